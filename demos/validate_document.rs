//! Validates a document and prints its diagnostics.
//!
//! ```bash
//! cargo run --example validate_document -- people.rbs
//! RUST_LOG=rechenbrett_spreadsheet=debug cargo run --example validate_document
//! ```
//!
//! Without a path, a built-in sample document is validated.

use miette::{IntoDiagnostic, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use rechenbrett_spreadsheet::diag::{SourceFile, convert_diagnostics_to_reports};
use rechenbrett_spreadsheet::{ServiceConfig, create_spreadsheet_services};

const SAMPLE: &str = "\
// People on the sheet
person Alice
person bob

Hello Alice!
Hello Carol!
";

fn main() -> Result<()> {
    // Respects RUST_LOG.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let (name, text) = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).into_diagnostic()?;
            (path, text)
        }
        None => ("sample.rbs".to_string(), SAMPLE.to_string()),
    };

    let services = create_spreadsheet_services(ServiceConfig::default())?;
    let built = services.build_document(&text);

    for fault in &built.validation.faults {
        tracing::error!(%fault, "check fault");
    }

    let diagnostics = built.all();
    let source = SourceFile::with_name(text.as_str(), name.as_str());
    for report in convert_diagnostics_to_reports(&diagnostics, &source) {
        eprintln!("{report:?}");
    }
    println!(
        "{}: {} diagnostic(s), {} node(s) checked",
        name,
        diagnostics.len(),
        built.validation.nodes_visited
    );
    Ok(())
}
