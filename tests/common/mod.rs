//! Common test utilities
//!
//! # Diagnostic Helpers
//! - [`format_diag_diagnostics`] - Format diagnostics for display in assertions
//! - [`messages`] - Collect validation messages in order
//!
//! # Parsing Helpers
//! - [`parse_cleanly`] - Parse source and return the model, panicking on errors
//!
//! # Validation Helpers
//! - [`default_services`] - Language services with the built-in checks
//! - [`validate_source`] - Parse cleanly and run the built-in checks

#![allow(dead_code)]

use rechenbrett_spreadsheet::diag::Diag;
use rechenbrett_spreadsheet::{
    Model, ServiceConfig, SpreadsheetServices, ValidationOutcome, create_spreadsheet_services,
    parse,
};

/// Format diagnostics for display in assertion messages.
pub fn format_diag_diagnostics(diags: &[Diag]) -> String {
    diags
        .iter()
        .map(|diag| format!("{diag:?}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse source and return the model.
///
/// # Panics
/// Panics if lexing or parsing reported anything.
pub fn parse_cleanly(source: &str) -> Model {
    let result = parse(source);
    assert!(
        result.diagnostics.is_empty(),
        "Expected clean parse for:\n{}\n\nDiagnostics:\n{}",
        source,
        format_diag_diagnostics(&result.diagnostics)
    );
    result.ast
}

pub fn default_services() -> SpreadsheetServices {
    create_spreadsheet_services(ServiceConfig::default()).expect("built-in checks register")
}

/// Parse source cleanly and run the built-in checks over it.
pub fn validate_source(source: &str) -> ValidationOutcome {
    let model = parse_cleanly(source);
    default_services().runner().validate(&model)
}

pub fn messages(outcome: &ValidationOutcome) -> Vec<&str> {
    outcome
        .diagnostics
        .iter()
        .map(|diag| diag.message.as_str())
        .collect()
}

/// Builds a document declaring `count` persons, alternating lower-case and
/// capitalized names, one per line.
pub fn alternating_persons(count: usize) -> String {
    (0..count)
        .map(|i| {
            if i % 2 == 0 {
                format!("person p{i}\n")
            } else {
                format!("person P{i}\n")
            }
        })
        .collect()
}
