//! Document build benchmarks
//!
//! Measures the stages a language server runs on every edit:
//!
//! - **Parsing**: lexing and parsing into a model
//! - **Validation**: the check pass over an already parsed model
//! - **Full build**: parse, link, validate, and LSP conversion
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench validation
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rechenbrett_spreadsheet::{ServiceConfig, create_spreadsheet_services, parse};

const SIZES: [usize; 3] = [10, 100, 1_000];

/// A document with `count` persons (every other one lower-case) and one
/// greeting per person.
fn document(count: usize) -> String {
    let mut text = String::new();
    for i in 0..count {
        let name = if i % 2 == 0 {
            format!("p{i}")
        } else {
            format!("P{i}")
        };
        text.push_str(&format!("person {name}\nHello {name}!\n"));
    }
    text
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    for size in SIZES {
        let text = document(size);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| parse(black_box(text)))
        });
    }
    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let services =
        create_spreadsheet_services(ServiceConfig::default()).expect("built-in checks register");
    let mut group = c.benchmark_group("validation");
    for size in SIZES {
        let model = parse(&document(size)).ast;
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &model, |b, model| {
            b.iter(|| services.runner().validate(black_box(model)))
        });
    }
    group.finish();
}

fn bench_full_build(c: &mut Criterion) {
    let services =
        create_spreadsheet_services(ServiceConfig::default()).expect("built-in checks register");
    let mut group = c.benchmark_group("full_build");
    for size in SIZES {
        let text = document(size);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| services.diagnostics_for("file:///bench.rbs", 1, black_box(text)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parsing, bench_validation, bench_full_build);
criterion_main!(benches);
