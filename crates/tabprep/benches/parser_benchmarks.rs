//! Loading performance benchmarks.
//!
//! Measures parsing and loading across table sizes and delimiters.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Write;
use tabprep::{LoadOptions, Parser, load_path};
use tempfile::NamedTempFile;

/// Generate a long-format growth table: population, time, then `values`
/// measurement columns with a sprinkling of gaps, zeros and negatives.
fn generate_long_data(rows: usize, values: usize, delimiter: char) -> String {
    let mut data = String::from("population");
    data.push(delimiter);
    data.push_str("time");
    for i in 0..values {
        data.push(delimiter);
        data.push_str(&format!("OD_{}", i + 1));
    }
    data.push('\n');

    for row in 0..rows {
        data.push_str(&format!("pop_{}", row % 12));
        data.push(delimiter);
        data.push_str(&format!("{}", (row / 12) * 5));
        for col in 0..values {
            data.push(delimiter);
            match (row + col) % 7 {
                0 => data.push_str("NA"),
                1 => data.push('0'),
                2 => data.push_str(&format!("-{:.3}", (row % 10) as f64 / 100.0)),
                _ => data.push_str(&format!("{:.3}", (row * col) as f64 / 1000.0)),
            }
        }
        data.push('\n');
    }

    data
}

/// Benchmark parsing in-memory bytes.
fn bench_parse_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_bytes");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_long_data(*rows, 8, '\t');

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            let parser = Parser::new();
            b.iter(|| black_box(parser.parse_bytes(data.as_bytes(), b'\t').unwrap()))
        });
    }

    group.finish();
}

/// Benchmark loading files with delimiter auto-detection.
fn bench_load_txt(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_txt");

    for (label, delimiter) in [("tab", '\t'), ("comma", ',')] {
        let data = generate_long_data(1_000, 8, delimiter);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("delimiter", label), &data, |b, data| {
            b.iter_with_setup(
                || {
                    let mut temp = NamedTempFile::with_suffix(".txt").unwrap();
                    temp.write_all(data.as_bytes()).unwrap();
                    temp
                },
                |temp| black_box(load_path(temp.path(), &LoadOptions::default()).unwrap()),
            )
        });
    }

    group.finish();
}

/// Benchmark loading with the numeric alternate forms.
fn bench_load_alternate_forms(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_alternate_forms");

    for values in [4, 16, 64].iter() {
        let data = generate_long_data(1_000, *values, ',');
        let options = LoadOptions::new().with_alternate_forms(true);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("value_columns", values), &data, |b, data| {
            b.iter_with_setup(
                || {
                    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
                    temp.write_all(data.as_bytes()).unwrap();
                    temp
                },
                |temp| black_box(load_path(temp.path(), &options).unwrap()),
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_bytes,
    bench_load_txt,
    bench_load_alternate_forms,
);
criterion_main!(benches);
