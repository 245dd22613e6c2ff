//! Parser performance benchmarks.
//!
//! Measures parsing and ingestion performance across dataset sizes.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use dashbase::{
    CollectionStore, CsvDialect, FileType, IngestRequest, IngestionCoordinator, ParserConfig,
    TextParser,
};

/// Generate synthetic CSV data with the specified number of rows and columns.
fn generate_csv_data(rows: usize, cols: usize) -> String {
    let mut data = String::new();

    // Header row
    for i in 0..cols {
        if i > 0 {
            data.push(',');
        }
        data.push_str(&format!("column_{}", i + 1));
    }
    data.push('\n');

    // Data rows
    for row in 0..rows {
        for col in 0..cols {
            if col > 0 {
                data.push(',');
            }
            // Mix of data types
            match col % 5 {
                0 => data.push_str(&format!("ID_{:06}", row)),
                1 => data.push_str(&format!("{:.2}", row as f64 * 1.5)),
                2 => data.push_str(&format!("\"{}, {}\"", row % 12, row % 28)),
                3 => data.push_str(if row % 2 == 0 { "true" } else { "false" }),
                4 => data.push_str(&format!("{}", row % 10)),
                _ => unreachable!(),
            }
        }
        data.push('\n');
    }

    data
}

/// Generate the same dataset as a JSON array.
fn generate_json_data(rows: usize, cols: usize) -> String {
    let records: Vec<serde_json::Value> = (0..rows)
        .map(|row| {
            let fields: serde_json::Map<String, serde_json::Value> = (0..cols)
                .map(|col| {
                    let value = match col % 3 {
                        0 => serde_json::json!(format!("ID_{:06}", row)),
                        1 => serde_json::json!(row as f64 * 1.5),
                        _ => serde_json::json!(row % 2 == 0),
                    };
                    (format!("column_{}", col + 1), value)
                })
                .collect();
            serde_json::Value::Object(fields)
        })
        .collect();

    serde_json::to_string(&records).unwrap()
}

/// Benchmark CSV parsing in both dialects.
fn bench_parse_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_csv");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_csv_data(*rows, 10);
        group.throughput(Throughput::Bytes(data.len() as u64));

        for (label, dialect) in [("simple", CsvDialect::Simple), ("rfc4180", CsvDialect::Rfc4180)] {
            let parser = TextParser::with_config(ParserConfig {
                csv_dialect: dialect,
                ..ParserConfig::default()
            });
            group.bench_with_input(BenchmarkId::new(label, rows), &data, |b, data| {
                b.iter(|| black_box(parser.parse(data, FileType::Csv, "bench.csv").unwrap()))
            });
        }
    }

    group.finish();
}

/// Benchmark JSON parsing.
fn bench_parse_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_json");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_json_data(*rows, 10);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            let parser = TextParser::new();
            b.iter(|| black_box(parser.parse(data, FileType::Json, "bench.json").unwrap()))
        });
    }

    group.finish();
}

/// Benchmark a full ingest that replaces the same collection each iteration.
fn bench_ingest_replace(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest_replace");
    let coordinator = IngestionCoordinator::new(Arc::new(CollectionStore::in_memory()));

    for rows in [100, 1_000].iter() {
        let data = generate_csv_data(*rows, 10);
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter(|| {
                black_box(
                    coordinator
                        .ingest(IngestRequest::new("bench.csv", data.as_str()))
                        .unwrap(),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_csv, bench_parse_json, bench_ingest_replace);
criterion_main!(benches);
