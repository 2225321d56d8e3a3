//! Benchmark for conversion operations.
//!
//! Run with: cargo bench --bench conversion

use criterion::{Criterion, criterion_group, criterion_main};
use rusqlite::Connection;
use rusqlite_arrow::{ReadOptions, batch_to_table, query_to_arrow, query_to_arrow_with_options};

const ROWS: usize = 10_000;

fn seeded_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE readings (id INTEGER, sensor TEXT, value DOUBLE, ok BOOLEAN)")
        .unwrap();
    {
        let mut stmt = conn
            .prepare("INSERT INTO readings VALUES (?, ?, ?, ?)")
            .unwrap();
        for i in 0..ROWS {
            stmt.execute(rusqlite::params![
                i as i64,
                format!("sensor-{}", i % 16),
                i as f64 / 3.0,
                i % 2 == 0,
            ])
            .unwrap();
        }
    }
    conn
}

fn benchmark_read(c: &mut Criterion) {
    let conn = seeded_connection();

    c.bench_function("query_to_arrow_10k_rows", |b| {
        b.iter(|| {
            let batch = query_to_arrow(&conn, "SELECT * FROM readings").unwrap();
            std::hint::black_box(batch)
        });
    });

    c.bench_function("query_to_arrow_10k_rows_preallocated", |b| {
        let options = ReadOptions::with_row_capacity(ROWS);
        b.iter(|| {
            let batch =
                query_to_arrow_with_options(&conn, "SELECT * FROM readings", &options).unwrap();
            std::hint::black_box(batch)
        });
    });
}

fn benchmark_write(c: &mut Criterion) {
    let conn = seeded_connection();
    let batch = query_to_arrow(&conn, "SELECT * FROM readings").unwrap();

    c.bench_function("batch_to_table_10k_rows", |b| {
        b.iter(|| {
            let mut target = Connection::open_in_memory().unwrap();
            batch_to_table(&mut target, &batch, "readings").unwrap();
            std::hint::black_box(target)
        });
    });
}

criterion_group!(benches, benchmark_read, benchmark_write);
criterion_main!(benches);
