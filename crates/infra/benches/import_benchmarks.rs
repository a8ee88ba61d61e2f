use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use vintrade_import::{Cell, Table, map_columns};
use vintrade_infra::{ImportRequest, Services};
use vintrade_core::SupplierKey;

fn price_list(rows: usize) -> Table {
    let mut table = vec![
        ["SKU", "Producer", "Wine", "Vintage", "Pack", "Size", "Type", "FOB"]
            .iter()
            .map(|h| Cell::text(*h))
            .collect::<Vec<_>>(),
    ];
    for i in 0..rows {
        table.push(vec![
            Cell::text(format!("SKU-{i}")),
            Cell::text(format!("Producer {}", i % 40)),
            Cell::text(format!("Cuvée {i}")),
            Cell::Number(2015.0 + (i % 8) as f64),
            Cell::Number(if i % 3 == 0 { 6.0 } else { 12.0 }),
            Cell::text("750ml"),
            Cell::text(if i % 5 == 0 { "Gin" } else { "Red" }),
            Cell::Number(80.0 + (i % 97) as f64),
        ]);
    }
    Table::new(table)
}

/// End-to-end import (parse, price, reconcile, commit) into a warm catalog.
fn bench_run_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_import");

    for rows in [100usize, 1_000, 5_000] {
        let table = price_list(rows);
        let supplier = SupplierKey::new("Acme").unwrap();
        let mapping = map_columns(&table.headers(), &supplier, None).mapping;

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &table, |b, table| {
            let services = Services::in_memory();
            b.iter(|| {
                let summary = services
                    .imports
                    .run_import(ImportRequest {
                        supplier: "Acme".to_string(),
                        table: table.clone(),
                        mapping: mapping.clone(),
                        source_name: "acme.csv".to_string(),
                    })
                    .unwrap();
                black_box(summary);
            });
        });
    }

    group.finish();
}

fn bench_propose_mapping(c: &mut Criterion) {
    let table = price_list(0);
    let headers = table.headers();
    let supplier = SupplierKey::new("Acme").unwrap();

    c.bench_function("map_columns_detect", |b| {
        b.iter(|| black_box(map_columns(black_box(&headers), &supplier, None)));
    });
}

criterion_group!(benches, bench_run_import, bench_propose_mapping);
criterion_main!(benches);
