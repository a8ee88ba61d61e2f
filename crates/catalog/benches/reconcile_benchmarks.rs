use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use vintrade_catalog::{Product, ProductFields, reconcile};
use vintrade_core::{ProductId, SupplierKey};
use vintrade_pricing::FormulaSet;

const SUPPLIERS: [&str; 8] = [
    "acme", "kermit", "zed", "vinifera", "north-berkeley", "polaner", "skurnik", "louis-dressner",
];

fn catalog(rows: usize, formulas: &FormulaSet) -> Vec<Product> {
    (0..rows)
        .map(|i| {
            Product::priced(
                ProductId::new(),
                SupplierKey::new(SUPPLIERS[i % SUPPLIERS.len()]).unwrap(),
                ProductFields {
                    producer: format!("Producer {i}"),
                    name: format!("Cuvée {i}"),
                    pack_size: Some(12),
                    bottle_size_ml: Some(750.0),
                    cost_per_case: Some(100.0 + i as f64),
                    category: "Red".to_string(),
                    ..ProductFields::default()
                },
                BTreeMap::new(),
                Utc::now(),
                formulas,
            )
        })
        .collect()
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    let formulas = FormulaSet::default();
    let supplier = SupplierKey::new("acme").unwrap();

    for rows in [100usize, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), rows, |b, &rows| {
            let active = catalog(rows, &formulas);
            // Every third row is referenced by an order.
            let live: HashSet<ProductId> = active.iter().step_by(3).map(|p| p.id).collect();
            let batch = catalog(rows / SUPPLIERS.len(), &formulas);

            b.iter(|| {
                let r = reconcile(
                    active.clone(),
                    Vec::new(),
                    batch.clone(),
                    &supplier,
                    &live,
                    Utc::now(),
                );
                black_box(r.outcome.replaced)
            });
        });
    }

    group.finish();
}

fn bench_reprice(c: &mut Criterion) {
    let mut group = c.benchmark_group("reprice_catalog");
    let formulas = FormulaSet::default();

    for rows in [1_000usize, 10_000].iter() {
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), rows, |b, &rows| {
            let products = catalog(rows, &formulas);
            b.iter(|| {
                let mut products = products.clone();
                for p in products.iter_mut() {
                    p.reprice(&formulas);
                }
                black_box(products.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reconcile, bench_reprice);
criterion_main!(benches);
