//! Benchmark suite for the flowtrace analyzer.
//!
//! Run with: `cargo bench --package flowtrace`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flowtrace::prelude::*;

/// Deterministic synthetic batch: pseudo-random transfers over a fixed
/// account population, seeded with a few planted cycles and one hub.
fn synthetic_batch(tx_count: usize, account_count: usize) -> Vec<Transaction> {
    let mut txs: Vec<Transaction> = (0..tx_count)
        .map(|i| {
            let sender = i % account_count;
            let receiver = (i * 7 + 3) % account_count;
            Transaction::new(
                format!("T{i}"),
                format!("ACC_{sender}"),
                format!("ACC_{receiver}"),
                ((i * 31 + 17) % 9000) as f64 + 50.0,
                format!(
                    "2024-01-{:02}T{:02}:{:02}:00Z",
                    (i / 1440) % 28 + 1,
                    (i / 60) % 24,
                    i % 60
                ),
            )
        })
        .collect();

    // Planted 3-cycle and fan-in hub on dedicated accounts.
    txs.push(Transaction::new("C1", "RING_A", "RING_B", 500.0, "2024-01-01T00:00:00Z"));
    txs.push(Transaction::new("C2", "RING_B", "RING_C", 490.0, "2024-01-01T01:00:00Z"));
    txs.push(Transaction::new("C3", "RING_C", "RING_A", 480.0, "2024-01-01T02:00:00Z"));
    for i in 0..12 {
        txs.push(Transaction::new(
            format!("H{i}"),
            format!("MULE_{i}"),
            "COLLECTOR",
            60.0,
            format!("2024-01-01T{:02}:30:00Z", i),
        ));
    }

    txs
}

fn analyze_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyzer/full-pipeline");

    for size in [100, 1_000, 5_000].iter() {
        let batch = synthetic_batch(*size, (*size / 10).max(10));

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("transactions", size), &batch, |b, batch| {
            b.iter(|| flowtrace::analyze(black_box(batch)))
        });
    }

    group.finish();
}

criterion_group!(benches, analyze_benchmark);
criterion_main!(benches);
