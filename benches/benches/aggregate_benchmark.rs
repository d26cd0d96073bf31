//! Aggregation throughput benchmarks.
//!
//! Run with: `cargo bench --package blockprice-bench`

use blockprice_aggregate::BlockAggregator;
use blockprice_bench::{synthetic_boundaries, synthetic_ticks};
use blockprice_store::TableBuilder;
use blockprice_types::Exchange;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

/// Full multi-source aggregation: four exchange passes over a shared
/// window sequence, then table construction.
fn aggregation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for blocks in [1_000u64, 10_000] {
        let per_block = 50;
        let boundaries = synthetic_boundaries(100, blocks);
        let sources: Vec<_> = Exchange::all()
            .iter()
            .map(|ex| synthetic_ticks(&boundaries, *ex, per_block))
            .collect();

        let total_ticks: u64 = sources.iter().map(|s| s.len() as u64).sum();
        group.throughput(Throughput::Elements(total_ticks));

        group.bench_with_input(
            BenchmarkId::new("four-sources", blocks),
            &blocks,
            |b, _| {
                b.iter(|| {
                    let mut agg = BlockAggregator::new(&boundaries).unwrap();
                    for (exchange, ticks) in Exchange::all().iter().zip(&sources) {
                        let mut pass = agg.begin_pass(*exchange);
                        for tick in ticks {
                            pass.feed(*tick);
                        }
                        black_box(pass.finish());
                    }
                    black_box(TableBuilder::new().build(agg))
                });
            },
        );
    }

    group.finish();
}

/// Window consolidation in isolation: one window takes the whole stream,
/// so the run is dominated by the buffer sort and OHLCV fold.
fn consolidate_benchmark(c: &mut Criterion) {
    let boundaries = synthetic_boundaries(100, 1);
    let ticks = synthetic_ticks(&boundaries, Exchange::Coinbase, 10_000);

    let mut group = c.benchmark_group("window");
    group.throughput(Throughput::Elements(ticks.len() as u64));
    group.bench_function("consolidate-10k", |b| {
        b.iter(|| {
            let mut agg = BlockAggregator::new(&boundaries).unwrap();
            let mut pass = agg.begin_pass(Exchange::Coinbase);
            for tick in &ticks {
                pass.feed(*tick);
            }
            black_box(pass.finish());
            black_box(agg.into_windows())
        });
    });
    group.finish();
}

criterion_group!(benches, aggregation_benchmark, consolidate_benchmark);
criterion_main!(benches);
