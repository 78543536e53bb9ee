//! Throughput benchmarks for bulk wallet analysis.
//!
//! Run with: `cargo bench --bench throughput`

use std::collections::HashMap;

use behavior_analyzer::{build_sequences, BehaviorAnalyzer};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use swap_core::config::AnalysisConfig;
use swap_core::types::{SwapEvent, TradingStyle};

const T0: i64 = 1_700_000_000;

/// Generate a random wallet history. Buys and sells interleave loosely, so
/// some tokens end up unpaired or with replaced buys.
fn generate_random_wallet(rng: &mut impl Rng, event_count: usize) -> Vec<SwapEvent> {
    let token_count = rng.gen_range(1..=(event_count / 4).max(1));
    let mut ts = T0;

    (0..event_count)
        .map(|_| {
            ts += rng.gen_range(30..86_400);
            let mint = format!("mint{}", rng.gen_range(0..token_count));
            let sol = rng.gen_range(0.01..25.0);
            if rng.gen_bool(0.55) {
                SwapEvent::buy(mint, sol, ts)
            } else {
                SwapEvent::sell(mint, sol, ts)
            }
        })
        .collect()
}

fn generate_wallet_batch(count: usize, events_per_wallet: usize) -> Vec<(String, Vec<SwapEvent>)> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            (
                format!("wallet{}", i),
                generate_random_wallet(&mut rng, events_per_wallet),
            )
        })
        .collect()
}

/// Benchmark sequential analysis over a batch of wallets.
fn bench_batch_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_analyze");
    let analyzer = BehaviorAnalyzer::new();
    let config = AnalysisConfig::default();

    for wallet_count in [10, 100, 500].iter() {
        let wallets = generate_wallet_batch(*wallet_count, 200);

        group.throughput(Throughput::Elements(*wallet_count as u64));
        group.bench_with_input(
            BenchmarkId::new("sequential", wallet_count),
            &wallets,
            |b, wallets| {
                b.iter(|| {
                    let styles: Vec<TradingStyle> = wallets
                        .iter()
                        .map(|(wallet, events)| analyzer.analyze(wallet, events, &config).trading_style)
                        .collect();
                    black_box(styles)
                })
            },
        );
    }

    group.finish();
}

/// Benchmark parallel analysis over a batch of wallets using rayon.
fn bench_parallel_analyze(c: &mut Criterion) {
    use rayon::prelude::*;

    let mut group = c.benchmark_group("parallel_analyze");
    let analyzer = BehaviorAnalyzer::new();
    let config = AnalysisConfig::default();

    for wallet_count in [100, 500, 2_000].iter() {
        let wallets = generate_wallet_batch(*wallet_count, 200);

        group.throughput(Throughput::Elements(*wallet_count as u64));
        group.bench_with_input(
            BenchmarkId::new("parallel", wallet_count),
            &wallets,
            |b, wallets| {
                b.iter(|| {
                    let counts: HashMap<TradingStyle, usize> = wallets
                        .par_iter()
                        .map(|(wallet, events)| analyzer.analyze(wallet, events, &config).trading_style)
                        .fold(HashMap::new, |mut acc, style| {
                            *acc.entry(style).or_insert(0) += 1;
                            acc
                        })
                        .reduce(HashMap::new, |mut a, b| {
                            for (style, n) in b {
                                *a.entry(style).or_insert(0) += n;
                            }
                            a
                        });
                    black_box(counts)
                })
            },
        );
    }

    group.finish();
}

/// Benchmark grouping and pairing alone on large histories.
fn bench_sequence_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence_building");
    let mut rng = rand::thread_rng();
    let excluded = AnalysisConfig::default().excluded_mints;

    for size in [1_000, 10_000, 50_000].iter() {
        let events = generate_random_wallet(&mut rng, *size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("events", size), &events, |b, events| {
            b.iter(|| black_box(build_sequences(black_box(events), &excluded)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_batch_analyze,
    bench_parallel_analyze,
    bench_sequence_building,
);

criterion_main!(benches);
