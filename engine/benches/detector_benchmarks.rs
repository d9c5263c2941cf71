//! Detector Benchmarks
//!
//! - Pure calculations: Haversine distance, aggregation
//! - `assess` against profiles of increasing history length
//! - Full `analyze` round trip through the in-memory store
//!
//! Run with: `cargo bench -p login-risk-engine`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used)] // Benchmarks can use expect for setup

use chrono::Duration;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use login_risk_engine::geodesy::distance_km;
use login_risk_engine::scoring::aggregate;
use login_risk_engine::sinks::NullSink;
use login_risk_engine::resolvers::StaticGeoResolver;
use login_risk_engine::stores::{InMemoryProfileStore, RetentionPolicy};
use login_risk_engine::{DetectorConfig, RiskDetector, RiskFactors, RiskWeights, UserId, UserProfile};
use login_risk_testing::{addresses, geo_table, test_time, AttemptBuilder};

fn detector() -> RiskDetector<StaticGeoResolver, InMemoryProfileStore, NullSink> {
    RiskDetector::new(
        DetectorConfig::default(),
        geo_table(),
        InMemoryProfileStore::new(),
        NullSink,
    )
    .expect("default configuration is valid")
}

/// Build a profile by assessing `len` hourly attempts.
fn profile_with_history(runtime: &tokio::runtime::Runtime, len: i64) -> UserProfile {
    let detector = detector();
    let mut profile = UserProfile::new(UserId::from("bench"));
    runtime.block_on(async {
        for hour in 0..len {
            let attempt = AttemptBuilder::new("bench")
                .after(Duration::hours(hour))
                .from(addresses::RESOLVABLE[usize::try_from(hour).unwrap_or(0) % 3])
                .build();
            detector.assess(&attempt, &mut profile).await;
        }
    });
    profile
}

/// Benchmark the pure scoring helpers
fn benchmark_calculations(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculations");
    group.throughput(Throughput::Elements(1));

    group.bench_function("haversine", |b| {
        b.iter(|| {
            distance_km(
                black_box(40.7128),
                black_box(-74.0060),
                black_box(35.6762),
                black_box(139.6503),
            )
        });
    });

    let weights = RiskWeights::default();
    group.bench_function("aggregate", |b| {
        b.iter(|| aggregate(black_box(&RiskFactors::new(40, 100, 70, 35)), &weights));
    });

    group.finish();
}

/// Benchmark `assess` as history grows
fn benchmark_assess(c: &mut Criterion) {
    let mut group = c.benchmark_group("assess");
    group.throughput(Throughput::Elements(1));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");
    let detector = detector();

    for len in [10i64, 100, 1_000] {
        let profile = profile_with_history(&runtime, len);
        let attempt = AttemptBuilder::new("bench")
            .at(test_time())
            .after(Duration::hours(len))
            .from(addresses::TOKYO)
            .build();

        group.bench_with_input(BenchmarkId::from_parameter(len), &profile, |b, profile| {
            b.to_async(&runtime).iter(|| async {
                let mut profile = profile.clone();
                black_box(detector.assess(&attempt, &mut profile).await)
            });
        });
    }

    group.finish();
}

/// Benchmark a full load → assess → save → publish round trip
fn benchmark_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    group.throughput(Throughput::Elements(1));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");

    group.bench_function("in_memory_store", |b| {
        // Repeated analyses of one user; cap history so iterations stay comparable.
        let store = InMemoryProfileStore::new()
            .with_retention(RetentionPolicy::unbounded().with_max_history(100));
        let detector = RiskDetector::new(DetectorConfig::default(), geo_table(), store, NullSink)
            .expect("default configuration is valid");
        let attempt = AttemptBuilder::new("bench").build();

        b.to_async(&runtime).iter(|| async {
            let _ = black_box(detector.analyze(&attempt).await);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_calculations,
    benchmark_assess,
    benchmark_analyze,
);
criterion_main!(benches);
