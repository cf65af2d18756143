//! Benchmarks for trade classification.
//!
//! Run with: cargo bench -p ifrs13-classify

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;

use ifrs13_classify::{classify_batch, classify_trade, ClassificationContext};
use ifrs13_core::{ClassificationConfig, CurrencyCode, OptionType, ProductType, Trade};
use ifrs13_risk::{RiskExposureGenerator, SyntheticGenerator};

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

fn create_test_trade(id: usize) -> Trade {
    let currencies = ["USD", "EUR", "GBP", "JPY"];
    let products = ProductType::all();
    let product = products[id % products.len()];
    let expiry = if product.is_option() {
        (id % 12) as f64
    } else {
        0.0
    };

    Trade::builder()
        .trade_id(format!("TRD_{id:05}"))
        .product_type(product)
        .currency(CurrencyCode::new(currencies[id % currencies.len()]).unwrap())
        .option_type(if id % 2 == 0 {
            OptionType::Payer
        } else {
            OptionType::Receiver
        })
        .notional(Decimal::from(1_000_000 + (id as i64 % 50) * 250_000))
        .strike(1.0 + (id % 9) as f64 * 0.5)
        .expiry_tenor(expiry)
        .maturity_tenor(expiry + 2.0 + (id % 38) as f64)
        .build()
        .unwrap()
}

fn create_test_trades(count: usize) -> Vec<Trade> {
    (0..count).map(create_test_trade).collect()
}

// =============================================================================
// SINGLE TRADE
// =============================================================================

fn bench_risk_generation(c: &mut Criterion) {
    let generator = SyntheticGenerator::new();
    let trade = create_test_trade(0);

    c.bench_function("synthetic_risk_swaption", |b| {
        b.iter(|| generator.generate(black_box(&trade)))
    });
}

fn bench_single_trade(c: &mut Criterion) {
    let context = ClassificationContext::standard().unwrap();
    let generator = SyntheticGenerator::new();
    let config = ClassificationConfig::default();
    let trade = create_test_trade(0);

    c.bench_function("classify_single_trade", |b| {
        b.iter(|| classify_trade(black_box(&trade), &generator, &context, &config))
    });
}

// =============================================================================
// BATCH
// =============================================================================

fn bench_batch_sequential(c: &mut Criterion) {
    let context = ClassificationContext::standard().unwrap();
    let generator = SyntheticGenerator::new();
    let config = ClassificationConfig::sequential();

    let mut group = c.benchmark_group("batch_sequential");
    group.sample_size(30);

    for size in [10, 100, 1000].iter() {
        let trades = create_test_trades(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &trades, |b, trades| {
            b.iter(|| classify_batch(black_box(trades), &generator, &context, &config))
        });
    }
    group.finish();
}

fn bench_batch_comparison(c: &mut Criterion) {
    let context = ClassificationContext::standard().unwrap();
    let generator = SyntheticGenerator::new();
    let trades = create_test_trades(1000);

    let mut group = c.benchmark_group("batch_comparison_1000");
    group.sample_size(30);
    group.throughput(Throughput::Elements(1000));

    let sequential = ClassificationConfig::sequential();
    group.bench_function("sequential", |b| {
        b.iter(|| classify_batch(black_box(&trades), &generator, &context, &sequential))
    });

    let parallel = ClassificationConfig::new().with_parallel_threshold(1);
    group.bench_function("parallel", |b| {
        b.iter(|| classify_batch(black_box(&trades), &generator, &context, &parallel))
    });
    group.finish();
}

criterion_group!(single_trade, bench_risk_generation, bench_single_trade,);

criterion_group!(batch, bench_batch_sequential, bench_batch_comparison,);

criterion_main!(single_trade, batch);
