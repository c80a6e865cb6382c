//! 性能基准测试 - 分账与费用计算
//!
//! 测试场景:
//! 1. 不同收款人数量下的最大余数分账
//! 2. 不同金额级别的费用计算

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use paycore::{
    domain::{Money, PaymentMethod, SplitInput},
    service::{fee_calculator::FeeCalculator, rates::PlatformRates, split_calculator},
};
use rust_decimal::Decimal;

fn splits_of(count: usize) -> Vec<SplitInput> {
    // 构造加总恰好为 100 的分账表：前 n-1 个均分，最后一个补齐
    let even = Decimal::from(100i64) / Decimal::from(count as i64);
    let even = even.round_dp(2);
    let last = Decimal::from(100i64) - even * Decimal::from((count - 1) as i64);
    (0..count)
        .map(|i| SplitInput {
            recipient_id: format!("recipient_{}", i),
            role: "affiliate".to_string(),
            percent: if i == count - 1 { last } else { even },
        })
        .collect()
}

fn bench_split_calculator(c: &mut Criterion) {
    let net = Money::from_decimal_str("999.99").expect("net amount");

    let mut group = c.benchmark_group("split_calculator");
    for count in [1usize, 2, 3, 5] {
        let splits = splits_of(count);
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &splits,
            |b, splits| {
                b.iter(|| split_calculator::calculate(black_box(net), black_box(splits)));
            },
        );
    }
    group.finish();
}

fn bench_fee_calculator(c: &mut Criterion) {
    let calculator = FeeCalculator::new(PlatformRates::default());
    let amounts = [("small_1", "1.00"), ("medium_297", "297.00"), ("large_100k", "100000.00")];

    let mut group = c.benchmark_group("fee_calculator");
    for (name, amount) in amounts {
        let gross = Money::from_decimal_str(amount).expect("gross amount");
        group.bench_with_input(BenchmarkId::from_parameter(name), &gross, |b, gross| {
            b.iter(|| {
                calculator.calculate(black_box(*gross), black_box(PaymentMethod::Card), 12)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_split_calculator, bench_fee_calculator);
criterion_main!(benches);
