//! Criterion benchmarks for curve evaluation.
//!
//! Measures local interpolation, spline evaluation (including the first
//! lazy solve) and the cost of each differentiation order.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use curve_core::config::CurveParams;
use curve_core::market_data::curves::Curve;

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
}

/// Quarterly nodes with a flat 3% continuously compounded rate.
fn nodes(n: usize) -> Vec<(NaiveDate, f64)> {
    (0..n)
        .map(|i| {
            let date = anchor() + Duration::days(91 * i as i64);
            (date, (-0.03 * (91 * i) as f64 / 365.0).exp())
        })
        .collect()
}

fn spline_params(nodes: &[(NaiveDate, f64)]) -> CurveParams {
    let first = nodes[1].0;
    let last = nodes[nodes.len() - 1].0;
    let mut knots = vec![first; 4];
    knots.extend(nodes[2..nodes.len() - 1].iter().map(|(d, _)| *d));
    knots.extend(std::iter::repeat(last).take(4));
    CurveParams::default().with_knots(knots)
}

fn query_dates(n: usize) -> Vec<NaiveDate> {
    let span = 91 * (n as i64 - 1);
    (0..100).map(|i| anchor() + Duration::days(i * span / 100)).collect()
}

/// Benchmark local log-linear evaluation.
fn bench_local_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_evaluation");

    for size in [10, 40, 120] {
        let curve = Curve::from_pairs(nodes(size), CurveParams::default()).unwrap();
        let dates = query_dates(size);
        group.bench_with_input(BenchmarkId::new("value_100", size), &curve, |b, curve| {
            b.iter(|| {
                for date in &dates {
                    let _ = curve.value(black_box(*date));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark spline solve and evaluation.
fn bench_spline(c: &mut Criterion) {
    let mut group = c.benchmark_group("spline");

    for size in [10, 40] {
        let pairs = nodes(size);
        let params = spline_params(&pairs);

        group.bench_with_input(
            BenchmarkId::new("construct_and_solve", size),
            &(&pairs, &params),
            |b, (pairs, params)| {
                b.iter(|| {
                    let curve = Curve::from_pairs(pairs.to_vec(), (*params).clone()).unwrap();
                    curve.value(black_box(pairs[size / 2].0)).unwrap()
                });
            },
        );

        let curve = Curve::from_pairs(pairs.clone(), params.clone()).unwrap();
        let dates = query_dates(size);
        group.bench_with_input(BenchmarkId::new("value_100", size), &curve, |b, curve| {
            b.iter(|| {
                for date in &dates {
                    let _ = curve.value(black_box(*date));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark evaluation at each differentiation order.
fn bench_ad_orders(c: &mut Criterion) {
    let mut group = c.benchmark_group("ad_orders");
    let pairs = nodes(20);
    let date = pairs[7].0 + Duration::days(30);

    for order in [0u8, 1, 2] {
        let params = spline_params(&pairs).with_ad_order(order);
        let curve = Curve::from_pairs(pairs.clone(), params).unwrap();
        group.bench_with_input(BenchmarkId::new("value", order), &curve, |b, curve| {
            b.iter(|| curve.value(black_box(date)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_local_evaluation,
    bench_spline,
    bench_ad_orders
);
criterion_main!(benches);
