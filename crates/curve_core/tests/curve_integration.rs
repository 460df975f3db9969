//! End-to-end tests for curve evaluation, spline tails, transformations and
//! differentiation through the public API.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use curve_core::config::CurveParams;
use curve_core::market_data::curves::{
    day_ordinal, Curve, DateCurve, Endpoints, Horizon, Interpolation, InterpolationFn, NodeSet,
    SplineAdapter, SplineEndpoint, ValueCurve,
};
use curve_core::math::spline::SplineEvaluator;
use curve_core::types::{ErrorKind, Number};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn clamped(first: NaiveDate, interior: &[NaiveDate], last: NaiveDate) -> Vec<NaiveDate> {
    let mut t = vec![first; 4];
    t.extend_from_slice(interior);
    t.extend(std::iter::repeat(last).take(4));
    t
}

fn annual_nodes() -> Vec<(NaiveDate, f64)> {
    vec![
        (d(2022, 1, 1), 1.0),
        (d(2023, 1, 1), 0.98),
        (d(2024, 1, 1), 0.955),
        (d(2025, 1, 1), 0.925),
        (d(2026, 1, 1), 0.89),
    ]
}

/// Annual nodes with a spline from 2023 onwards.
fn spline_curve(ad: u8) -> Curve {
    let knots = clamped(d(2023, 1, 1), &[d(2024, 1, 1), d(2025, 1, 1)], d(2026, 1, 1));
    Curve::from_pairs(
        annual_nodes(),
        CurveParams::default()
            .with_knots(knots)
            .with_id("sp_")
            .with_ad_order(ad),
    )
    .unwrap()
}

#[test]
fn test_log_linear_example() {
    let curve = Curve::from_pairs(
        vec![
            (d(2022, 1, 1), 1.0),
            (d(2022, 4, 1), 0.99),
            (d(2022, 7, 1), 0.98),
            (d(2022, 10, 1), 0.97),
        ],
        CurveParams::default(),
    )
    .unwrap();
    let f = (d(2022, 5, 16) - d(2022, 4, 1)).num_days() as f64
        / (d(2022, 7, 1) - d(2022, 4, 1)).num_days() as f64;
    let expected = (0.99_f64.ln() + (0.98_f64.ln() - 0.99_f64.ln()) * f).exp();
    assert_relative_eq!(
        curve.value(d(2022, 5, 16)).unwrap().real(),
        expected,
        epsilon = 1e-15
    );
}

#[test]
fn test_translate_example() {
    let curve = Curve::from_pairs(
        vec![
            (d(2022, 1, 1), 1.0),
            (d(2023, 1, 1), 0.98),
            (d(2024, 1, 1), 0.955),
        ],
        CurveParams::default(),
    )
    .unwrap();

    let moved = curve.translate(d(2022, 12, 1), false).unwrap();
    assert_eq!(moved.anchor(), d(2022, 12, 1));
    assert_eq!(moved.value(d(2022, 12, 1)).unwrap().real(), 1.0);
    assert_ne!(moved.id(), curve.id());

    let err = curve.translate(d(2023, 6, 1), false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralConstraint);
}

#[test]
fn test_spline_tail_reproduces_nodes() {
    let curve = spline_curve(0);
    for (date, v) in annual_nodes() {
        assert_relative_eq!(curve.value(date).unwrap().real(), v, epsilon = 1e-12);
    }
    // Local rule governs up to and including the first knot.
    let local = Curve::from_pairs(annual_nodes(), CurveParams::default()).unwrap();
    assert_eq!(
        curve.value(d(2022, 7, 1)).unwrap(),
        local.value(d(2022, 7, 1)).unwrap()
    );
    // Beyond the last knot the spline basis vanishes.
    assert_eq!(curve.value(d(2026, 6, 1)).unwrap().real(), 1.0);
}

#[test]
fn test_natural_spline_has_zero_curvature_at_ends() {
    let dates: Vec<NaiveDate> = annual_nodes().iter().skip(1).map(|(d, _)| *d).collect();
    let values: Vec<f64> = annual_nodes().iter().skip(1).map(|(_, v)| *v).collect();
    let nodes = NodeSet::new(dates.clone(), values).unwrap();
    let knots = clamped(dates[0], &dates[1..3], dates[3]);

    let adapter = SplineAdapter::solving(knots, Endpoints::default(), &dates, true).unwrap();
    let spline = adapter.spline(&nodes).unwrap();
    assert_relative_eq!(spline.derivative(day_ordinal(dates[0]), 2), 0.0, epsilon = 1e-12);
    assert_relative_eq!(spline.derivative(day_ordinal(dates[3]), 2), 0.0, epsilon = 1e-12);
}

#[test]
fn test_not_a_knot_spline_is_smooth_across_removed_knot() {
    let dates = [
        d(2022, 1, 1),
        d(2023, 1, 1),
        d(2024, 1, 1),
        d(2025, 1, 1),
        d(2026, 1, 1),
    ];
    let nodes = NodeSet::new(dates.to_vec(), vec![0.0, 0.02, 0.045, 0.075, 0.11]).unwrap();
    let knots = clamped(dates[0], &dates[1..4], dates[4]);
    let endpoints = Endpoints::both(SplineEndpoint::NotAKnot);

    let adapter = SplineAdapter::solving(knots, endpoints, &dates, false).unwrap();
    let spline = adapter.spline(&nodes).unwrap();
    for (date, v) in nodes.iter() {
        assert_relative_eq!(spline.evaluate(day_ordinal(date)), *v, epsilon = 1e-12);
    }
    let removed = day_ordinal(dates[1]);
    for m in [2, 3] {
        let left = spline.derivative(removed - 1e-3, m);
        let right = spline.derivative(removed + 1e-3, m);
        assert_relative_eq!(left, right, epsilon = 1e-9, max_relative = 1e-4);
    }
}

#[test]
fn test_not_a_knot_needs_ten_knots() {
    let knots = clamped(d(2023, 1, 1), &[], d(2026, 1, 1));
    let err = Curve::from_pairs(
        annual_nodes(),
        CurveParams::default()
            .with_knots(knots)
            .with_endpoints(Endpoints::both(SplineEndpoint::NotAKnot)),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralConstraint);
}

#[test]
fn test_first_order_gradient_matches_finite_difference() {
    let curve = spline_curve(1);
    let h = 1e-6;
    for date in [d(2022, 8, 15), d(2023, 9, 1), d(2025, 3, 1)] {
        let value = curve.value(date).unwrap();
        for i in 0..annual_nodes().len() {
            let bump = |sign: f64| {
                let mut pairs = annual_nodes();
                pairs[i].1 += sign * h;
                let knots = curve.knots().map(<[NaiveDate]>::to_vec).unwrap();
                Curve::from_pairs(pairs, CurveParams::default().with_knots(knots))
                    .unwrap()
                    .value(date)
                    .unwrap()
                    .real()
            };
            let fd = (bump(1.0) - bump(-1.0)) / (2.0 * h);
            assert_relative_eq!(value.gradient(&format!("sp_{}", i)), fd, epsilon = 1e-7);
        }
    }
}

#[test]
fn test_second_order_hessian_matches_finite_difference() {
    let curve = spline_curve(2);
    let first = spline_curve(1);
    let date = d(2024, 7, 1);
    let value = curve.value(date).unwrap();
    assert_eq!(value.order(), 2);

    let h = 1e-5;
    for (i, j) in [(2, 2), (2, 3), (1, 4)] {
        let grad = |sign: f64| {
            let mut pairs = annual_nodes();
            pairs[j].1 += sign * h;
            let knots = first.knots().map(<[NaiveDate]>::to_vec).unwrap();
            Curve::from_pairs(
                pairs,
                CurveParams::default()
                    .with_knots(knots)
                    .with_id("sp_")
                    .with_ad_order(1),
            )
            .unwrap()
            .value(date)
            .unwrap()
            .gradient(&format!("sp_{}", i))
        };
        let fd = (grad(1.0) - grad(-1.0)) / (2.0 * h);
        let exact = value.hessian(&format!("sp_{}", i), &format!("sp_{}", j));
        assert_relative_eq!(exact, fd, epsilon = 1e-6);
    }
}

#[test]
fn test_ad_order_switch_keeps_values() {
    let mut curve = spline_curve(0);
    let plain = curve.value(d(2024, 7, 1)).unwrap().real();
    curve.set_ad_order(2).unwrap();
    assert_relative_eq!(curve.value(d(2024, 7, 1)).unwrap().real(), plain, epsilon = 1e-14);
    curve.set_ad_order(0).unwrap();
    assert_eq!(curve.value(d(2024, 7, 1)).unwrap().order(), 0);

    let err = curve.set_ad_order(5).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(curve.ad_order(), 0);
}

#[test]
fn test_transforms_keep_ad_order() {
    let curve = spline_curve(1);
    let shifted = curve.shift(5.0).unwrap();
    assert_eq!(shifted.ad_order(), 1);
    let id = shifted.id().to_string();
    let v = shifted.value(d(2024, 7, 1)).unwrap();
    assert!(v.vars().iter().all(|tag| tag.starts_with(&id)));
}

/// Level equal to the node value nearest before `date`, or the anchor value.
struct StepBefore;

impl InterpolationFn for StepBefore {
    fn evaluate<T: Number>(&self, date: NaiveDate, nodes: &NodeSet<T>) -> T {
        let i = nodes.dates().iter().rposition(|d| *d <= date).unwrap_or(0);
        nodes.values()[i].clone()
    }
}

#[test]
fn test_custom_interpolation_bypasses_bracket_rules() {
    let mut curve = ValueCurve::from_pairs(
        vec![(d(2022, 1, 1), 1.5), (d(2022, 6, 1), 2.5)],
        CurveParams::default()
            .with_interpolation(curve_core::market_data::curves::Interpolation::custom(
                StepBefore,
            ))
            .with_id("cst_"),
    )
    .unwrap();
    // Before the anchor the custom function still answers.
    assert_eq!(curve.value(d(2021, 6, 1)).unwrap().real(), 1.5);
    assert_eq!(curve.value(d(2022, 7, 1)).unwrap().real(), 2.5);

    curve.set_ad_order(1).unwrap();
    let v = curve.value(d(2022, 3, 1)).unwrap();
    assert_eq!(v.gradient("cst_0"), 1.0);
    assert_eq!(v.gradient("cst_1"), 0.0);

    assert!(curve.to_json().unwrap().contains(r#""interpolation":"custom""#));
}

/// Twice the anchor level everywhere.
struct DoubleAnchor;

impl InterpolationFn for DoubleAnchor {
    fn evaluate<T: Number>(&self, _date: NaiveDate, nodes: &NodeSet<T>) -> T {
        let anchor = nodes.values()[0].clone();
        anchor.clone() + anchor
    }
}

#[test]
fn test_value_curve_roll_reinserts_anchor_at_curve_value() {
    let curve = ValueCurve::from_pairs(
        vec![(d(2022, 1, 1), 1.5), (d(2022, 6, 1), 2.5)],
        CurveParams::default().with_interpolation(Interpolation::custom(DoubleAnchor)),
    )
    .unwrap();
    assert_eq!(curve.value(d(2022, 1, 1)).unwrap().real(), 3.0);

    let rolled = curve.roll(d(2022, 1, 11)).unwrap();
    let nodes = rolled.nodes();
    assert_eq!(
        nodes.dates(),
        &[d(2022, 1, 1), d(2022, 1, 11), d(2022, 6, 11)][..]
    );
    assert_eq!(nodes.values(), &[3.0, 1.5, 2.5][..]);
}

/// Monthly nodes with a spline clamped on the anchor and the last node.
fn monthly_spline_curve() -> Curve {
    let knots = clamped(
        d(2022, 1, 1),
        &[d(2022, 2, 1), d(2022, 3, 1), d(2022, 4, 1)],
        d(2022, 5, 1),
    );
    Curve::from_pairs(
        vec![
            (d(2022, 1, 1), 1.0),
            (d(2022, 2, 1), 0.999),
            (d(2022, 3, 1), 0.9978),
            (d(2022, 4, 1), 0.9963),
            (d(2022, 5, 1), 0.9940),
        ],
        CurveParams::default().with_knots(knots),
    )
    .unwrap()
}

#[test]
fn test_translate_spline_curve_keeps_knots_by_default() {
    let curve = monthly_spline_curve();
    let translated = curve.translate(d(2022, 1, 15), false).unwrap();

    assert_eq!(translated.knots(), curve.knots());
    assert_eq!(translated.anchor(), d(2022, 1, 15));
    assert_relative_eq!(
        translated.value(d(2022, 1, 15)).unwrap().real(),
        1.0,
        epsilon = 1e-12
    );
}

#[test]
fn test_translate_spline_curve_extends_left_knots() {
    let curve = monthly_spline_curve();
    let translated = curve.translate(d(2022, 1, 15), true).unwrap();

    let expected = clamped(
        d(2022, 1, 15),
        &[d(2022, 2, 1), d(2022, 3, 1), d(2022, 4, 1)],
        d(2022, 5, 1),
    );
    assert_eq!(translated.knots(), Some(&expected[..]));
    assert_relative_eq!(
        translated.value(d(2022, 1, 15)).unwrap().real(),
        1.0,
        epsilon = 1e-12
    );
}

#[test]
fn test_translate_past_first_interior_knot_is_structural() {
    let curve = monthly_spline_curve();
    for extend in [false, true] {
        let err = curve.translate(d(2022, 2, 1), extend).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralConstraint);
    }
}

#[test]
fn test_roll_spline_curve_preserves_forward_rates() {
    let curve = monthly_spline_curve();
    let (start, end) = (d(2022, 2, 1), d(2022, 3, 1));
    let base = curve.rate(start, end, None).unwrap().unwrap().real();

    for days in [10i64, -10] {
        let target: Horizon = format!("{}d", days).parse().unwrap();
        let rolled = curve.roll(target).unwrap();
        assert_eq!(rolled.anchor(), d(2022, 1, 1));

        let shift = chrono::Duration::days(days);
        let moved = rolled
            .rate(start + shift, end + shift, None)
            .unwrap()
            .unwrap()
            .real();
        assert_relative_eq!(base, moved, epsilon = 1e-9);
    }
}

#[test]
fn test_roll_preserves_rates_through_trait() {
    fn check<C: DateCurve>(curve: &C, days: i64) {
        let rolled = curve
            .rolled(format!("{}d", days).parse().unwrap())
            .unwrap();
        let shift = chrono::Duration::days(days);
        let (start, end) = (d(2023, 3, 1), d(2023, 9, 1));
        let base = curve
            .rate_between(start, end.into(), None)
            .unwrap()
            .unwrap()
            .real();
        let moved = rolled
            .rate_between(start + shift, (end + shift).into(), None)
            .unwrap()
            .unwrap()
            .real();
        assert_relative_eq!(base, moved, epsilon = 1e-9);
    }

    let curve = Curve::from_pairs(annual_nodes(), CurveParams::default()).unwrap();
    check(&curve, 30);
    check(&curve, -30);

    let levels = ValueCurve::from_pairs(annual_nodes(), CurveParams::default()).unwrap();
    check(&levels, 30);
}

#[test]
fn test_curves_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Curve>();
    assert_send_sync::<ValueCurve>();

    let curve = spline_curve(1);
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| curve.value(d(2024, 7, 1)).unwrap().real()))
            .collect();
        let values: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(values.windows(2).all(|w| w[0] == w[1]));
    });
}
