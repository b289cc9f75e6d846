//! Lane-width constraints and tail policies of the explicit SIMD strategy.

use mathbench::harness::input::linspace;
use mathbench::{
    build_catalog, BenchError, Catalog, FunctionId, Operands, Precision, StrategyKind, TailPolicy,
};

#[test]
fn test_strict_f32_needs_multiples_of_sixteen() {
    let catalog = build_catalog().unwrap();
    let case = catalog
        .lookup(FunctionId::Sin, Precision::Single, StrategyKind::ExplicitSimd)
        .unwrap();

    let x = vec![0.5f32; 200_001];
    let mut out = vec![0.0f32; 200_001];
    let error = mathbench::run(case, Operands::Unary(&x), &mut out).unwrap_err();
    assert_eq!(
        error,
        BenchError::LaneRemainder {
            len: 200_001,
            lanes: 16,
            remainder: 1
        }
    );

    let result = mathbench::run(case, Operands::Unary(&x[..200_000]), &mut out[..200_000]);
    assert!(result.is_ok());
}

#[test]
fn test_strict_f64_uses_eight_lanes() {
    let catalog = build_catalog().unwrap();
    let case = catalog
        .lookup(FunctionId::Cos, Precision::Double, StrategyKind::ExplicitSimd)
        .unwrap();
    assert_eq!(case.length_multiple(), 8);

    let x = vec![0.0f64; 24];
    let mut out = vec![0.0f64; 24];
    assert!(mathbench::run(case, Operands::Unary(&x), &mut out).is_ok());

    let error = mathbench::run(case, Operands::Unary(&x[..20]), &mut out[..20]).unwrap_err();
    assert!(matches!(
        error,
        BenchError::LaneRemainder {
            lanes: 8,
            remainder: 4,
            ..
        }
    ));
}

#[test]
fn test_other_strategies_accept_any_length() {
    let catalog = build_catalog().unwrap();
    for strategy in [StrategyKind::Scalar, StrategyKind::LibraryVectorized] {
        let case = catalog
            .lookup(FunctionId::Atan, Precision::Single, strategy)
            .unwrap();
        let x = vec![1.0f32; 200_001];
        let mut out = vec![0.0f32; 200_001];
        mathbench::run(case, Operands::Unary(&x), &mut out).unwrap();
        assert!(out.iter().all(|v| (v - std::f32::consts::FRAC_PI_4).abs() < 1e-6));
    }
}

fn tail_matches_scalar(policy: TailPolicy, len: usize) {
    let catalog = Catalog::build(policy).unwrap();
    let x: Vec<f64> = linspace(-3.0..3.0, len);

    let mut expected = vec![0.0f64; len];
    catalog
        .lookup(FunctionId::Exp, Precision::Double, StrategyKind::Scalar)
        .unwrap()
        .apply(Operands::Unary(&x), &mut expected)
        .unwrap();

    let case = catalog
        .lookup(FunctionId::Exp, Precision::Double, StrategyKind::ExplicitSimd)
        .unwrap();
    assert_eq!(case.length_multiple(), 1);

    let mut out = vec![f64::NAN; len];
    mathbench::run(case, Operands::Unary(&x), &mut out).unwrap();

    for (i, (got, want)) in out.iter().zip(&expected).enumerate() {
        let relative_error = ((got - want) / want).abs();
        assert!(
            relative_error < 1e-13,
            "{policy} len {len} index {i}: {got} vs {want}"
        );
    }
}

#[test]
fn test_masked_tail_covers_every_element() {
    for len in [1, 7, 8, 9, 15, 17, 200_001] {
        tail_matches_scalar(TailPolicy::Masked, len);
    }
}

#[test]
fn test_scalar_fallback_tail_covers_every_element() {
    for len in [1, 7, 8, 9, 15, 17, 200_001] {
        tail_matches_scalar(TailPolicy::ScalarFallback, len);
    }
}
