//! Functions at and beyond the edges of their domain: inverse trigonometric
//! functions outside `[-1, 1]` and exponentials past overflow.

use std::f64::consts::{FRAC_PI_2, PI};

use mathbench::verify::compare;
use mathbench::{build_catalog, Element, FunctionId, Operands, StrategyKind};

/// Sixteen inputs: the closed-interval endpoints, zero, and values outside `[-1, 1]`.
const INPUTS: [f64; 16] = [
    1.0, -1.0, 0.0, 0.5, -0.5, 1.5, -1.5, 2.0, -2.0, 10.0, -10.0, 1.0, -1.0, 0.0, 3.0, -3.0,
];

fn evaluate<T: Element>(function: FunctionId, strategy: StrategyKind) -> Vec<T> {
    let catalog = build_catalog().unwrap();
    let case = catalog.lookup(function, T::PRECISION, strategy).unwrap();
    let x: Vec<T> = INPUTS.iter().map(|&v| T::narrow(v)).collect();
    let mut out = vec![T::default(); x.len()];
    mathbench::run(case, Operands::Unary(&x), &mut out).unwrap();
    out
}

fn check_edges<T: Element>(tolerance: f64) {
    for strategy in StrategyKind::ALL {
        let asin = evaluate::<T>(FunctionId::Asin, strategy);
        let acos = evaluate::<T>(FunctionId::Acos, strategy);

        for (i, &x) in INPUTS.iter().enumerate() {
            let (asin_i, acos_i) = (asin[i].widen(), acos[i].widen());
            println!("{strategy}: x = {x}, asin = {asin_i}, acos = {acos_i}");

            if x.abs() > 1.0 {
                assert!(asin_i.is_nan(), "{strategy}: asin({x}) = {asin_i}, expected NaN");
                assert!(acos_i.is_nan(), "{strategy}: acos({x}) = {acos_i}, expected NaN");
                continue;
            }

            let (expected_asin, expected_acos) = match x {
                v if v == 1.0 => (FRAC_PI_2, 0.0),
                v if v == -1.0 => (-FRAC_PI_2, PI),
                v => (v.asin(), v.acos()),
            };
            assert!(
                (asin_i - expected_asin).abs() < tolerance,
                "{strategy}: asin({x}) = {asin_i}, expected {expected_asin}"
            );
            assert!(
                (acos_i - expected_acos).abs() < tolerance,
                "{strategy}: acos({x}) = {acos_i}, expected {expected_acos}"
            );
        }
    }
}

#[test]
fn test_inverse_trig_edges_f32() {
    check_edges::<f32>(1e-6);
}

#[test]
fn test_inverse_trig_edges_f64() {
    check_edges::<f64>(1e-14);
}

#[test]
fn test_exp_overflow_is_not_an_error() {
    // out-of-range inputs produce infinities and zeros, not BenchError
    let catalog = build_catalog().unwrap();
    let x: Vec<f32> = [100.0f32, 1e3, 88.5, -1e3].repeat(4);

    for function in [FunctionId::Exp, FunctionId::Exp2, FunctionId::ExpM1] {
        let mut reference = vec![0.0f32; x.len()];
        for strategy in StrategyKind::ALL {
            let case = catalog
                .lookup(function, mathbench::Precision::Single, strategy)
                .unwrap();
            let mut out = vec![0.0f32; x.len()];
            mathbench::run(case, Operands::Unary(&x), &mut out).unwrap();
            println!("{strategy}: {function}({x:?}) = {out:?}");

            assert_eq!(out[1], f32::INFINITY, "{strategy}: {function}(1e3)");
            if function == FunctionId::Exp {
                assert_eq!(out[0], f32::INFINITY, "{strategy}: exp(100)");
                assert!(out[2].is_finite() && out[2] > 1e38, "{strategy}: exp(88.5) = {}", out[2]);
            }

            if strategy == StrategyKind::Scalar {
                reference = out;
                continue;
            }
            let agreement = compare(&reference, &out, function.tolerance(mathbench::Precision::Single)).unwrap();
            assert!(
                agreement.is_ok(),
                "{strategy}: {function} disagrees with scalar: {:?}",
                agreement.first_mismatch
            );
        }
    }
}
