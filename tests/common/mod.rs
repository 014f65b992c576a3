//! Shared test helpers compiled into every integration-test binary.
//! Items may not all be used in every binary, so dead_code is suppressed.
#![allow(dead_code)]

use powerlaw_psd::Complex64;

/// Maximum absolute error tolerated between f64 transform results and analytical values.
pub const EPSILON: f64 = 1e-9;

pub fn assert_approx(actual: f64, expected: f64, label: &str) {
    assert!(
        (actual - expected).abs() <= EPSILON,
        "{}: got {:.12}, expected {:.12}  (diff {:.2e})",
        label,
        actual,
        expected,
        (actual - expected).abs(),
    );
}

pub fn assert_slice_approx(actual: &[f64], expected: &[f64], label: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{}: length mismatch ({} vs {})",
        label,
        actual.len(),
        expected.len()
    );
    for (i, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_approx(a, e, &format!("{label}[{i}]"));
    }
}

/// `|a - e| <= tol · max(1, |e|)` for every element.
pub fn assert_complex_close(actual: &[Complex64], expected: &[Complex64], tol: f64, label: &str) {
    assert_eq!(actual.len(), expected.len(), "{label}: length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        let err = (a - e).norm();
        assert!(
            err <= tol * e.norm().max(1.0),
            "{label}[{i}]: got {a}, expected {e}  (err {err:.2e})"
        );
    }
}
