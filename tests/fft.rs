use std::f64::consts::PI;

use powerlaw_psd::{Complex64, CpuFft, FftEngine};

mod common;
use common::{assert_approx, assert_complex_close, assert_slice_approx};

fn re(v: &[Complex64]) -> Vec<f64> {
    v.iter().map(|c| c.re).collect()
}

fn im(v: &[Complex64]) -> Vec<f64> {
    v.iter().map(|c| c.im).collect()
}

/// FFT of an impulse [1, 0, 0, …] must be all-ones real and all-zeros imaginary.
///
/// Proof: X[k] = Σ x[n]·e^{-j2πkn/N} = x[0]·e^0 = 1  for all k.
#[test]
fn test_fft_impulse() {
    let n = 8;
    let mut input = vec![0.0; n];
    input[0] = 1.0;

    let out = CpuFft::new().transform_real(&input);

    assert_slice_approx(&re(&out), &[1.0; 8], "real");
    assert_slice_approx(&im(&out), &[0.0; 8], "imag");
}

/// FFT of a constant (DC) signal must be [N, 0, 0, …]; N = 10 is not a power of two.
#[test]
fn test_fft_dc_signal_non_power_of_two() {
    let n = 10;
    let out = CpuFft::new().transform_real(&vec![1.0; n]);

    assert_eq!(out.len(), n, "no padding for non-power-of-two lengths");
    assert_approx(out[0].re, n as f64, "real[0]");
    for (i, c) in out.iter().enumerate().skip(1) {
        assert_approx(c.re, 0.0, &format!("real[{i}]"));
        assert_approx(c.im, 0.0, &format!("imag[{i}]"));
    }
}

/// FFT of x[n] = sin(2π·n/N) must have X[1] = -jN/2, X[N-1] = +jN/2 and nothing else.
#[test]
fn test_fft_single_frequency_sine() {
    let n = 12usize;
    let half_n = n as f64 / 2.0;
    let input: Vec<f64> = (0..n).map(|i| (2.0 * PI * i as f64 / n as f64).sin()).collect();

    let out = CpuFft::new().transform_real(&input);

    assert_approx(out[1].re, 0.0, "real[1]");
    assert_approx(out[1].im, -half_n, "imag[1]");
    assert_approx(out[n - 1].im, half_n, "imag[N-1]");
    for k in (0..n).filter(|&k| k != 1 && k != n - 1) {
        assert!(out[k].norm() < 1e-9, "bin {k} should be empty, got {}", out[k]);
    }
}

/// Linearity: FFT(a·x) = a·FFT(x).
#[test]
fn test_fft_linearity() {
    let engine = CpuFft::new();
    let scale = 3.0;
    let input = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
    let scaled: Vec<f64> = input.iter().map(|&x| x * scale).collect();

    let base: Vec<Complex64> = engine.transform_real(&input).iter().map(|&c| c * scale).collect();
    let out = engine.transform_real(&scaled);

    assert_complex_close(&out, &base, 1e-12, "scaled");
}

/// IFFT of [N, 0, …, 0] is the all-ones sequence: the inverse carries the 1/N factor.
#[test]
fn test_ifft_is_normalised() {
    let n = 6;
    let mut spectrum = vec![Complex64::new(0.0, 0.0); n];
    spectrum[0] = Complex64::new(n as f64, 0.0);

    let out = CpuFft::new().inverse_transform(&spectrum);

    assert_slice_approx(&re(&out), &[1.0; 6], "real");
    assert_slice_approx(&im(&out), &[0.0; 6], "imag");
}

/// Complex input: a single complex exponential at bin 3 lands in bin 3 only.
#[test]
fn test_fft_complex_exponential() {
    let n = 9;
    let input: Vec<Complex64> = (0..n)
        .map(|t| Complex64::from_polar(1.0, 2.0 * PI * 3.0 * t as f64 / n as f64))
        .collect();

    let out = CpuFft::new().transform(&input);

    let mut expected = vec![Complex64::new(0.0, 0.0); n];
    expected[3] = Complex64::new(n as f64, 0.0);
    assert_complex_close(&out, &expected, 1e-10, "exp");
}
