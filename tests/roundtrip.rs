use powerlaw_psd::{Complex64, CpuFft, FftEngine};

mod common;
use common::assert_complex_close;

fn roundtrip(input: &[Complex64]) -> Vec<Complex64> {
    let engine = CpuFft::new();
    engine.inverse_transform(&engine.transform(input))
}

fn real(x: &[f64]) -> Vec<Complex64> {
    x.iter().map(|&v| Complex64::new(v, 0.0)).collect()
}

/// IFFT(FFT(x)) must recover x; the imaginary part must be ~0 (real input).
#[test]
fn test_roundtrip_arbitrary_signal() {
    let input = real(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    assert_complex_close(&roundtrip(&input), &input, 1e-9, "round-trip");
}

/// Round-trip must also work for lengths that are not powers of two.
#[test]
fn test_roundtrip_non_power_of_two_lengths() {
    for n in [1usize, 2, 3, 7, 100, 1000, 10_000] {
        let input: Vec<Complex64> = (0..n)
            .map(|i| Complex64::new((i as f64 * 0.37).sin() * 5.0 - 1.0, (i as f64 * 1.3).cos()))
            .collect();
        assert_complex_close(&roundtrip(&input), &input, 1e-9, &format!("n={n}"));
    }
}

/// Round-trip must also work for a signal that contains negative values.
#[test]
fn test_roundtrip_with_negatives() {
    let input = real(&[-3.0, 1.5, 0.0, -2.0, 4.0, -1.0, 0.5, 2.5, -7.25]);
    assert_complex_close(&roundtrip(&input), &input, 1e-9, "round-trip with negatives");
}

/// Identical input gives identical output, across engine instances.
#[test]
fn test_transform_is_deterministic() {
    let input = real(&[0.3, -0.1, 2.0, 5.5, 1.0]);
    let a = CpuFft::new().transform(&input);
    let b = CpuFft::new().transform(&input);
    assert_eq!(a, b);
}
