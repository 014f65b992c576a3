//! Bluestein's chirp-z algorithm: an arbitrary-length DFT expressed as a
//! circular convolution of power-of-two length.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;

/// DFT of `input` (any length) using only power-of-two transforms.
///
/// `pow2(x, forward)` must return the unscaled DFT of a power-of-two-length
/// `x` (`forward == false` selects the `+j` kernel). The result is unscaled in
/// both directions.
pub fn transform<F>(input: &[Complex64], forward: bool, pow2: F) -> Vec<Complex64>
where
    F: Fn(&[Complex64], bool) -> Vec<Complex64>,
{
    let n = input.len();
    if n <= 1 {
        return input.to_vec();
    }
    let m = (2 * n - 1).next_power_of_two();
    let sign = if forward { -1.0 } else { 1.0 };

    // k² is reduced mod 2n before scaling so the phase stays exact for large k.
    let chirp: Vec<Complex64> = (0..n)
        .map(|k| {
            let k2 = (k as u128 * k as u128 % (2 * n as u128)) as f64;
            Complex64::from_polar(1.0, sign * PI * k2 / n as f64)
        })
        .collect();

    let mut a = vec![Complex64::new(0.0, 0.0); m];
    for (slot, (x, w)) in a.iter_mut().zip(input.iter().zip(&chirp)) {
        *slot = x * w;
    }
    let mut b = vec![Complex64::new(0.0, 0.0); m];
    b[0] = chirp[0].conj();
    for k in 1..n {
        b[k] = chirp[k].conj();
        b[m - k] = chirp[k].conj();
    }

    let fa = pow2(&a, true);
    let fb = pow2(&b, true);
    let product: Vec<Complex64> = fa.iter().zip(&fb).map(|(x, y)| x * y).collect();
    let conv = pow2(&product, false);
    let scale = (m as f64).recip();

    conv.iter()
        .zip(&chirp)
        .map(|(&c, &w)| c * scale * w)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_dft(x: &[Complex64], forward: bool) -> Vec<Complex64> {
        let n = x.len();
        let sign = if forward { -1.0 } else { 1.0 };
        (0..n)
            .map(|k| {
                x.iter()
                    .enumerate()
                    .map(|(t, v)| v * Complex64::from_polar(1.0, sign * 2.0 * PI * (k * t) as f64 / n as f64))
                    .sum()
            })
            .collect()
    }

    #[test]
    fn matches_direct_dft_for_odd_and_composite_lengths() {
        for n in [3usize, 5, 6, 12, 17] {
            let x: Vec<Complex64> = (0..n)
                .map(|i| Complex64::new((i as f64 * 0.7).sin(), (i as f64 * 0.3).cos()))
                .collect();
            for forward in [true, false] {
                let expected = naive_dft(&x, forward);
                let got = transform(&x, forward, naive_dft);
                for (g, e) in got.iter().zip(&expected) {
                    assert!((g - e).norm() < 1e-9, "n={n} forward={forward}: {g} vs {e}");
                }
            }
        }
    }
}
