use std::f64::consts::PI;

/// Segment taper applied before each transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Window {
    /// Raised cosine, `0.5 - 0.5·cos(2πi/(L-1))`.
    #[default]
    Hann,
    /// `0.54 - 0.46·cos(2πi/(L-1))`.
    Hamming,
    /// Three-term cosine, `0.42 - 0.5·cos(2πi/(L-1)) + 0.08·cos(4πi/(L-1))`.
    Blackman,
    /// All ones.
    Rectangular,
}

/// How the averaged periodogram is normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scaling {
    /// Power spectral density, units²/Hz. Normalisation `fs·Σw²`.
    #[default]
    Density,
    /// Power spectrum, units². Normalisation `(Σw)²`.
    Spectrum,
}

impl Window {
    /// Symmetric window weights of length `len`.
    ///
    /// A single-point window is `[1.0]` for every type; `len == 0` is empty.
    ///
    /// ```
    /// # use powerlaw_psd::Window;
    /// let w = Window::Hann.weights(5);
    /// assert_eq!(w.len(), 5);
    /// assert!(w[0].abs() < 1e-12 && (w[2] - 1.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn weights(self, len: usize) -> Vec<f64> {
        if len == 1 {
            return vec![1.0];
        }
        let denom = (len.saturating_sub(1)) as f64;
        (0..len)
            .map(|i| {
                let phase = 2.0 * PI * i as f64 / denom;
                match self {
                    Self::Hann => 0.5 - 0.5 * phase.cos(),
                    Self::Hamming => 0.54 - 0.46 * phase.cos(),
                    Self::Blackman => 0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos(),
                    Self::Rectangular => 1.0,
                }
            })
            .collect()
    }
}

/// Hann window of length `len`.
#[must_use]
pub fn hann(len: usize) -> Vec<f64> {
    Window::Hann.weights(len)
}

/// `Σ wᵢ²`.
#[must_use]
pub fn sum_of_squares(weights: &[f64]) -> f64 {
    weights.iter().map(|w| w * w).sum()
}

/// Mean-square value of the window, `Σ wᵢ² / L`. Zero for an empty window.
#[must_use]
pub fn mean_square(weights: &[f64]) -> f64 {
    if weights.is_empty() {
        return 0.0;
    }
    sum_of_squares(weights) / weights.len() as f64
}

/// Divisor applied to each squared-magnitude bin of a windowed segment.
///
/// For [`Scaling::Density`] this is `fs·Σwᵢ²`, which makes the one-sided
/// periodogram integrate to the segment's variance. For
/// [`Scaling::Spectrum`] it is `(Σwᵢ)²`, which makes a unit-amplitude sine
/// read `A²/2` at its bin. The one-sided doubling is applied separately.
///
/// ```
/// # use powerlaw_psd::window::{normalization, Scaling};
/// let w = [1.0, 1.0, 1.0, 1.0];
/// assert_eq!(normalization(&w, 2.0, Scaling::Density), 8.0);
/// assert_eq!(normalization(&w, 2.0, Scaling::Spectrum), 16.0);
/// ```
#[must_use]
pub fn normalization(weights: &[f64], sample_rate: f64, scaling: Scaling) -> f64 {
    match scaling {
        Scaling::Density => sample_rate * sum_of_squares(weights),
        Scaling::Spectrum => {
            let sum: f64 = weights.iter().sum();
            sum * sum
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hann_matches_closed_form() {
        let len = 8;
        let w = hann(len);
        for (i, &v) in w.iter().enumerate() {
            let expected = 0.5 - 0.5 * (2.0 * PI * i as f64 / 7.0).cos();
            assert!((v - expected).abs() < 1e-15, "w[{i}] = {v}, expected {expected}");
        }
    }

    #[test]
    fn hann_is_symmetric_and_zero_at_edges() {
        let w = hann(9);
        assert!(w[0].abs() < 1e-15 && w[8].abs() < 1e-15);
        for i in 0..9 {
            assert!((w[i] - w[8 - i]).abs() < 1e-12);
        }
    }

    #[test]
    fn degenerate_lengths() {
        assert!(hann(0).is_empty());
        assert_eq!(hann(1), vec![1.0]);
        assert_eq!(Window::Blackman.weights(1), vec![1.0]);
    }

    /// For large L the symmetric Hann mean-square tends to 3/8.
    #[test]
    fn hann_mean_square_tends_to_three_eighths() {
        let ms = mean_square(&hann(4096));
        assert!((ms - 0.375).abs() < 1e-3, "mean square {ms}");
    }

    #[test]
    fn density_normalization_for_hann() {
        let w = hann(1024);
        let expected = 1000.0 * sum_of_squares(&w);
        assert_eq!(normalization(&w, 1000.0, Scaling::Density), expected);
        assert!((normalization(&w, 1.0, Scaling::Density) - 1024.0 * mean_square(&w)).abs() < 1e-9);
    }

    #[test]
    fn rectangular_is_flat() {
        assert_eq!(Window::Rectangular.weights(4), vec![1.0; 4]);
        assert_eq!(mean_square(&[]), 0.0);
    }
}
