//! Colored-noise synthesis by spectral shaping.
//!
//! Each FFT bin gets magnitude `|f|^(-α/2)` (zero at DC) and an independent
//! uniform phase; the real part of the inverse transform is the series. Its
//! expected PSD therefore falls off as `|f|^(-α)`, which a Welch estimate
//! followed by a log-log fit recovers as a slope of about `-α`.

use std::f64::consts::TAU;

use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rustfft::num_complex::Complex64;
use tracing::debug;

use crate::error::{Result, SpectralError};
use crate::fft::{CpuFft, FftEngine};
use crate::spectrum::Signal;
use crate::utils::fft_frequencies;

/// Common names for spectral exponents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoiseColor {
    /// α = 0, flat spectrum.
    White,
    /// α = 1, PSD ∝ 1/f.
    Pink,
    /// α = 2, PSD ∝ 1/f², a random walk.
    Brown,
}

impl NoiseColor {
    #[must_use]
    pub fn alpha(self) -> f64 {
        match self {
            Self::White => 0.0,
            Self::Pink => 1.0,
            Self::Brown => 2.0,
        }
    }
}

impl From<NoiseColor> for f64 {
    fn from(color: NoiseColor) -> Self {
        color.alpha()
    }
}

/// Generates real series whose PSD follows `|f|^(-alpha)`.
///
/// The random source is supplied per call, so a seeded generator reproduces
/// the same series bit for bit:
///
/// ```
/// use powerlaw_psd::NoiseSynthesizer;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let synth = NoiseSynthesizer::new(1.0).unwrap();
/// let a = synth.synthesize(512, &mut StdRng::seed_from_u64(42)).unwrap();
/// let b = synth.synthesize(512, &mut StdRng::seed_from_u64(42)).unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug)]
pub struct NoiseSynthesizer<E = CpuFft> {
    alpha: f64,
    engine: E,
}

impl NoiseSynthesizer<CpuFft> {
    pub fn new(alpha: f64) -> Result<Self> {
        Self::with_engine(alpha, CpuFft::new())
    }

    pub fn colored(color: NoiseColor) -> Self {
        Self {
            alpha: color.alpha(),
            engine: CpuFft::new(),
        }
    }
}

impl<E: FftEngine> NoiseSynthesizer<E> {
    /// Fails with [`SpectralError::InvalidArgument`] for a non-finite `alpha`.
    pub fn with_engine(alpha: f64, engine: E) -> Result<Self> {
        if !alpha.is_finite() {
            return Err(SpectralError::invalid(format!(
                "alpha must be finite, got {alpha}"
            )));
        }
        Ok(Self { alpha, engine })
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Target magnitude per bin in FFT order, zero at DC.
    #[must_use]
    pub fn magnitudes(&self, n: usize) -> Vec<f64> {
        let exponent = -self.alpha / 2.0;
        fft_frequencies(n, 1.0)
            .into_iter()
            .map(|f| if f == 0.0 { 0.0 } else { f.abs().powf(exponent) })
            .collect()
    }

    /// Synthesizes `n` samples at unit sample rate.
    ///
    /// One phase is drawn per bin, in bin order and including DC, so the
    /// number of draws from `rng` is exactly `n`. Fails with
    /// [`SpectralError::InvalidArgument`] when `n < 2` or when `|f|^(-alpha/2)`
    /// overflows for this `alpha`; nothing is drawn from `rng` in either case.
    pub fn synthesize<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Signal> {
        if n < 2 {
            return Err(SpectralError::invalid(format!(
                "noise length must be at least 2, got {n}"
            )));
        }
        let magnitudes = self.magnitudes(n);
        if magnitudes.iter().any(|m| !m.is_finite()) {
            return Err(SpectralError::invalid(format!(
                "alpha {} overflows the spectral magnitudes at n = {n}",
                self.alpha
            )));
        }
        debug!(n, alpha = self.alpha, "synthesizing power-law noise");

        let phase = Uniform::new(0.0, TAU);
        let coefficients: Vec<Complex64> = magnitudes
            .into_iter()
            .map(|m| Complex64::from_polar(m, phase.sample(rng)))
            .collect();

        let samples = self
            .engine
            .inverse_transform(&coefficients)
            .into_iter()
            .map(|c| c.re)
            .collect();
        Signal::new(samples, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn magnitudes_follow_power_law_and_skip_dc() {
        let synth = NoiseSynthesizer::new(2.0).unwrap();
        let m = synth.magnitudes(8);
        assert_eq!(m[0], 0.0);
        // |f|^-1 at f = 1/8, 2/8, 3/8, -4/8, -3/8, ...
        assert!((m[1] - 8.0).abs() < 1e-12);
        assert!((m[4] - 2.0).abs() < 1e-12);
        assert!((m[7] - m[1]).abs() < 1e-12);
    }

    #[test]
    fn white_magnitudes_are_flat() {
        let m = NoiseSynthesizer::colored(NoiseColor::White).magnitudes(6);
        assert_eq!(m, vec![0.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn rejects_short_length_and_bad_alpha() {
        let synth = NoiseSynthesizer::new(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            synth.synthesize(1, &mut rng),
            Err(SpectralError::InvalidArgument(_))
        ));
        assert!(NoiseSynthesizer::new(f64::NAN).is_err());
    }

    #[test]
    fn overflowing_magnitudes_are_rejected() {
        // (1/64)^-200 = 2^1200
        let synth = NoiseSynthesizer::new(400.0).unwrap();
        assert!(synth.magnitudes(64).iter().any(|m| m.is_infinite()));
        assert!(matches!(
            synth.synthesize(64, &mut StdRng::seed_from_u64(0)),
            Err(SpectralError::InvalidArgument(_))
        ));
    }

    #[test]
    fn output_has_no_dc() {
        let synth = NoiseSynthesizer::new(1.0).unwrap();
        let signal = synth.synthesize(1000, &mut StdRng::seed_from_u64(7)).unwrap();
        let mean = signal.samples().iter().sum::<f64>() / signal.len() as f64;
        assert!(mean.abs() < 1e-12, "mean {mean}");
    }
}
