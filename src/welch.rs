//! Welch's averaged-periodogram PSD estimator.
//!
//! The input is cut into overlapping segments of `nperseg` samples, each
//! segment is tapered, transformed and squared, and the scaled one-sided
//! periodograms are averaged bin by bin.
//!
//! Two policies shape the segmentation and are observable through
//! [`stride`] and [`segment_count`]:
//!
//! - the stride `round(nperseg·(1 - overlap))` is clamped to at least one sample;
//! - a trailing run of samples too short to fill a segment is dropped, never
//!   zero-padded, so no segment carries less power than the others.
//!
//! Segments are not detrended unless [`Detrend`] asks for it.

use tracing::{debug, warn};

use crate::error::{Result, SpectralError};
use crate::fft::{CpuFft, FftEngine};
use crate::spectrum::{validate_sample_rate, Signal, Spectrum};
use crate::utils::one_sided_frequencies;
use crate::window::{normalization, Scaling, Window};

/// Per-segment trend removal applied before windowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Detrend {
    #[default]
    None,
    /// Subtract the segment mean.
    Constant,
    /// Subtract the least-squares line through the segment.
    Linear,
}

/// How per-segment periodograms are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Averaging {
    #[default]
    Mean,
    /// Bin-wise median, divided by the median bias of a χ²₂ variable so it
    /// estimates the same quantity as the mean.
    Median,
}

/// Parameters of a Welch estimate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WelchConfig {
    /// Samples per segment.
    pub nperseg: usize,
    /// Fraction of `nperseg` shared by consecutive segments, in `[0, 1)`.
    pub overlap: f64,
    pub window: Window,
    pub detrend: Detrend,
    pub averaging: Averaging,
    pub scaling: Scaling,
}

impl Default for WelchConfig {
    fn default() -> Self {
        Self {
            nperseg: 256,
            overlap: 0.5,
            window: Window::Hann,
            detrend: Detrend::None,
            averaging: Averaging::Mean,
            scaling: Scaling::Density,
        }
    }
}

impl WelchConfig {
    #[must_use]
    pub fn new(nperseg: usize) -> Self {
        Self {
            nperseg,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn overlap(mut self, overlap: f64) -> Self {
        self.overlap = overlap;
        self
    }

    #[must_use]
    pub fn window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn detrend(mut self, detrend: Detrend) -> Self {
        self.detrend = detrend;
        self
    }

    #[must_use]
    pub fn averaging(mut self, averaging: Averaging) -> Self {
        self.averaging = averaging;
        self
    }

    #[must_use]
    pub fn scaling(mut self, scaling: Scaling) -> Self {
        self.scaling = scaling;
        self
    }

    /// Checks the parameters against a signal of `n` samples.
    pub fn validate(&self, n: usize) -> Result<()> {
        if self.nperseg == 0 {
            return Err(SpectralError::invalid("nperseg must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.overlap) {
            return Err(SpectralError::invalid(format!(
                "overlap must lie in [0, 1), got {}",
                self.overlap
            )));
        }
        if self.nperseg > n {
            return Err(SpectralError::invalid(format!(
                "nperseg ({}) exceeds signal length ({n})",
                self.nperseg
            )));
        }
        Ok(())
    }
}

/// Hop between segment starts: `round(nperseg·(1 - overlap))`, at least 1.
///
/// ```
/// # use powerlaw_psd::welch::stride;
/// assert_eq!(stride(1024, 0.5), 512);
/// assert_eq!(stride(4, 0.9), 1); // round(0.4) = 0, clamped
/// ```
#[must_use]
pub fn stride(nperseg: usize, overlap: f64) -> usize {
    let raw = (nperseg as f64 * (1.0 - overlap)).round();
    if raw < 1.0 {
        1
    } else {
        raw as usize
    }
}

/// Number of full segments of `nperseg` samples at hop `stride` in `n` samples.
///
/// ```
/// # use powerlaw_psd::welch::segment_count;
/// assert_eq!(segment_count(10_000, 1024, 512), 18);
/// assert_eq!(segment_count(1000, 1024, 512), 0);
/// ```
#[must_use]
pub fn segment_count(n: usize, nperseg: usize, stride: usize) -> usize {
    if nperseg == 0 || stride == 0 || n < nperseg {
        return 0;
    }
    (n - nperseg) / stride + 1
}

/// A contiguous, full-length view into a signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<'a> {
    pub offset: usize,
    pub samples: &'a [f64],
}

/// Iterator over the full segments of a sample slice.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    samples: &'a [f64],
    nperseg: usize,
    stride: usize,
    next: usize,
}

impl<'a> Segments<'a> {
    /// Segments of `samples`; yields nothing when `nperseg` is zero or longer
    /// than the input.
    #[must_use]
    pub fn new(samples: &'a [f64], nperseg: usize, stride: usize) -> Self {
        Self {
            samples,
            nperseg,
            stride: stride.max(1),
            next: 0,
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.next;
        let end = offset.checked_add(self.nperseg)?;
        if self.nperseg == 0 || end > self.samples.len() {
            return None;
        }
        self.next = offset + self.stride;
        Some(Segment {
            offset,
            samples: &self.samples[offset..end],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = segment_count(
            self.samples.len().saturating_sub(self.next),
            self.nperseg,
            self.stride,
        );
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Segments<'_> {}

/// Per-bin factors turning squared FFT magnitudes into a one-sided estimate.
///
/// Every bin gets `2 / norm` except DC and, for even `nperseg`, the Nyquist
/// bin, which get `1 / norm` because they have no negative-frequency mirror.
///
/// ```
/// # use powerlaw_psd::welch::one_sided_scale;
/// assert_eq!(one_sided_scale(4, 2.0), vec![0.5, 1.0, 0.5]);
/// assert_eq!(one_sided_scale(5, 2.0), vec![0.5, 1.0, 1.0]);
/// ```
#[must_use]
pub fn one_sided_scale(nperseg: usize, norm: f64) -> Vec<f64> {
    let bins = nperseg / 2 + 1;
    (0..bins)
        .map(|k| {
            let single = k == 0 || (nperseg % 2 == 0 && k == nperseg / 2);
            if single {
                norm.recip()
            } else {
                2.0 / norm
            }
        })
        .collect()
}

/// Welch PSD estimator bound to an FFT engine.
///
/// # Example
///
/// ```
/// use powerlaw_psd::{Signal, Welch, WelchConfig};
/// let samples: Vec<f64> = (0..4096).map(|i| (0.2 * i as f64).sin()).collect();
/// let signal = Signal::new(samples, 1.0).unwrap();
/// let spectrum = Welch::new(WelchConfig::new(256)).estimate(&signal).unwrap();
/// assert_eq!(spectrum.len(), 129);
/// ```
#[derive(Debug)]
pub struct Welch<E = CpuFft> {
    config: WelchConfig,
    engine: E,
}

impl Welch<CpuFft> {
    #[must_use]
    pub fn new(config: WelchConfig) -> Self {
        Self::with_engine(config, CpuFft::new())
    }
}

impl<E: FftEngine> Welch<E> {
    #[must_use]
    pub fn with_engine(config: WelchConfig, engine: E) -> Self {
        Self { config, engine }
    }

    #[must_use]
    pub fn config(&self) -> &WelchConfig {
        &self.config
    }

    /// Estimates the PSD of `signal` at its own sample rate.
    pub fn estimate(&self, signal: &Signal) -> Result<Spectrum> {
        self.estimate_samples(signal.samples(), signal.sample_rate())
    }

    /// Estimates the PSD of raw `samples` taken at `sample_rate` Hz.
    ///
    /// Fails with [`SpectralError::InvalidArgument`] when the window has no
    /// energy at this length (a Hann window of 2 samples is `[0, 0]`) or when
    /// any bin overflows to a non-finite power.
    pub fn estimate_samples(&self, samples: &[f64], sample_rate: f64) -> Result<Spectrum> {
        let cfg = &self.config;
        validate_sample_rate(sample_rate)?;
        cfg.validate(samples.len())?;

        let n = samples.len();
        let nperseg = cfg.nperseg;
        let raw_stride = (nperseg as f64 * (1.0 - cfg.overlap)).round();
        let hop = stride(nperseg, cfg.overlap);
        if raw_stride < 1.0 {
            warn!(nperseg, overlap = cfg.overlap, "segment stride rounds to 0, clamped to 1");
        }

        let count = segment_count(n, nperseg, hop);
        if count == 0 {
            return Err(SpectralError::InsufficientData {
                what: "welch segmentation",
                needed: nperseg,
                available: n,
            });
        }
        let covered = (count - 1) * hop + nperseg;
        debug!(
            n,
            nperseg,
            stride = hop,
            segments = count,
            dropped = n - covered,
            "welch segmentation"
        );

        let weights = cfg.window.weights(nperseg);
        let norm = normalization(&weights, sample_rate, cfg.scaling);
        if !(norm.is_finite() && norm > 0.0) {
            return Err(SpectralError::invalid(format!(
                "{:?} window of length {nperseg} has normalization {norm}",
                cfg.window
            )));
        }
        let scale = one_sided_scale(nperseg, norm);

        let periodograms = Segments::new(samples, nperseg, hop)
            .map(|segment| self.periodogram(segment.samples, &weights, &scale));

        let power = match cfg.averaging {
            Averaging::Mean => mean_of(periodograms, scale.len(), count),
            Averaging::Median => median_of(periodograms.collect(), scale.len()),
        };

        let frequencies = one_sided_frequencies(nperseg, sample_rate);
        if let Some((f, p)) = frequencies.iter().zip(&power).find(|(_, p)| !p.is_finite()) {
            return Err(SpectralError::invalid(format!(
                "power at {f} Hz is {p}; input samples must be finite and small enough to square"
            )));
        }
        Ok(Spectrum::from_parts(frequencies, power))
    }

    /// Scaled one-sided periodogram of a single full segment.
    fn periodogram(&self, segment: &[f64], weights: &[f64], scale: &[f64]) -> Vec<f64> {
        let mut tapered = detrended(segment, self.config.detrend);
        for (x, w) in tapered.iter_mut().zip(weights) {
            *x *= w;
        }
        let coefficients = self.engine.transform_real(&tapered);
        coefficients
            .iter()
            .zip(scale)
            .map(|(c, s)| c.norm_sqr() * s)
            .collect()
    }
}

fn mean_of(periodograms: impl Iterator<Item = Vec<f64>>, bins: usize, count: usize) -> Vec<f64> {
    let mut acc = vec![0.0; bins];
    for p in periodograms {
        for (a, v) in acc.iter_mut().zip(&p) {
            *a += v;
        }
    }
    let inv = (count as f64).recip();
    acc.iter_mut().for_each(|a| *a *= inv);
    acc
}

fn median_of(periodograms: Vec<Vec<f64>>, bins: usize) -> Vec<f64> {
    let bias = median_bias(periodograms.len());
    let mut column = Vec::with_capacity(periodograms.len());
    (0..bins)
        .map(|k| {
            column.clear();
            column.extend(periodograms.iter().map(|p| p[k]));
            column.sort_by(f64::total_cmp);
            let mid = column.len() / 2;
            let median = if column.len() % 2 == 0 {
                0.5 * (column[mid - 1] + column[mid])
            } else {
                column[mid]
            };
            median / bias
        })
        .collect()
}

/// Ratio of the sample median to the mean for `n` independent χ²₂ draws.
fn median_bias(n: usize) -> f64 {
    let terms = n.saturating_sub(1) / 2;
    1.0 + (1..=terms)
        .map(|i| {
            let ii = 2.0 * i as f64;
            1.0 / (ii + 1.0) - 1.0 / ii
        })
        .sum::<f64>()
}

fn detrended(segment: &[f64], detrend: Detrend) -> Vec<f64> {
    match detrend {
        Detrend::None => segment.to_vec(),
        Detrend::Constant => {
            let mean = segment.iter().sum::<f64>() / segment.len() as f64;
            segment.iter().map(|x| x - mean).collect()
        }
        Detrend::Linear => {
            let n = segment.len() as f64;
            let mean_t = (n - 1.0) / 2.0;
            let mean_x = segment.iter().sum::<f64>() / n;
            let (mut sxy, mut sxx) = (0.0, 0.0);
            for (i, x) in segment.iter().enumerate() {
                let dt = i as f64 - mean_t;
                sxy += dt * (x - mean_x);
                sxx += dt * dt;
            }
            let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
            segment
                .iter()
                .enumerate()
                .map(|(i, x)| x - mean_x - slope * (i as f64 - mean_t))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_follow_stride_and_drop_tail() {
        let samples: Vec<f64> = (0..10).map(f64::from).collect();
        let offsets: Vec<usize> = Segments::new(&samples, 4, 3).map(|s| s.offset).collect();
        // 0..4, 3..7, 6..10; a fourth segment would start at 9 and is dropped.
        assert_eq!(offsets, vec![0, 3, 6]);
        assert_eq!(Segments::new(&samples, 4, 3).len(), 3);
        assert_eq!(Segments::new(&samples, 11, 3).count(), 0);
    }

    #[test]
    fn median_bias_matches_reference_values() {
        assert_eq!(median_bias(1), 1.0);
        assert_eq!(median_bias(2), 1.0);
        assert!((median_bias(3) - (1.0 + 1.0 / 3.0 - 0.5)).abs() < 1e-15);
        // Tends to ln 2 for large n.
        assert!((median_bias(10_001) - std::f64::consts::LN_2).abs() < 1e-4);
    }

    #[test]
    fn linear_detrend_removes_a_ramp() {
        let ramp: Vec<f64> = (0..16).map(|i| 3.0 + 0.5 * i as f64).collect();
        assert!(detrended(&ramp, Detrend::Linear).iter().all(|x| x.abs() < 1e-12));
        let centred = detrended(&ramp, Detrend::Constant);
        assert!(centred.iter().sum::<f64>().abs() < 1e-12);
    }

    #[test]
    fn validate_rejects_bad_parameters() {
        assert!(WelchConfig::new(0).validate(10).is_err());
        assert!(WelchConfig::new(4).overlap(1.0).validate(10).is_err());
        assert!(WelchConfig::new(4).overlap(-0.1).validate(10).is_err());
        assert!(WelchConfig::new(4).overlap(f64::NAN).validate(10).is_err());
        assert!(WelchConfig::new(11).validate(10).is_err());
        assert!(WelchConfig::new(10).overlap(0.0).validate(10).is_ok());
    }
}
