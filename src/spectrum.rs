use crate::error::{Result, SpectralError};
use crate::utils::find_dominant_frequencies;

/// A real-valued, uniformly sampled time series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signal {
    samples: Vec<f64>,
    sample_rate: f64,
}

impl Signal {
    /// Wraps `samples` taken at `sample_rate` Hz.
    ///
    /// Fails with [`SpectralError::InsufficientData`] for an empty series and
    /// [`SpectralError::InvalidArgument`] for a non-positive or non-finite rate
    /// or any non-finite sample.
    pub fn new(samples: Vec<f64>, sample_rate: f64) -> Result<Self> {
        validate_sample_rate(sample_rate)?;
        if samples.is_empty() {
            return Err(SpectralError::InsufficientData {
                what: "signal",
                needed: 1,
                available: 0,
            });
        }
        if let Some((i, x)) = samples.iter().enumerate().find(|(_, x)| !x.is_finite()) {
            return Err(SpectralError::invalid(format!(
                "sample {i} is {x}; samples must be finite"
            )));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    #[must_use]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

pub(crate) fn validate_sample_rate(sample_rate: f64) -> Result<()> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(SpectralError::invalid(format!(
            "sample rate must be finite and > 0, got {sample_rate}"
        )));
    }
    Ok(())
}

/// A one-sided spectrum: `(frequency, power)` pairs with frequency strictly
/// increasing from a non-negative start and power ≥ 0.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spectrum {
    frequencies: Vec<f64>,
    power: Vec<f64>,
}

impl Spectrum {
    /// Builds a spectrum from parallel frequency and power arrays.
    ///
    /// ```
    /// # use powerlaw_psd::Spectrum;
    /// let s = Spectrum::new(vec![0.0, 1.0, 2.0], vec![0.5, 1.0, 0.25]).unwrap();
    /// assert_eq!(s.peak(), Some((1.0, 1.0)));
    /// assert!(Spectrum::new(vec![0.0, 1.0], vec![1.0]).is_err());
    /// ```
    pub fn new(frequencies: Vec<f64>, power: Vec<f64>) -> Result<Self> {
        if frequencies.len() != power.len() {
            return Err(SpectralError::invalid(format!(
                "frequency and power lengths differ ({} vs {})",
                frequencies.len(),
                power.len()
            )));
        }
        if let Some(&f) = frequencies.iter().find(|f| !(f.is_finite() && **f >= 0.0)) {
            return Err(SpectralError::invalid(format!(
                "frequencies must be finite and >= 0, got {f}"
            )));
        }
        if frequencies.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SpectralError::invalid(
                "frequencies must be strictly increasing",
            ));
        }
        if let Some(&p) = power.iter().find(|p| !(p.is_finite() && **p >= 0.0)) {
            return Err(SpectralError::invalid(format!(
                "power values must be finite and >= 0, got {p}"
            )));
        }
        Ok(Self { frequencies, power })
    }

    /// Constructor for estimator output, whose invariants hold by construction.
    pub(crate) fn from_parts(frequencies: Vec<f64>, power: Vec<f64>) -> Self {
        debug_assert_eq!(frequencies.len(), power.len());
        Self { frequencies, power }
    }

    #[must_use]
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    #[must_use]
    pub fn power(&self) -> &[f64] {
        &self.power
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Iterates `(frequency, power)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies.iter().copied().zip(self.power.iter().copied())
    }

    /// Spacing between the first two bins, `None` with fewer than two bins.
    #[must_use]
    pub fn bin_width(&self) -> Option<f64> {
        match self.frequencies.as_slice() {
            [f0, f1, ..] => Some(f1 - f0),
            _ => None,
        }
    }

    /// The bin with the largest power. Ties resolve to the lowest frequency.
    #[must_use]
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.iter()
            .fold(None, |best: Option<(f64, f64)>, (f, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((f, p)),
            })
    }

    /// Local power maxima above `threshold`; see [`find_dominant_frequencies`].
    #[must_use]
    pub fn dominant_frequencies(&self, threshold: f64) -> Vec<(f64, f64)> {
        find_dominant_frequencies(&self.power, &self.frequencies, threshold)
    }

    /// The spectrum with every zero-frequency bin removed, ready for a log axis.
    #[must_use]
    pub fn without_dc(&self) -> Self {
        let (frequencies, power) = self.iter().filter(|&(f, _)| f > 0.0).unzip();
        Self { frequencies, power }
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.frequencies, self.power)
    }
}
