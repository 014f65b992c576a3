use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::debug;

use crate::error::{Result, SpectralError};
use crate::spectrum::Spectrum;

/// Fewest non-DC points accepted by [`fit_power_law`]; two fix the line and
/// the third leaves one degree of freedom for the standard error.
pub const MIN_FIT_POINTS: usize = 3;

/// Least-squares line through `(log10 f, log10 P)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerLawFit {
    /// Spectral exponent β in `P ∝ f^β`.
    pub slope: f64,
    /// `log10` of the power at 1 Hz.
    pub intercept: f64,
    /// Pearson correlation of the log-log points.
    pub r_value: f64,
    /// Two-sided p-value for the null hypothesis `slope == 0`.
    pub p_value: f64,
    /// Standard error of `slope`.
    pub std_err: f64,
    /// Number of points that entered the fit.
    pub points: usize,
}

impl PowerLawFit {
    /// `-slope`, the α that [`NoiseSynthesizer`](crate::NoiseSynthesizer) would
    /// need to produce this spectrum.
    #[must_use]
    pub fn exponent_as_alpha(&self) -> f64 {
        -self.slope
    }

    /// `r²`.
    #[must_use]
    pub fn r_squared(&self) -> f64 {
        self.r_value * self.r_value
    }

    /// Power predicted by the fit at frequency `f`, `10^(slope·log10 f + intercept)`.
    #[must_use]
    pub fn predict(&self, frequency: f64) -> f64 {
        10f64.powf(self.slope * frequency.log10() + self.intercept)
    }

    /// The fitted line evaluated at each of `frequencies`, for overlaying on a
    /// log-log plot. Every frequency must be finite and > 0.
    ///
    /// ```
    /// # use powerlaw_psd::{fit_power_law, Spectrum};
    /// let f = vec![0.0, 1.0, 10.0, 100.0];
    /// let p = vec![9.0, 1.0, 0.1, 0.01];
    /// let fit = fit_power_law(&Spectrum::new(f, p).unwrap()).unwrap();
    /// let line = fit.reconstruct(&[1.0, 1000.0]).unwrap();
    /// assert!((line[1] - 1e-3).abs() < 1e-12);
    /// ```
    pub fn reconstruct(&self, frequencies: &[f64]) -> Result<Vec<f64>> {
        if let Some(&f) = frequencies.iter().find(|f| !(f.is_finite() && **f > 0.0)) {
            return Err(SpectralError::invalid(format!(
                "fit can only be evaluated at finite positive frequencies, got {f}"
            )));
        }
        Ok(frequencies.iter().map(|&f| self.predict(f)).collect())
    }
}

/// Fits `log10(power) = slope·log10(frequency) + intercept` by ordinary least
/// squares over every bin except the zero-frequency one.
///
/// Fails with [`SpectralError::InsufficientData`] when fewer than
/// [`MIN_FIT_POINTS`] bins remain or the remaining frequencies do not vary,
/// and with [`SpectralError::InvalidArgument`] when a retained bin has
/// power ≤ 0 or non-finite power.
pub fn fit_power_law(spectrum: &Spectrum) -> Result<PowerLawFit> {
    let retained = spectrum.without_dc();
    let n = retained.len();
    if n < MIN_FIT_POINTS {
        return Err(SpectralError::InsufficientData {
            what: "power-law fit",
            needed: MIN_FIT_POINTS,
            available: n,
        });
    }
    if let Some((f, p)) = retained.iter().find(|&(_, p)| !(p.is_finite() && p > 0.0)) {
        return Err(SpectralError::invalid(format!(
            "power at {f} Hz is {p}; log10 requires finite power > 0"
        )));
    }

    let x: Vec<f64> = retained.frequencies().iter().map(|f| f.log10()).collect();
    let y: Vec<f64> = retained.power().iter().map(|p| p.log10()).collect();
    let fit = linear_regression(&x, &y)?;
    debug!(
        points = n,
        slope = fit.slope,
        intercept = fit.intercept,
        r = fit.r_value,
        "power-law fit"
    );
    Ok(fit)
}

/// `fit.reconstruct(frequencies)`.
pub fn reconstruct_fit(fit: &PowerLawFit, frequencies: &[f64]) -> Result<Vec<f64>> {
    fit.reconstruct(frequencies)
}

/// Closed-form OLS with the usual linregress conventions for degenerate input.
fn linear_regression(x: &[f64], y: &[f64]) -> Result<PowerLawFit> {
    let n = x.len();
    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx <= 0.0 {
        return Err(SpectralError::InsufficientData {
            what: "power-law fit (distinct frequencies)",
            needed: 2,
            available: 1,
        });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let denom = (sxx * syy).sqrt();
    let r = if denom == 0.0 {
        0.0
    } else {
        (sxy / denom).clamp(-1.0, 1.0)
    };

    let df = (n - 2) as f64;
    let one_minus_r2 = (1.0 - r) * (1.0 + r);
    let std_err = (one_minus_r2 * syy / sxx / df).sqrt();
    let p_value = if one_minus_r2 <= 0.0 {
        0.0
    } else {
        let t = r * (df / one_minus_r2).sqrt();
        two_sided_p(t, df)?
    };

    Ok(PowerLawFit {
        slope,
        intercept,
        r_value: r,
        p_value,
        std_err,
        points: n,
    })
}

fn two_sided_p(t: f64, df: f64) -> Result<f64> {
    if t.is_nan() {
        return Err(SpectralError::invalid("t statistic is NaN"));
    }
    if t.is_infinite() {
        return Ok(0.0);
    }
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| SpectralError::invalid(format!("t distribution with {df} dof: {e}")))?;
    Ok((2.0 * dist.sf(t.abs())).min(1.0))
}
