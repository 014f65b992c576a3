use std::f64::consts::PI;

/// Generates `num_samples` of `amplitude · sin(2π · frequency · t)` sampled at
/// `sample_rate` Hz, starting at `t = 0`.
///
/// # Example
///
/// ```
/// # use powerlaw_psd::utils::generate_sine_wave;
/// let sine_wave = generate_sine_wave(10.0, 2.0, 1000.0, 2000);
/// assert_eq!(sine_wave.len(), 2000);
/// assert!((sine_wave[25] - 2.0).abs() < 1e-12); // quarter period
/// ```
#[must_use]
pub fn generate_sine_wave(
    frequency: f64,
    amplitude: f64,
    sample_rate: f64,
    num_samples: usize,
) -> Vec<f64> {
    (0..num_samples)
        .map(|n| amplitude * (2.0 * PI * frequency * n as f64 / sample_rate).sin())
        .collect()
}

/// Returns the frequency of each bin of a full `n`-point DFT in standard FFT order.
///
/// Bins `0..=(n-1)/2` are the non-negative frequencies `k / (n·d)`; the
/// remaining bins are the negative frequencies `(k - n) / (n·d)`, ascending
/// towards zero. `d` is the sample spacing (the reciprocal of the sample rate).
///
/// # Example
///
/// ```
/// # use powerlaw_psd::utils::fft_frequencies;
/// assert_eq!(fft_frequencies(4, 1.0), vec![0.0, 0.25, -0.5, -0.25]);
/// assert_eq!(fft_frequencies(5, 1.0), vec![0.0, 0.2, 0.4, -0.4, -0.2]);
/// ```
#[must_use]
pub fn fft_frequencies(n: usize, d: f64) -> Vec<f64> {
    let scale = (n as f64 * d).recip();
    let positive = n.div_ceil(2);
    (0..n)
        .map(|k| {
            let signed = if k < positive { k as f64 } else { k as f64 - n as f64 };
            signed * scale
        })
        .collect()
}

/// Returns the `n_total / 2 + 1` unique positive-frequency bins (0 Hz … Nyquist) for a
/// real-valued DFT of `n_total` samples at `sample_rate` Hz.
///
/// # Example
///
/// ```
/// # use powerlaw_psd::utils::one_sided_frequencies;
/// let freqs = one_sided_frequencies(1000, 200.0);
/// assert_eq!(freqs.len(), 501);       // n/2 + 1
/// assert_eq!(freqs[0], 0.0);          // DC
/// assert!((freqs[500] - 100.0).abs() < 1e-9); // Nyquist = sample_rate / 2
/// ```
#[must_use]
pub fn one_sided_frequencies(n_total: usize, sample_rate: f64) -> Vec<f64> {
    (0..=n_total / 2)
        .map(|k| k as f64 * sample_rate / n_total as f64)
        .collect()
}

/// Finds local peaks of `power` above `threshold`, returned as `(frequency, power)` pairs.
///
/// A peak is a bin whose value exceeds both immediate neighbours and the threshold.
/// The first and last bins are never reported (they cannot be local peaks).
///
/// # Example
///
/// ```
/// # use powerlaw_psd::utils::find_dominant_frequencies;
/// let power = [0.1, 0.5, 0.3, 0.7, 0.2];
/// let frequencies = [0.0, 100.0, 200.0, 300.0, 400.0];
/// let dominant = find_dominant_frequencies(&power, &frequencies, 0.4);
/// assert_eq!(dominant, vec![(100.0, 0.5), (300.0, 0.7)]);
/// ```
#[must_use]
pub fn find_dominant_frequencies(
    power: &[f64],
    frequencies: &[f64],
    threshold: f64,
) -> Vec<(f64, f64)> {
    let len = power.len().min(frequencies.len());
    (1..len.saturating_sub(1))
        .filter(|&i| power[i] > power[i - 1] && power[i] > power[i + 1] && power[i] > threshold)
        .map(|i| (frequencies[i], power[i]))
        .collect()
}
