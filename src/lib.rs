//! Welch power spectral density estimation, colored-noise synthesis and
//! log-log power-law fitting.
//!
//! The pieces compose as
//! [`NoiseSynthesizer`] → [`Welch`] → [`fit_power_law`], and any external
//! signal can enter at [`Welch`]. Transforms go through the [`FftEngine`]
//! trait; [`CpuFft`] is the default and a cubecl [`GpuFft`] is available with
//! the `wgpu` or `cuda` feature.

pub mod error;
pub mod fft;
pub mod fit;
#[cfg(any(feature = "wgpu", feature = "cuda"))]
pub mod gpu;
pub mod noise;
pub mod spectrum;
pub mod utils;
pub mod welch;
pub mod window;

use rand::rngs::StdRng;
use rand::SeedableRng;

pub use error::{Result, SpectralError};
pub use fft::{CpuFft, FftEngine};
pub use fit::{fit_power_law, reconstruct_fit, PowerLawFit};
#[cfg(any(feature = "wgpu", feature = "cuda"))]
pub use gpu::GpuFft;
pub use noise::{NoiseColor, NoiseSynthesizer};
pub use rustfft::num_complex::Complex64;
pub use spectrum::{Signal, Spectrum};
pub use welch::{Averaging, Detrend, Welch, WelchConfig};
pub use window::{Scaling, Window};

#[cfg(feature = "wgpu")]
pub type GpuRuntime = cubecl::wgpu::WgpuRuntime;

#[cfg(all(feature = "cuda", not(feature = "wgpu")))]
pub type GpuRuntime = cubecl::cuda::CudaRuntime;

/// Synthesizes `n` samples of power-law noise with PSD ∝ `|f|^(-alpha)`.
///
/// The series is sampled at 1 Hz. With `Some(seed)` the output is
/// reproducible bit for bit; with `None` the generator is seeded from system
/// entropy.
///
/// # Errors
///
/// [`SpectralError::InvalidArgument`] when `n < 2`, `alpha` is not finite, or
/// `alpha` is so large that the spectral magnitudes overflow at length `n`.
///
/// # Example
///
/// ```
/// # use powerlaw_psd::synthesize_noise;
/// let a = synthesize_noise(1024, 1.0, Some(42)).unwrap();
/// let b = synthesize_noise(1024, 1.0, Some(42)).unwrap();
/// assert_eq!(a.samples(), b.samples());
/// ```
pub fn synthesize_noise(n: usize, alpha: f64, seed: Option<u64>) -> Result<Signal> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    NoiseSynthesizer::new(alpha)?.synthesize(n, &mut rng)
}

/// Estimates the one-sided PSD of `samples` with Welch's method, a Hann
/// window and no detrending.
///
/// The result has `nperseg / 2 + 1` bins at `k·fs/nperseg`.
///
/// # Errors
///
/// [`SpectralError::InvalidArgument`] when `nperseg` is zero or exceeds the
/// signal length, `overlap` is outside `[0, 1)` or `fs` is not a positive
/// finite rate. Also when `nperseg == 2` (the Hann window is all zeros) and
/// when non-finite or overflowing samples would give non-finite power.
///
/// # Example
///
/// ```
/// # use powerlaw_psd::estimate_psd;
/// let samples: Vec<f64> = (0..10_000).map(|i| (i as f64 * 0.1).sin()).collect();
/// let spectrum = estimate_psd(&samples, 1000.0, 1024, 0.5).unwrap();
/// assert_eq!(spectrum.len(), 513);
/// assert!(spectrum.power().iter().all(|&p| p >= 0.0));
/// ```
pub fn estimate_psd(samples: &[f64], fs: f64, nperseg: usize, overlap: f64) -> Result<Spectrum> {
    Welch::new(WelchConfig::new(nperseg).overlap(overlap)).estimate_samples(samples, fs)
}
