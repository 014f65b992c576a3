//! PSD of a 10 Hz sine buried in Gaussian noise, sampled at 1 kHz.
//!
//! Usage: `cargo run --example noisy_sine -- [-v]...`

use powerlaw_psd::utils::generate_sine_wave;
use powerlaw_psd::{estimate_psd, fit_power_law};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing::info;

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_level = match std::env::args().filter(|a| a == "-v").count() {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let fs = 1000.0;
    let n = 100_000;
    let mut rng = StdRng::seed_from_u64(0);
    let noise = Normal::new(0.0, 0.5)?;
    let data: Vec<f64> = generate_sine_wave(10.0, 1.0, fs, n)
        .into_iter()
        .map(|x| x + noise.sample(&mut rng))
        .collect();

    let spectrum = estimate_psd(&data, fs, 1024, 0.5)?;
    if let Some((f, p)) = spectrum.peak() {
        info!(frequency = f, power = p, "spectral peak");
    }
    for (f, p) in spectrum.dominant_frequencies(0.01) {
        info!(frequency = f, power = p, "dominant");
    }

    let fit = fit_power_law(&spectrum)?;
    info!(slope = fit.slope, r = fit.r_value, p = fit.p_value, "log-log fit");
    Ok(())
}
