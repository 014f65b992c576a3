use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftDirection, FftPlanner};

/// A discrete Fourier transform and its inverse over finite complex sequences.
///
/// Implementations must accept any length (no power-of-two restriction is
/// visible to callers) and satisfy `inverse_transform(transform(x)) ≈ x`.
/// The forward transform is unnormalised; the inverse divides by `N`.
pub trait FftEngine {
    /// Forward DFT: `X[k] = Σ x[n]·e^{-j2πkn/N}`.
    fn transform(&self, input: &[Complex64]) -> Vec<Complex64>;

    /// Inverse DFT: `x[n] = (1/N) Σ X[k]·e^{+j2πkn/N}`.
    fn inverse_transform(&self, input: &[Complex64]) -> Vec<Complex64>;

    /// Forward DFT of a real-valued sequence.
    fn transform_real(&self, input: &[f64]) -> Vec<Complex64> {
        let complex: Vec<Complex64> = input.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        self.transform(&complex)
    }
}

/// CPU engine backed by `rustfft`.
///
/// Plans are cached per `(length, direction)`, so the repeated same-length
/// transforms issued by the Welch estimator are planned once. The cache sits
/// behind a mutex, which keeps the engine `Send + Sync`.
///
/// # Example
///
/// ```
/// use powerlaw_psd::{CpuFft, FftEngine};
/// let engine = CpuFft::new();
/// let spectrum = engine.transform_real(&[1.0, 0.0, 0.0, 0.0, 0.0]);
/// assert_eq!(spectrum.len(), 5);
/// assert!(spectrum.iter().all(|c| (c.re - 1.0).abs() < 1e-12 && c.im.abs() < 1e-12));
/// ```
#[derive(Default)]
pub struct CpuFft {
    plans: Mutex<PlanCache>,
}

struct PlanCache {
    planner: FftPlanner<f64>,
    plans: HashMap<(usize, bool), Arc<dyn Fft<f64>>>,
}

impl Default for PlanCache {
    fn default() -> Self {
        Self {
            planner: FftPlanner::new(),
            plans: HashMap::new(),
        }
    }
}

impl CpuFft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn plan(&self, len: usize, direction: FftDirection) -> Arc<dyn Fft<f64>> {
        // Cached plans stay valid even if a previous holder panicked.
        let mut cache = self.plans.lock().unwrap_or_else(|e| e.into_inner());
        let forward = direction == FftDirection::Forward;
        if let Some(plan) = cache.plans.get(&(len, forward)) {
            return Arc::clone(plan);
        }
        let plan = cache.planner.plan_fft(len, direction);
        cache.plans.insert((len, forward), Arc::clone(&plan));
        plan
    }

    fn process(&self, input: &[Complex64], direction: FftDirection) -> Vec<Complex64> {
        let mut buffer = input.to_vec();
        if buffer.is_empty() {
            return buffer;
        }
        self.plan(buffer.len(), direction).process(&mut buffer);
        buffer
    }
}

impl std::fmt::Debug for CpuFft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuFft").finish_non_exhaustive()
    }
}

impl FftEngine for CpuFft {
    fn transform(&self, input: &[Complex64]) -> Vec<Complex64> {
        self.process(input, FftDirection::Forward)
    }

    fn inverse_transform(&self, input: &[Complex64]) -> Vec<Complex64> {
        let mut output = self.process(input, FftDirection::Inverse);
        let scale = (output.len() as f64).recip();
        for v in &mut output {
            *v *= scale;
        }
        output
    }
}

impl<E: FftEngine + ?Sized> FftEngine for &E {
    fn transform(&self, input: &[Complex64]) -> Vec<Complex64> {
        (**self).transform(input)
    }

    fn inverse_transform(&self, input: &[Complex64]) -> Vec<Complex64> {
        (**self).inverse_transform(input)
    }

    fn transform_real(&self, input: &[f64]) -> Vec<Complex64> {
        (**self).transform_real(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plans_are_reused_per_length_and_direction() {
        let engine = CpuFft::new();
        let x = vec![Complex64::new(1.0, 0.0); 12];
        let _ = engine.transform(&x);
        let _ = engine.transform(&x);
        let _ = engine.inverse_transform(&x);
        let cache = engine.plans.lock().unwrap();
        assert_eq!(cache.plans.len(), 2);
    }

    #[test]
    fn empty_input_is_empty_output() {
        let engine = CpuFft::new();
        assert!(engine.transform(&[]).is_empty());
        assert!(engine.inverse_transform(&[]).is_empty());
    }
}
