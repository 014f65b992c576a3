//! GPU FFT engine on cubecl.
//!
//! Power-of-two lengths run the radix-2 butterfly kernel directly, one launch
//! per stage. Other lengths go through Bluestein's algorithm on top of the
//! same kernel, so no padding is visible to callers. Arithmetic on the device
//! is `f32`; expect round-trip errors around `1e-6` relative rather than the
//! `1e-12` of [`CpuFft`](crate::CpuFft).

mod bluestein;
mod butterfly;

use cubecl::prelude::*;
use rustfft::num_complex::Complex64;

use crate::fft::FftEngine;
use butterfly::{bit_reverse, butterfly_stage};

// The general advice for WebGPU is to choose a workgroup size of 64
// Common sizes are 32, 64, 128, 256, or 512 threads per workgroup.
// Apple Metal supports a maximum workgroup size of 1024 threads.
const WORKGROUP_SIZE: u32 = 1024;

/// [`FftEngine`] running on a cubecl device.
///
/// ```no_run
/// use powerlaw_psd::{GpuFft, Welch, WelchConfig};
/// let welch = Welch::with_engine(WelchConfig::new(1024), GpuFft::default_device());
/// ```
pub struct GpuFft<R: Runtime = crate::GpuRuntime> {
    device: R::Device,
}

impl GpuFft<crate::GpuRuntime> {
    #[must_use]
    pub fn default_device() -> Self {
        Self::new(Default::default())
    }
}

impl<R: Runtime> GpuFft<R> {
    #[must_use]
    pub fn new(device: R::Device) -> Self {
        Self { device }
    }

    fn dispatch(&self, input: &[Complex64], forward: bool) -> Vec<Complex64> {
        if input.len().is_power_of_two() {
            radix2::<R>(&self.device, input, forward)
        } else {
            bluestein::transform(input, forward, |x, fwd| radix2::<R>(&self.device, x, fwd))
        }
    }
}

impl<R: Runtime> FftEngine for GpuFft<R> {
    fn transform(&self, input: &[Complex64]) -> Vec<Complex64> {
        if input.len() <= 1 {
            return input.to_vec();
        }
        self.dispatch(input, true)
    }

    fn inverse_transform(&self, input: &[Complex64]) -> Vec<Complex64> {
        if input.len() <= 1 {
            return input.to_vec();
        }
        let scale = (input.len() as f64).recip();
        self.dispatch(input, false)
            .into_iter()
            .map(|c| c * scale)
            .collect()
    }
}

/// Unscaled radix-2 DIT transform of a power-of-two-length `input`.
fn radix2<R: Runtime>(device: &R::Device, input: &[Complex64], forward: bool) -> Vec<Complex64> {
    let n = input.len();
    debug_assert!(n.is_power_of_two());
    if n <= 1 {
        return input.to_vec();
    }
    let m = n.ilog2();

    // ── Bit-reverse permute the input on the CPU (O(N)) ───────────────────────
    let mut real = vec![0.0f32; n];
    let mut imag = vec![0.0f32; n];
    for (i, c) in input.iter().enumerate() {
        let j = bit_reverse(i, m);
        real[j] = c.re as f32;
        imag[j] = c.im as f32;
    }

    let client = R::client(device);
    let real_handle = client.create_from_slice(f32::as_bytes(&real));
    let imag_handle = client.create_from_slice(f32::as_bytes(&imag));

    // ── One launch per stage over global memory ───────────────────────────────
    let workgroups = ((n / 2) as u32).div_ceil(WORKGROUP_SIZE);
    for s in 0..m {
        let half_stride = 1_usize << s;
        unsafe {
            butterfly_stage::launch::<f32, R>(
                &client,
                CubeCount::Static(workgroups, 1, 1),
                CubeDim::new_1d(WORKGROUP_SIZE),
                ArrayArg::from_raw_parts::<f32>(&real_handle, n, 1),
                ArrayArg::from_raw_parts::<f32>(&imag_handle, n, 1),
                n,           // comptime
                half_stride, // comptime — unique kernel per stage
                forward,     // comptime
            )
            .expect("butterfly stage launch failed")
        };
    }

    let real_out = f32::from_bytes(&client.read_one(real_handle)).to_vec();
    let imag_out = f32::from_bytes(&client.read_one(imag_handle)).to_vec();

    real_out
        .into_iter()
        .zip(imag_out)
        .map(|(re, im)| Complex64::new(f64::from(re), f64::from(im)))
        .collect()
}
