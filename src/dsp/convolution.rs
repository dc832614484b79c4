//! Convolution Reverb
//!
//! Convolves a signal with an impulse response and crossfades the result with
//! the dry signal. The convolution tail past the original length is dropped.

use log::{debug, info};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::engine::SampleBuffer;
use crate::error::{AugmentError, Result};

/// Impulse responses up to this length are convolved directly
const DIRECT_CONVOLUTION_MAX_IR: usize = 64;

/// Mix `signal` with its convolution by `impulse_response`
///
/// `output = convolved * level + signal * (1 - level)`, where `convolved`
/// is the full linear convolution cut to the signal length.
///
/// # Arguments
/// * `signal` - Dry recording
/// * `impulse_response` - Room or device response at the same sample rate
/// * `level` - Wet share in `[0, 1]`
///
/// # Returns
/// A buffer with the signal's length and rate.
///
/// # Errors
/// * `InvalidParameter` - If `level` is outside `[0, 1]`
/// * `SampleRateMismatch` - If the IR is recorded at another rate
pub fn convolve(
    signal: &SampleBuffer,
    impulse_response: &SampleBuffer,
    level: f64,
) -> Result<SampleBuffer> {
    if !(0.0..=1.0).contains(&level) {
        return Err(AugmentError::InvalidParameter {
            name: "level",
            reason: format!("must be between 0 and 1, got {}", level),
        });
    }
    signal.ensure_same_rate(impulse_response, "impulse response")?;

    info!(
        "Convolving with {} sample impulse response, level {}",
        impulse_response.len(),
        level
    );

    let wet = convolve_truncated(signal.samples(), impulse_response.samples());
    let dry = 1.0 - level;

    let samples = signal
        .samples()
        .iter()
        .zip(&wet)
        .map(|(&x, &y)| (y * level + x as f64 * dry) as f32)
        .collect();

    Ok(signal.with_samples(samples))
}

/// First `signal.len()` samples of the full linear convolution
pub fn convolve_truncated(signal: &[f32], ir: &[f32]) -> Vec<f64> {
    if signal.is_empty() || ir.is_empty() {
        return vec![0.0; signal.len()];
    }
    if ir.len() <= DIRECT_CONVOLUTION_MAX_IR {
        convolve_direct(signal, ir)
    } else {
        convolve_fft(signal, ir)
    }
}

fn convolve_direct(signal: &[f32], ir: &[f32]) -> Vec<f64> {
    (0..signal.len())
        .map(|n| {
            let taps = ir.len().min(n + 1);
            (0..taps)
                .map(|k| signal[n - k] as f64 * ir[k] as f64)
                .sum()
        })
        .collect()
}

fn convolve_fft(signal: &[f32], ir: &[f32]) -> Vec<f64> {
    // Only the first signal.len() outputs are kept, so the IR past that point
    // never contributes.
    let ir = &ir[..ir.len().min(signal.len())];
    let full_len = signal.len() + ir.len() - 1;
    let fft_len = full_len.next_power_of_two();
    debug!("FFT convolution: {} x {} -> fft size {}", signal.len(), ir.len(), fft_len);

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(fft_len);
    let inverse = planner.plan_fft_inverse(fft_len);

    let mut x = zero_padded(signal, fft_len);
    let mut h = zero_padded(ir, fft_len);
    forward.process(&mut x);
    forward.process(&mut h);

    for (a, b) in x.iter_mut().zip(&h) {
        *a *= b;
    }
    inverse.process(&mut x);

    let scale = 1.0 / fft_len as f64;
    x.iter().take(signal.len()).map(|c| c.re * scale).collect()
}

fn zero_padded(samples: &[f32], len: usize) -> Vec<Complex<f64>> {
    let mut out = vec![Complex::new(0.0, 0.0); len];
    for (slot, &s) in out.iter_mut().zip(samples) {
        slot.re = s as f64;
    }
    out
}
