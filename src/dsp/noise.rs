//! Additive Noise
//!
//! Mixes a noise recording into a signal at a target signal-to-noise ratio,
//! then restores the signal's original RMS level.

use log::debug;

use crate::engine::buffer::{db_to_linear, rms};
use crate::engine::SampleBuffer;
use crate::error::{AugmentError, Result};

/// Repeat `noise` end to end and cut it to exactly `len` samples
pub fn tile_noise(noise: &[f32], len: usize) -> Vec<f32> {
    if noise.is_empty() {
        return vec![0.0; len];
    }
    noise.iter().copied().cycle().take(len).collect()
}

/// Add `noise` to `signal` at `snr_db`
///
/// The noise is tiled to the signal length, scaled so that
/// `rms(signal) / rms(scaled noise) == 10^(snr_db / 20)`, summed with the
/// signal, and the sum is rescaled back to the signal's RMS.
///
/// # Arguments
/// * `signal` - Recording to degrade
/// * `noise` - Noise profile at the same sample rate, any length
/// * `snr_db` - Target signal-to-noise ratio in dB
///
/// # Returns
/// A buffer of the signal's length and rate whose RMS equals the signal's.
///
/// # Errors
/// * `InvalidParameter` - If `snr_db` is not finite or so negative the noise
///   gain overflows
/// * `SampleRateMismatch` - If the noise is recorded at another rate
/// * `DegenerateNoise` - If the tiled noise is silent
/// * `DegenerateMix` - If the mix is silent (only possible for a silent signal)
pub fn add_noise(signal: &SampleBuffer, noise: &SampleBuffer, snr_db: f64) -> Result<SampleBuffer> {
    signal.ensure_same_rate(noise, "noise")?;
    if !snr_db.is_finite() {
        return Err(AugmentError::InvalidParameter {
            name: "snr",
            reason: format!("must be finite, got {}", snr_db),
        });
    }

    let tiled = tile_noise(noise.samples(), signal.len());

    let rms_noise = rms(&tiled);
    debug!("rms_noise: {}", rms_noise);
    if rms_noise == 0.0 {
        return Err(AugmentError::DegenerateNoise);
    }

    let rms_signal = signal.rms();
    debug!("rms_signal: {}", rms_signal);

    let snr_linear = db_to_linear(snr_db);
    debug!("snr, snr_linear: {}, {}", snr_db, snr_linear);

    let noise_factor = rms_signal / rms_noise / snr_linear;
    debug!("mixed = signal + noise * {}", noise_factor);
    if !noise_factor.is_finite() {
        return Err(snr_out_of_range(snr_db));
    }

    let mixed: Vec<f64> = signal
        .samples()
        .iter()
        .zip(&tiled)
        .map(|(&s, &n)| s as f64 + n as f64 * noise_factor)
        .collect();

    let rms_mixed = (mixed.iter().map(|v| v * v).sum::<f64>() / mixed.len() as f64).sqrt();
    if rms_mixed == 0.0 {
        return Err(AugmentError::DegenerateMix);
    }
    if !rms_mixed.is_finite() {
        return Err(snr_out_of_range(snr_db));
    }

    let restore = rms_signal / rms_mixed;
    Ok(signal.with_samples(mixed.iter().map(|v| (v * restore) as f32).collect()))
}

fn snr_out_of_range(snr_db: f64) -> AugmentError {
    AugmentError::InvalidParameter {
        name: "snr",
        reason: format!("{} dB scales the noise past f64 range", snr_db),
    }
}
