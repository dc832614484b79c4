//! Random Cropping
//!
//! Picks a random excerpt of at least `min_length_secs` from a signal.

use log::debug;
use rand::Rng;

use crate::engine::SampleBuffer;
use crate::error::{AugmentError, Result};

/// Crop a random excerpt of at least `min_length_secs`
///
/// `start` is drawn uniformly from `[0, duration - min_length)` and `end` from
/// `[start + min_length, duration)`. The sample range is widened outward to
/// whole samples, so the excerpt is never shorter than requested.
///
/// # Arguments
/// * `signal` - Recording to crop
/// * `min_length_secs` - Shortest allowed excerpt
/// * `rng` - Source of the two uniform draws
///
/// # Returns
/// * `Ok(SampleBuffer)` - A contiguous excerpt at the signal's sample rate
/// * `Err(AugmentError)` - If no excerpt of that length fits
///
/// # Errors
/// * `InvalidParameter` - If `min_length_secs` is not a positive finite number
/// * `InsufficientDuration` - If the signal is not longer than `min_length_secs`
pub fn random_crop<R: Rng + ?Sized>(
    signal: &SampleBuffer,
    min_length_secs: f64,
    rng: &mut R,
) -> Result<SampleBuffer> {
    if !(min_length_secs.is_finite() && min_length_secs > 0.0) {
        return Err(AugmentError::InvalidParameter {
            name: "min_length",
            reason: format!("must be a positive number of seconds, got {}", min_length_secs),
        });
    }

    let duration = signal.duration_secs();
    if duration <= min_length_secs {
        return Err(AugmentError::InsufficientDuration {
            duration_secs: duration,
            min_length_secs,
        });
    }

    let start = uniform(rng, 0.0, duration - min_length_secs);
    let end = uniform(rng, start + min_length_secs, duration);

    let sample_rate = signal.sample_rate() as f64;
    let start_idx = (start * sample_rate).floor() as usize;
    let end_idx = ((end * sample_rate).ceil() as usize).min(signal.len());

    debug!(
        "Cropping {:.3}s..{:.3}s (samples {}..{})",
        start, end, start_idx, end_idx
    );

    signal.slice(start_idx, end_idx)
}

/// Uniform draw from `[low, high)`, collapsing to `low` for an empty range
fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}
