//! Gain Stage
//!
//! dB gain followed by hard clipping to full scale.

use log::info;

use crate::engine::buffer::db_to_linear;
use crate::engine::SampleBuffer;
use crate::error::{AugmentError, Result};

/// Full-scale sample bound
pub const FULL_SCALE: f32 = 1.0;

/// Scale `signal` by `gain_db` and hard-clip to `[-1.0, 1.0]`
///
/// # Arguments
/// * `signal` - Input buffer, left untouched
/// * `gain_db` - Gain in dB, positive or negative
///
/// # Returns
/// A buffer of the same length and rate with every non-NaN sample inside
/// full scale. A gain too large for `f64` saturates: non-zero samples go to
/// full scale by sign and zeros stay zero.
///
/// # Errors
/// * `InvalidParameter` - If `gain_db` is NaN or infinite
pub fn apply_gain(signal: &SampleBuffer, gain_db: f64) -> Result<SampleBuffer> {
    if !gain_db.is_finite() {
        return Err(AugmentError::InvalidParameter {
            name: "gain",
            reason: format!("must be finite, got {}", gain_db),
        });
    }
    info!("Apply gain {} dB", gain_db);
    let factor = db_to_linear(gain_db);

    let samples = signal
        .samples()
        .iter()
        .map(|&s| scale_and_clip(s, factor))
        .collect();

    Ok(signal.with_samples(samples))
}

fn scale_and_clip(sample: f32, factor: f64) -> f32 {
    if factor.is_infinite() {
        // 0 * inf is NaN
        return if sample == 0.0 {
            0.0
        } else {
            FULL_SCALE.copysign(sample)
        };
    }
    ((sample as f64 * factor) as f32).clamp(-FULL_SCALE, FULL_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(samples: Vec<f32>) -> SampleBuffer {
        SampleBuffer::new(samples, 44100).unwrap()
    }

    #[test]
    fn test_plus_40db_clips_point_one() {
        let out = apply_gain(&buffer(vec![0.1, -0.1, 0.0]), 40.0).unwrap();
        assert_eq!(out.samples(), &[1.0, -1.0, 0.0]);
    }

    #[test]
    fn test_unity_gain_is_identity() {
        let signal = buffer(vec![0.25, -0.5, 0.75]);
        assert_eq!(apply_gain(&signal, 0.0).unwrap(), signal);
    }

    #[test]
    fn test_minus_6db_halves_roughly() {
        let out = apply_gain(&buffer(vec![0.8]), -6.0).unwrap();
        assert!((out.samples()[0] - 0.8 * 0.501187).abs() < 1e-5);
    }

    #[test]
    fn test_out_of_range_input_is_clipped() {
        let out = apply_gain(&buffer(vec![1.5, -3.0]), 0.0).unwrap();
        assert_eq!(out.samples(), &[1.0, -1.0]);
    }

    #[test]
    fn test_keeps_sample_rate_and_length() {
        let signal = buffer(vec![0.1; 64]);
        let out = apply_gain(&signal, 12.0).unwrap();
        assert_eq!(out.len(), 64);
        assert_eq!(out.sample_rate(), 44100);
    }

    #[test]
    fn test_output_within_full_scale_for_any_gain() {
        let signal = buffer(vec![0.0, 0.1, -0.1, 1e-30, -0.9, 5.0, -f32::MAX]);
        for gain in [-1e4, -400.0, -40.0, -6.0, 0.0, 6.0, 40.0, 400.0, 3000.0, 1e4] {
            let out = apply_gain(&signal, gain).unwrap();
            for &s in out.samples() {
                assert!((-1.0..=1.0).contains(&s), "gain {}: sample {}", gain, s);
            }
        }
    }

    #[test]
    fn test_overflowing_gain_saturates_by_sign() {
        let out = apply_gain(&buffer(vec![0.0, 0.1, -0.1]), 10_000.0).unwrap();
        assert_eq!(out.samples(), &[0.0, 1.0, -1.0]);
    }

    #[test]
    fn test_non_finite_gain_rejected() {
        for gain in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                apply_gain(&buffer(vec![0.1]), gain),
                Err(AugmentError::InvalidParameter { name: "gain", .. })
            ));
        }
    }
}
