//! Sample Buffer
//!
//! Mono audio signal type shared by every transform. Samples are 32-bit
//! float; level measurements accumulate in f64.

use crate::error::{AugmentError, Result};

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert linear amplitude to decibels
///
/// Returns -infinity for zero input.
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        f64::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Root-mean-square of a sample slice
///
/// Returns 0.0 for an empty slice.
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_squares / samples.len() as f64).sqrt()
}

// ============================================================================
// Sample Buffer
// ============================================================================

/// In-memory mono audio signal
///
/// # Example
/// ```
/// use audio_augment::engine::SampleBuffer;
///
/// let buffer = SampleBuffer::new(vec![0.0; 44100], 44100).unwrap();
/// assert_eq!(buffer.len(), 44100);
/// assert!((buffer.duration_secs() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Create a buffer from samples and a sample rate
    ///
    /// # Errors
    /// * `InvalidAudio` - If the sample rate is zero
    /// * `EmptyAudio` - If there are no samples
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(AugmentError::InvalidAudio {
                reason: "sample rate must be positive".to_string(),
                source: None,
            });
        }
        if samples.is_empty() {
            return Err(AugmentError::EmptyAudio);
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Build a buffer that shares the sample rate of `self`
    ///
    /// Callers keep the length of an already non-empty buffer.
    pub(crate) fn with_samples(&self, samples: Vec<f32>) -> Self {
        Self {
            samples,
            sample_rate: self.sample_rate,
        }
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    #[inline]
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Linear RMS level
    pub fn rms(&self) -> f64 {
        rms(&self.samples)
    }

    /// RMS level in dBFS
    pub fn rms_db(&self) -> f64 {
        linear_to_db(self.rms())
    }

    /// Absolute peak level (linear)
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
    }

    /// Copy of the sample range `[start, end)`
    ///
    /// Indices are clamped to the buffer length.
    ///
    /// # Errors
    /// * `EmptyAudio` - If the clamped range holds no samples
    pub fn slice(&self, start: usize, end: usize) -> Result<Self> {
        let end = end.min(self.samples.len());
        let start = start.min(end);
        if start == end {
            return Err(AugmentError::EmptyAudio);
        }
        Ok(self.with_samples(self.samples[start..end].to_vec()))
    }

    /// Fail with `SampleRateMismatch` unless `other` runs at the same rate
    pub fn ensure_same_rate(&self, other: &SampleBuffer, asset: &str) -> Result<()> {
        if self.sample_rate != other.sample_rate {
            return Err(AugmentError::SampleRateMismatch {
                expected: self.sample_rate,
                actual: other.sample_rate,
                asset: asset.to_string(),
            });
        }
        Ok(())
    }

    /// Check that all samples are finite (no NaN or Inf)
    pub fn is_finite(&self) -> bool {
        self.samples.iter().all(|s| s.is_finite())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_to_linear() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-12);
        assert!((db_to_linear(20.0) - 10.0).abs() < 1e-9);
        assert!((db_to_linear(-6.0) - 0.501187).abs() < 1e-6);
    }

    #[test]
    fn test_linear_to_db() {
        assert!((linear_to_db(1.0)).abs() < 1e-12);
        assert!((linear_to_db(0.1) + 20.0).abs() < 1e-9);
        assert!(linear_to_db(0.0).is_infinite());
    }

    #[test]
    fn test_rms_constant_signal() {
        let buffer = SampleBuffer::new(vec![0.5; 1000], 44100).unwrap();
        assert!((buffer.rms() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rms_sine_is_one_over_sqrt_two() {
        let samples: Vec<f32> = (0..48000)
            .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 48000.0).sin())
            .collect();
        let buffer = SampleBuffer::new(samples, 48000).unwrap();
        assert!((buffer.rms() - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-4);
        assert!((buffer.rms_db() + 3.01).abs() < 0.01);
    }

    #[test]
    fn test_rms_empty() {
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        assert!(SampleBuffer::new(vec![0.0; 10], 0).is_err());
    }

    #[test]
    fn test_duration() {
        let buffer = SampleBuffer::new(vec![0.0; 22050], 44100).unwrap();
        assert!((buffer.duration_secs() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_peak_negative() {
        let mut samples = vec![0.0; 100];
        samples[40] = -0.75;
        samples[60] = 0.5;
        let buffer = SampleBuffer::new(samples, 8000).unwrap();
        assert_eq!(buffer.peak(), 0.75);
    }

    #[test]
    fn test_slice_clamps_and_keeps_rate() {
        let buffer = SampleBuffer::new((0..10).map(|i| i as f32).collect(), 8000).unwrap();
        let sliced = buffer.slice(3, 20).unwrap();
        assert_eq!(sliced.samples(), &[3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(sliced.sample_rate(), 8000);
        assert!(matches!(buffer.slice(12, 20), Err(AugmentError::EmptyAudio)));
        assert!(matches!(buffer.slice(4, 4), Err(AugmentError::EmptyAudio)));
    }

    #[test]
    fn test_empty_buffer_rejected() {
        assert!(matches!(
            SampleBuffer::new(Vec::new(), 8000),
            Err(AugmentError::EmptyAudio)
        ));
    }

    #[test]
    fn test_ensure_same_rate() {
        let a = SampleBuffer::new(vec![0.0; 10], 44100).unwrap();
        let b = SampleBuffer::new(vec![0.0; 10], 48000).unwrap();
        assert!(a.ensure_same_rate(&a.clone(), "noise").is_ok());
        match a.ensure_same_rate(&b, "noise 'white-noise'") {
            Err(AugmentError::SampleRateMismatch {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 44100);
                assert_eq!(actual, 48000);
            }
            other => panic!("Expected SampleRateMismatch, got: {:?}", other),
        }
    }

    #[test]
    fn test_is_finite() {
        let good = SampleBuffer::new(vec![0.1, -0.2], 8000).unwrap();
        let bad = SampleBuffer::new(vec![0.1, f32::NAN], 8000).unwrap();
        assert!(good.is_finite());
        assert!(!bad.is_finite());
    }
}
