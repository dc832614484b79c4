//! WAV file I/O
//!
//! Loads WAV files into mono `SampleBuffer`s and writes them back. The sample
//! rate of the source file is kept as-is; nothing is resampled.
//!
//! Multi-channel files are reduced to their first (left) channel.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, warn};

use crate::engine::buffer::SampleBuffer;
use crate::error::{AugmentError, Result};

/// Output encoding for written WAV files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Bit depth: 16, 24 or 32 (32 is IEEE float)
    pub bit_depth: u16,
}

impl Default for WavFormat {
    fn default() -> Self {
        WavFormat { bit_depth: 32 }
    }
}

impl WavFormat {
    pub fn new(bit_depth: u16) -> Result<Self> {
        match bit_depth {
            16 | 24 | 32 => Ok(WavFormat { bit_depth }),
            _ => Err(AugmentError::UnsupportedFormat {
                format: format!("{}-bit audio (only 16, 24, 32 supported)", bit_depth),
            }),
        }
    }
}

/// Load a WAV file as a mono buffer
///
/// Integer PCM is scaled to `[-1.0, 1.0)`; float data is taken as is.
/// Multi-channel files keep their left channel.
///
/// # Arguments
/// * `path` - Path to the WAV file
///
/// # Returns
/// * `Ok(SampleBuffer)` - Non-empty mono samples at the file's sample rate
/// * `Err(AugmentError)` - If the file cannot be read or holds no audio
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidAudio` - If the file is not a valid WAV file
/// * `UnsupportedFormat` - For integer bit depths hound cannot decode
/// * `EmptyAudio` - If the file contains no samples
pub fn load_wav(path: &Path) -> Result<SampleBuffer> {
    if !path.exists() {
        return Err(AugmentError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let reader = WavReader::open(path).map_err(|e| AugmentError::InvalidAudio {
        reason: format!("Failed to open WAV file {}: {}", path.display(), e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(AugmentError::InvalidAudio {
            reason: "WAV header declares zero channels".to_string(),
            source: None,
        });
    }

    let interleaved = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;

    let samples = if channels == 1 {
        interleaved
    } else {
        warn!(
            "{} has {} channels, keeping the left channel only",
            path.display(),
            channels
        );
        interleaved.into_iter().step_by(channels).collect()
    };

    if samples.is_empty() {
        return Err(AugmentError::EmptyAudio);
    }

    debug!(
        "Loaded {} ({} samples @ {} Hz)",
        path.display(),
        samples.len(),
        spec.sample_rate
    );

    SampleBuffer::new(samples, spec.sample_rate)
}

/// Write a buffer to a mono WAV file
///
/// Integer formats are clamped to full scale on write.
///
/// # Arguments
/// * `buffer` - Samples to write, at their own sample rate
/// * `path` - Destination file, created or truncated
/// * `format` - Bit depth: 16/24-bit integer or 32-bit float
///
/// # Errors
/// * `UnsupportedFormat` - If the bit depth is not 16, 24 or 32
/// * `Io` - If the file cannot be created or written
pub fn write_wav(buffer: &SampleBuffer, path: &Path, format: WavFormat) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: format.bit_depth,
        sample_format: if format.bit_depth == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };

    let mut writer = WavWriter::create(path, spec)?;

    match format.bit_depth {
        16 => {
            for &sample in buffer.samples() {
                let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
                writer.write_sample(scaled)?;
            }
        }
        24 => {
            for &sample in buffer.samples() {
                // 24-bit stored as i32 in hound
                let scaled = (sample * 8388607.0).clamp(-8388608.0, 8388607.0) as i32;
                writer.write_sample(scaled)?;
            }
        }
        32 => {
            for &sample in buffer.samples() {
                writer.write_sample(sample)?;
            }
        }
        other => {
            return Err(AugmentError::UnsupportedFormat {
                format: format!("{}-bit audio (only 16, 24, 32 supported)", other),
            });
        }
    }

    writer.finalize()?;
    debug!("Wrote {} ({} samples)", path.display(), buffer.len());
    Ok(())
}

/// Generate a sine test tone
///
/// Useful for exercising transforms without fixture files.
pub fn generate_test_tone(
    frequency: f32,
    amplitude: f32,
    duration_secs: f32,
    sample_rate: u32,
) -> Result<SampleBuffer> {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    let angular_freq = 2.0 * std::f32::consts::PI * frequency / sample_rate as f32;
    let samples = (0..num_samples)
        .map(|i| amplitude * (angular_freq * i as f32).sin())
        .collect();

    SampleBuffer::new(samples, sample_rate)
}

// ============================================================================
// Internal helper functions
// ============================================================================

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let scale = match (sample_format, bits_per_sample) {
        (SampleFormat::Float, _) => {
            return reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(Into::into);
        }
        (SampleFormat::Int, 8) => 128.0,
        (SampleFormat::Int, 16) => 32768.0,
        (SampleFormat::Int, 24) => 8388608.0,
        (SampleFormat::Int, 32) => 2147483648.0,
        (SampleFormat::Int, bits) => {
            return Err(AugmentError::UnsupportedFormat {
                format: format!("{}-bit integer audio", bits),
            })
        }
    };

    reader
        .samples::<i32>()
        .map(|s| s.map(|v| (v as f64 / scale) as f32))
        .collect::<std::result::Result<Vec<f32>, _>>()
        .map_err(Into::into)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_generate_test_tone() {
        let buffer = generate_test_tone(440.0, 0.5, 1.0, 44100).unwrap();
        assert_eq!(buffer.len(), 44100);
        assert_eq!(buffer.sample_rate(), 44100);
        assert!(buffer.peak() <= 0.5);
        assert!(buffer.peak() > 0.49);
    }

    #[test]
    fn test_round_trip_float() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let original = generate_test_tone(1000.0, 0.8, 0.2, 44100).unwrap();

        write_wav(&original, &path, WavFormat::default()).unwrap();
        let loaded = load_wav(&path).unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_round_trip_16bit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone16.wav");
        let original = generate_test_tone(1000.0, 0.8, 0.2, 22050).unwrap();

        write_wav(&original, &path, WavFormat::new(16).unwrap()).unwrap();
        let loaded = load_wav(&path).unwrap();

        assert_eq!(loaded.len(), original.len());
        assert_eq!(loaded.sample_rate(), 22050);
        for (orig, got) in original.samples().iter().zip(loaded.samples()) {
            // one 16-bit step is ~3e-5
            assert!((orig - got).abs() < 1e-4, "{} vs {}", orig, got);
        }
    }

    #[test]
    fn test_round_trip_24bit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone24.wav");
        let original = generate_test_tone(220.0, 0.3, 0.1, 48000).unwrap();

        write_wav(&original, &path, WavFormat::new(24).unwrap()).unwrap();
        let loaded = load_wav(&path).unwrap();

        for (orig, got) in original.samples().iter().zip(loaded.samples()) {
            assert!((orig - got).abs() < 1e-6, "{} vs {}", orig, got);
        }
    }

    #[test]
    fn test_stereo_file_keeps_left_channel() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for i in 0..100 {
            writer.write_sample(i as f32 / 100.0).unwrap();
            writer.write_sample(-1.0_f32).unwrap();
        }
        writer.finalize().unwrap();

        let loaded = load_wav(&path).unwrap();
        assert_eq!(loaded.len(), 100);
        assert_eq!(loaded.samples()[10], 0.1);
        assert!(loaded.samples().iter().all(|&s| s >= 0.0));
    }

    #[test]
    fn test_load_nonexistent_file() {
        match load_wav(Path::new("/nonexistent/path/audio.wav")) {
            Err(AugmentError::FileNotFound { path }) => {
                assert!(path.to_string_lossy().contains("nonexistent"));
            }
            other => panic!("Expected FileNotFound error, got: {:?}", other),
        }
    }

    #[test]
    fn test_load_header_only_file_is_empty_audio() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        WavWriter::create(&path, spec).unwrap().finalize().unwrap();

        assert!(matches!(load_wav(&path), Err(AugmentError::EmptyAudio)));
    }

    #[test]
    fn test_load_garbage_is_invalid_audio() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.wav");
        std::fs::write(&path, b"definitely not a riff header").unwrap();
        assert_eq!(load_wav(&path).unwrap_err().error_code(), "INVALID_AUDIO");
    }

    #[test]
    fn test_unsupported_bit_depth() {
        assert!(WavFormat::new(12).is_err());
        assert_eq!(WavFormat::default().bit_depth, 32);
    }
}
