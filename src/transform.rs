//! Transform descriptions and output naming
//!
//! A `Transform` is the literal parameter set of one augmentation. The output
//! file name is derived from it deterministically:
//! `{stem}_{token}.wav`, e.g. `song_addedNoise20.wav`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bridge::{CompandPreset, EqualizerBand};

/// Extension of every written artifact
pub const OUTPUT_EXTENSION: &str = "wav";

/// One augmentation and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "transform", rename_all = "snake_case")]
pub enum Transform {
    /// Random excerpt of at least `min_length_secs`
    RandomCrop { min_length_secs: f64 },
    /// Named noise profile mixed in at `snr_db`
    AddNoise { noise: String, snr_db: f64 },
    /// Named impulse response mixed in at `level`
    Convolve { impulse_response: String, level: f64 },
    /// Gain in dB with hard clipping
    Gain { gain_db: f64 },
    /// rubberband time-stretch and pitch-shift
    TimeStretch {
        time_stretch_ratio: f64,
        pitch_shift_ratio: f64,
    },
    /// sox compand preset
    DynamicRangeCompression { preset: CompandPreset },
    /// sox peaking equalizer
    Equalize { band: EqualizerBand },
}

impl Transform {
    /// Short identifier used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Transform::RandomCrop { .. } => "random_crop",
            Transform::AddNoise { .. } => "add_noise",
            Transform::Convolve { .. } => "convolve",
            Transform::Gain { .. } => "gain",
            Transform::TimeStretch { .. } => "time_stretch",
            Transform::DynamicRangeCompression { .. } => "dr_compression",
            Transform::Equalize { .. } => "equalize",
        }
    }

    /// Whether this transform shells out to an external tool
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            Transform::TimeStretch { .. }
                | Transform::DynamicRangeCompression { .. }
                | Transform::Equalize { .. }
        )
    }

    /// Name suffix identifying the transform and its parameter values
    ///
    /// Numbers are written in their shortest round-trip form, so `20.0`
    /// becomes `20` and `0.5` stays `0.5`. Equalizer bands are written from
    /// the parsed integers, not the text they were parsed from: `"0500;50;+30"`
    /// names the same file as `"500;50;30"`.
    pub fn suffix(&self) -> String {
        match self {
            Transform::RandomCrop { min_length_secs } => format!("randomCropped{}", min_length_secs),
            Transform::AddNoise { snr_db, .. } => format!("addedNoise{}", snr_db),
            Transform::Convolve { level, .. } => format!("convolved{}", level),
            Transform::Gain { gain_db } => format!("gain{}", gain_db),
            Transform::TimeStretch {
                time_stretch_ratio,
                pitch_shift_ratio,
            } => format!(
                "timestr{}_pitchshift{}",
                time_stretch_ratio, pitch_shift_ratio
            ),
            Transform::DynamicRangeCompression { preset } => {
                format!("drCompression{}", preset.degree())
            }
            Transform::Equalize { band } => format!("eq{}", band),
        }
    }

    /// Output path for an augmented copy of `input`
    ///
    /// The stem is the input file name up to its first `.`. The file goes to
    /// `output_dir` when given, otherwise next to the input.
    pub fn output_path(&self, input: &Path, output_dir: Option<&Path>) -> PathBuf {
        let dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| input.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        dir.join(self.output_file_name(input))
    }

    /// `{stem}_{suffix}.wav` for `input`
    pub fn output_file_name(&self, input: &Path) -> String {
        format!("{}_{}.{}", stem(input), self.suffix(), OUTPUT_EXTENSION)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.suffix())
    }
}

fn stem(input: &Path) -> String {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => file_name,
    }
}
