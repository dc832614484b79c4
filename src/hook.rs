//! Post-process hooks
//!
//! Run after an artifact has been written, before the optional delete step.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::engine::SampleBuffer;
use crate::error::Result;
use crate::transform::Transform;

/// Consumer of freshly written artifacts
pub trait PostProcessHook: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Called once per written artifact
    fn after_write(&self, artifact: &Path, buffer: &SampleBuffer, transform: &Transform) -> Result<()>;
}

/// Summary features of one artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactFeatures {
    pub file: String,
    pub transform: Transform,
    pub sample_rate: u32,
    pub num_samples: usize,
    pub duration_secs: f64,
    pub rms_db: f64,
    pub peak: f32,
    pub zero_crossing_rate: f64,
    /// SHA-256 of the artifact as written
    pub sha256: String,
    pub extracted_at: DateTime<Utc>,
}

impl ArtifactFeatures {
    pub fn extract(artifact: &Path, buffer: &SampleBuffer, transform: &Transform) -> Result<Self> {
        let bytes = fs::read(artifact)?;
        let sha256 = format!("{:x}", Sha256::digest(&bytes));

        Ok(Self {
            file: artifact
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            transform: transform.clone(),
            sample_rate: buffer.sample_rate(),
            num_samples: buffer.len(),
            duration_secs: buffer.duration_secs(),
            rms_db: buffer.rms_db(),
            peak: buffer.peak(),
            zero_crossing_rate: zero_crossing_rate(buffer.samples()),
            sha256,
            extracted_at: Utc::now(),
        })
    }
}

/// Fraction of adjacent sample pairs that change sign
pub fn zero_crossing_rate(samples: &[f32]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let crossings = samples
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count();
    crossings as f64 / (samples.len() - 1) as f64
}

/// Writes `<artifact>.features.json` next to each artifact
///
/// The sidecar outlives the artifact when deletion is enabled.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractionHook;

impl FeatureExtractionHook {
    pub fn sidecar_path(artifact: &Path) -> PathBuf {
        let mut name = artifact.as_os_str().to_owned();
        name.push(".features.json");
        PathBuf::from(name)
    }
}

impl PostProcessHook for FeatureExtractionHook {
    fn name(&self) -> &str {
        "feature-extraction"
    }

    fn after_write(&self, artifact: &Path, buffer: &SampleBuffer, transform: &Transform) -> Result<()> {
        let features = ArtifactFeatures::extract(artifact, buffer, transform)?;
        let sidecar = Self::sidecar_path(artifact);
        fs::write(&sidecar, serde_json::to_string_pretty(&features)?)?;
        info!("Features written to {}", sidecar.display());
        Ok(())
    }
}
