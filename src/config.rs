//! Engine configuration
//!
//! Passed explicitly into [`Augmenter::new`](crate::Augmenter::new); nothing
//! here is process-wide state. Loadable from a JSON file where every field is
//! optional.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::io::WavFormat;
use crate::error::{AugmentError, Result};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory for written artifacts (default: next to each input)
    pub output_dir: Option<PathBuf>,

    /// Directory holding noise profiles and impulse responses (default: ./sounds)
    pub library_dir: PathBuf,

    /// Delete each artifact once the post-process hook has run (default: false)
    pub delete_after_hook: bool,

    /// Bit depth of written WAV files: 16, 24 or 32 float (default: 32)
    pub bit_depth: u16,

    /// rubberband executable (default: looked up on PATH)
    pub rubberband_path: PathBuf,

    /// sox executable (default: looked up on PATH)
    pub sox_path: PathBuf,

    /// Timeout for each external tool call in seconds (default: 120)
    pub tool_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            library_dir: PathBuf::from("sounds"),
            delete_after_hook: false,
            bit_depth: 32,
            rubberband_path: PathBuf::from("rubberband"),
            sox_path: PathBuf::from("sox"),
            tool_timeout_secs: 120,
        }
    }
}

impl EngineConfig {
    /// Load and validate a JSON configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AugmentError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field ranges
    pub fn validate(&self) -> Result<()> {
        self.wav_format()?;
        if self.tool_timeout_secs == 0 {
            return Err(AugmentError::Config {
                reason: "tool_timeout_secs must be at least 1".to_string(),
            });
        }
        if self.rubberband_path.as_os_str().is_empty() || self.sox_path.as_os_str().is_empty() {
            return Err(AugmentError::Config {
                reason: "tool paths must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn wav_format(&self) -> Result<WavFormat> {
        WavFormat::new(self.bit_depth).map_err(|_| AugmentError::Config {
            reason: format!("bit_depth must be 16, 24 or 32, got {}", self.bit_depth),
        })
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}
