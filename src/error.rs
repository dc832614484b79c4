//! Error handling for audio-augment
//!
//! Every error carries enough structured context for the caller to decide
//! whether to skip the file or abort the batch.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for augmentation operations
pub type Result<T> = std::result::Result<T, AugmentError>;

/// Main error type for augmentation operations
#[derive(Error, Debug)]
pub enum AugmentError {
    // Transform Errors
    #[error("Minimum crop length {min_length_secs}s is not shorter than the signal ({duration_secs:.3}s)")]
    InsufficientDuration {
        duration_secs: f64,
        min_length_secs: f64,
    },

    #[error("Sample rate mismatch: signal is {expected} Hz, {asset} is {actual} Hz")]
    SampleRateMismatch {
        expected: u32,
        actual: u32,
        asset: String,
    },

    #[error("Noise buffer has zero energy")]
    DegenerateNoise,

    #[error("Mixed signal has zero energy, cannot restore loudness")]
    DegenerateMix,

    #[error("{transform} produced NaN or infinite samples")]
    NonFiniteOutput { transform: String },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    // External Tool Errors
    #[error("{tool} failed ({status}): {stderr}")]
    ExternalToolFailure {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("{tool} timed out after {timeout:?}")]
    ExternalToolTimeout {
        tool: String,
        timeout: Duration,
        stderr: String,
    },

    // Asset Errors
    #[error("Asset not found: {name} (looked in {path})")]
    AssetNotFound { name: String, path: PathBuf },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Audio contains no samples")]
    EmptyAudio,

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<hound::Error> for AugmentError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => AugmentError::Io(e),
            other => AugmentError::InvalidAudio {
                reason: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

impl AugmentError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            AugmentError::InsufficientDuration { .. } => "INSUFFICIENT_DURATION",
            AugmentError::SampleRateMismatch { .. } => "SAMPLE_RATE_MISMATCH",
            AugmentError::DegenerateNoise => "DEGENERATE_NOISE",
            AugmentError::DegenerateMix => "DEGENERATE_MIX",
            AugmentError::NonFiniteOutput { .. } => "NON_FINITE_OUTPUT",
            AugmentError::InvalidParameter { .. } => "INVALID_PARAMETER",
            AugmentError::ExternalToolFailure { .. } => "EXTERNAL_TOOL_FAILURE",
            AugmentError::ExternalToolTimeout { .. } => "EXTERNAL_TOOL_TIMEOUT",
            AugmentError::AssetNotFound { .. } => "ASSET_NOT_FOUND",
            AugmentError::FileNotFound { .. } => "FILE_NOT_FOUND",
            AugmentError::InvalidAudio { .. } => "INVALID_AUDIO",
            AugmentError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            AugmentError::EmptyAudio => "EMPTY_AUDIO",
            AugmentError::Config { .. } => "CONFIG_ERROR",
            AugmentError::Io(_) => "IO_ERROR",
            AugmentError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error only means "no output for this input"
    ///
    /// Batch drivers can skip the file and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AugmentError::InsufficientDuration { .. })
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            AugmentError::InsufficientDuration { .. } => vec![
                "Use a shorter minimum crop length",
                "Skip this file for cropping",
            ],
            AugmentError::SampleRateMismatch { .. } => vec![
                "Re-export the noise or impulse response at the recording's sample rate",
            ],
            AugmentError::DegenerateNoise => vec![
                "The noise profile is silent - replace it with a recorded noise file",
            ],
            AugmentError::NonFiniteOutput { .. } => vec![
                "Use less extreme transform parameters",
            ],
            AugmentError::ExternalToolFailure { .. } => vec![
                "Check that rubberband and sox are installed and on PATH",
                "Inspect the captured stderr for the tool's own message",
            ],
            AugmentError::ExternalToolTimeout { .. } => vec![
                "Raise tool_timeout_secs in the configuration",
                "Try a shorter input file",
            ],
            AugmentError::AssetNotFound { .. } => vec![
                "Check library_dir points at the sounds folder",
                "Impulse responses are stored as ir_<name>.wav",
            ],
            AugmentError::UnsupportedFormat { .. } => vec![
                "Convert to 16, 24 or 32-bit WAV",
            ],
            _ => vec![],
        }
    }
}
