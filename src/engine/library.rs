//! Noise and impulse-response library
//!
//! Pre-recorded assets live in one directory and are addressed by name:
//! noise profiles as `<name>.wav`, impulse responses as `ir_<name>.wav`.
//! Decoded buffers are cached and handed out as shared read-only `Arc`s.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::debug;

use crate::engine::buffer::SampleBuffer;
use crate::engine::io::load_wav;
use crate::error::{AugmentError, Result};

/// Kind of library asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Noise,
    ImpulseResponse,
}

impl AssetKind {
    /// File name for an asset of this kind
    pub fn file_name(&self, name: &str) -> String {
        match self {
            AssetKind::Noise => format!("{}.wav", name),
            AssetKind::ImpulseResponse => format!("ir_{}.wav", name),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Noise => "noise",
            AssetKind::ImpulseResponse => "impulse response",
        }
    }
}

/// Read-only asset library rooted at a directory
pub struct AssetLibrary {
    root: PathBuf,
    cache: Mutex<HashMap<(AssetKind, String), Arc<SampleBuffer>>>,
}

impl AssetLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path an asset name resolves to (whether or not it exists)
    pub fn resolve(&self, kind: AssetKind, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return Err(AugmentError::InvalidParameter {
                name: "asset name",
                reason: format!("'{}' is not a plain asset name", name),
            });
        }
        Ok(self.root.join(kind.file_name(name)))
    }

    /// Load a noise profile by name
    pub fn noise(&self, name: &str) -> Result<Arc<SampleBuffer>> {
        self.load(AssetKind::Noise, name)
    }

    /// Load an impulse response by name
    pub fn impulse_response(&self, name: &str) -> Result<Arc<SampleBuffer>> {
        self.load(AssetKind::ImpulseResponse, name)
    }

    /// Number of assets currently cached
    pub fn cached_len(&self) -> usize {
        self.lock().len()
    }

    fn load(&self, kind: AssetKind, name: &str) -> Result<Arc<SampleBuffer>> {
        let key = (kind, name.to_string());
        if let Some(buffer) = self.lock().get(&key) {
            return Ok(Arc::clone(buffer));
        }

        let path = self.resolve(kind, name)?;
        if !path.is_file() {
            return Err(AugmentError::AssetNotFound {
                name: format!("{} '{}'", kind.label(), name),
                path,
            });
        }

        let buffer = Arc::new(load_wav(&path)?);
        debug!(
            "Cached {} '{}' ({} samples @ {} Hz)",
            kind.label(),
            name,
            buffer.len(),
            buffer.sample_rate()
        );
        self.lock().insert(key, Arc::clone(&buffer));
        Ok(buffer)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(AssetKind, String), Arc<SampleBuffer>>> {
        // The cache only ever holds fully loaded buffers, so a poisoned lock is still usable.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::io::{generate_test_tone, write_wav, WavFormat};
    use tempfile::tempdir;

    #[test]
    fn test_file_names() {
        assert_eq!(AssetKind::Noise.file_name("white-noise"), "white-noise.wav");
        assert_eq!(
            AssetKind::ImpulseResponse.file_name("classroom"),
            "ir_classroom.wav"
        );
    }

    #[test]
    fn test_missing_asset_is_asset_not_found() {
        let dir = tempdir().unwrap();
        let library = AssetLibrary::new(dir.path());
        match library.impulse_response("smartphone_mic") {
            Err(AugmentError::AssetNotFound { path, .. }) => {
                assert!(path.ends_with("ir_smartphone_mic.wav"));
            }
            other => panic!("Expected AssetNotFound, got: {:?}", other),
        }
    }

    #[test]
    fn test_path_like_names_rejected() {
        let library = AssetLibrary::new("sounds");
        assert!(library.noise("../secret").is_err());
        assert!(library.noise("").is_err());
    }

    #[test]
    fn test_assets_are_cached_and_shared() {
        let dir = tempdir().unwrap();
        let tone = generate_test_tone(100.0, 0.5, 0.1, 8000).unwrap();
        write_wav(&tone, &dir.path().join("hum.wav"), WavFormat::default()).unwrap();

        let library = AssetLibrary::new(dir.path());
        let first = library.noise("hum").unwrap();
        let second = library.noise("hum").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(library.cached_len(), 1);
        assert_eq!(first.sample_rate(), 8000);
    }
}
