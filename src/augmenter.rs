//! Augmentation engine
//!
//! Drives one transform over one file: load, transform, write, then the
//! optional post-process hook and delete step.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rand::Rng;

use crate::bridge::{compand_args, equalizer_args, time_stretch_args, ExternalTool};
use crate::config::EngineConfig;
use crate::dsp;
use crate::engine::io::{load_wav, write_wav, WavFormat};
use crate::engine::{AssetLibrary, SampleBuffer};
use crate::error::{AugmentError, Result};
use crate::hook::PostProcessHook;
use crate::transform::Transform;

/// Outcome of augmenting one file
#[derive(Debug, Clone)]
pub struct TransformResult {
    /// The produced signal
    pub buffer: SampleBuffer,
    /// The transform and its literal parameters
    pub transform: Transform,
    /// Where the artifact was written
    pub output_path: PathBuf,
    /// False once the delete step has removed the artifact
    pub retained: bool,
}

/// Augmentation engine
///
/// Holds no mutable state besides the read-only asset cache, so one instance
/// can serve independent files from several threads.
pub struct Augmenter {
    config: EngineConfig,
    format: WavFormat,
    library: AssetLibrary,
    rubberband: ExternalTool,
    sox: ExternalTool,
    hook: Option<Box<dyn PostProcessHook>>,
}

impl Augmenter {
    /// Build an engine from a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let format = config.wav_format()?;
        let timeout = config.tool_timeout();

        Ok(Self {
            format,
            library: AssetLibrary::new(config.library_dir.clone()),
            rubberband: ExternalTool::new(config.rubberband_path.clone(), timeout),
            sox: ExternalTool::new(config.sox_path.clone(), timeout),
            hook: None,
            config,
        })
    }

    /// Install a post-process hook
    pub fn with_hook(mut self, hook: Box<dyn PostProcessHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Replace the external tool runners
    pub fn with_tools(mut self, rubberband: ExternalTool, sox: ExternalTool) -> Self {
        self.rubberband = rubberband;
        self.sox = sox;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn library(&self) -> &AssetLibrary {
        &self.library
    }

    /// Apply `transform` to an in-memory signal
    ///
    /// Library assets are resolved by name; external transforms round-trip
    /// through temporary files.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        signal: &SampleBuffer,
        transform: &Transform,
        rng: &mut R,
    ) -> Result<SampleBuffer> {
        match transform {
            Transform::RandomCrop { min_length_secs } => {
                dsp::random_crop(signal, *min_length_secs, rng)
            }
            Transform::AddNoise { noise, snr_db } => {
                let noise = self.library.noise(noise)?;
                dsp::add_noise(signal, &noise, *snr_db)
            }
            Transform::Convolve {
                impulse_response,
                level,
            } => {
                let ir = self.library.impulse_response(impulse_response)?;
                dsp::convolve(signal, &ir, *level)
            }
            Transform::Gain { gain_db } => dsp::apply_gain(signal, *gain_db),
            Transform::TimeStretch {
                time_stretch_ratio,
                pitch_shift_ratio,
            } => self.rubberband.process(signal, self.format, |input, output| {
                time_stretch_args(*time_stretch_ratio, *pitch_shift_ratio, input, output)
            }),
            Transform::DynamicRangeCompression { preset } => {
                self.sox.process(signal, self.format, |input, output| {
                    Ok(compand_args(*preset, input, output))
                })
            }
            Transform::Equalize { band } => {
                self.sox.process(signal, self.format, |input, output| {
                    Ok(equalizer_args(*band, input, output))
                })
            }
        }
    }

    /// Load `input`, apply `transform`, and persist the result
    ///
    /// Nothing is written when the transform fails, including the
    /// `InsufficientDuration` case of cropping, or when it yields NaN or
    /// infinite samples. With `delete_after_hook` set the artifact is removed
    /// once the hook has consumed it; without a hook it is kept.
    pub fn augment_file<R: Rng + ?Sized>(
        &self,
        input: &Path,
        transform: &Transform,
        rng: &mut R,
    ) -> Result<TransformResult> {
        info!("{}: {}", input.display(), transform);
        let signal = load_wav(input)?;
        let buffer = self.apply(&signal, transform, rng)?;

        if !buffer.is_finite() {
            return Err(AugmentError::NonFiniteOutput {
                transform: transform.name().to_string(),
            });
        }

        let output_path = transform.output_path(input, self.config.output_dir.as_deref());
        if let Some(dir) = self.config.output_dir.as_deref() {
            fs::create_dir_all(dir)?;
        }
        write_wav(&buffer, &output_path, self.format)?;
        info!("Wrote {}", output_path.display());

        if let Some(hook) = &self.hook {
            debug!("Running hook {} on {}", hook.name(), output_path.display());
            hook.after_write(&output_path, &buffer, transform)?;
        }

        let mut retained = true;
        if self.config.delete_after_hook {
            if self.hook.is_some() {
                fs::remove_file(&output_path)?;
                info!("Deleted {} after post-processing", output_path.display());
                retained = false;
            } else {
                warn!("No post-process hook installed, keeping {}", output_path.display());
            }
        }

        Ok(TransformResult {
            buffer,
            transform: transform.clone(),
            output_path,
            retained,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::io::generate_test_tone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn engine() -> Augmenter {
        Augmenter::new(EngineConfig {
            library_dir: PathBuf::from("/nonexistent/sounds"),
            ..EngineConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            bit_depth: 8,
            ..EngineConfig::default()
        };
        assert!(Augmenter::new(config).is_err());
    }

    #[test]
    fn test_apply_gain_in_memory() {
        let signal = generate_test_tone(100.0, 0.1, 0.1, 8000).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let out = engine()
            .apply(&signal, &Transform::Gain { gain_db: 40.0 }, &mut rng)
            .unwrap();
        assert!(out.peak() <= 1.0);
        assert_eq!(out.len(), signal.len());
    }

    #[test]
    fn test_missing_noise_asset() {
        let signal = generate_test_tone(100.0, 0.1, 0.1, 8000).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let transform = Transform::AddNoise {
            noise: "white-noise".to_string(),
            snr_db: 20.0,
        };
        assert!(matches!(
            engine().apply(&signal, &transform, &mut rng),
            Err(AugmentError::AssetNotFound { .. })
        ));
    }

    #[test]
    fn test_bad_stretch_ratio_never_runs_tool() {
        let signal = generate_test_tone(100.0, 0.1, 0.1, 8000).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let transform = Transform::TimeStretch {
            time_stretch_ratio: -1.0,
            pitch_shift_ratio: 1.0,
        };
        assert!(matches!(
            engine().apply(&signal, &transform, &mut rng),
            Err(AugmentError::InvalidParameter { .. })
        ));
    }
}
