//! CLI Command Implementations
//!
//! Turns parsed arguments into an `Augmenter` run over each input file.

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bridge::CompandPreset;
use crate::cli::{Cli, Commands};
use crate::config::EngineConfig;
use crate::error::{AugmentError, Result};
use crate::hook::FeatureExtractionHook;
use crate::transform::Transform;
use crate::Augmenter;

/// Per-run counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Configuration from the optional file, overridden by command-line flags
pub fn build_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(dir) = &cli.output_dir {
        config.output_dir = Some(dir.clone());
    }
    if let Some(dir) = &cli.library_dir {
        config.library_dir = dir.clone();
    }
    if cli.delete_after {
        config.delete_after_hook = true;
    }
    if config.delete_after_hook && !cli.features {
        return Err(AugmentError::Config {
            reason: "deleting outputs needs a post-process hook, add --features".to_string(),
        });
    }
    config.validate()?;
    Ok(config)
}

/// The transform a subcommand describes
pub fn transform_for(command: &Commands) -> Result<Transform> {
    Ok(match command {
        Commands::Crop { min_length, .. } => Transform::RandomCrop {
            min_length_secs: *min_length,
        },
        Commands::Noise { noise, snr, .. } => Transform::AddNoise {
            noise: noise.clone(),
            snr_db: *snr,
        },
        Commands::Convolve { ir, level, .. } => Transform::Convolve {
            impulse_response: ir.clone(),
            level: *level,
        },
        Commands::Gain { db, .. } => Transform::Gain { gain_db: *db },
        Commands::Stretch {
            time_ratio,
            pitch_ratio,
            ..
        } => Transform::TimeStretch {
            time_stretch_ratio: *time_ratio,
            pitch_shift_ratio: *pitch_ratio,
        },
        Commands::Compand { degree, .. } => Transform::DynamicRangeCompression {
            preset: CompandPreset::from_degree(*degree)?,
        },
        Commands::Eq { band, .. } => Transform::Equalize { band: *band },
    })
}

/// Run the parsed command over every input
///
/// Inputs are independent: a failure is logged and the remaining files are
/// still processed.
pub fn run(cli: &Cli) -> Result<RunSummary> {
    let config = build_config(cli)?;
    let transform = transform_for(&cli.command)?;

    let mut augmenter = Augmenter::new(config)?;
    if cli.features {
        augmenter = augmenter.with_hook(Box::new(FeatureExtractionHook));
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut summary = RunSummary::default();
    for input in cli.command.inputs() {
        match augmenter.augment_file(input, &transform, &mut rng) {
            Ok(result) => {
                summary.written += 1;
                if result.retained {
                    println!("{}", result.output_path.display());
                }
            }
            Err(e) if e.is_recoverable() => {
                summary.skipped += 1;
                warn!("Skipping {}: {}", input.display(), e);
            }
            Err(e) => {
                summary.failed += 1;
                error!("{} [{}]: {}", input.display(), e.error_code(), e);
                for suggestion in e.recovery_suggestions() {
                    info!("  hint: {}", suggestion);
                }
            }
        }
    }

    info!(
        "Done: {} written, {} skipped, {} failed",
        summary.written, summary.skipped, summary.failed
    );
    Ok(summary)
}
