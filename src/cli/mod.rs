//! CLI Module
//!
//! Command-line interface: one subcommand per transform.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::bridge::EqualizerBand;

/// Audio augmentation toolbox - writes perturbed copies of WAV files
#[derive(Parser, Debug)]
#[command(name = "augment")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for written files (default: next to each input)
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Directory holding noise profiles and impulse responses
    #[arg(long, global = true)]
    pub library_dir: Option<PathBuf>,

    /// Delete each written file after post-processing (needs --features)
    #[arg(long, global = true)]
    pub delete_after: bool,

    /// Write a <file>.features.json sidecar for each output
    #[arg(long, global = true)]
    pub features: bool,

    /// Seed for random cropping
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Input files shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct Inputs {
    /// WAV files to augment
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Randomly crop an excerpt of at least --min-length seconds
    #[command(name = "crop")]
    Crop {
        #[command(flatten)]
        inputs: Inputs,

        /// Minimum excerpt length in seconds
        #[arg(long, default_value_t = 1.0)]
        min_length: f64,
    },

    /// Mix in a named noise profile at a target SNR
    #[command(name = "noise")]
    Noise {
        #[command(flatten)]
        inputs: Inputs,

        /// Noise profile name (<library>/<name>.wav)
        #[arg(long, default_value = "white-noise")]
        noise: String,

        /// Signal-to-noise ratio in dB
        #[arg(long, allow_negative_numbers = true)]
        snr: f64,
    },

    /// Convolve with a named impulse response
    #[command(name = "convolve")]
    Convolve {
        #[command(flatten)]
        inputs: Inputs,

        /// Impulse response name (<library>/ir_<name>.wav)
        #[arg(long)]
        ir: String,

        /// Wet level between 0 and 1
        #[arg(long, default_value_t = 0.5)]
        level: f64,
    },

    /// Apply gain in dB with hard clipping
    #[command(name = "gain")]
    Gain {
        #[command(flatten)]
        inputs: Inputs,

        /// Gain in dB (positive or negative)
        #[arg(long, allow_negative_numbers = true)]
        db: f64,
    },

    /// Time-stretch and pitch-shift with rubberband
    #[command(name = "stretch")]
    Stretch {
        #[command(flatten)]
        inputs: Inputs,

        /// Duration ratio
        #[arg(long, default_value_t = 1.0)]
        time_ratio: f64,

        /// Frequency ratio
        #[arg(long, default_value_t = 1.0)]
        pitch_ratio: f64,
    },

    /// Dynamic-range compression with sox
    #[command(name = "compand")]
    Compand {
        #[command(flatten)]
        inputs: Inputs,

        /// Preset strength
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        degree: u8,
    },

    /// Peaking equalizer with sox
    #[command(name = "eq")]
    Eq {
        #[command(flatten)]
        inputs: Inputs,

        /// Band as frequency;bandwidth;gain, e.g. "500;50;30"
        #[arg(long, allow_hyphen_values = true)]
        band: EqualizerBand,
    },
}

impl Commands {
    pub fn inputs(&self) -> &[PathBuf] {
        match self {
            Commands::Crop { inputs, .. }
            | Commands::Noise { inputs, .. }
            | Commands::Convolve { inputs, .. }
            | Commands::Gain { inputs, .. }
            | Commands::Stretch { inputs, .. }
            | Commands::Compand { inputs, .. }
            | Commands::Eq { inputs, .. } => &inputs.files,
        }
    }
}
