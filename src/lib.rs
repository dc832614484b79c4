//! audio-augment - Audio Degradation Toolbox
//!
//! Generates perturbed copies of mono recordings for training-data
//! augmentation:
//! - Random cropping
//! - Additive noise at a target SNR
//! - Convolution reverb with a wet/dry mix
//! - Gain with hard clipping
//! - Time-stretch, companding and EQ through rubberband / sox
//!
//! # Architecture
//!
//! Load a WAV into a [`SampleBuffer`], apply exactly one [`Transform`], write
//! the result under a name derived from the transform, then run the optional
//! post-process hook. [`Augmenter`] drives this from an explicit
//! [`EngineConfig`].

pub mod augmenter;
pub mod bridge;
pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod hook;
pub mod transform;

pub use augmenter::{Augmenter, TransformResult};
pub use config::EngineConfig;
pub use engine::SampleBuffer;
pub use error::{AugmentError, Result};
pub use transform::Transform;
