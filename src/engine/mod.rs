//! Audio Engine Module
//!
//! Core audio plumbing:
//! - Mono sample buffers and level measurement
//! - WAV file I/O
//! - The named noise / impulse-response library

pub mod buffer;
pub mod io;
pub mod library;

pub use buffer::{db_to_linear, linear_to_db, SampleBuffer};
pub use io::{generate_test_tone, load_wav, write_wav, WavFormat};
pub use library::{AssetKind, AssetLibrary};
