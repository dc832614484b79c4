//! Signal Transforms
//!
//! Pure functions over `SampleBuffer`s. Each transform borrows its input and
//! returns a newly allocated buffer.

mod convolution;
mod crop;
mod gain;
mod noise;

pub use convolution::{convolve, convolve_truncated};
pub use crop::random_crop;
pub use gain::{apply_gain, FULL_SCALE};
pub use noise::{add_noise, tile_noise};
