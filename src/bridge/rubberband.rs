//! rubberband time-stretching / pitch-shifting arguments

use std::ffi::OsString;
use std::path::Path;

use crate::error::{AugmentError, Result};

/// Arguments for `rubberband -c 1 -t <ratio> -f <pitch> <in> <out>`
///
/// `time_stretch_ratio` scales the duration, `pitch_shift_ratio` scales the
/// frequency; both must be positive.
pub fn time_stretch_args(
    time_stretch_ratio: f64,
    pitch_shift_ratio: f64,
    input: &Path,
    output: &Path,
) -> Result<Vec<OsString>> {
    check_ratio("time_stretch_ratio", time_stretch_ratio)?;
    check_ratio("pitch_shift_ratio", pitch_shift_ratio)?;

    Ok(vec![
        "-c".into(),
        "1".into(),
        "-t".into(),
        time_stretch_ratio.to_string().into(),
        "-f".into(),
        pitch_shift_ratio.to_string().into(),
        input.as_os_str().to_owned(),
        output.as_os_str().to_owned(),
    ])
}

fn check_ratio(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AugmentError::InvalidParameter {
            name,
            reason: format!("must be a positive ratio, got {}", value),
        })
    }
}
