//! sox companding and equalizer arguments

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AugmentError, Result};

/// Dynamic-range compression preset, selected by degree 1–3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompandPreset {
    Light,
    Medium,
    Heavy,
}

impl CompandPreset {
    pub fn from_degree(degree: u8) -> Result<Self> {
        match degree {
            1 => Ok(CompandPreset::Light),
            2 => Ok(CompandPreset::Medium),
            3 => Ok(CompandPreset::Heavy),
            other => Err(AugmentError::InvalidParameter {
                name: "degree",
                reason: format!("must be 1, 2 or 3, got {}", other),
            }),
        }
    }

    pub fn degree(&self) -> u8 {
        match self {
            CompandPreset::Light => 1,
            CompandPreset::Medium => 2,
            CompandPreset::Heavy => 3,
        }
    }

    /// `attack,decay`, transfer-function points and makeup gain for `compand`
    fn curve(&self) -> [&'static str; 3] {
        match self {
            CompandPreset::Light => ["0.01,0.20", "-40,-10,-30", "5"],
            CompandPreset::Medium => ["0.01,0.20", "-50,-50,-40,-30,-40,-10,-30", "12"],
            CompandPreset::Heavy => ["0.01,0.1", "-70,-60,-70,-30,-70,0,-70", "45"],
        }
    }
}

/// Arguments for `sox <in> <out> compand ...`
pub fn compand_args(preset: CompandPreset, input: &Path, output: &Path) -> Vec<OsString> {
    let mut args = vec![
        input.as_os_str().to_owned(),
        output.as_os_str().to_owned(),
        "compand".into(),
    ];
    args.extend(preset.curve().into_iter().map(OsString::from));
    args
}

/// Two-pole peaking equalizer band, written as `freq;bandwidth;gain`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualizerBand {
    pub frequency_hz: i32,
    pub bandwidth_hz: i32,
    pub gain_db: i32,
}

impl FromStr for EqualizerBand {
    type Err = AugmentError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: String| AugmentError::InvalidParameter {
            name: "equalizer",
            reason,
        };

        let parts: Vec<&str> = s.split(';').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(invalid(format!(
                "expected 'frequency;bandwidth;gain', got '{}'",
                s
            )));
        }
        let parse = |part: &str| {
            part.parse::<i32>()
                .map_err(|_| invalid(format!("'{}' is not an integer in '{}'", part, s)))
        };

        let band = EqualizerBand {
            frequency_hz: parse(parts[0])?,
            bandwidth_hz: parse(parts[1])?,
            gain_db: parse(parts[2])?,
        };
        if band.frequency_hz <= 0 || band.bandwidth_hz <= 0 {
            return Err(invalid(format!(
                "frequency and bandwidth must be positive in '{}'",
                s
            )));
        }
        Ok(band)
    }
}

impl fmt::Display for EqualizerBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};{}", self.frequency_hz, self.bandwidth_hz, self.gain_db)
    }
}

/// Arguments for `sox <in> <out> equalizer <freq> <bw> <gain>`
pub fn equalizer_args(band: EqualizerBand, input: &Path, output: &Path) -> Vec<OsString> {
    vec![
        input.as_os_str().to_owned(),
        output.as_os_str().to_owned(),
        "equalizer".into(),
        band.frequency_hz.to_string().into(),
        band.bandwidth_hz.to_string().into(),
        band.gain_db.to_string().into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_compand_medium() {
        let args = compand_args(
            CompandPreset::from_degree(2).unwrap(),
            Path::new("a.wav"),
            Path::new("b.wav"),
        );
        assert_eq!(
            strings(args),
            vec![
                "a.wav",
                "b.wav",
                "compand",
                "0.01,0.20",
                "-50,-50,-40,-30,-40,-10,-30",
                "12"
            ]
        );
    }

    #[test]
    fn test_degree_round_trip_and_bounds() {
        for degree in 1..=3 {
            assert_eq!(CompandPreset::from_degree(degree).unwrap().degree(), degree);
        }
        assert!(CompandPreset::from_degree(0).is_err());
        assert!(CompandPreset::from_degree(4).is_err());
    }

    #[test]
    fn test_parse_equalizer_band() {
        let band: EqualizerBand = "500;50;30".parse().unwrap();
        assert_eq!(
            band,
            EqualizerBand {
                frequency_hz: 500,
                bandwidth_hz: 50,
                gain_db: 30
            }
        );
        assert_eq!(band.to_string(), "500;50;30");

        let cut: EqualizerBand = "1000;200;-12".parse().unwrap();
        assert_eq!(cut.gain_db, -12);
    }

    #[test]
    fn test_malformed_equalizer_band() {
        for bad in ["500;50", "500;50;30;1", "500;fifty;30", "0;50;3", ""] {
            assert!(bad.parse::<EqualizerBand>().is_err(), "{}", bad);
        }
    }

    #[test]
    fn test_equalizer_args() {
        let band: EqualizerBand = "500;50;30".parse().unwrap();
        assert_eq!(
            strings(equalizer_args(band, Path::new("in.wav"), Path::new("out.wav"))),
            vec!["in.wav", "out.wav", "equalizer", "500", "50", "30"]
        );
    }
}
