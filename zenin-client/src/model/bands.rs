use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Frequency band classified by the backend.
///
/// The derived ordering follows the declaration order, so maps keyed by
/// `Band` serialize Delta through Gamma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Band {
    Delta,
    Theta,
    Alpha,
    Beta,
    Gamma,
}

impl Band {
    pub const ALL: [Band; 5] = [Band::Delta, Band::Theta, Band::Alpha, Band::Beta, Band::Gamma];

    pub fn name(self) -> &'static str {
        match self {
            Band::Delta => "Delta",
            Band::Theta => "Theta",
            Band::Alpha => "Alpha",
            Band::Beta => "Beta",
            Band::Gamma => "Gamma",
        }
    }

    /// Backend defaults for this band's cut-points.
    pub fn default_thresholds(self) -> BandThresholds {
        match self {
            Band::Delta => BandThresholds::new(85.0, 75.0, 50.0, 40.0),
            Band::Theta => BandThresholds::new(70.0, 60.0, 40.0, 30.0),
            Band::Alpha => BandThresholds::new(80.0, 70.0, 50.0, 40.0),
            Band::Beta => BandThresholds::new(52.0, 45.0, 30.0, 22.0),
            Band::Gamma => BandThresholds::new(34.0, 27.0, 18.0, 13.0),
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the four cut-points of a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutPoint {
    Highest,
    HighMid,
    Mid,
    LowMid,
}

impl CutPoint {
    pub const ALL: [CutPoint; 4] = [CutPoint::Highest, CutPoint::HighMid, CutPoint::Mid, CutPoint::LowMid];

    pub fn label(self) -> &'static str {
        match self {
            CutPoint::Highest => "Yüksek",
            CutPoint::HighMid => "Yüksek-Orta",
            CutPoint::Mid => "Orta",
            CutPoint::LowMid => "Düşük-Orta",
        }
    }
}

/// Four ordered cut-points for one band.
///
/// Conventionally `highest >= high_mid >= mid >= low_mid`; the ordering is
/// reported by [`BandThresholds::is_descending`] but never enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    #[serde(rename = "yuksek")]
    pub highest: f64,
    #[serde(rename = "yuksek_orta")]
    pub high_mid: f64,
    #[serde(rename = "orta")]
    pub mid: f64,
    #[serde(rename = "dusuk_orta")]
    pub low_mid: f64,
}

impl BandThresholds {
    pub fn new(highest: f64, high_mid: f64, mid: f64, low_mid: f64) -> Self {
        Self {
            highest,
            high_mid,
            mid,
            low_mid,
        }
    }

    pub fn get(&self, cut: CutPoint) -> f64 {
        match cut {
            CutPoint::Highest => self.highest,
            CutPoint::HighMid => self.high_mid,
            CutPoint::Mid => self.mid,
            CutPoint::LowMid => self.low_mid,
        }
    }

    pub fn set(&mut self, cut: CutPoint, value: f64) {
        match cut {
            CutPoint::Highest => self.highest = value,
            CutPoint::HighMid => self.high_mid = value,
            CutPoint::Mid => self.mid = value,
            CutPoint::LowMid => self.low_mid = value,
        }
    }

    pub fn is_descending(&self) -> bool {
        self.highest >= self.high_mid && self.high_mid >= self.mid && self.mid >= self.low_mid
    }
}

/// Parse a numeric form value. Only finite numbers are accepted.
pub fn parse_number(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::NotANumber(trimmed.to_string())),
    }
}

/// Qualitative level of a band within a profile, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WaveLevel {
    #[serde(rename = "yüksek")]
    High,
    #[serde(rename = "yüksek orta")]
    HighMid,
    #[default]
    #[serde(rename = "orta")]
    Mid,
    #[serde(rename = "düşük orta")]
    LowMid,
    #[serde(rename = "düşük")]
    Low,
}

impl WaveLevel {
    pub const ALL: [WaveLevel; 5] = [
        WaveLevel::High,
        WaveLevel::HighMid,
        WaveLevel::Mid,
        WaveLevel::LowMid,
        WaveLevel::Low,
    ];

    /// The wire string, also used as the display label.
    pub fn as_str(self) -> &'static str {
        match self {
            WaveLevel::High => "yüksek",
            WaveLevel::HighMid => "yüksek orta",
            WaveLevel::Mid => "orta",
            WaveLevel::LowMid => "düşük orta",
            WaveLevel::Low => "düşük",
        }
    }
}

impl fmt::Display for WaveLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaveLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WaveLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownLevel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_use_backend_field_names() {
        let json = serde_json::to_value(Band::Beta.default_thresholds()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"yuksek": 52.0, "yuksek_orta": 45.0, "orta": 30.0, "dusuk_orta": 22.0})
        );
    }

    #[test]
    fn test_all_defaults_are_descending() {
        for band in Band::ALL {
            assert!(band.default_thresholds().is_descending(), "{} defaults out of order", band);
        }
    }

    #[test]
    fn test_set_cut_point() {
        let mut t = Band::Alpha.default_thresholds();
        t.set(CutPoint::Mid, 75.0);
        assert_eq!(t.get(CutPoint::Mid), 75.0);
        assert!(!t.is_descending());
    }

    #[test]
    fn test_parse_number_rejects_non_numeric() {
        assert_eq!(parse_number(" 12.5 "), Ok(12.5));
        assert_eq!(parse_number("abc"), Err(ValidationError::NotANumber("abc".to_string())));
        assert!(parse_number("").is_err());
        assert!(parse_number("NaN").is_err());
        assert!(parse_number("inf").is_err());
    }

    #[test]
    fn test_wave_level_wire_strings() {
        let level: WaveLevel = serde_json::from_str(r#""düşük orta""#).unwrap();
        assert_eq!(level, WaveLevel::LowMid);
        assert_eq!(serde_json::to_string(&WaveLevel::High).unwrap(), r#""yüksek""#);
        assert!(serde_json::from_str::<WaveLevel>(r#""very high""#).is_err());
    }

    #[test]
    fn test_wave_level_from_str_round_trips_labels() {
        for level in WaveLevel::ALL {
            assert_eq!(level.as_str().parse::<WaveLevel>(), Ok(level));
        }
        assert_eq!(
            "medium".parse::<WaveLevel>(),
            Err(ValidationError::UnknownLevel("medium".to_string()))
        );
    }

    #[test]
    fn test_band_serializes_as_name() {
        assert_eq!(serde_json::to_string(&Band::Gamma).unwrap(), r#""Gamma""#);
    }
}
