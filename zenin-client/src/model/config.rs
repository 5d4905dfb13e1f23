use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::bands::{parse_number, Band, BandThresholds, CutPoint};
use super::profiles::DEFAULT_PROFILE_SET_ID;
use crate::error::ValidationError;

/// Parameters for one analysis run. Always sent whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub dominance_delta: f64,
    pub balance_threshold: f64,
    #[serde(rename = "denge_mean_threshold")]
    pub mean_balance_threshold: f64,
    pub window_secs: u32,
    pub window_samples: u32,
    /// Server-side folder used by path-based batch runs.
    pub data_root: Option<String>,
    pub profile_set_id: String,
    pub band_thresholds: BTreeMap<Band, BandThresholds>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dominance_delta: 29.0,
            balance_threshold: 22.0,
            mean_balance_threshold: 46.0,
            window_secs: 30,
            window_samples: 5,
            data_root: None,
            profile_set_id: DEFAULT_PROFILE_SET_ID.to_string(),
            band_thresholds: Band::ALL
                .into_iter()
                .map(|band| (band, band.default_thresholds()))
                .collect(),
        }
    }
}

impl RunConfig {
    /// Thresholds for `band`, falling back to the band's defaults.
    pub fn thresholds(&self, band: Band) -> BandThresholds {
        self.band_thresholds
            .get(&band)
            .copied()
            .unwrap_or_else(|| band.default_thresholds())
    }

    pub fn set_threshold(&mut self, band: Band, cut: CutPoint, value: f64) {
        self.band_thresholds
            .entry(band)
            .or_insert_with(|| band.default_thresholds())
            .set(cut, value);
    }

    /// Parse and apply a threshold typed into a form. Non-numeric input
    /// leaves the config untouched.
    pub fn set_threshold_from_str(&mut self, band: Band, cut: CutPoint, input: &str) -> Result<(), ValidationError> {
        let value = parse_number(input)?;
        self.set_threshold(band, cut, value);
        Ok(())
    }

    /// Fill any missing band with its defaults.
    pub fn ensure_all_bands(&mut self) {
        for band in Band::ALL {
            self.band_thresholds
                .entry(band)
                .or_insert_with(|| band.default_thresholds());
        }
    }

    /// Copy of this config with all five bands present.
    pub fn normalized(&self) -> RunConfig {
        let mut config = self.clone();
        config.ensure_all_bands();
        config
    }

    /// Bands whose cut-points are not in descending order.
    pub fn threshold_warnings(&self) -> Vec<Band> {
        Band::ALL
            .into_iter()
            .filter(|band| !self.thresholds(*band).is_descending())
            .collect()
    }

    /// JSON body sent to the backend, with every band filled in.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let config = self.normalized();
        for band in config.threshold_warnings() {
            warn!("{} thresholds are not in descending order", band);
        }
        serde_json::to_string(&config)
    }

    pub fn get(&self, field: ScalarField) -> f64 {
        match field {
            ScalarField::DominanceDelta => self.dominance_delta,
            ScalarField::BalanceThreshold => self.balance_threshold,
            ScalarField::MeanBalanceThreshold => self.mean_balance_threshold,
            ScalarField::WindowSecs => f64::from(self.window_secs),
            ScalarField::WindowSamples => f64::from(self.window_samples),
        }
    }

    /// Parse and apply a scalar form field. Window sizes must be
    /// non-negative whole numbers.
    pub fn set_from_str(&mut self, field: ScalarField, input: &str) -> Result<(), ValidationError> {
        match field {
            ScalarField::WindowSecs | ScalarField::WindowSamples => {
                let trimmed = input.trim();
                let value: u32 = trimmed
                    .parse()
                    .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))?;
                if field == ScalarField::WindowSecs {
                    self.window_secs = value;
                } else {
                    self.window_samples = value;
                }
            }
            ScalarField::DominanceDelta => self.dominance_delta = parse_number(input)?,
            ScalarField::BalanceThreshold => self.balance_threshold = parse_number(input)?,
            ScalarField::MeanBalanceThreshold => self.mean_balance_threshold = parse_number(input)?,
        }
        Ok(())
    }
}

/// Scalar parameters of a [`RunConfig`] editable from a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarField {
    DominanceDelta,
    BalanceThreshold,
    MeanBalanceThreshold,
    WindowSecs,
    WindowSamples,
}

impl ScalarField {
    pub const ALL: [ScalarField; 5] = [
        ScalarField::DominanceDelta,
        ScalarField::BalanceThreshold,
        ScalarField::MeanBalanceThreshold,
        ScalarField::WindowSecs,
        ScalarField::WindowSamples,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ScalarField::DominanceDelta => "Dominance Delta",
            ScalarField::BalanceThreshold => "Balance Threshold",
            ScalarField::MeanBalanceThreshold => "Mean Balance Threshold",
            ScalarField::WindowSecs => "Window (seconds)",
            ScalarField::WindowSamples => "Window Samples",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, ScalarField::WindowSecs | ScalarField::WindowSamples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_serialized_config_has_all_bands_with_four_numbers() {
        let mut config = RunConfig::default();
        config.band_thresholds.remove(&Band::Theta);
        config.band_thresholds.remove(&Band::Gamma);

        let json: Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        let bands = json["band_thresholds"].as_object().unwrap();
        assert_eq!(bands.len(), 5);
        for band in Band::ALL {
            let entry = bands[band.name()].as_object().unwrap();
            assert_eq!(entry.len(), 4);
            for key in ["yuksek", "yuksek_orta", "orta", "dusuk_orta"] {
                assert!(entry[key].is_number(), "{}.{} not numeric", band, key);
            }
        }
    }

    #[test]
    fn test_wire_names() {
        let json: Value = serde_json::to_value(RunConfig::default()).unwrap();
        assert_eq!(json["denge_mean_threshold"], 46.0);
        assert_eq!(json["profile_set_id"], "meditasyon");
        assert_eq!(json["window_secs"], 30);
        assert!(json["data_root"].is_null());
    }

    #[test]
    fn test_backend_default_payload_deserializes() {
        let body = r#"{
            "dominance_delta": 25.5,
            "balance_threshold": 20.0,
            "denge_mean_threshold": 40.0,
            "window_secs": 20,
            "window_samples": 4,
            "data_root": null,
            "profile_set_id": "custom",
            "band_thresholds": {
                "Delta": {"yuksek": 85, "yuksek_orta": 75, "orta": 50, "dusuk_orta": 40}
            }
        }"#;
        let config: RunConfig = serde_json::from_str(body).unwrap();
        assert_eq!(config.mean_balance_threshold, 40.0);
        assert_eq!(config.profile_set_id, "custom");
        assert_eq!(config.band_thresholds.len(), 1);
        assert_eq!(config.thresholds(Band::Gamma), Band::Gamma.default_thresholds());
    }

    #[test]
    fn test_set_threshold_on_missing_band_starts_from_defaults() {
        let mut config = RunConfig::default();
        config.band_thresholds.clear();
        config.set_threshold(Band::Alpha, CutPoint::LowMid, 35.0);

        let alpha = config.thresholds(Band::Alpha);
        assert_eq!(alpha.low_mid, 35.0);
        assert_eq!(alpha.highest, 80.0);
    }

    #[test]
    fn test_set_threshold_from_str_keeps_value_on_bad_input() {
        let mut config = RunConfig::default();
        assert!(config.set_threshold_from_str(Band::Beta, CutPoint::Mid, "3o").is_err());
        assert_eq!(config.thresholds(Band::Beta).mid, 30.0);
        config.set_threshold_from_str(Band::Beta, CutPoint::Mid, "31.5").unwrap();
        assert_eq!(config.thresholds(Band::Beta).mid, 31.5);
    }

    #[test]
    fn test_threshold_warnings_report_unordered_bands() {
        let mut config = RunConfig::default();
        assert!(config.threshold_warnings().is_empty());
        config.set_threshold(Band::Delta, CutPoint::Highest, 10.0);
        assert_eq!(config.threshold_warnings(), vec![Band::Delta]);
    }

    #[test]
    fn test_scalar_fields_parse() {
        let mut config = RunConfig::default();
        config.set_from_str(ScalarField::DominanceDelta, "31.25").unwrap();
        assert_eq!(config.get(ScalarField::DominanceDelta), 31.25);

        config.set_from_str(ScalarField::WindowSecs, "45").unwrap();
        assert_eq!(config.window_secs, 45);

        assert!(config.set_from_str(ScalarField::WindowSamples, "2.5").is_err());
        assert!(config.set_from_str(ScalarField::WindowSamples, "-1").is_err());
        assert_eq!(config.window_samples, 5);
    }
}
