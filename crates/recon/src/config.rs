use serde::{Deserialize, Serialize};

use crate::error::ReconError;

/// Similarity at or above which a shared field counts as matched.
pub const DEFAULT_FIELD_MATCH_THRESHOLD: f64 = 0.9;

/// Confidence at or above which a candidate pair is accepted.
pub const DEFAULT_PAIRING_THRESHOLD: f64 = 0.8;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    #[serde(default = "default_field_match")]
    pub field_match: f64,
    #[serde(default = "default_pairing")]
    pub pairing: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            field_match: DEFAULT_FIELD_MATCH_THRESHOLD,
            pairing: DEFAULT_PAIRING_THRESHOLD,
        }
    }
}

fn default_field_match() -> f64 {
    DEFAULT_FIELD_MATCH_THRESHOLD
}

fn default_pairing() -> f64 {
    DEFAULT_PAIRING_THRESHOLD
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        check_unit_interval("thresholds.field_match", self.thresholds.field_match)?;
        check_unit_interval("thresholds.pairing", self.thresholds.pairing)?;
        Ok(())
    }
}

fn check_unit_interval(key: &str, value: f64) -> Result<(), ReconError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ReconError::ConfigValidation(format!(
            "{key} must be between 0 and 1, got {value}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
