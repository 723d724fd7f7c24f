//! Engine configuration.
//!
//! Every constant of the scoring pipeline lives here with its default.
//! Partial TOML files override only the keys they name.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::components::anchor::{MONTH, QUARTER, YEAR};
use crate::components::{AnchorSpec, CmPolicy, CompositeRule};
use crate::indicators::EmaForm;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Complete configuration of the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub anchors: AnchorConfig,
    pub composite: CompositeConfig,
    pub drag: DragConfig,
    pub energy: EnergyConfig,
    pub trend: TrendConfig,
    pub judgment: JudgmentConfig,
    pub regime: RegimeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    pub clr: AnchorSpec,
    pub cm: AnchorSpec,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            clr: AnchorSpec::clr_default(),
            cm: AnchorSpec::cm_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    pub clr_rule: CompositeRule,
    pub cm_rule: CompositeRule,
    /// Haircut applied to the margin bonus.
    pub tax_rate: f64,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            clr_rule: CompositeRule::MarginBonus,
            cm_rule: CompositeRule::Unweighted,
            tax_rate: 0.20315,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Trailing returns used for volatility (three years).
    pub window: usize,
    /// Trading days per year.
    pub annualization: usize,
    pub downside_floor: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            window: 3 * YEAR,
            annualization: YEAR,
            downside_floor: 1e-6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    pub long_span: usize,
    pub short_span: usize,
    pub signal_span: usize,
    pub signal_form: EmaForm,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            long_span: 25,
            short_span: 13,
            signal_span: 7,
            signal_form: EmaForm::Adjusted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub period: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self { period: 200 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgmentConfig {
    /// CLR deadband: FULL needs a score strictly above this.
    pub full_threshold: f64,
    pub cm_policy: CmPolicy,
    /// Shift for the short-term momentum comparison (graduated policy).
    pub short_lookback: usize,
    /// Shift for the medium-term momentum comparison (graduated policy).
    pub medium_lookback: usize,
    /// Allocation kept on a REDUCE verdict.
    pub reduce_fraction: f64,
}

impl Default for JudgmentConfig {
    fn default() -> Self {
        Self {
            full_threshold: 0.05,
            cm_policy: CmPolicy::Binary,
            short_lookback: MONTH,
            medium_lookback: QUARTER,
            reduce_fraction: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    /// Valuation percentile at and above which the momentum model is favored.
    pub boundary: f64,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self { boundary: 0.5 }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, scheme) in [("anchors.clr", &self.anchors.clr), ("anchors.cm", &self.anchors.cm)] {
            if let AnchorSpec::Averaged { baselines, .. } = scheme {
                if baselines.is_empty() {
                    return Err(invalid(field, "averaged anchor needs at least one baseline"));
                }
            }
            if scheme.max_offset() == 0 {
                return Err(invalid(field, "anchor must look back at least one day"));
            }
        }

        if !self.composite.tax_rate.is_finite() || self.composite.tax_rate < 0.0 {
            return Err(invalid("composite.tax_rate", "must be a non-negative number"));
        }
        if self.drag.window < 2 {
            return Err(invalid("drag.window", "needs at least two returns"));
        }
        if self.drag.annualization == 0 {
            return Err(invalid("drag.annualization", "must be positive"));
        }
        if self.drag.downside_floor.is_nan() || self.drag.downside_floor <= 0.0 {
            return Err(invalid("drag.downside_floor", "must be positive"));
        }
        if self.energy.long_span == 0 || self.energy.short_span == 0 || self.energy.signal_span == 0 {
            return Err(invalid("energy", "spans must be >= 1"));
        }
        if self.trend.period == 0 {
            return Err(invalid("trend.period", "must be >= 1"));
        }
        if !self.judgment.full_threshold.is_finite() {
            return Err(invalid("judgment.full_threshold", "must be finite"));
        }
        if self.judgment.short_lookback == 0 || self.judgment.medium_lookback == 0 {
            return Err(invalid("judgment", "momentum lookbacks must be >= 1"));
        }
        if !(0.0..=1.0).contains(&self.judgment.reduce_fraction) {
            return Err(invalid("judgment.reduce_fraction", "must be within [0, 1]"));
        }
        if !self.regime.boundary.is_finite() {
            return Err(invalid("regime.boundary", "must be finite"));
        }
        Ok(())
    }

    /// BLAKE3 hash of the canonical JSON form, for tagging reports.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("EngineConfig must serialize");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
