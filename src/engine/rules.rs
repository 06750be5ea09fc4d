//! Threshold rules that override the classifier.
//!
//! Evaluated in fixed order against the raw (unscaled) readings:
//!
//! 1. soil moisture at or above `moisture_high_min`: pump OFF
//! 2. soil moisture at or below `dry_moisture_max` and temperature at or
//!    above `hot_temperature_min`: pump ON
//! 3. otherwise the classifier output stands

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::types::{Decision, DecisionSource, PumpClass};

/// Cut-offs for the override rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    pub moisture_high_min: f64,
    pub dry_moisture_max: f64,
    pub hot_temperature_min: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            moisture_high_min: defaults::MOISTURE_HIGH_MIN,
            dry_moisture_max: defaults::DRY_MOISTURE_MAX,
            hot_temperature_min: defaults::HOT_TEMPERATURE_MIN,
        }
    }
}

/// Final decision plus the operator-facing reason line.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleVerdict {
    pub decision: Decision,
    pub reason: String,
}

/// Apply the override rules to a raw prediction. Pure and total.
pub fn apply_rules(
    raw: PumpClass,
    temperature: f64,
    soil_moisture: f64,
    thresholds: &RuleThresholds,
) -> RuleVerdict {
    if soil_moisture >= thresholds.moisture_high_min {
        RuleVerdict {
            decision: Decision {
                pump: false,
                source: DecisionSource::RuleMoistureHigh,
            },
            reason: format!("Soil Moisture ≥ {} → Pump OFF", thresholds.moisture_high_min),
        }
    } else if soil_moisture <= thresholds.dry_moisture_max
        && temperature >= thresholds.hot_temperature_min
    {
        RuleVerdict {
            decision: Decision {
                pump: true,
                source: DecisionSource::RuleDryHot,
            },
            reason: "Dry & Hot → Pump ON".to_string(),
        }
    } else {
        RuleVerdict {
            decision: Decision {
                pump: raw.is_on(),
                source: DecisionSource::Model,
            },
            reason: "Using model prediction".to_string(),
        }
    }
}
