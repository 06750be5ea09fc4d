//! Pump decisions and the report rendered for the operator.

use serde::{Deserialize, Serialize};

use super::Reading;

/// Class label produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PumpClass {
    Off,
    On,
}

impl PumpClass {
    pub const fn from_on(on: bool) -> Self {
        if on {
            Self::On
        } else {
            Self::Off
        }
    }

    /// Integer label as used at training time (0 = off, 1 = on).
    pub const fn label(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }

    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Which stage settled the final pump state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    /// No rule fired; the classifier output stands.
    Model,
    /// Soil already wet enough, pump forced off.
    RuleMoistureHigh,
    /// Soil dry and air hot, pump forced on.
    RuleDryHot,
}

/// Final pump state plus where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub pump: bool,
    pub source: DecisionSource,
}

impl Decision {
    /// Card headline shown on the dashboard.
    pub const fn headline(&self) -> &'static str {
        if self.pump {
            "Pump is ON"
        } else {
            "Pump is OFF"
        }
    }

    /// Card sub-line shown under the headline.
    pub const fn detail(&self) -> &'static str {
        if self.pump {
            "Soil is dry. Irrigation required."
        } else {
            "Soil has enough moisture."
        }
    }
}

/// One named, model-ready feature value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureValue {
    pub name: String,
    pub value: f64,
}

/// Everything produced by one pass through the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionReport {
    pub decision: Decision,
    /// Classifier output before any rule override (0 = off, 1 = on).
    pub raw_prediction: u8,
    /// One-line human-readable explanation of the final state.
    pub reason: String,
    pub headline: &'static str,
    pub detail: &'static str,
    pub reading: Reading,
    /// Scaled, schema-aligned features the classifier saw.
    pub features: Vec<FeatureValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pump_class_labels() {
        assert_eq!(PumpClass::Off.label(), 0);
        assert_eq!(PumpClass::On.label(), 1);
        assert!(PumpClass::from_on(true).is_on());
        assert!(!PumpClass::from_on(false).is_on());
    }

    #[test]
    fn test_card_text_follows_pump_state() {
        let on = Decision {
            pump: true,
            source: DecisionSource::RuleDryHot,
        };
        let off = Decision {
            pump: false,
            source: DecisionSource::Model,
        };
        assert_eq!(on.headline(), "Pump is ON");
        assert_eq!(on.detail(), "Soil is dry. Irrigation required.");
        assert_eq!(off.headline(), "Pump is OFF");
        assert_eq!(off.detail(), "Soil has enough moisture.");
    }

    #[test]
    fn test_source_serializes_snake_case() {
        let json = serde_json::to_string(&DecisionSource::RuleMoistureHigh).unwrap();
        assert_eq!(json, "\"rule_moisture_high\"");
    }
}
