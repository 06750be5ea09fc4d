//! Decision Engine
//!
//! Feature Builder -> Predictor -> Rule Overrider, one reading at a time.
//! The engine holds only an immutable artifact snapshot and the rule
//! thresholds, so evaluations are independent and may run concurrently.

pub mod artifacts;
mod rules;

pub use artifacts::{ArtifactBundle, ArtifactLoadError, ArtifactPaths, ArtifactRegistry};
pub use rules::{apply_rules, RuleThresholds, RuleVerdict};

use std::sync::Arc;

use tracing::debug;

use crate::features::{build_features, FeatureVector};
use crate::model::InferenceError;
use crate::types::{DecisionReport, PumpClass, Reading};

#[derive(Debug, Clone)]
pub struct DecisionEngine {
    artifacts: Arc<ArtifactBundle>,
    rules: RuleThresholds,
}

impl DecisionEngine {
    pub const fn new(artifacts: Arc<ArtifactBundle>, rules: RuleThresholds) -> Self {
        Self { artifacts, rules }
    }

    pub fn artifacts(&self) -> &ArtifactBundle {
        &self.artifacts
    }

    /// Encode, align and scale a reading for the classifier.
    pub fn prepare(&self, reading: &Reading) -> FeatureVector {
        build_features(reading, self.artifacts.schema(), self.artifacts.scaler())
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<PumpClass, InferenceError> {
        self.artifacts.model().predict(features)
    }

    /// Run the full pipeline for one reading.
    pub fn evaluate(&self, reading: &Reading) -> Result<DecisionReport, InferenceError> {
        let features = self.prepare(reading);
        let raw = self.predict(&features)?;
        let verdict = apply_rules(raw, reading.temperature(), reading.soil_moisture(), &self.rules);

        debug!(
            crop = %reading.crop(),
            temperature = reading.temperature(),
            soil_moisture = reading.soil_moisture(),
            raw = raw.label(),
            pump = verdict.decision.pump,
            source = ?verdict.decision.source,
            "Pump decision"
        );

        Ok(DecisionReport {
            decision: verdict.decision,
            raw_prediction: raw.label(),
            reason: verdict.reason,
            headline: verdict.decision.headline(),
            detail: verdict.decision.detail(),
            reading: reading.clone(),
            features: features.to_named(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureSchema, Scaler, NUMERIC_COLUMNS};
    use crate::model::{LogisticModel, ModelArtifact};
    use crate::types::{Crop, DecisionSource, InputRanges, ReadingInput};

    const SCHEMA: &str = "temperature\nsoil_moisture\ndays\ntime\nmoisture_trend\ncrop_maize\ncrop_rice\ncrop_wheat\n";

    /// Logistic model that always returns `class` (intercept only).
    fn engine(class: PumpClass) -> DecisionEngine {
        let schema = FeatureSchema::parse(SCHEMA).unwrap();
        let scaler = Scaler::Standard {
            columns: NUMERIC_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            mean: vec![28.0, 450.0, 15.0, 12.0, 500.0],
            scale: vec![6.0, 200.0, 9.0, 7.0, 250.0],
        };
        let model = ModelArtifact::Logistic(LogisticModel {
            coefficients: vec![0.0; 8],
            intercept: if class.is_on() { 1.0 } else { -1.0 },
            feature_names: None,
        });
        let bundle = ArtifactBundle::from_parts(schema, scaler, model).unwrap();
        DecisionEngine::new(Arc::new(bundle), RuleThresholds::default())
    }

    fn reading(temperature: f64, soil_moisture: f64, crop: Crop) -> Reading {
        ReadingInput {
            temperature: Some(temperature),
            soil_moisture: Some(soil_moisture),
            crop: Some(crop.to_string()),
            ..Default::default()
        }
        .validate(&InputRanges::default())
        .unwrap()
    }

    #[test]
    fn test_dry_hot_rice_pumps() {
        let report = engine(PumpClass::Off)
            .evaluate(&reading(35.0, 300.0, Crop::Rice))
            .unwrap();
        assert!(report.decision.pump);
        assert_eq!(report.decision.source, DecisionSource::RuleDryHot);
        assert_eq!(report.raw_prediction, 0);
        assert_eq!(report.headline, "Pump is ON");
    }

    #[test]
    fn test_wet_wheat_stays_off() {
        let report = engine(PumpClass::On)
            .evaluate(&reading(20.0, 700.0, Crop::Wheat))
            .unwrap();
        assert!(!report.decision.pump);
        assert_eq!(report.decision.source, DecisionSource::RuleMoistureHigh);
        assert_eq!(report.raw_prediction, 1);
    }

    #[test]
    fn test_maize_middle_band_uses_model() {
        let report = engine(PumpClass::Off)
            .evaluate(&reading(25.0, 450.0, Crop::Maize))
            .unwrap();
        assert!(!report.decision.pump);
        assert_eq!(report.reason, "Using model prediction");
        assert_eq!(report.detail, "Soil has enough moisture.");
    }

    #[test]
    fn test_report_features_follow_schema() {
        let e = engine(PumpClass::On);
        let report = e.evaluate(&reading(34.0, 650.0, Crop::Maize)).unwrap();
        let names: Vec<&str> = report.features.iter().map(|f| f.name.as_str()).collect();
        let expected: Vec<&str> = e.artifacts().schema().columns().iter().map(String::as_str).collect();
        assert_eq!(names, expected);
        assert_eq!(report.features[0].value, 1.0);
        assert_eq!(report.features[5].value, 1.0);
        assert_eq!(report.reading.temperature(), 34.0);
    }
}
