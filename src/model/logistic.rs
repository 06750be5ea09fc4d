//! Linear (logistic regression) classifier.

use serde::Deserialize;

use super::{check_feature_names, check_input, Classifier, InferenceError, ModelError};
use crate::features::FeatureVector;
use crate::types::PumpClass;

/// `w·x + b`, class ON when the decision function is strictly positive
/// (probability above 0.5).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogisticModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl LogisticModel {
    pub(super) fn validate(&self) -> Result<(), ModelError> {
        if self.coefficients.is_empty() {
            return Err(ModelError::Empty("coefficients"));
        }
        if self.coefficients.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::NotFinite("coefficients"));
        }
        if !self.intercept.is_finite() {
            return Err(ModelError::NotFinite("intercept"));
        }
        check_feature_names(self.feature_names.as_ref(), self.coefficients.len())
    }

    pub fn decision_function(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        check_input(self.coefficients.len(), features)?;
        let score = self
            .coefficients
            .iter()
            .zip(features.values())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        if score.is_finite() {
            Ok(score)
        } else {
            Err(InferenceError::NonFiniteScore)
        }
    }
}

impl Classifier for LogisticModel {
    fn kind(&self) -> &'static str {
        "logistic"
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict(&self, features: &FeatureVector) -> Result<PumpClass, InferenceError> {
        Ok(PumpClass::from_on(self.decision_function(features)? > 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureSchema, FeatureVector};
    use std::sync::Arc;

    fn vector(values: &[f64]) -> FeatureVector {
        let schema = Arc::new(
            FeatureSchema::parse("temperature\nsoil_moisture\ndays\ntime\nmoisture_trend\n").unwrap(),
        );
        let mut v = FeatureVector::zeros(schema);
        for (i, x) in values.iter().enumerate() {
            v.set(i, *x);
        }
        v
    }

    fn model() -> LogisticModel {
        LogisticModel {
            coefficients: vec![1.0, -2.0, 0.0, 0.0, 0.0],
            intercept: 0.0,
            feature_names: None,
        }
    }

    #[test]
    fn test_positive_score_is_on() {
        let v = vector(&[3.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(model().predict(&v).unwrap(), PumpClass::On);
    }

    #[test]
    fn test_zero_score_is_off() {
        let v = vector(&[2.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(model().decision_function(&v).unwrap(), 0.0);
        assert_eq!(model().predict(&v).unwrap(), PumpClass::Off);
    }

    #[test]
    fn test_wrong_width_is_inference_error() {
        let mut m = model();
        m.coefficients.push(1.0);
        let v = vector(&[0.0; 5]);
        assert_eq!(
            m.predict(&v),
            Err(InferenceError::DimensionMismatch {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn test_non_finite_feature_is_inference_error() {
        let v = vector(&[0.0, f64::INFINITY, 0.0, 0.0, 0.0]);
        assert_eq!(
            model().predict(&v),
            Err(InferenceError::NonFiniteFeature("soil_moisture".to_string()))
        );
    }

    #[test]
    fn test_feature_names_length_checked() {
        let mut m = model();
        m.feature_names = Some(vec!["temperature".to_string()]);
        assert_eq!(
            m.validate(),
            Err(ModelError::FeatureNames {
                names: 1,
                n_features: 5
            })
        );
    }
}
