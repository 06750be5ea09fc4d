//! Pre-trained pump classifiers.
//!
//! The classifier is fitted offline and shipped as a tagged JSON artifact.
//! Every supported kind implements [`Classifier`], the seam the decision
//! engine predicts through.
//!
//! ```json
//! { "kind": "logistic", "coefficients": [...], "intercept": -0.4 }
//! { "kind": "decision_tree", "n_features": 8, "nodes": [...] }
//! { "kind": "random_forest", "n_features": 8, "trees": [{ "nodes": [...] }] }
//! ```

mod logistic;
mod tree;

pub use logistic::LogisticModel;
pub use tree::{DecisionTree, RandomForest, TreeNode, TreeNodes};

use serde::Deserialize;
use thiserror::Error;

use crate::features::FeatureVector;
use crate::types::PumpClass;

/// Problems found in a model artifact while loading it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("model has no parameters: {0}")]
    Empty(&'static str),

    #[error("model parameter '{0}' contains NaN or Inf")]
    NotFinite(&'static str),

    #[error("tree {tree} node {node}: {message}")]
    BadNode {
        tree: usize,
        node: usize,
        message: String,
    },

    #[error("feature_names lists {names} columns but the model uses {n_features}")]
    FeatureNames { names: usize, n_features: usize },
}

/// Per-request prediction failure. Distinct from artifact load failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("model expects {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("feature '{0}' is NaN or Inf")]
    NonFiniteFeature(String),

    #[error("model produced a non-finite score")]
    NonFiniteScore,
}

/// A trained binary pump classifier.
pub trait Classifier: Send + Sync + std::fmt::Debug {
    /// Short kind name for logs and status output.
    fn kind(&self) -> &'static str;

    /// Number of input columns the model was trained on.
    fn n_features(&self) -> usize;

    /// Training-time column names, if the artifact recorded them.
    fn feature_names(&self) -> Option<&[String]>;

    fn predict(&self, features: &FeatureVector) -> Result<PumpClass, InferenceError>;
}

/// Shared input guard: right width and all values finite.
pub(crate) fn check_input(expected: usize, features: &FeatureVector) -> Result<(), InferenceError> {
    if features.len() != expected {
        return Err(InferenceError::DimensionMismatch {
            expected,
            actual: features.len(),
        });
    }
    if let Some((name, _)) = features.iter().find(|(_, v)| !v.is_finite()) {
        return Err(InferenceError::NonFiniteFeature(name.to_string()));
    }
    Ok(())
}

/// Model artifact as stored on disk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Logistic(LogisticModel),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl ModelArtifact {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Internal consistency checks that do not need the schema.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::Logistic(m) => m.validate(),
            Self::DecisionTree(m) => m.validate(),
            Self::RandomForest(m) => m.validate(),
        }
    }

    pub fn into_classifier(self) -> Box<dyn Classifier> {
        match self {
            Self::Logistic(m) => Box::new(m),
            Self::DecisionTree(m) => Box::new(m),
            Self::RandomForest(m) => Box::new(m),
        }
    }
}

fn check_feature_names(names: Option<&Vec<String>>, n_features: usize) -> Result<(), ModelError> {
    match names {
        Some(names) if names.len() != n_features => Err(ModelError::FeatureNames {
            names: names.len(),
            n_features,
        }),
        _ => Ok(()),
    }
}
