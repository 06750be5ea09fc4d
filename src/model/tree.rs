//! Decision tree and random forest classifiers.
//!
//! Trees are stored as flat node arrays with node 0 as the root. A split
//! sends a sample left when `x[feature] <= threshold`. Leaves carry the
//! fraction of class-ON training samples that reached them.

use serde::Deserialize;

use super::{check_feature_names, check_input, Classifier, InferenceError, ModelError};
use crate::features::FeatureVector;
use crate::types::PumpClass;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        probability: f64,
    },
}

/// One tree's node array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreeNodes {
    pub nodes: Vec<TreeNode>,
}

/// Children must point strictly forward so traversal always ends on a leaf.
fn validate_nodes(nodes: &[TreeNode], tree: usize, n_features: usize) -> Result<(), ModelError> {
    if nodes.is_empty() {
        return Err(ModelError::Empty("nodes"));
    }
    let bad = |node: usize, message: String| ModelError::BadNode {
        tree,
        node,
        message,
    };
    for (i, node) in nodes.iter().enumerate() {
        match *node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if feature >= n_features {
                    return Err(bad(i, format!("feature index {feature} >= n_features {n_features}")));
                }
                if !threshold.is_finite() {
                    return Err(bad(i, "threshold is NaN or Inf".to_string()));
                }
                for child in [left, right] {
                    if child <= i || child >= nodes.len() {
                        return Err(bad(i, format!("child index {child} out of order or range")));
                    }
                }
            }
            TreeNode::Leaf { probability } => {
                if !(0.0..=1.0).contains(&probability) {
                    return Err(bad(i, format!("leaf probability {probability} outside [0, 1]")));
                }
            }
        }
    }
    Ok(())
}

/// Leaf probability reached by `x`. Assumes validated nodes and finite input.
fn leaf_probability(nodes: &[TreeNode], x: &[f64]) -> f64 {
    let mut i = 0;
    loop {
        match nodes[i] {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => i = if x[feature] <= threshold { left } else { right },
            TreeNode::Leaf { probability } => return probability,
        }
    }
}

// ============================================================================
// Decision Tree
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecisionTree {
    pub n_features: usize,
    pub nodes: Vec<TreeNode>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl DecisionTree {
    pub(super) fn validate(&self) -> Result<(), ModelError> {
        validate_nodes(&self.nodes, 0, self.n_features)?;
        check_feature_names(self.feature_names.as_ref(), self.n_features)
    }

    pub fn predict_proba(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        check_input(self.n_features, features)?;
        Ok(leaf_probability(&self.nodes, features.values()))
    }
}

impl Classifier for DecisionTree {
    fn kind(&self) -> &'static str {
        "decision_tree"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict(&self, features: &FeatureVector) -> Result<PumpClass, InferenceError> {
        Ok(PumpClass::from_on(self.predict_proba(features)? > 0.5))
    }
}

// ============================================================================
// Random Forest
// ============================================================================

/// Soft-voting ensemble: class ON when the mean leaf probability exceeds 0.5.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<TreeNodes>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl RandomForest {
    pub(super) fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::Empty("trees"));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            validate_nodes(&tree.nodes, t, self.n_features)?;
        }
        check_feature_names(self.feature_names.as_ref(), self.n_features)
    }

    pub fn predict_proba(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        check_input(self.n_features, features)?;
        let x = features.values();
        let total: f64 = self.trees.iter().map(|t| leaf_probability(&t.nodes, x)).sum();
        let mean = total / self.trees.len() as f64;
        if mean.is_finite() {
            Ok(mean)
        } else {
            Err(InferenceError::NonFiniteScore)
        }
    }
}

impl Classifier for RandomForest {
    fn kind(&self) -> &'static str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict(&self, features: &FeatureVector) -> Result<PumpClass, InferenceError> {
        Ok(PumpClass::from_on(self.predict_proba(features)? > 0.5))
    }
}
