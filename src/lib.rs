//! Irrigation Advisor: pump decisions from field readings
//!
//! A trained classifier decides whether to irrigate; two agronomic rules can
//! override it.
//!
//! ## Architecture
//!
//! - **Features**: one-hot encode the crop, align to the training schema, scale
//! - **Model**: logistic regression, decision tree or random forest loaded from JSON
//! - **Engine**: feature builder -> classifier -> rule overrider
//! - **API**: server-rendered dashboard plus a JSON API

pub mod api;
pub mod config;
pub mod engine;
pub mod features;
pub mod model;
pub mod types;

// Re-export configuration
pub use config::AdvisorConfig;

// Re-export engine
pub use engine::{
    apply_rules, ArtifactBundle, ArtifactLoadError, ArtifactPaths, ArtifactRegistry,
    DecisionEngine, RuleThresholds,
};

// Re-export commonly used types
pub use types::{
    Crop, Decision, DecisionReport, DecisionSource, InputError, InputRanges, PumpClass, Reading,
    ReadingInput,
};
