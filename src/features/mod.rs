//! Feature preparation for the pump classifier.
//!
//! A [`Reading`](crate::types::Reading) becomes a model-ready
//! [`FeatureVector`] in three steps:
//!
//! 1. `encode_reading`: numeric fields plus one-hot crop columns
//!    (cotton is the dropped baseline)
//! 2. `align_to_schema`: zero-pad and reorder to the trained schema
//! 3. `Scaler::transform`: normalise the numeric subset only

mod builder;
mod scaler;
mod schema;

pub use builder::*;
pub use scaler::*;
pub use schema::*;

use std::sync::Arc;

use crate::types::{Crop, FeatureValue};

/// Numeric columns fed to the scaler, in training order.
///
/// `days` is the training-time name of the reading's `day` field.
pub const NUMERIC_COLUMNS: [&str; 5] = ["temperature", "soil_moisture", "days", "time", "moisture_trend"];

/// Name of the one-hot column for a crop.
pub fn crop_column(crop: Crop) -> String {
    format!("crop_{crop}")
}

/// Values aligned one-to-one with a shared [`FeatureSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    schema: Arc<FeatureSchema>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// All-zero vector for `schema`.
    pub fn zeros(schema: Arc<FeatureSchema>) -> Self {
        let values = vec![0.0; schema.len()];
        Self { schema, values }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema.position(name).map(|i| self.values[i])
    }

    pub(crate) fn set(&mut self, index: usize, value: f64) {
        self.values[index] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.schema
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn to_named(&self) -> Vec<FeatureValue> {
        self.iter()
            .map(|(name, value)| FeatureValue {
                name: name.to_string(),
                value,
            })
            .collect()
    }
}
