//! Pre-fit numeric scaler.
//!
//! The scaler is fitted offline on the five numeric columns and shipped as a
//! JSON artifact. Only those columns are transformed; one-hot and padded
//! columns pass through untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{FeatureVector, NUMERIC_COLUMNS};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScalerError {
    #[error("scaler columns {actual:?} do not match the numeric columns {expected:?}")]
    Columns {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("scaler field '{field}' has {actual} entries, expected {expected}")]
    Length {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("scaler field '{0}' contains NaN or Inf")]
    NotFinite(&'static str),
}

/// Fitted scaler parameters, tagged by kind.
///
/// ```json
/// { "kind": "standard", "columns": ["temperature", ...], "mean": [...], "scale": [...] }
/// { "kind": "min_max",  "columns": ["temperature", ...], "min":  [...], "scale": [...] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard {
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    /// `x * scale + min`
    MinMax {
        columns: Vec<String>,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

impl Scaler {
    pub fn columns(&self) -> &[String] {
        match self {
            Self::Standard { columns, .. } | Self::MinMax { columns, .. } => columns,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Standard { .. } => "standard",
            Self::MinMax { .. } => "min_max",
        }
    }

    /// Check the fitted parameters are usable on the numeric columns.
    pub fn validate(&self) -> Result<(), ScalerError> {
        let columns = self.columns();
        let mut actual: Vec<String> = columns.to_vec();
        let mut expected: Vec<String> = NUMERIC_COLUMNS.iter().map(|c| (*c).to_string()).collect();
        actual.sort();
        expected.sort();
        if actual != expected {
            return Err(ScalerError::Columns {
                expected,
                actual: columns.to_vec(),
            });
        }

        let (offset_name, offset, scale) = match self {
            Self::Standard { mean, scale, .. } => ("mean", mean, scale),
            Self::MinMax { min, scale, .. } => ("min", min, scale),
        };
        for (field, values) in [(offset_name, offset), ("scale", scale)] {
            if values.len() != columns.len() {
                return Err(ScalerError::Length {
                    field,
                    expected: columns.len(),
                    actual: values.len(),
                });
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(ScalerError::NotFinite(field));
            }
        }
        Ok(())
    }

    /// Transform the value of column `i` (index into `columns()`).
    fn apply(&self, i: usize, x: f64) -> f64 {
        match self {
            Self::Standard { mean, scale, .. } => {
                // Constant features are fitted with zero scale; leave them centred.
                let s = if scale[i] == 0.0 { 1.0 } else { scale[i] };
                (x - mean[i]) / s
            }
            Self::MinMax { min, scale, .. } => x * scale[i] + min[i],
        }
    }

    /// Scale the numeric columns of `features` in place.
    pub fn transform(&self, features: &mut FeatureVector) {
        for (i, column) in self.columns().iter().enumerate() {
            if let Some(pos) = features.schema().position(column) {
                let scaled = self.apply(i, features.values()[pos]);
                features.set(pos, scaled);
            }
        }
    }
}
