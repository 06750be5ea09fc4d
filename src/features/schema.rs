//! Ordered feature schema the classifier was trained with.
//!
//! The schema file is the source of truth for column set and order. It is
//! parsed and checked once when artifacts load; every feature vector built
//! afterwards is aligned to it.

use std::collections::HashMap;

use thiserror::Error;

use super::{crop_column, NUMERIC_COLUMNS};
use crate::types::Crop;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema lists no feature columns")]
    Empty,

    #[error("column '{0}' appears more than once")]
    Duplicate(String),

    #[error("numeric column '{0}' is missing from the schema")]
    MissingNumeric(&'static str),
}

/// Duplicate-free, ordered list of feature names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(SchemaError::Duplicate(name.clone()));
            }
        }

        if let Some(missing) = NUMERIC_COLUMNS.into_iter().find(|c| !index.contains_key(*c)) {
            return Err(SchemaError::MissingNumeric(missing));
        }

        Ok(Self { columns, index })
    }

    /// Parse the one-name-per-line text format. Lines are trimmed and blank
    /// lines skipped.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let columns = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self::new(columns)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Columns the encoder never produces. They are always zero.
    pub fn unknown_columns(&self) -> Vec<&str> {
        let crop_columns: Vec<String> = Crop::ALL.into_iter().map(crop_column).collect();
        self.columns
            .iter()
            .filter(|c| !NUMERIC_COLUMNS.contains(&c.as_str()) && !crop_columns.contains(*c))
            .map(String::as_str)
            .collect()
    }
}
