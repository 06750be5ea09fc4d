//! Artifact lifecycle: schema, scaler and classifier.
//!
//! Artifacts are read and cross-checked once into an immutable
//! [`ArtifactBundle`]. The [`ArtifactRegistry`] owns the active bundle behind
//! an `ArcSwap` so requests take a cheap snapshot and a reload never disturbs
//! in-flight work. A failed reload leaves the previous bundle active.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::defaults;
use crate::features::{FeatureSchema, Scaler, ScalerError, SchemaError};
use crate::model::{Classifier, ModelArtifact, ModelError};

/// Any failure opening, deserializing or cross-checking an artifact.
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid feature schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("invalid scaler: {0}")]
    Scaler(#[from] ScalerError),

    #[error("invalid model: {0}")]
    Model(#[from] ModelError),

    #[error("artifacts disagree: {0}")]
    Mismatch(String),
}

/// Where the three artifacts live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub schema: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from(defaults::MODEL_PATH),
            scaler: PathBuf::from(defaults::SCALER_PATH),
            schema: PathBuf::from(defaults::SCHEMA_PATH),
        }
    }
}

fn read(path: &Path) -> Result<String, ArtifactLoadError> {
    std::fs::read_to_string(path).map_err(|source| ArtifactLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loaded, mutually consistent artifacts.
#[derive(Debug)]
pub struct ArtifactBundle {
    schema: Arc<FeatureSchema>,
    scaler: Scaler,
    model: Box<dyn Classifier>,
    loaded_at: DateTime<Utc>,
}

impl ArtifactBundle {
    /// Read all three artifacts from disk.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactLoadError> {
        let schema = FeatureSchema::parse(&read(&paths.schema)?)?;

        let scaler: Scaler = serde_json::from_str(&read(&paths.scaler)?).map_err(|source| {
            ArtifactLoadError::Parse {
                path: paths.scaler.clone(),
                source,
            }
        })?;

        let model = ModelArtifact::from_json(&read(&paths.model)?).map_err(|source| {
            ArtifactLoadError::Parse {
                path: paths.model.clone(),
                source,
            }
        })?;

        let bundle = Self::from_parts(schema, scaler, model)?;
        info!(
            model = %paths.model.display(),
            kind = bundle.model.kind(),
            features = bundle.schema.len(),
            scaler = bundle.scaler.kind(),
            "Artifacts loaded"
        );
        Ok(bundle)
    }

    /// Validate already-parsed artifacts against each other.
    pub fn from_parts(
        schema: FeatureSchema,
        scaler: Scaler,
        model: ModelArtifact,
    ) -> Result<Self, ArtifactLoadError> {
        scaler.validate()?;
        model.validate()?;
        let model = model.into_classifier();

        if model.n_features() != schema.len() {
            return Err(ArtifactLoadError::Mismatch(format!(
                "model expects {} features but the schema lists {}",
                model.n_features(),
                schema.len()
            )));
        }
        if let Some(names) = model.feature_names() {
            if names != schema.columns() {
                return Err(ArtifactLoadError::Mismatch(
                    "model feature_names differ from the schema column order".to_string(),
                ));
            }
        }

        let unknown = schema.unknown_columns();
        if !unknown.is_empty() {
            warn!(columns = ?unknown, "Schema has columns the encoder never sets; they stay zero");
        }

        Ok(Self {
            schema: Arc::new(schema),
            scaler,
            model,
            loaded_at: Utc::now(),
        })
    }

    pub const fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    pub const fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    pub fn model(&self) -> &dyn Classifier {
        self.model.as_ref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Owner of the active artifact bundle.
#[derive(Debug)]
pub struct ArtifactRegistry {
    paths: ArtifactPaths,
    current: ArcSwap<ArtifactBundle>,
}

impl ArtifactRegistry {
    /// Initial load. Failure here is fatal to startup.
    pub fn load(paths: ArtifactPaths) -> Result<Self, ArtifactLoadError> {
        let bundle = ArtifactBundle::load(&paths)?;
        Ok(Self::with_bundle(paths, bundle))
    }

    pub fn with_bundle(paths: ArtifactPaths, bundle: ArtifactBundle) -> Self {
        Self {
            paths,
            current: ArcSwap::from_pointee(bundle),
        }
    }

    pub const fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Snapshot of the active bundle.
    pub fn current(&self) -> Arc<ArtifactBundle> {
        self.current.load_full()
    }

    /// Re-read artifacts from disk; swap only if the new set is valid.
    pub fn reload(&self) -> Result<Arc<ArtifactBundle>, ArtifactLoadError> {
        match ArtifactBundle::load(&self.paths) {
            Ok(bundle) => {
                let bundle = Arc::new(bundle);
                self.current.store(Arc::clone(&bundle));
                info!("Artifact bundle swapped");
                Ok(bundle)
            }
            Err(e) => {
                warn!(error = %e, "Artifact reload failed, keeping current bundle");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LogisticModel;
    use std::fs;

    const SCHEMA: &str = "temperature\nsoil_moisture\ndays\ntime\nmoisture_trend\ncrop_maize\ncrop_rice\ncrop_wheat\n";
    const SCALER: &str = r#"{"kind":"standard","columns":["temperature","soil_moisture","days","time","moisture_trend"],"mean":[0,0,0,0,0],"scale":[1,1,1,1,1]}"#;
    const MODEL: &str = r#"{"kind":"logistic","coefficients":[0,0,0,0,0,0,0,0],"intercept":1.0}"#;

    fn write_artifacts(dir: &Path, model: &str) -> ArtifactPaths {
        let paths = ArtifactPaths {
            model: dir.join("model.json"),
            scaler: dir.join("scaler.json"),
            schema: dir.join("columns.txt"),
        };
        fs::write(&paths.schema, SCHEMA).unwrap();
        fs::write(&paths.scaler, SCALER).unwrap();
        fs::write(&paths.model, model).unwrap();
        paths
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = ArtifactBundle::load(&write_artifacts(dir.path(), MODEL)).unwrap();
        assert_eq!(bundle.schema().len(), 8);
        assert_eq!(bundle.model().kind(), "logistic");
        assert_eq!(bundle.scaler().kind(), "standard");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = write_artifacts(dir.path(), MODEL);
        paths.scaler = dir.path().join("nope.json");
        assert!(matches!(
            ArtifactBundle::load(&paths),
            Err(ArtifactLoadError::Io { .. })
        ));
    }

    #[test]
    fn test_garbage_model_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_artifacts(dir.path(), "\u{80}pickle");
        assert!(matches!(
            ArtifactBundle::load(&paths),
            Err(ArtifactLoadError::Parse { .. })
        ));
    }

    #[test]
    fn test_width_mismatch_detected() {
        let schema = FeatureSchema::parse(SCHEMA).unwrap();
        let scaler: Scaler = serde_json::from_str(SCALER).unwrap();
        let model = ModelArtifact::Logistic(LogisticModel {
            coefficients: vec![1.0; 5],
            intercept: 0.0,
            feature_names: None,
        });
        assert!(matches!(
            ArtifactBundle::from_parts(schema, scaler, model),
            Err(ArtifactLoadError::Mismatch(_))
        ));
    }

    #[test]
    fn test_feature_name_order_checked() {
        let schema = FeatureSchema::parse(SCHEMA).unwrap();
        let scaler: Scaler = serde_json::from_str(SCALER).unwrap();
        let mut names: Vec<String> = schema.columns().to_vec();
        names.swap(0, 1);
        let model = ModelArtifact::Logistic(LogisticModel {
            coefficients: vec![1.0; 8],
            intercept: 0.0,
            feature_names: Some(names),
        });
        assert!(matches!(
            ArtifactBundle::from_parts(schema, scaler, model),
            Err(ArtifactLoadError::Mismatch(_))
        ));
    }

    #[test]
    fn test_failed_reload_keeps_previous_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_artifacts(dir.path(), MODEL);
        let registry = ArtifactRegistry::load(paths.clone()).unwrap();
        let before = registry.current();

        fs::write(&paths.model, "{}").unwrap();
        assert!(registry.reload().is_err());
        assert!(Arc::ptr_eq(&before, &registry.current()));
    }

    #[test]
    fn test_successful_reload_swaps_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_artifacts(dir.path(), MODEL);
        let registry = ArtifactRegistry::load(paths.clone()).unwrap();
        let before = registry.current();

        let forest = r#"{"kind":"decision_tree","n_features":8,"nodes":[{"leaf":{"probability":0.0}}]}"#;
        fs::write(&paths.model, forest).unwrap();
        let after = registry.reload().unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(registry.current().model().kind(), "decision_tree");
        // In-flight snapshots keep the old model.
        assert_eq!(before.model().kind(), "logistic");
    }
}
