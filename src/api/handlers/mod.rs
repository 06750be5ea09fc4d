//! API route handlers
//!
//! - Pump decisions (query string or JSON body)
//! - Health, schema and config introspection
//! - Artifact reload

mod decision;
mod status;

pub use decision::*;
pub use status::*;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::AdvisorConfig;
use crate::engine::{ArtifactRegistry, DecisionEngine};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API and dashboard handlers
#[derive(Clone)]
pub struct AdvisorState {
    /// Active artifact bundle (swappable on reload)
    pub registry: Arc<ArtifactRegistry>,
    /// Rules, input ranges and server settings
    pub config: Arc<AdvisorConfig>,
    pub started_at: DateTime<Utc>,
}

impl AdvisorState {
    pub fn new(registry: Arc<ArtifactRegistry>, config: Arc<AdvisorConfig>) -> Self {
        Self {
            registry,
            config,
            started_at: Utc::now(),
        }
    }

    /// Engine over the current artifact snapshot.
    pub fn engine(&self) -> DecisionEngine {
        DecisionEngine::new(self.registry.current(), self.config.rules.clone())
    }
}
