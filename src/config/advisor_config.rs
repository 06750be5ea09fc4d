//! Advisor Configuration - artifact paths, rule thresholds and input ranges
//!
//! Every struct implements `Default` with the dashboard defaults, so
//! behaviour is unchanged when no config file is present.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;
use crate::engine::{ArtifactPaths, RuleThresholds};
use crate::types::InputRanges;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "IRRIGATION_CONFIG";

/// Environment variable overriding `server.addr`.
pub const SERVER_ADDR_ENV: &str = "IRRIGATION_SERVER_ADDR";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG: &str = "irrigation.toml";

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error ({}): {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one advisor deployment.
///
/// Load with `AdvisorConfig::load()` which searches:
/// 1. `$IRRIGATION_CONFIG`
/// 2. `./irrigation.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Classifier, scaler and schema locations
    #[serde(default)]
    pub artifacts: ArtifactPaths,

    /// Override rule cut-offs
    #[serde(default)]
    pub rules: RuleThresholds,

    /// Accepted reading ranges
    #[serde(default)]
    pub inputs: InputRanges,
}

impl AdvisorConfig {
    /// Resolve the config for a process: an explicit `--config` path is
    /// loaded strictly, otherwise the search order applies. Environment
    /// overrides are applied last.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var(CONFIG_ENV).ok();
        let mut config = Self::resolve_with(explicit, env_path.as_deref(), Path::new(LOCAL_CONFIG))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// [`resolve`](Self::resolve) with the environment supplied by the caller.
    pub fn resolve_with(
        explicit: Option<&Path>,
        env_path: Option<&str>,
        local: &Path,
    ) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                let config = Self::load_from_file(path)?;
                info!(path = %path.display(), "Loaded config from --config");
                Ok(config)
            }
            None => Ok(Self::load_with(env_path, local)),
        }
    }

    /// Load configuration using the standard search order, falling back to
    /// defaults when a candidate file is missing or invalid.
    pub fn load() -> Self {
        let env_path = std::env::var(CONFIG_ENV).ok();
        Self::load_with(env_path.as_deref(), Path::new(LOCAL_CONFIG))
    }

    /// Search order with the `$IRRIGATION_CONFIG` value and the local
    /// candidate passed in.
    pub fn load_with(env_path: Option<&str>, local: &Path) -> Self {
        // 1. Env var
        if let Some(path) = env_path {
            let p = Path::new(path);
            if p.exists() {
                match Self::load_from_file(p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from {}", CONFIG_ENV);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV);
            }
        }

        // 2. Local file
        if local.exists() {
            match Self::load_from_file(local) {
                Ok(config) => {
                    info!(path = %local.display(), "Loaded local config");
                    return config;
                }
                Err(e) => {
                    warn!(path = %local.display(), error = %e, "Failed to load local config, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", LOCAL_CONFIG);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are only warned about; existing configs keep working.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `$IRRIGATION_SERVER_ADDR` on top of the loaded values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(std::env::var(SERVER_ADDR_ENV).ok());
    }

    /// Override `server.addr`; blank values are ignored.
    pub fn apply_overrides(&mut self, addr: Option<String>) {
        if let Some(addr) = addr.filter(|a| !a.trim().is_empty()) {
            info!(addr = %addr, "Server address overridden by {}", SERVER_ADDR_ENV);
            self.server.addr = addr;
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate thresholds and ranges for internal consistency.
    ///
    /// All problems are collected before failing. Suspicious but usable
    /// values are logged as warnings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (errors, warnings) = super::validation::validate_ranges(self);
        for w in &warnings {
            warn!("{}", w);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, `host:port`
    #[serde(default = "default_server_addr")]
    pub addr: String,

    /// Extra origins allowed by CORS (same-origin only when empty)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
            cors_origins: Vec::new(),
        }
    }
}
