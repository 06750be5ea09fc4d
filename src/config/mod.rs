//! Advisor Configuration Module
//!
//! Per-deployment configuration loaded from TOML, covering artifact
//! locations, override-rule thresholds, accepted input ranges and the HTTP
//! bind address.
//!
//! ## Loading Order
//!
//! 1. `--config <PATH>` on the command line (errors are fatal)
//! 2. `IRRIGATION_CONFIG` environment variable (path to TOML file)
//! 3. `irrigation.toml` in the current working directory
//! 4. Built-in defaults (the dashboard defaults)
//!
//! `IRRIGATION_SERVER_ADDR` overrides `server.addr` after loading.

mod advisor_config;
pub mod defaults;
pub mod validation;

pub use advisor_config::*;
