//! System-wide default constants.
//!
//! Centralises the values the advisor falls back to when no config file is
//! present. Grouped by subsystem for easy discovery.

// ============================================================================
// Server
// ============================================================================

/// Default HTTP bind address.
pub const SERVER_ADDR: &str = "0.0.0.0:8080";

// ============================================================================
// Artifacts
// ============================================================================

/// Trained classifier artifact.
pub const MODEL_PATH: &str = "artifacts/irrigation_model.json";

/// Fitted numeric scaler artifact.
pub const SCALER_PATH: &str = "artifacts/scaler.json";

/// Ordered feature column list, one name per line.
pub const SCHEMA_PATH: &str = "artifacts/feature_columns.txt";

// ============================================================================
// Override Rules
// ============================================================================

/// Soil moisture at or above this forces the pump OFF.
pub const MOISTURE_HIGH_MIN: f64 = 600.0;

/// Soil moisture at or below this (combined with heat) forces the pump ON.
pub const DRY_MOISTURE_MAX: f64 = 350.0;

/// Temperature (°C) at or above this counts as hot for the dry & hot rule.
pub const HOT_TEMPERATURE_MIN: f64 = 30.0;

// ============================================================================
// Reading Inputs
// ============================================================================

pub const TEMPERATURE: f64 = 28.0;
pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 50.0);

pub const SOIL_MOISTURE: f64 = 400.0;
pub const SOIL_MOISTURE_RANGE: (f64, f64) = (0.0, 1000.0);

pub const DAY: u32 = 1;
pub const DAY_RANGE: (f64, f64) = (1.0, 31.0);

/// Hour of day.
pub const TIME: f64 = 12.0;
pub const TIME_RANGE: (f64, f64) = (0.0, 24.0);

pub const MOISTURE_TREND: f64 = 500.0;
pub const MOISTURE_TREND_RANGE: (f64, f64) = (0.0, 1000.0);
