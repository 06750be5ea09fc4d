//! Checks on a loaded [`AdvisorConfig`].
//!
//! Unknown keys are found by flattening the raw TOML into dotted paths and
//! comparing against [`known_config_keys`]; each miss becomes a warning with
//! the nearest known key, if one is close. Range checks run on the typed
//! config and collect every error before reporting.

use std::collections::HashSet;
use std::fmt;

use super::AdvisorConfig;
use crate::types::ValueRange;

/// Config problem that does not stop startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Dotted key path, e.g. `rules.moisture_high_min`
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.suggestion {
            Some(s) => write!(f, "{} (did you mean '{s}'?)", self.message),
            None => f.write_str(&self.message),
        }
    }
}

// ============================================================================
// Key Paths
// ============================================================================

const RANGE_SECTIONS: [&str; 5] = ["temperature", "soil_moisture", "day", "time", "moisture_trend"];

/// Every dotted path `AdvisorConfig` accepts, sections included.
///
/// Keep in sync with the config structs.
pub fn known_config_keys() -> HashSet<String> {
    let fixed = [
        "server",
        "server.addr",
        "server.cors_origins",
        "artifacts",
        "artifacts.model",
        "artifacts.scaler",
        "artifacts.schema",
        "rules",
        "rules.moisture_high_min",
        "rules.dry_moisture_max",
        "rules.hot_temperature_min",
        "inputs",
    ];
    let ranges = RANGE_SECTIONS.iter().flat_map(|section| {
        [
            format!("inputs.{section}"),
            format!("inputs.{section}.min"),
            format!("inputs.{section}.max"),
        ]
    });
    fixed.iter().map(|k| (*k).to_string()).chain(ranges).collect()
}

/// Flatten a TOML document into dotted key paths, tables before their keys.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let Some(table) = value.as_table() else {
        return Vec::new();
    };
    table
        .iter()
        .flat_map(|(key, child)| {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            let nested = walk_toml_keys(child, &path);
            std::iter::once(path).chain(nested)
        })
        .collect()
}

// ============================================================================
// Suggestions
// ============================================================================

/// Edit distance (insert, delete, substitute) over chars, one DP row.
fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Nearest known key within [`MAX_SUGGESTION_DISTANCE`] edits.
///
/// Ties resolve to the alphabetically first key.
pub fn suggest_correction(unknown: &str, known: &HashSet<String>) -> Option<String> {
    known
        .iter()
        .map(|k| (levenshtein(unknown, k), k))
        .filter(|(dist, _)| *dist <= MAX_SUGGESTION_DISTANCE)
        .min()
        .map(|(_, k)| k.clone())
}

/// Warnings for every key in `raw_toml` the config does not know.
///
/// Unparseable TOML yields no warnings; the typed parse reports it.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

fn check_range(name: &str, range: ValueRange, errors: &mut Vec<String>) {
    // NaN/Inf comparisons silently pass, catch them explicitly
    if !range.min.is_finite() || !range.max.is_finite() {
        errors.push(format!(
            "inputs.{name}: bounds must be finite (got min={}, max={})",
            range.min, range.max
        ));
        return;
    }
    if range.min > range.max {
        errors.push(format!(
            "inputs.{name}: min ({}) must be <= max ({})",
            range.min, range.max
        ));
    }
}

/// Validate rules and input ranges on a parsed config.
///
/// Returns (errors, warnings): errors must prevent startup; warnings are
/// suspicious but not fatal.
pub fn validate_ranges(config: &AdvisorConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if config.server.addr.trim().is_empty() {
        errors.push("server.addr must not be empty".to_string());
    }

    for (name, range) in config.inputs.named() {
        check_range(name, range, &mut errors);
    }
    let day = config.inputs.day;
    if day.min < 1.0 || day.max > 31.0 {
        errors.push(format!(
            "inputs.day = [{}, {}] must stay within day numbers 1-31",
            day.min, day.max
        ));
    }

    let r = &config.rules;
    let values = [
        ("moisture_high_min", r.moisture_high_min),
        ("dry_moisture_max", r.dry_moisture_max),
        ("hot_temperature_min", r.hot_temperature_min),
    ];
    let non_finite: Vec<&str> = values
        .iter()
        .filter(|(_, v)| !v.is_finite())
        .map(|(n, _)| *n)
        .collect();
    if non_finite.is_empty() {
        // Keeps the two rules mutually exclusive.
        if r.dry_moisture_max >= r.moisture_high_min {
            errors.push(format!(
                "rules.dry_moisture_max ({}) must be < rules.moisture_high_min ({})",
                r.dry_moisture_max, r.moisture_high_min
            ));
        }
    } else {
        for name in non_finite {
            errors.push(format!("rules.{name} must be a finite number"));
        }
    }

    let soil = config.inputs.soil_moisture;
    if r.moisture_high_min.is_finite() && !soil.contains(r.moisture_high_min) {
        warnings.push(ValidationWarning {
            field: "rules.moisture_high_min".to_string(),
            message: format!(
                "rules.moisture_high_min = {} is outside inputs.soil_moisture [{}, {}]",
                r.moisture_high_min, soil.min, soil.max
            ),
            suggestion: None,
        });
    }
    let temp = config.inputs.temperature;
    if r.hot_temperature_min.is_finite() && !temp.contains(r.hot_temperature_min) {
        warnings.push(ValidationWarning {
            field: "rules.hot_temperature_min".to_string(),
            message: format!(
                "rules.hot_temperature_min = {} is outside inputs.temperature [{}, {}]",
                r.hot_temperature_min, temp.min, temp.max
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
