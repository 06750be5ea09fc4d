//! Config Validation Tests
//!
//! Typo detection and range validation exercised through the public config
//! API, independently from the server and artifacts.

use irrigation_advisor::config::validation::{
    known_config_keys, suggest_correction, validate_ranges, validate_unknown_keys,
};
use irrigation_advisor::config::{AdvisorConfig, ConfigError};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_rule_threshold_warns_with_suggestion() {
    let toml_str = r#"
[rules]
moisture_hihg_min = 650.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("moisture_hihg_min"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("rules.moisture_high_min"),
        "Should suggest the correct spelling"
    );
}

#[test]
fn typo_in_section_name_warns() {
    let toml_str = r#"
[artefacts]
model = "m.json"
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.iter().any(|w| w.field == "artefacts"
        && w.suggestion.as_deref() == Some("artifacts")));
}

#[test]
fn wildly_wrong_key_has_no_suggestion() {
    let warnings = validate_unknown_keys("completely_unrelated_setting = 1\n");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].suggestion.is_none());
}

#[test]
fn sample_config_has_no_unknown_keys() {
    let raw = std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/irrigation.toml")).unwrap();
    assert!(validate_unknown_keys(&raw).is_empty());
    let config = AdvisorConfig::from_toml_str(&raw).unwrap();
    assert_eq!(config, AdvisorConfig::default());
}

#[test]
fn every_serialized_key_is_known() {
    let raw = AdvisorConfig::default().to_toml().unwrap();
    let warnings = validate_unknown_keys(&raw);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    assert!(known_config_keys().contains("inputs.moisture_trend.max"));
}

#[test]
fn suggestion_prefers_closest_key() {
    let known = known_config_keys();
    assert_eq!(
        suggest_correction("server.adr", &known).as_deref(),
        Some("server.addr")
    );
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn default_config_is_valid() {
    let (errors, warnings) = validate_ranges(&AdvisorConfig::default());
    assert!(errors.is_empty(), "{errors:?}");
    assert!(warnings.is_empty());
}

#[test]
fn overlapping_rules_are_rejected() {
    let toml_str = r#"
[rules]
moisture_high_min = 300.0
dry_moisture_max = 350.0
"#;
    match AdvisorConfig::from_toml_str(toml_str) {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.contains("dry_moisture_max")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn inverted_range_and_bad_day_are_all_reported() {
    let toml_str = r#"
[inputs]
temperature = { min = 50.0, max = 0.0 }
day = { min = 0.0, max = 40.0 }
"#;
    match AdvisorConfig::from_toml_str(toml_str) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 2, "{errors:?}");
            assert!(errors.iter().any(|e| e.starts_with("inputs.temperature")));
            assert!(errors.iter().any(|e| e.starts_with("inputs.day")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn threshold_outside_input_range_only_warns() {
    let mut config = AdvisorConfig::default();
    config.rules.hot_temperature_min = 55.0;
    let (errors, warnings) = validate_ranges(&config);
    assert!(errors.is_empty());
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field, "rules.hot_temperature_min");
}

#[test]
fn partial_config_keeps_other_defaults() {
    let config = AdvisorConfig::from_toml_str("[rules]\nhot_temperature_min = 32.5\n").unwrap();
    assert!((config.rules.hot_temperature_min - 32.5).abs() < f64::EPSILON);
    assert!((config.rules.moisture_high_min - 600.0).abs() < f64::EPSILON);
    assert_eq!(config.server.addr, "0.0.0.0:8080");
}

#[test]
fn malformed_file_is_parse_error_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[rules\nmoisture_high_min = ").unwrap();
    let err = AdvisorConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AdvisorConfig::load_from_file(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn single_range_bound_keeps_rest_of_file() {
    let toml_str = r#"
[artifacts]
model = "/srv/models/pump.json"

[inputs.temperature]
min = 5.0
"#;
    assert!(validate_unknown_keys(toml_str).is_empty());
    let config = AdvisorConfig::from_toml_str(toml_str).unwrap();
    assert!((config.inputs.temperature.min - 5.0).abs() < f64::EPSILON);
    assert!((config.inputs.temperature.max - 50.0).abs() < f64::EPSILON);
    assert_eq!(
        config.artifacts.model,
        std::path::PathBuf::from("/srv/models/pump.json")
    );
}
