//! Environmental readings entered by the operator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::defaults;

// ============================================================================
// Crop
// ============================================================================

/// Crop planted in the irrigated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    #[default]
    Cotton,
    Wheat,
    Rice,
    Maize,
}

impl Crop {
    /// Crops in the order the dashboard offers them.
    pub const ALL: [Self; 4] = [Self::Cotton, Self::Wheat, Self::Rice, Self::Maize];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cotton => "cotton",
            Self::Wheat => "wheat",
            Self::Rice => "rice",
            Self::Maize => "maize",
        }
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Crop {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| InputError::UnknownCrop(s.to_string()))
    }
}

// ============================================================================
// Input Errors
// ============================================================================

/// A reading field that cannot be fed to the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} = {value} is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("unknown crop '{0}' (expected one of: cotton, wheat, rice, maize)")]
    UnknownCrop(String),
}

// ============================================================================
// Input Ranges
// ============================================================================

/// Inclusive `[min, max]` bound on a numeric input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn check(&self, field: &'static str, value: f64) -> Result<f64, InputError> {
        if !value.is_finite() {
            return Err(InputError::NotFinite { field });
        }
        if !self.contains(value) {
            return Err(InputError::OutOfRange {
                field,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value)
    }
}

/// Accepted range for every numeric reading field.
///
/// Either bound may be omitted in config; it keeps the field's default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PartialInputRanges")]
pub struct InputRanges {
    pub temperature: ValueRange,
    pub soil_moisture: ValueRange,
    pub day: ValueRange,
    pub time: ValueRange,
    pub moisture_trend: ValueRange,
}

impl Default for InputRanges {
    fn default() -> Self {
        Self {
            temperature: ValueRange::new(defaults::TEMPERATURE_RANGE),
            soil_moisture: ValueRange::new(defaults::SOIL_MOISTURE_RANGE),
            day: ValueRange::new(defaults::DAY_RANGE),
            time: ValueRange::new(defaults::TIME_RANGE),
            moisture_trend: ValueRange::new(defaults::MOISTURE_TREND_RANGE),
        }
    }
}

/// A range as written in config, bounds optional.
#[derive(Debug, Default, Deserialize)]
struct PartialRange {
    min: Option<f64>,
    max: Option<f64>,
}

impl PartialRange {
    fn or(self, base: ValueRange) -> ValueRange {
        ValueRange {
            min: self.min.unwrap_or(base.min),
            max: self.max.unwrap_or(base.max),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialInputRanges {
    temperature: PartialRange,
    soil_moisture: PartialRange,
    day: PartialRange,
    time: PartialRange,
    moisture_trend: PartialRange,
}

impl From<PartialInputRanges> for InputRanges {
    fn from(partial: PartialInputRanges) -> Self {
        let base = Self::default();
        Self {
            temperature: partial.temperature.or(base.temperature),
            soil_moisture: partial.soil_moisture.or(base.soil_moisture),
            day: partial.day.or(base.day),
            time: partial.time.or(base.time),
            moisture_trend: partial.moisture_trend.or(base.moisture_trend),
        }
    }
}

impl InputRanges {
    /// `(name, range)` pairs in form order.
    pub fn named(&self) -> [(&'static str, ValueRange); 5] {
        [
            ("temperature", self.temperature),
            ("soil_moisture", self.soil_moisture),
            ("day", self.day),
            ("time", self.time),
            ("moisture_trend", self.moisture_trend),
        ]
    }
}

// ============================================================================
// Reading
// ============================================================================

/// One validated set of environmental readings.
///
/// Only constructed through [`ReadingInput::validate`], so every field is
/// finite and inside the configured [`InputRanges`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    temperature: f64,
    soil_moisture: f64,
    day: u32,
    time: f64,
    moisture_trend: f64,
    crop: Crop,
}

impl Reading {
    /// Temperature in °C.
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    pub const fn soil_moisture(&self) -> f64 {
        self.soil_moisture
    }

    /// Day number within the month.
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Hour of day.
    pub const fn time(&self) -> f64 {
        self.time
    }

    pub const fn moisture_trend(&self) -> f64 {
        self.moisture_trend
    }

    pub const fn crop(&self) -> Crop {
        self.crop
    }
}

/// Raw, possibly partial reading as it arrives from a form, query string,
/// JSON body or the command line. Missing fields take the dashboard defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingInput {
    pub temperature: Option<f64>,
    pub soil_moisture: Option<f64>,
    pub day: Option<u32>,
    pub time: Option<f64>,
    pub moisture_trend: Option<f64>,
    pub crop: Option<String>,
}

impl ReadingInput {
    /// Fill defaults and check every field against `ranges`.
    pub fn validate(&self, ranges: &InputRanges) -> Result<Reading, InputError> {
        let temperature = ranges
            .temperature
            .check("temperature", self.temperature.unwrap_or(defaults::TEMPERATURE))?;
        let soil_moisture = ranges
            .soil_moisture
            .check("soil_moisture", self.soil_moisture.unwrap_or(defaults::SOIL_MOISTURE))?;
        let day = self.day.unwrap_or(defaults::DAY);
        ranges.day.check("day", f64::from(day))?;
        let time = ranges.time.check("time", self.time.unwrap_or(defaults::TIME))?;
        let moisture_trend = ranges.moisture_trend.check(
            "moisture_trend",
            self.moisture_trend.unwrap_or(defaults::MOISTURE_TREND),
        )?;
        let crop = match self.crop.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => Crop::default(),
        };

        Ok(Reading {
            temperature,
            soil_moisture,
            day,
            time,
            moisture_trend,
            crop,
        })
    }
}

impl From<&Reading> for ReadingInput {
    fn from(r: &Reading) -> Self {
        Self {
            temperature: Some(r.temperature),
            soil_moisture: Some(r.soil_moisture),
            day: Some(r.day),
            time: Some(r.time),
            moisture_trend: Some(r.moisture_trend),
            crop: Some(r.crop.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_uses_dashboard_defaults() {
        let reading = ReadingInput::default()
            .validate(&InputRanges::default())
            .unwrap();
        assert_eq!(reading.temperature(), 28.0);
        assert_eq!(reading.soil_moisture(), 400.0);
        assert_eq!(reading.day(), 1);
        assert_eq!(reading.time(), 12.0);
        assert_eq!(reading.moisture_trend(), 500.0);
        assert_eq!(reading.crop(), Crop::Cotton);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let input = ReadingInput {
            temperature: Some(50.0),
            soil_moisture: Some(0.0),
            day: Some(31),
            time: Some(24.0),
            moisture_trend: Some(1000.0),
            crop: Some("maize".to_string()),
        };
        assert!(input.validate(&InputRanges::default()).is_ok());
    }

    #[test]
    fn test_out_of_range_temperature_rejected() {
        let input = ReadingInput {
            temperature: Some(50.5),
            ..Default::default()
        };
        let err = input.validate(&InputRanges::default()).unwrap_err();
        assert!(matches!(
            err,
            InputError::OutOfRange { field: "temperature", .. }
        ));
    }

    #[test]
    fn test_day_zero_rejected() {
        let input = ReadingInput {
            day: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            input.validate(&InputRanges::default()),
            Err(InputError::OutOfRange { field: "day", .. })
        ));
    }

    #[test]
    fn test_nan_rejected_as_not_finite() {
        let input = ReadingInput {
            soil_moisture: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(
            input.validate(&InputRanges::default()),
            Err(InputError::NotFinite { field: "soil_moisture" })
        );
    }

    #[test]
    fn test_single_bound_keeps_field_default() {
        let ranges: InputRanges = toml::from_str("[temperature]\nmin = 5.0\n\n[day]\nmax = 28.0\n").unwrap();
        assert_eq!(ranges.temperature, ValueRange { min: 5.0, max: 50.0 });
        assert_eq!(ranges.day, ValueRange { min: 1.0, max: 28.0 });
        assert_eq!(ranges.soil_moisture, InputRanges::default().soil_moisture);
    }

    #[test]
    fn test_crop_parse_is_case_insensitive() {
        assert_eq!(" Rice ".parse::<Crop>().unwrap(), Crop::Rice);
        assert_eq!("WHEAT".parse::<Crop>().unwrap(), Crop::Wheat);
        assert!(matches!(
            "barley".parse::<Crop>(),
            Err(InputError::UnknownCrop(_))
        ));
    }

    #[test]
    fn test_blank_crop_falls_back_to_cotton() {
        let input = ReadingInput {
            crop: Some("  ".to_string()),
            ..Default::default()
        };
        let reading = input.validate(&InputRanges::default()).unwrap();
        assert_eq!(reading.crop(), Crop::Cotton);
    }

    #[test]
    fn test_reading_roundtrips_through_input() {
        let input = ReadingInput {
            temperature: Some(35.0),
            soil_moisture: Some(300.0),
            day: Some(12),
            time: Some(6.5),
            moisture_trend: Some(250.0),
            crop: Some("rice".to_string()),
        };
        let reading = input.validate(&InputRanges::default()).unwrap();
        assert_eq!(ReadingInput::from(&reading), input);
    }
}
