//! Reading -> encoded record -> schema-aligned, scaled feature vector.

use std::sync::Arc;

use super::{crop_column, FeatureSchema, FeatureVector, Scaler};
use crate::types::{Crop, Reading};

/// Crop categories as seen at training time (sorted). The first entry is the
/// dropped baseline and never gets a column.
pub const CROP_CATEGORIES: [Crop; 4] = [Crop::Cotton, Crop::Maize, Crop::Rice, Crop::Wheat];

/// The implicit all-zeros crop.
pub const BASELINE_CROP: Crop = CROP_CATEGORIES[0];

/// Flatten a reading into named columns: the five numeric fields followed by
/// one binary column per non-baseline crop.
pub fn encode_reading(reading: &Reading) -> Vec<(String, f64)> {
    let mut record = vec![
        ("temperature".to_string(), reading.temperature()),
        ("soil_moisture".to_string(), reading.soil_moisture()),
        ("days".to_string(), f64::from(reading.day())),
        ("time".to_string(), reading.time()),
        ("moisture_trend".to_string(), reading.moisture_trend()),
    ];
    record.extend(
        CROP_CATEGORIES[1..]
            .iter()
            .map(|&crop| (crop_column(crop), if crop == reading.crop() { 1.0 } else { 0.0 })),
    );
    record
}

/// Project an encoded record onto `schema`.
///
/// Schema columns missing from the record are zero; record columns missing
/// from the schema are dropped. The result always has exactly the schema's
/// columns in the schema's order.
pub fn align_to_schema(record: &[(String, f64)], schema: &Arc<FeatureSchema>) -> FeatureVector {
    let mut features = FeatureVector::zeros(Arc::clone(schema));
    for (name, value) in record {
        if let Some(pos) = schema.position(name) {
            features.set(pos, *value);
        }
    }
    features
}

/// Full preparation: encode, align, scale.
pub fn build_features(reading: &Reading, schema: &Arc<FeatureSchema>, scaler: &Scaler) -> FeatureVector {
    let record = encode_reading(reading);
    let mut features = align_to_schema(&record, schema);
    scaler.transform(&mut features);
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::NUMERIC_COLUMNS;
    use crate::types::{InputRanges, ReadingInput};

    fn reading(crop: Crop) -> Reading {
        ReadingInput {
            temperature: Some(30.0),
            soil_moisture: Some(420.0),
            day: Some(3),
            time: Some(14.0),
            moisture_trend: Some(510.0),
            crop: Some(crop.to_string()),
        }
        .validate(&InputRanges::default())
        .unwrap()
    }

    fn schema(text: &str) -> Arc<FeatureSchema> {
        Arc::new(FeatureSchema::parse(text).unwrap())
    }

    fn identity_scaler() -> Scaler {
        Scaler::Standard {
            columns: NUMERIC_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            mean: vec![0.0; 5],
            scale: vec![1.0; 5],
        }
    }

    #[test]
    fn test_baseline_crop_has_no_column() {
        let record = encode_reading(&reading(Crop::Cotton));
        assert!(record.iter().all(|(name, _)| name != "crop_cotton"));
        assert!(record
            .iter()
            .filter(|(name, _)| name.starts_with("crop_"))
            .all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn test_selected_crop_is_hot() {
        let record = encode_reading(&reading(Crop::Rice));
        let hot: Vec<&str> = record
            .iter()
            .filter(|(_, v)| *v == 1.0)
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(hot, vec!["crop_rice"]);
    }

    #[test]
    fn test_alignment_matches_schema_for_every_crop() {
        let schema = schema("crop_wheat\ntime\ntemperature\nextra_flag\nsoil_moisture\ncrop_maize\ndays\nmoisture_trend\n");
        for crop in Crop::ALL {
            let features = align_to_schema(&encode_reading(&reading(crop)), &schema);
            let names: Vec<&str> = features.iter().map(|(n, _)| n).collect();
            let expected: Vec<&str> = schema.columns().iter().map(String::as_str).collect();
            assert_eq!(names, expected, "column order drifted for {crop}");
            assert_eq!(features.get("extra_flag"), Some(0.0));
        }
    }

    #[test]
    fn test_encoded_columns_outside_schema_are_dropped() {
        let schema = schema("temperature\nsoil_moisture\ndays\ntime\nmoisture_trend\n");
        let features = align_to_schema(&encode_reading(&reading(Crop::Rice)), &schema);
        assert_eq!(features.len(), 5);
        assert_eq!(features.get("crop_rice"), None);
        assert_eq!(features.get("days"), Some(3.0));
    }

    #[test]
    fn test_scaling_leaves_one_hot_columns_alone() {
        let schema = schema("temperature\nsoil_moisture\ndays\ntime\nmoisture_trend\ncrop_maize\ncrop_rice\ncrop_wheat\n");
        let scaler = Scaler::Standard {
            columns: NUMERIC_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            mean: vec![10.0; 5],
            scale: vec![2.0; 5],
        };
        let features = build_features(&reading(Crop::Wheat), &schema, &scaler);
        assert_eq!(features.get("temperature"), Some(10.0));
        assert_eq!(features.get("crop_wheat"), Some(1.0));
        assert_eq!(features.get("crop_rice"), Some(0.0));
    }

    #[test]
    fn test_identity_scaler_preserves_raw_values() {
        let schema = schema("temperature\nsoil_moisture\ndays\ntime\nmoisture_trend\n");
        let features = build_features(&reading(Crop::Maize), &schema, &identity_scaler());
        assert_eq!(features.values(), &[30.0, 420.0, 3.0, 14.0, 510.0]);
    }
}
