use crate::core::{AlignedRow, FeatureField, FeatureRecord, FeatureSchema};
use crate::utils::error::{PredictError, Result};
use serde_json::Value;

/// Expected columns that the record does not carry, in schema order.
pub fn missing_features<'a>(record: &FeatureRecord, schema: &'a FeatureSchema) -> Vec<&'a str> {
    schema
        .names()
        .filter(|name| !record.data.contains_key(*name))
        .collect()
}

/// Pads `record` with the schema defaults and projects it onto exactly the schema's
/// columns. Unknown keys are dropped.
pub fn align(record: &FeatureRecord, schema: &FeatureSchema) -> AlignedRow {
    let missing = missing_features(record, schema);
    if !missing.is_empty() {
        tracing::debug!("Zero-filling {} missing features: {:?}", missing.len(), missing);
    }

    let mut columns = Vec::with_capacity(schema.len());
    let mut values = Vec::with_capacity(schema.len());

    for field in &schema.fields {
        let value = record
            .get(&field.name)
            .cloned()
            .unwrap_or_else(|| default_value(field));
        columns.push(field.name.clone());
        values.push(value);
    }

    AlignedRow { columns, values }
}

fn default_value(field: &FeatureField) -> Value {
    if field.default == 0.0 {
        return Value::from(0);
    }
    serde_json::Number::from_f64(field.default)
        .map(Value::Number)
        .unwrap_or_else(|| Value::from(0))
}

/// Converts an aligned row into the numeric vector a predictor consumes.
///
/// Booleans become 1/0 and numeric strings are parsed; nulls and anything
/// non-scalar are rejected.
pub fn to_numeric(row: &AlignedRow) -> Result<Vec<f64>> {
    row.columns
        .iter()
        .zip(&row.values)
        .map(|(column, value)| cell_to_f64(column, value))
        .collect()
}

fn cell_to_f64(column: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| PredictError::prediction(format!("Column '{}' is not a finite number", column))),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => {
            let parsed = s.trim().parse::<f64>().map_err(|_| {
                PredictError::prediction(format!("could not convert string to float: '{}'", s))
            })?;
            if !parsed.is_finite() {
                return Err(PredictError::prediction(format!(
                    "Input contains NaN or infinity (column '{}')",
                    column
                )));
            }
            Ok(parsed)
        }
        Value::Null => Err(PredictError::prediction(format!(
            "Input contains NaN (column '{}')",
            column
        ))),
        Value::Array(_) | Value::Object(_) => Err(PredictError::prediction(format!(
            "Column '{}' must be a scalar value",
            column
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FeatureKind;
    use serde_json::json;

    fn house_schema() -> FeatureSchema {
        FeatureSchema::from_names([
            "LAND AREA",
            "ROAD ACCESS",
            "CARS",
            "BIKES",
            "LOCATION_XYZ",
            "LOCATION_ABC",
            "LOCATION_DEF",
            "FACING_East",
            "FACING_North",
            "FACING_West",
        ])
    }

    fn record(value: Value) -> FeatureRecord {
        match value {
            Value::Object(map) => FeatureRecord::from_object(map),
            _ => panic!("test records must be objects"),
        }
    }

    #[test]
    fn test_align_fills_missing_with_zero_in_schema_order() {
        let schema = house_schema();
        let input = record(json!({"CARS": 2, "LAND AREA": 4.5}));

        let row = align(&input, &schema);

        let expected: Vec<&str> = schema.names().collect();
        assert_eq!(row.columns, expected);
        assert_eq!(row.get("LAND AREA"), Some(&json!(4.5)));
        assert_eq!(row.get("CARS"), Some(&json!(2)));
        for column in ["ROAD ACCESS", "BIKES", "LOCATION_XYZ", "FACING_West"] {
            assert_eq!(row.get(column).and_then(Value::as_f64), Some(0.0), "{column}");
        }
    }

    #[test]
    fn test_align_drops_unknown_keys() {
        let schema = house_schema();
        let input = record(json!({"CARS": 1, "SWIMMING POOL": 1, "body_extra": "x"}));

        let row = align(&input, &schema);

        assert_eq!(row.len(), schema.len());
        assert!(row.get("SWIMMING POOL").is_none());
        assert!(row.get("body_extra").is_none());
    }

    #[test]
    fn test_align_every_subset_yields_full_row() {
        let schema = house_schema();
        let names: Vec<&str> = schema.names().collect();

        for mask in [0usize, 1, 0b1010101010, 0b1111111111, 0b0000011111] {
            let mut input = FeatureRecord::new();
            for (i, name) in names.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    input.insert(*name, json!(i + 1));
                }
            }

            let row = align(&input, &schema);
            assert_eq!(row.columns, names);
            for (i, value) in row.values.iter().enumerate() {
                let expected = if mask & (1 << i) != 0 { (i + 1) as f64 } else { 0.0 };
                assert_eq!(value.as_f64(), Some(expected));
            }
        }
    }

    #[test]
    fn test_align_empty_schema_gives_empty_row() {
        let row = align(&record(json!({"CARS": 3})), &FeatureSchema::default());
        assert!(row.is_empty());
    }

    #[test]
    fn test_align_uses_field_default() {
        let schema = FeatureSchema::new(vec![FeatureField {
            name: "FLOORS".to_string(),
            kind: FeatureKind::Numeric,
            default: 1.5,
        }]);
        let row = align(&FeatureRecord::new(), &schema);
        assert_eq!(row.values, vec![json!(1.5)]);
    }

    #[test]
    fn test_missing_features_lists_in_order() {
        let schema = FeatureSchema::from_names(["A", "B", "C"]);
        let input = record(json!({"B": 1}));
        assert_eq!(missing_features(&input, &schema), vec!["A", "C"]);
    }

    #[test]
    fn test_to_numeric_conversions() {
        let row = AlignedRow {
            columns: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            values: vec![json!(2.5), json!(true), json!(" 7 "), json!(false)],
        };
        assert_eq!(to_numeric(&row).unwrap(), vec![2.5, 1.0, 7.0, 0.0]);
    }

    #[test]
    fn test_to_numeric_rejects_text_and_null() {
        let text = AlignedRow {
            columns: vec!["a".into()],
            values: vec![json!("north")],
        };
        let err = to_numeric(&text).unwrap_err();
        assert!(err.to_string().contains("could not convert string to float"));

        let null = AlignedRow {
            columns: vec!["a".into()],
            values: vec![Value::Null],
        };
        assert!(to_numeric(&null).unwrap_err().to_string().contains("NaN"));
    }

    #[test]
    fn test_to_numeric_rejects_non_finite_strings() {
        for text in ["NaN", "inf", "-inf", "infinity"] {
            let row = AlignedRow {
                columns: vec!["AREA".into()],
                values: vec![json!(text)],
            };
            let err = to_numeric(&row).unwrap_err();
            assert_eq!(err.kind(), crate::utils::error::ErrorKind::Prediction, "{text}");
            assert!(err.to_string().contains("NaN or infinity"), "{text}");
        }
    }
}
