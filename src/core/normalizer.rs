use crate::core::{FeatureRecord, FeatureSchema};
use crate::domain::model::FeatureKind;
use serde_json::Value;

pub const DEFAULT_INDICATOR_PREFIXES: &[&str] = &["LOCATION_"];

/// Coerces one-hot indicator columns to booleans. The house model was fit on boolean
/// location dummies while clients send them as 0/1.
#[derive(Debug, Clone)]
pub struct CategoricalNormalizer {
    prefixes: Vec<String>,
}

impl CategoricalNormalizer {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_indicator(&self, column: &str) -> bool {
        self.prefixes.iter().any(|p| column.starts_with(p.as_str()))
    }

    /// A column is an indicator when it matches a configured prefix or the model
    /// schema declares it with `kind = "indicator"`.
    pub fn is_indicator_in(&self, column: &str, schema: &FeatureSchema) -> bool {
        self.is_indicator(column)
            || schema
                .fields
                .iter()
                .any(|f| f.kind == FeatureKind::Indicator && f.name == column)
    }

    /// Only touches columns present in the record; absent indicators are left to the aligner.
    pub fn normalize(&self, mut record: FeatureRecord, schema: &FeatureSchema) -> FeatureRecord {
        for (column, value) in record.data.iter_mut() {
            if self.is_indicator_in(column, schema) {
                *value = Value::Bool(equals_one(value));
            }
        }
        record
    }
}

impl Default for CategoricalNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_INDICATOR_PREFIXES.iter().copied())
    }
}

// Numeric equality: 1, 1.0 and true match; strings never do.
fn equals_one(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::Bool(b) => *b,
        _ => false,
    }
}
