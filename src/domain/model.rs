use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One request's worth of features, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub data: HashMap<String, serde_json::Value>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_object(object: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            data: object.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    #[default]
    Numeric,
    Indicator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureField {
    pub name: String,
    #[serde(default)]
    pub kind: FeatureKind,
    #[serde(default)]
    pub default: f64,
}

impl FeatureField {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Numeric,
            default: 0.0,
        }
    }
}

/// Artifacts may list a feature as a bare column name or as a full field description.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FeatureEntry {
    Name(String),
    Field(FeatureField),
}

impl From<FeatureEntry> for FeatureField {
    fn from(entry: FeatureEntry) -> Self {
        match entry {
            FeatureEntry::Name(name) => FeatureField::numeric(name),
            FeatureEntry::Field(field) => field,
        }
    }
}

/// Ordered list of the columns a predictor was trained on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub fields: Vec<FeatureField>,
}

impl FeatureSchema {
    pub fn new(fields: Vec<FeatureField>) -> Self {
        Self { fields }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: names.into_iter().map(FeatureField::numeric).collect(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A record projected onto a schema: exactly the schema's columns, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub columns: Vec<String>,
    pub values: Vec<serde_json::Value>,
}

impl AlignedRow {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&serde_json::Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }
}

/// The outcome of one endpoint call: the raw model output and its display form.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePrediction {
    pub raw: f64,
    pub formatted: String,
}
