use crate::core::aligner;
use crate::core::estimators::{Estimator, FittedModel};
use crate::core::{AlignedRow, FeatureSchema};
use crate::domain::model::{FeatureField, FeatureEntry};
use crate::domain::ports::Predictor;
use crate::utils::error::{PredictError, Result};
use crate::utils::validation::validate_file_extension;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// On-disk model format: the ordered feature schema plus the fitted estimator.
#[derive(Debug, Deserialize)]
pub struct ModelArtifact {
    pub features: Vec<FeatureEntry>,
    #[serde(flatten)]
    pub estimator: Estimator,
}

impl ModelArtifact {
    /// Validates the artifact and splits it into schema and predictor.
    pub fn into_parts(self) -> std::result::Result<(FeatureSchema, FittedModel), String> {
        let fields: Vec<FeatureField> = self.features.into_iter().map(Into::into).collect();

        {
            let mut seen = HashSet::new();
            for field in &fields {
                if field.name.is_empty() {
                    return Err("feature names cannot be empty".to_string());
                }
                if !seen.insert(field.name.as_str()) {
                    return Err(format!("duplicate feature name '{}'", field.name));
                }
                if !field.default.is_finite() {
                    return Err(format!("feature '{}' has a non-finite default", field.name));
                }
            }
        }

        let model = FittedModel::new(self.estimator, fields.len())?;
        Ok((FeatureSchema::new(fields), model))
    }
}

/// Reads and validates one artifact. Every failure is reported as `ModelLoad`.
pub fn load_artifact<P: AsRef<Path>>(path: P) -> Result<(FeatureSchema, FittedModel)> {
    let path_ref = path.as_ref();
    let load_error = |message: String| PredictError::ModelLoad {
        path: path_ref.display().to_string(),
        message,
    };

    let content = std::fs::read_to_string(path_ref).map_err(|e| load_error(e.to_string()))?;
    let artifact: ModelArtifact =
        serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?;
    artifact.into_parts().map_err(load_error)
}

/// A named predictor slot. A slot whose artifact failed to load keeps an empty schema
/// and rejects every invocation.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    name: String,
    schema: FeatureSchema,
    predictor: Option<Arc<dyn Predictor>>,
    load_error: Option<String>,
}

impl ModelHandle {
    /// Never fails: a broken artifact is logged and yields a degraded handle.
    pub fn load<P: AsRef<Path>>(name: &str, path: P) -> Self {
        let path = path.as_ref();
        if let Err(e) = validate_file_extension(name, &path.to_string_lossy(), &["json"]) {
            tracing::warn!("⚠️ {}", e);
        }

        match load_artifact(path) {
            Ok((schema, model)) => {
                tracing::info!(
                    "✅ Loaded model '{}' from {} ({} features)",
                    name,
                    path.display(),
                    schema.len()
                );
                Self::from_parts(name, schema, Arc::new(model))
            }
            Err(e) => {
                tracing::error!("❌ {}", e);
                tracing::warn!("Model '{}' will reject predictions until restart", name);
                Self::unavailable(name, e.to_string())
            }
        }
    }

    pub fn from_parts(name: &str, schema: FeatureSchema, predictor: Arc<dyn Predictor>) -> Self {
        Self {
            name: name.to_string(),
            schema,
            predictor: Some(predictor),
            load_error: None,
        }
    }

    pub fn unavailable(name: &str, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            schema: FeatureSchema::default(),
            predictor: None,
            load_error: Some(reason.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn is_loaded(&self) -> bool {
        self.predictor.is_some()
    }

    /// Width the loaded predictor expects; `None` when the artifact failed to load.
    pub fn n_features(&self) -> Option<usize> {
        self.predictor.as_ref().map(|p| p.n_features())
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn predict(&self, row: &AlignedRow) -> Result<f64> {
        let predictor = self
            .predictor
            .as_ref()
            .ok_or_else(|| PredictError::ModelUnavailable {
                name: self.name.clone(),
            })?;

        let values = aligner::to_numeric(row)?;
        predictor.predict(&values)
    }
}
