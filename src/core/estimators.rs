//! Regressors that can be restored from a model artifact.
//!
//! Two families are supported:
//!
//! - [`LinearModel`]: `intercept + Σ coefficient[i] × x[i]`
//! - [`ForestModel`]: mean over regression trees, each stored as a flat node array
//!   with node 0 as the root and `x[feature] <= threshold` sending a sample left.

use crate::domain::ports::Predictor;
use crate::utils::error::{PredictError, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    Linear(LinearModel),
    Forest(ForestModel),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn evaluate(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForestModel {
    pub trees: Vec<RegressionTree>,
}

impl ForestModel {
    pub fn evaluate(&self, row: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.evaluate(row)).sum();
        total / self.trees.len() as f64
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl RegressionTree {
    /// Walks from the root. Terminates because `validate` guarantees children
    /// sit after their parent.
    pub fn evaluate(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= n_features {
                    return Err(format!(
                        "node {} splits on feature {} but only {} features are declared",
                        i, feature, n_features
                    ));
                }
                for child in [*left, *right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(format!("node {} has invalid child index {}", i, child));
                    }
                }
            }
        }
        Ok(())
    }
}

/// An estimator checked against the width of its declared feature schema.
#[derive(Debug, Clone)]
pub struct FittedModel {
    n_features: usize,
    estimator: Estimator,
}

impl FittedModel {
    /// Returns the reason as a plain message; the loader wraps it with the artifact path.
    pub fn new(estimator: Estimator, n_features: usize) -> std::result::Result<Self, String> {
        match &estimator {
            Estimator::Linear(model) => {
                if model.coefficients.len() != n_features {
                    return Err(format!(
                        "{} coefficients for {} declared features",
                        model.coefficients.len(),
                        n_features
                    ));
                }
            }
            Estimator::Forest(model) => {
                if model.trees.is_empty() {
                    return Err("forest has no trees".to_string());
                }
                for (i, tree) in model.trees.iter().enumerate() {
                    tree.validate(n_features)
                        .map_err(|reason| format!("tree {}: {}", i, reason))?;
                }
            }
        }

        Ok(Self {
            n_features,
            estimator,
        })
    }
}

impl Predictor for FittedModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.n_features {
            return Err(PredictError::prediction(format!(
                "X has {} features, but the model is expecting {} features as input",
                row.len(),
                self.n_features
            )));
        }

        let output = match &self.estimator {
            Estimator::Linear(model) => model.evaluate(row),
            Estimator::Forest(model) => model.evaluate(row),
        };

        if !output.is_finite() {
            return Err(PredictError::prediction(format!(
                "Model produced a non-finite output: {}",
                output
            )));
        }
        Ok(output)
    }
}
