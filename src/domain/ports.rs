use crate::utils::error::Result;

/// A trained regressor. Rows arrive already aligned to the predictor's schema and
/// converted to numbers.
pub trait Predictor: Send + Sync + std::fmt::Debug {
    /// Number of columns the model was fit on.
    fn n_features(&self) -> usize;

    fn predict(&self, row: &[f64]) -> Result<f64>;
}
