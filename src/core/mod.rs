pub mod aligner;
pub mod context;
pub mod currency;
pub mod estimators;
pub mod loader;
pub mod normalizer;
pub mod pipeline;

pub use crate::domain::model::{AlignedRow, FeatureField, FeatureRecord, FeatureSchema, PricePrediction};
pub use crate::domain::ports::Predictor;
pub use crate::utils::error::Result;
