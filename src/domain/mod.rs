// Domain layer: feature records, schemas and the predictor port. No HTTP or filesystem here.

pub mod model;
pub mod ports;
