use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("{message}")]
    InvalidInput { message: String },

    #[error("Invalid JSON format: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("{message}")]
    Prediction { message: String },

    #[error("Failed to load model '{path}': {message}")]
    ModelLoad { path: String, message: String },

    #[error("Model '{name}' is not loaded")]
    ModelUnavailable { name: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a failure, used by the HTTP layer to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    InvalidJson,
    Prediction,
    ModelLoad,
    Config,
    Io,
}

impl PredictError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn prediction(message: impl Into<String>) -> Self {
        Self::Prediction {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::InvalidJson(_) => ErrorKind::InvalidJson,
            // An unloaded model surfaces when the request tries to use it.
            Self::Prediction { .. } | Self::ModelUnavailable { .. } => ErrorKind::Prediction,
            Self::ModelLoad { .. } => ErrorKind::ModelLoad,
            Self::Config { .. } | Self::InvalidConfigValue { .. } => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, PredictError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_json_display() {
        let err: PredictError = serde_json::from_str::<serde_json::Value>("not valid json")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::InvalidJson);
        assert!(err.to_string().starts_with("Invalid JSON format: "));
    }

    #[test]
    fn test_unavailable_model_is_a_prediction_failure() {
        let err = PredictError::ModelUnavailable {
            name: "house_price".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Prediction);
        assert_eq!(err.to_string(), "Model 'house_price' is not loaded");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PredictError = io_err.into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("IO error"));
    }
}
