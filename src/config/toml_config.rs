use crate::core::currency::DEFAULT_CURRENCY_SYMBOL;
use crate::core::normalizer::DEFAULT_INDICATOR_PREFIXES;
use crate::utils::error::{PredictError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "onsite-predict.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub models: ModelPaths,
    pub features: FeatureConfig,
    pub currency: CurrencyConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPaths {
    pub house_price: String,
    pub labor_cost: String,
    pub material_cost: String,
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self {
            house_price: "house_price_model.json".to_string(),
            labor_cost: "labor_cost_model.json".to_string(),
            material_cost: "material_cost_model.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub indicator_prefixes: Vec<String>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            indicator_prefixes: DEFAULT_INDICATOR_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    pub symbol: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads `path` if given. Without an explicit path the default file is read when
    /// present, otherwise built-in defaults apply.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PredictError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PredictError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PredictError::Config {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_range("server.port", self.server.port, 1, u16::MAX)?;

        for (field, path) in [
            ("models.house_price", &self.models.house_price),
            ("models.labor_cost", &self.models.labor_cost),
            ("models.material_cost", &self.models.material_cost),
        ] {
            validation::validate_path(field, path)?;
        }

        for prefix in &self.features.indicator_prefixes {
            validation::validate_non_empty_string("features.indicator_prefixes", prefix)?;
        }

        validation::validate_non_empty_string("currency.symbol", &self.currency.symbol)?;

        let levels = ["trace", "debug", "info", "warn", "error"];
        if !levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(PredictError::InvalidConfigValue {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: format!("Unsupported level. Valid levels: {}", levels.join(", ")),
            });
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_legacy_deployment() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.models.house_price, "house_price_model.json");
        assert_eq!(config.features.indicator_prefixes, vec!["LOCATION_"]);
        assert_eq!(config.currency.symbol, "₹");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[server]
port = 8080

[models]
house_price = "models/house.json"

[features]
indicator_prefixes = ["LOCATION_", "FACING_"]
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.models.house_price, "models/house.json");
        assert_eq!(config.models.labor_cost, "labor_cost_model.json");
        assert_eq!(config.features.indicator_prefixes.len(), 2);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ONSITE_TEST_MODEL_DIR", "/srv/models");

        let toml_content = r#"
[models]
material_cost = "${ONSITE_TEST_MODEL_DIR}/material.json"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.models.material_cost, "/srv/models/material.json");

        std::env::remove_var("ONSITE_TEST_MODEL_DIR");
    }

    #[test]
    fn test_foreign_model_extension_is_left_to_the_loader() {
        let config = AppConfig::from_toml_str(
            r#"
[models]
house_price = "house_price_model.pkl"
"#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::from_toml_str(
            r#"
[models]
labor_cost = ""
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str(
            r#"
[server]
port = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str(
            r#"
[logging]
level = "loud"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[server\nport = ").unwrap_err();
        assert!(err.to_string().contains("TOML parsing error"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[currency]\nsymbol = \"Rs. \"\n")
            .unwrap();

        let config = AppConfig::load(temp_file.path().to_str()).unwrap();
        assert_eq!(config.currency.symbol, "Rs. ");
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        assert!(AppConfig::load(Some("/nonexistent/onsite-predict.toml")).is_err());
    }
}
