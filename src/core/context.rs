use crate::config::AppConfig;
use crate::core::currency::CurrencyFormatter;
use crate::core::loader::ModelHandle;
use crate::core::normalizer::CategoricalNormalizer;
use crate::core::FeatureSchema;
use chrono::{DateTime, Utc};

pub const HOUSE_PRICE_MODEL: &str = "house_price";
pub const LABOR_COST_MODEL: &str = "labor_cost";
pub const MATERIAL_COST_MODEL: &str = "material_cost";

/// Everything a request needs, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    pub house_price: ModelHandle,
    pub labor_cost: ModelHandle,
    pub material_cost: ModelHandle,
    pub normalizer: CategoricalNormalizer,
    pub formatter: CurrencyFormatter,
    pub started_at: DateTime<Utc>,
}

impl ServiceContext {
    pub fn new(
        house_price: ModelHandle,
        labor_cost: ModelHandle,
        material_cost: ModelHandle,
        normalizer: CategoricalNormalizer,
        formatter: CurrencyFormatter,
    ) -> Self {
        if labor_cost.is_loaded()
            && material_cost.is_loaded()
            && labor_cost.schema() != material_cost.schema()
        {
            tracing::warn!(
                "Labor and material models declare different features; construction requests are aligned to the labor schema"
            );
        }

        Self {
            house_price,
            labor_cost,
            material_cost,
            normalizer,
            formatter,
            started_at: Utc::now(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let models = &config.models;
        Self::new(
            ModelHandle::load(HOUSE_PRICE_MODEL, &models.house_price),
            ModelHandle::load(LABOR_COST_MODEL, &models.labor_cost),
            ModelHandle::load(MATERIAL_COST_MODEL, &models.material_cost),
            CategoricalNormalizer::new(config.features.indicator_prefixes.iter().cloned()),
            CurrencyFormatter::new(config.currency.symbol.clone()),
        )
    }

    /// The feature list both construction models were trained on. Taken from the
    /// labor model, or the material model when the labor artifact failed to load.
    pub fn construction_schema(&self) -> &FeatureSchema {
        if self.labor_cost.is_loaded() {
            self.labor_cost.schema()
        } else {
            self.material_cost.schema()
        }
    }

    pub fn models(&self) -> [&ModelHandle; 3] {
        [&self.house_price, &self.labor_cost, &self.material_cost]
    }

    pub fn all_models_loaded(&self) -> bool {
        self.models().iter().all(|m| m.is_loaded())
    }
}
