use crate::core::aligner;
use crate::core::context::ServiceContext;
use crate::core::{FeatureRecord, PricePrediction};
use crate::utils::error::{PredictError, Result};
use serde_json::Value;

/// Decodes a request body into a feature record.
///
/// Accepts either the feature object itself or a wrapper `{"body": "<json string>"}`.
/// Only a failure to decode the nested string is reported as `InvalidJson`.
pub fn parse_payload(raw: &[u8]) -> Result<FeatureRecord> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(PredictError::invalid_input("No input data provided"));
    }

    let value: Value = serde_json::from_slice(raw).map_err(|e| {
        PredictError::invalid_input(format!("Failed to decode JSON object: {}", e))
    })?;

    let mut object = match value {
        Value::Object(object) => object,
        _ => {
            return Err(PredictError::invalid_input(
                "Request body must be a JSON object",
            ))
        }
    };

    let inner = match object.remove("body") {
        None => return Ok(FeatureRecord::from_object(object)),
        Some(Value::String(encoded)) => serde_json::from_str::<Value>(&encoded)?,
        Some(Value::Object(inner)) => Value::Object(inner),
        Some(Value::Null) => return Err(PredictError::invalid_input("No input data provided")),
        Some(_) => {
            return Err(PredictError::invalid_input(
                "Field 'body' must be a JSON-encoded object",
            ))
        }
    };

    match inner {
        Value::Object(object) => Ok(FeatureRecord::from_object(object)),
        _ => Err(PredictError::invalid_input(
            "Field 'body' must be a JSON-encoded object",
        )),
    }
}

pub fn predict_house_price(ctx: &ServiceContext, record: FeatureRecord) -> Result<PricePrediction> {
    let model = &ctx.house_price;
    let record = ctx.normalizer.normalize(record, model.schema());
    let row = aligner::align(&record, model.schema());
    tracing::debug!("Aligned house request to {} columns", row.len());

    let raw = model.predict(&row)?;
    Ok(PricePrediction {
        raw,
        formatted: ctx.formatter.format(raw),
    })
}

/// Labor and material are predicted from the same aligned row and summed.
pub fn predict_construction_cost(
    ctx: &ServiceContext,
    record: FeatureRecord,
) -> Result<PricePrediction> {
    let row = aligner::align(&record, ctx.construction_schema());
    tracing::debug!("Aligned construction request to {} columns", row.len());

    let labor = ctx.labor_cost.predict(&row)?;
    let material = ctx.material_cost.predict(&row)?;
    tracing::debug!("Labor: {:.2}, material: {:.2}", labor, material);

    let raw = labor + material;
    Ok(PricePrediction {
        raw,
        formatted: ctx.formatter.format(raw),
    })
}
