use crate::core::context::ServiceContext;
use crate::core::pipeline;
use crate::utils::error::{ErrorKind, PredictError, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

pub fn router(ctx: Arc<ServiceContext>) -> Router {
    Router::new()
        .route("/predict", post(predict_house_price))
        .route("/constructionpredict", post(predict_construction_cost))
        .route("/health", get(health))
        .with_state(ctx)
}

/// Serves until Ctrl-C.
pub async fn serve(listener: TcpListener, ctx: Arc<ServiceContext>) -> Result<()> {
    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(PredictError::Io)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown signal received");
}

async fn predict_house_price(State(ctx): State<Arc<ServiceContext>>, body: Bytes) -> Response {
    let result = pipeline::parse_payload(&body)
        .and_then(|record| pipeline::predict_house_price(&ctx, record));

    match result {
        Ok(prediction) => {
            tracing::info!("🏠 House price prediction: {}", prediction.formatted);
            (
                StatusCode::OK,
                Json(json!({ "predicted_price": prediction.formatted })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!("House price prediction failed: {}", e);
            house_error_response(&e).into_response()
        }
    }
}

async fn predict_construction_cost(
    State(ctx): State<Arc<ServiceContext>>,
    body: Bytes,
) -> Response {
    let result = pipeline::parse_payload(&body)
        .and_then(|record| pipeline::predict_construction_cost(&ctx, record));

    match result {
        Ok(prediction) => {
            tracing::info!("🏗️ Construction cost prediction: {}", prediction.formatted);
            (
                StatusCode::OK,
                Json(json!({ "construction_predicted_price": prediction.formatted })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!("Construction cost prediction failed: {}", e);
            construction_error_response(&e).into_response()
        }
    }
}

async fn health(State(ctx): State<Arc<ServiceContext>>) -> Json<Value> {
    let models: serde_json::Map<String, Value> = ctx
        .models()
        .iter()
        .map(|m| {
            (
                m.name().to_string(),
                json!({
                    "loaded": m.is_loaded(),
                    "features": m.schema().len(),
                    "error": m.load_error(),
                }),
            )
        })
        .collect();

    let status = if ctx.all_models_loaded() {
        "ok"
    } else {
        "degraded"
    };

    Json(json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": ctx.started_at.to_rfc3339(),
        "models": models,
    }))
}

/// Every house endpoint failure is a 400 carrying the raw message.
pub fn house_error_response(err: &PredictError) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": err.to_string() })),
    )
}

/// Model invocation failures are 500 on this endpoint; everything else is a 400.
pub fn construction_error_response(err: &PredictError) -> (StatusCode, Json<Value>) {
    match err.kind() {
        ErrorKind::Prediction => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Prediction Error: {}", err) })),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_house_errors_are_always_bad_request() {
        let (status, Json(body)) = house_error_response(&PredictError::prediction("boom"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "boom");
    }

    #[test]
    fn test_construction_prediction_error_is_500() {
        let (status, Json(body)) = construction_error_response(&PredictError::prediction("boom"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Prediction Error: boom");
    }

    #[test]
    fn test_construction_invalid_json_is_400() {
        let err = pipeline::parse_payload(br#"{"body": "{broken"}"#).unwrap_err();
        let (status, Json(body)) = construction_error_response(&err);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON format"));
    }

    #[test]
    fn test_construction_missing_body_is_400() {
        let (status, Json(body)) =
            construction_error_response(&PredictError::invalid_input("No input data provided"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No input data provided");
    }
}
