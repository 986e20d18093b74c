use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Server is missing the OpenAI API key.")]
    MissingApiKey,

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("{0}")]
    Extraction(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details = None;
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MissingApiKey => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "MISSING_API_KEY",
                self.to_string(),
            ),
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                details = Some(e.to_string());
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "OpenAI request failed".to_string(),
                )
            }
            AppError::Extraction(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_ERROR",
                msg.clone(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Unexpected server error.".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code
        });
        if let Some(details) = details {
            body["details"] = Value::String(details);
        }

        (status, Json(body)).into_response()
    }
}
