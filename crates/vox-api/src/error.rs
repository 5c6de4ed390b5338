//! API error types and JSON error response formatting.
//!
//! Most failures use the `{error, message}` body. Speech synthesis failures
//! use the bare `{"error": "..."}` body the frontend expects from `/tts`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use vox_core::error::ServiceError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "internal_error").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 422 Unprocessable Entity - a required field is present but blank.
    UnprocessableEntity(String),
    /// 500 Internal Server Error. The detail is logged, never returned.
    Internal(String),
    /// 500 with `{"error": detail}` - text-to-speech failed.
    Synthesis(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::UnprocessableEntity(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable_entity", msg)
            }
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal Server Error".to_string(),
                )
            }
            ApiError::Synthesis(detail) => {
                tracing::warn!(error = %detail, "Speech synthesis failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": detail })),
                )
                    .into_response();
            }
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_internal_hides_detail() {
        let resp = ApiError::from(ServiceError::Network("10.0.0.7 refused".to_string()))
            .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "internal_error");
        assert_eq!(json["message"], "Internal Server Error");
        assert!(!json.to_string().contains("10.0.0.7"));
    }

    #[tokio::test]
    async fn test_unprocessable_entity_body() {
        let resp = ApiError::UnprocessableEntity("query must not be empty".to_string())
            .into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({
                "error": "unprocessable_entity",
                "message": "query must not be empty"
            })
        );
    }

    #[tokio::test]
    async fn test_synthesis_error_body() {
        let resp = ApiError::Synthesis("quota exceeded".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({"error": "quota exceeded"})
        );
    }
}
