use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// The caller did not supply an API key.
    MissingCredential,
    /// A required request field is absent or empty.
    MissingField(&'static str),
    /// Bad request error (invalid input).
    BadRequest(String),
    /// The upstream lookup failed after the request was accepted.
    ///
    /// Carries the request identifier so the caller can correlate the
    /// failure with the verification report.
    Upstream {
        /// Human-readable failure reason (without the "API request failed" prefix).
        message: String,
        /// Identifier assigned to the failed request.
        request_id: String,
    },
    /// Internal server error.
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingCredential => write!(f, "API key is required"),
            AppError::MissingField(field) => write!(f, "{} field is required", capitalize(field)),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Upstream { message, .. } => write!(f, "API request failed: {}", message),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps each error variant to an HTTP status code and JSON body.
    ///
    /// Client errors carry only `error`; upstream failures also carry
    /// `requestId`.
    fn into_response(self) -> Response {
        match &self {
            AppError::MissingCredential | AppError::MissingField(_) => {
                tracing::warn!("Rejected lookup request: {}", self);
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": self.to_string() })),
                )
                    .into_response()
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": msg })),
            )
                .into_response(),
            AppError::Upstream { request_id, .. } => {
                tracing::error!("[{}] {}", request_id, self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": self.to_string(),
                        "requestId": request_id,
                    })),
                )
                    .into_response()
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_messages() {
        assert_eq!(AppError::MissingCredential.to_string(), "API key is required");
        assert_eq!(
            AppError::MissingField("company").to_string(),
            "Company field is required"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::MissingCredential.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MissingField("company").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Upstream {
                message: "HTTP error! status: 429".to_string(),
                request_id: "req_1_0".to_string(),
            }
            .into_response()
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::InternalError("boom".to_string())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_message_prefix() {
        let err = AppError::Upstream {
            message: "HTTP error! status: 500".to_string(),
            request_id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "API request failed: HTTP error! status: 500");
    }
}
