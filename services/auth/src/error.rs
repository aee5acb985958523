use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service error variants.
///
/// Code verification failures are not errors; they travel inside
/// [`crate::domain::types::Verification`].
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid email")]
    InvalidEmail,
    #[error("invalid token")]
    InvalidToken,
    #[error("code delivery failed: {0}")]
    Delivery(String),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Delivery(_) => "DELIVERY_FAILED",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingField(_) | Self::InvalidEmail => StatusCode::BAD_REQUEST,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Delivery(_) => StatusCode::BAD_GATEWAY,
        };
        // 4xx are expected client errors and already visible in the request trace.
        if let Self::Delivery(detail) = &self {
            tracing::error!(error = %detail, kind = "DELIVERY_FAILED", "delivery error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
