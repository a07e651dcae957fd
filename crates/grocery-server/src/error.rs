//! Mapping of service failures to HTTP responses

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use grocery_core::{GroceryError, ValidationError};

/// Error returned by every handler
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body decoded but a field failed validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Body could not be decoded as the expected JSON shape
    #[error("{message}")]
    Rejected {
        status: StatusCode,
        message: String,
        /// Offending field, when the decoder names one
        field: Option<String>,
    },

    /// Store or other server-side failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GroceryError> for ApiError {
    fn from(err: GroceryError) -> Self {
        match err {
            GroceryError::Validation(v) => ApiError::Validation(v),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        let field = match &rejection {
            JsonRejection::JsonDataError(_) => rejected_field(&message),
            _ => None,
        };
        ApiError::Rejected {
            status: rejection.status(),
            message,
            field,
        }
    }
}

/// Field named by a JSON data error, either `missing field `x`` or a
/// `path: reason` prefix
fn rejected_field(message: &str) -> Option<String> {
    let detail = message
        .split_once("target type: ")
        .map_or(message, |(_, detail)| detail);

    if let Some(rest) = detail.strip_prefix("missing field `") {
        return rest.split_once('`').map(|(field, _)| field.to_string());
    }

    let (path, _) = detail.split_once(": ")?;
    let is_path = !path.is_empty()
        && path != "."
        && path
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'));
    is_path.then(|| path.to_string())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(v) => serde_json::json!({
                "error": v.message,
                "field": v.field,
            }),
            ApiError::Rejected {
                message,
                field: Some(field),
                ..
            } => serde_json::json!({
                "error": message,
                "field": field,
            }),
            ApiError::Rejected { message, .. } => serde_json::json!({ "error": message }),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                serde_json::json!({ "error": "Internal server error" })
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grocery_core::StoreError;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: ApiError =
            GroceryError::Validation(ValidationError::new("name", "Item name is required")).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_failure_maps_to_server_error() {
        let err: ApiError = GroceryError::Store(StoreError::Database("gone".into())).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_rejected_field_from_missing_field() {
        let message = "Failed to deserialize the JSON body into the target type: \
                       missing field `name` at line 1 column 14";
        assert_eq!(rejected_field(message).as_deref(), Some("name"));
    }

    #[test]
    fn test_rejected_field_from_path_prefix() {
        let message = "Failed to deserialize the JSON body into the target type: \
                       quantity: invalid type: string \"two\", expected a JSON number \
                       at line 1 column 32";
        assert_eq!(rejected_field(message).as_deref(), Some("quantity"));
        assert_eq!(
            rejected_field("status: invalid type: null, expected a boolean").as_deref(),
            Some("status")
        );
    }

    #[test]
    fn test_rejected_field_absent_without_path() {
        let message = "Failed to deserialize the JSON body into the target type: \
                       invalid type: integer `3`, expected struct AddItemRequest";
        assert_eq!(rejected_field(message), None);
        assert_eq!(rejected_field("Expected request with `Content-Type: application/json`"), None);
    }
}
