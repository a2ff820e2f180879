//! Error types for the API server.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gridportal_core::billing::BillingError;
use gridportal_core::portal::PortalError;
use gridportal_core::source::SourceError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// An invalid query parameter was provided.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A UUID could not be parsed from the request path.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    /// A request body failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request needs a logged-in customer.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The data source failed.
    #[error("data source error: {0}")]
    Source(#[from] SourceError),
}

impl From<PortalError> for ApiError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::Lookup { source } => Self::Source(source),
            PortalError::NotLoggedIn => Self::Unauthorized(err.to_string()),
            PortalError::MissingAccountNumber
            | PortalError::InvalidAmount
            | PortalError::MissingFields { .. } => Self::Validation(err.to_string()),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        Self::InvalidQuery(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::InvalidQuery(msg) | Self::InvalidUuid(msg) | Self::Validation(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::Source(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_errors_are_bad_gateway() {
        let err = ApiError::from(SourceError::Timeout {
            endpoint: String::from("/status"),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn portal_validation_is_bad_request() {
        let err = ApiError::from(PortalError::InvalidAmount);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(PortalError::NotLoggedIn);
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn variants_map_to_http_statuses() {
        let cases = [
            (ApiError::NotFound(String::from("x")), StatusCode::NOT_FOUND),
            (ApiError::InvalidQuery(String::from("x")), StatusCode::BAD_REQUEST),
            (ApiError::InvalidUuid(String::from("x")), StatusCode::BAD_REQUEST),
            (ApiError::Validation(String::from("x")), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized(String::from("x")), StatusCode::UNAUTHORIZED),
            (
                ApiError::from(BillingError::OutOfRange {
                    usage_kwh: rust_decimal::Decimal::MAX,
                }),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
