//! Payment service errors with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::Money;
use thiserror::Error;

/// Errors that can occur while authorising a payment.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Zero or negative amounts cannot be authorised.
    #[error("Invalid payment amount: {0}")]
    InvalidAmount(Money),
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        let status = match self {
            PaymentError::InvalidAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
