//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use order_store::OrderStoreError;
use saga::SagaError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// The request body is not a well-formed order request.
    InvalidBody(String),
    /// Order-creation saga failure.
    Saga(SagaError),
    /// Order store failure outside the saga.
    Store(OrderStoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": msg, "kind": "not_found" }),
            ),
            ApiError::InvalidBody(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": msg, "kind": "validation" }),
            ),
            ApiError::Saga(err) => {
                let status = saga_error_status(&err);
                if status.is_server_error() {
                    tracing::error!(error = %err, kind = err.kind(), "order creation failed");
                }
                let mut body = serde_json::json!({ "error": err.to_string(), "kind": err.kind() });
                if let Some(resource) = err.resource() {
                    body["resource"] = serde_json::json!(resource);
                }
                (status, body)
            }
            ApiError::Store(err) => {
                tracing::error!(error = %err, "order store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": err.to_string(), "kind": "store" }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Status code for each saga failure class.
pub fn saga_error_status(err: &SagaError) -> StatusCode {
    match err {
        SagaError::Validation(_) => StatusCode::BAD_REQUEST,
        SagaError::Fetch(_) => StatusCode::BAD_GATEWAY,
        SagaError::AuthorizationUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        SagaError::PaymentDeclined { .. } => StatusCode::PAYMENT_REQUIRED,
        SagaError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<SagaError> for ApiError {
    fn from(err: SagaError) -> Self {
        ApiError::Saga(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<OrderStoreError> for ApiError {
    fn from(err: OrderStoreError) -> Self {
        match err {
            OrderStoreError::InvalidId(id) => ApiError::NotFound(format!("Order {id} not found")),
            other => ApiError::Store(other),
        }
    }
}
