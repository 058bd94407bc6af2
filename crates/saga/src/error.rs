//! Saga error types.

use std::time::Duration;

use domain::{CustomerOrder, ResourceKind, ValidationError};
use order_store::OrderStoreError;
use thiserror::Error;

/// Why a single outbound call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// The target could not be turned into a request.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The call did not finish within its deadline.
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl CallError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            CallError::Timeout(timeout)
        } else {
            CallError::Transport(err.to_string())
        }
    }
}

/// A resource fetch that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to fetch {kind} from '{locator}': {cause}")]
pub struct FetchError {
    pub kind: ResourceKind,
    pub locator: String,
    #[source]
    pub cause: CallError,
}

impl FetchError {
    /// Creates a fetch error for the given resource.
    pub fn new(kind: ResourceKind, locator: impl Into<String>, cause: CallError) -> Self {
        Self {
            kind,
            locator: locator.into(),
            cause,
        }
    }
}

/// Terminal failures of the order-creation saga.
///
/// None of these are retried inside the saga; each names the step and the
/// dependency involved so the caller can decide whether to resubmit.
#[derive(Debug, Error)]
pub enum SagaError {
    /// The request was rejected before any outbound call.
    #[error("Invalid order request: {0}")]
    Validation(#[from] ValidationError),

    /// One of the four resource fetches failed.
    #[error("Dependency unavailable: {0}")]
    Fetch(#[from] FetchError),

    /// The payment service could not be asked, or its answer was unreadable.
    #[error("Payment service unavailable: {0}")]
    AuthorizationUnavailable(#[source] CallError),

    /// The payment service answered and refused the amount.
    #[error("Payment declined: {message}")]
    PaymentDeclined { message: String },

    /// Writing the authorised order failed.
    ///
    /// Carries the order that could not be saved; it has no ID.
    #[error("Failed to persist order: {source}")]
    Persistence {
        order: Box<CustomerOrder>,
        #[source]
        source: OrderStoreError,
    },
}

impl SagaError {
    /// Short machine-readable name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            SagaError::Validation(_) => "validation",
            SagaError::Fetch(_) => "fetch",
            SagaError::AuthorizationUnavailable(_) => "authorization_unavailable",
            SagaError::PaymentDeclined { .. } => "payment_declined",
            SagaError::Persistence { .. } => "persistence",
        }
    }

    /// The resource whose locator or fetch caused the failure, if any.
    pub fn resource(&self) -> Option<ResourceKind> {
        match self {
            SagaError::Validation(err) => Some(err.kind()),
            SagaError::Fetch(err) => Some(err.kind),
            _ => None,
        }
    }

    /// The order that was authorised but could not be saved.
    pub fn unsaved_order(&self) -> Option<&CustomerOrder> {
        match self {
            SagaError::Persistence { order, .. } => Some(order),
            _ => None,
        }
    }
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_names_resource_and_locator() {
        let err = SagaError::from(FetchError::new(
            ResourceKind::Address,
            "http://user/addresses/1",
            CallError::Status {
                status: 404,
                body: "not found".to_string(),
            },
        ));
        let message = err.to_string();
        assert!(message.contains("address"));
        assert!(message.contains("http://user/addresses/1"));
        assert!(message.contains("404"));
        assert_eq!(err.kind(), "fetch");
        assert_eq!(err.resource(), Some(ResourceKind::Address));
    }

    #[test]
    fn test_decline_and_unavailable_are_distinct() {
        let declined = SagaError::PaymentDeclined {
            message: "amount exceeds 105.00".to_string(),
        };
        let unavailable =
            SagaError::AuthorizationUnavailable(CallError::Transport("refused".to_string()));
        assert_ne!(declined.kind(), unavailable.kind());
        assert!(declined.resource().is_none());
        assert!(unavailable.unsaved_order().is_none());
    }

    #[test]
    fn test_timeout_display() {
        let err = CallError::Timeout(Duration::from_secs(5));
        assert_eq!(err.to_string(), "timed out after 5000ms");
    }
}
