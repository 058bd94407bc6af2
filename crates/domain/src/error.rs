//! Domain error types.

use thiserror::Error;

use crate::order::ResourceKind;

/// An order request that must be rejected before any outbound call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A resource locator was missing or blank.
    #[error("{0} locator is required")]
    MissingLocator(ResourceKind),

    /// A resource locator was present but cannot be resolved.
    #[error("{kind} locator '{locator}' is malformed: {reason}")]
    MalformedLocator {
        kind: ResourceKind,
        locator: String,
        reason: String,
    },
}

impl ValidationError {
    /// The resource the offending locator refers to.
    pub fn kind(&self) -> ResourceKind {
        match self {
            ValidationError::MissingLocator(kind) => *kind,
            ValidationError::MalformedLocator { kind, .. } => *kind,
        }
    }
}

/// An item list whose total cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("line total of item '{item_id}' overflows")]
    LineOverflow { item_id: String },

    #[error("order total overflows")]
    TotalOverflow,
}
