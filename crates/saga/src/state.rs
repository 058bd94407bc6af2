//! Saga state machine.

use domain::ResourceKind;
use serde::{Deserialize, Serialize};

/// The state of an order-creation saga.
///
/// State transitions:
/// ```text
/// Validating ──► FetchingItems ──► FetchingAddress ──► FetchingCustomer ──► FetchingCard
///     ──► CalculatingTotal ──► AuthorizingPayment ──► Persisting ──► Completed
///
/// any non-terminal state ──► Failed
/// ```
///
/// The four fetches are in flight together; the fetching states are walked
/// as their results are consumed in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SagaState {
    #[default]
    Validating,
    FetchingItems,
    FetchingAddress,
    FetchingCustomer,
    FetchingCard,
    CalculatingTotal,
    AuthorizingPayment,
    Persisting,

    /// The order was persisted (terminal state).
    Completed,

    /// The saga stopped on an error (terminal state).
    Failed,
}

impl SagaState {
    /// The state that follows this one on the success path.
    pub fn next(&self) -> Option<SagaState> {
        match self {
            SagaState::Validating => Some(SagaState::FetchingItems),
            SagaState::FetchingItems => Some(SagaState::FetchingAddress),
            SagaState::FetchingAddress => Some(SagaState::FetchingCustomer),
            SagaState::FetchingCustomer => Some(SagaState::FetchingCard),
            SagaState::FetchingCard => Some(SagaState::CalculatingTotal),
            SagaState::CalculatingTotal => Some(SagaState::AuthorizingPayment),
            SagaState::AuthorizingPayment => Some(SagaState::Persisting),
            SagaState::Persisting => Some(SagaState::Completed),
            SagaState::Completed | SagaState::Failed => None,
        }
    }

    /// The state in which the given resource's fetch result is consumed.
    pub fn fetching(kind: ResourceKind) -> SagaState {
        match kind {
            ResourceKind::Items => SagaState::FetchingItems,
            ResourceKind::Address => SagaState::FetchingAddress,
            ResourceKind::Customer => SagaState::FetchingCustomer,
            ResourceKind::Card => SagaState::FetchingCard,
        }
    }

    /// Returns true if the saga may move from this state to `to`.
    pub fn can_transition_to(&self, to: SagaState) -> bool {
        match to {
            SagaState::Failed => !self.is_terminal(),
            _ => self.next() == Some(to),
        }
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SagaState::Completed | SagaState::Failed)
    }

    /// Returns true if an outbound call is made while in this state.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            SagaState::FetchingItems
                | SagaState::FetchingAddress
                | SagaState::FetchingCustomer
                | SagaState::FetchingCard
                | SagaState::AuthorizingPayment
                | SagaState::Persisting
        )
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SagaState::Validating => "Validating",
            SagaState::FetchingItems => "FetchingItems",
            SagaState::FetchingAddress => "FetchingAddress",
            SagaState::FetchingCustomer => "FetchingCustomer",
            SagaState::FetchingCard => "FetchingCard",
            SagaState::CalculatingTotal => "CalculatingTotal",
            SagaState::AuthorizingPayment => "AuthorizingPayment",
            SagaState::Persisting => "Persisting",
            SagaState::Completed => "Completed",
            SagaState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for SagaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
