//! Route handlers.

pub mod health;
pub mod metrics;
pub mod orders;

use order_store::OrderStore;
use saga::{HttpPaymentAuthorizer, HttpResourceClient, OrderOrchestrator};

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore> {
    pub orchestrator: OrderOrchestrator<HttpResourceClient, HttpPaymentAuthorizer, S>,
}
