//! Order-creation saga.
//!
//! This crate turns an [`domain::OrderRequest`] into a persisted
//! [`domain::CustomerOrder`] by coordinating independent services without a
//! shared transaction:
//! 1. Validate the four resource locators
//! 2. Fetch items, address, customer and card (concurrently)
//! 3. Price the items
//! 4. Ask the payment service for an authorisation
//! 5. Assemble and persist the order
//!
//! No step before persistence has a durable side effect, so a failure simply
//! stops the saga; nothing is compensated.

pub mod error;
pub mod orchestrator;
pub mod services;
pub mod state;

pub use error::{CallError, FetchError, SagaError};
pub use orchestrator::{DEFAULT_CALL_TIMEOUT, OrderOrchestrator};
pub use services::{
    HttpPaymentAuthorizer, HttpResourceClient, InMemoryPaymentAuthorizer, InMemoryResourceClient,
    PaymentAuthorizer, ResourceClient,
};
pub use state::SagaState;
