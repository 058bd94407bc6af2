//! Outbound collaborators of the saga: resource fetches and payment authorisation.

pub mod payment;
pub mod resource;

pub use payment::{HttpPaymentAuthorizer, InMemoryPaymentAuthorizer, PaymentAuthorizer};
pub use resource::{HttpResourceClient, InMemoryResourceClient, ResourceClient};
