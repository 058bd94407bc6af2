//! Domain layer for the order service.
//!
//! This crate provides the data model of the order-creation saga:
//! - `OrderRequest`, the four resource locators a client submits
//! - Snapshots of the resources the saga resolves (`Item`, `Address`, `Customer`, `Card`)
//! - `CustomerOrder`, the aggregate the saga persists, and its assembly
//! - Pricing of an item list including the fixed shipping surcharge
//! - The payment authorisation request/verdict exchanged with the payment service

pub mod error;
pub mod order;
pub mod payment;

pub use common::{Money, OrderId};
pub use error::{PricingError, ValidationError};
pub use order::{
    Address, Card, Customer, CustomerOrder, FIXED_SHIPPING, Item, OrderRequest, ResourceKind,
    Shipment, pricing,
};
pub use payment::{Authorisation, PaymentRequest};
