//! Persistence of placed customer orders.
//!
//! The order-creation saga writes exactly one document per successful run.
//! This crate defines the [`OrderStore`] contract it writes through, plus an
//! in-memory implementation for tests and local runs and a PostgreSQL
//! implementation that keeps each order as a JSONB document.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::OrderId;
pub use error::{OrderStoreError, Result};
pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use store::OrderStore;
