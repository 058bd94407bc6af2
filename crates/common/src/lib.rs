//! Shared types used across the order service crates.

pub mod money;
pub mod types;

pub use money::Money;
pub use types::OrderId;
