use common::OrderId;
use thiserror::Error;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// An order that already carries an ID was handed to `insert`.
    #[error("Order already persisted as {0}")]
    AlreadyPersisted(OrderId),

    /// The stored ID is not one this store could have assigned.
    #[error("Invalid order id: {0}")]
    InvalidId(String),

    /// The store refused or failed the write.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, OrderStoreError>;
