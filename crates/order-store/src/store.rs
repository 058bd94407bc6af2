use async_trait::async_trait;
use common::OrderId;
use domain::CustomerOrder;

use crate::Result;

/// Core trait for order store implementations.
///
/// The store owns identifier allocation: callers hand it an unpersisted order
/// and get back the ID it was stored under. All implementations must be
/// thread-safe (Send + Sync) and safe to share between concurrent requests.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists an order and returns the ID assigned to it.
    ///
    /// Fails with `AlreadyPersisted` if the order already carries an ID.
    async fn insert(&self, order: &CustomerOrder) -> Result<OrderId>;

    /// Retrieves a persisted order by ID.
    ///
    /// The returned order carries its ID.
    async fn get(&self, id: &OrderId) -> Result<Option<CustomerOrder>>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<()>;
}

/// Rejects orders that already carry an ID.
pub(crate) fn ensure_unpersisted(order: &CustomerOrder) -> Result<()> {
    match order.id() {
        Some(id) => Err(crate::OrderStoreError::AlreadyPersisted(id.clone())),
        None => Ok(()),
    }
}
