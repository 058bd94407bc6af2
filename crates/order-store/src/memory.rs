use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::{OrderStore, ensure_unpersisted};
use crate::{OrderId, OrderStoreError, Result};
use domain::CustomerOrder;

#[derive(Debug, Default)]
struct InMemoryOrderState {
    orders: HashMap<OrderId, CustomerOrder>,
    insert_calls: usize,
    fail_on_insert: bool,
    queued_ids: VecDeque<OrderId>,
}

/// In-memory order store for testing and local runs.
///
/// Provides the same contract as the PostgreSQL implementation. IDs are random
/// UUIDs unless one has been queued with [`InMemoryOrderStore::queue_id`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<InMemoryOrderState>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail every subsequent insert.
    pub async fn set_fail_on_insert(&self, fail: bool) {
        self.state.write().await.fail_on_insert = fail;
    }

    /// Makes the next insert use the given ID instead of a generated one.
    pub async fn queue_id(&self, id: impl Into<OrderId>) {
        self.state.write().await.queued_ids.push_back(id.into());
    }

    /// Returns the number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Returns how many times `insert` was called, including failed calls.
    pub async fn insert_calls(&self) -> usize {
        self.state.read().await.insert_calls
    }

    /// Returns the IDs of all stored orders.
    pub async fn ids(&self) -> Vec<OrderId> {
        self.state.read().await.orders.keys().cloned().collect()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: &CustomerOrder) -> Result<OrderId> {
        let mut state = self.state.write().await;
        state.insert_calls += 1;

        if state.fail_on_insert {
            return Err(OrderStoreError::Unavailable(
                "insert rejected by in-memory store".to_string(),
            ));
        }
        ensure_unpersisted(order)?;

        let id = state
            .queued_ids
            .pop_front()
            .unwrap_or_else(OrderId::generate);
        state
            .orders
            .insert(id.clone(), order.clone().persisted_as(id.clone()));
        Ok(id)
    }

    async fn get(&self, id: &OrderId) -> Result<Option<CustomerOrder>> {
        Ok(self.state.read().await.orders.get(id).cloned())
    }

    async fn ping(&self) -> Result<()> {
        if self.state.read().await.fail_on_insert {
            return Err(OrderStoreError::Unavailable(
                "in-memory store is failing".to_string(),
            ));
        }
        Ok(())
    }
}
