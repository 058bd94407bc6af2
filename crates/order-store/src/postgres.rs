use async_trait::async_trait;
use domain::CustomerOrder;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::store::{OrderStore, ensure_unpersisted};
use crate::{OrderId, OrderStoreError, Result};

/// PostgreSQL-backed order store.
///
/// Each order is stored as a JSONB document keyed by a UUID generated at
/// insert time. The document is written without its ID; `get` re-attaches it.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    #[tracing::instrument(skip(self, order), fields(customer_id = order.customer_id()))]
    async fn insert(&self, order: &CustomerOrder) -> Result<OrderId> {
        ensure_unpersisted(order)?;

        let id = Uuid::new_v4();
        let document = serde_json::to_value(order)?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, document, total_cents, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(order.customer_id())
        .bind(document)
        .bind(order.total().cents())
        .bind(order.date())
        .execute(&self.pool)
        .await?;

        metrics::counter!("order_store_inserts_total").increment(1);
        tracing::debug!(order_id = %id, "order inserted");

        Ok(OrderId::from(id))
    }

    async fn get(&self, id: &OrderId) -> Result<Option<CustomerOrder>> {
        let uuid = Uuid::parse_str(id.as_str())
            .map_err(|_| OrderStoreError::InvalidId(id.to_string()))?;

        let row = sqlx::query("SELECT document FROM orders WHERE id = $1")
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let document: serde_json::Value = row.try_get("document")?;
                let order: CustomerOrder = serde_json::from_value(document)?;
                Ok(Some(order.persisted_as(id.clone())))
            }
            None => Ok(None),
        }
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
