//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use order_store::OrderStore;
use serde::Serialize;

use crate::routes::AppState;

#[derive(Serialize)]
pub struct HealthCheck {
    pub service: &'static str,
    pub status: &'static str,
    pub date: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub health: Vec<HealthCheck>,
}

/// GET /health — reports the service itself and its order store.
pub async fn check<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<HealthResponse> {
    let date = chrono::Utc::now().to_rfc3339();
    let db_status = match state.orchestrator.store().ping().await {
        Ok(()) => "OK",
        Err(err) => {
            tracing::warn!(error = %err, "order store health check failed");
            "err"
        }
    };

    Json(HealthResponse {
        health: vec![
            HealthCheck {
                service: "orders",
                status: "OK",
                date: date.clone(),
            },
            HealthCheck {
                service: "orders-db",
                status: db_status,
                date,
            },
        ],
    })
}
