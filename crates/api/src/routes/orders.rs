//! Order creation and lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use domain::{CustomerOrder, OrderId, OrderRequest};
use order_store::OrderStore;

use crate::error::ApiError;
use crate::routes::AppState;

/// POST /orders — run the order-creation saga for the given locators.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerOrder>), ApiError> {
    let Json(request) = payload?;
    let order = state.orchestrator.create_order(&request).await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders/{id} — load a persisted order.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerOrder>, ApiError> {
    let order_id = OrderId::new(id.as_str());
    let order = state
        .orchestrator
        .store()
        .get(&order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(order))
}
