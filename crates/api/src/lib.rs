//! HTTP API for the order service.
//!
//! Exposes order creation (which runs the order-creation saga), order
//! lookup, health and Prometheus metrics, with structured logging via
//! tracing.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use saga::{CallError, HttpPaymentAuthorizer, HttpResourceClient, OrderOrchestrator};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: OrderStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check::<S>))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Builds application state backed by the HTTP collaborators named in `config`.
pub fn create_state<S: OrderStore>(config: &Config, store: S) -> Result<Arc<AppState<S>>, CallError> {
    let resources = HttpResourceClient::new(config.call_timeout)?;
    let payment = HttpPaymentAuthorizer::new(&config.payment_url, config.call_timeout)?;
    let orchestrator =
        OrderOrchestrator::new(resources, payment, store).with_call_timeout(config.call_timeout);

    Ok(Arc::new(AppState { orchestrator }))
}
