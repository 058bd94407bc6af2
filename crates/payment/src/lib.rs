//! Payment authorisation service.
//!
//! Answers whether an order total may be charged. Authorisation is a pure
//! approval check against a configured ceiling; nothing is booked, so there
//! is nothing to void.

pub mod authoriser;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

pub use authoriser::Authoriser;
pub use config::Config;
pub use error::PaymentError;

/// Creates the Axum router for the payment service.
pub fn create_app(authoriser: Arc<Authoriser>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/paymentauth", post(routes::authorise))
        .route("/health", get(routes::health))
        .with_state(authoriser)
        .merge(metrics_router)
        .layer(TraceLayer::new_for_http())
}
