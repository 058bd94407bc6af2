//! Payment service endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use domain::{Authorisation, PaymentRequest};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use crate::authoriser::Authoriser;
use crate::error::PaymentError;

#[derive(Serialize)]
pub struct HealthCheck {
    pub service: &'static str,
    pub status: &'static str,
    pub time: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub health: Vec<HealthCheck>,
}

/// POST /paymentauth — authorise the amount of a payment request.
#[tracing::instrument(skip(authoriser, request), fields(customer_id = %request.customer.id, amount = %request.amount))]
pub async fn authorise(
    State(authoriser): State<Arc<Authoriser>>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<Authorisation>, PaymentError> {
    let verdict = authoriser.authorise(request.amount)?;

    let outcome = if verdict.authorised { "authorised" } else { "declined" };
    metrics::counter!("payment_authorisations_total", "outcome" => outcome).increment(1);
    tracing::info!(outcome, "payment authorisation decided");

    Ok(Json(verdict))
}

/// GET /health — returns service health.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        health: vec![HealthCheck {
            service: "payment",
            status: "OK",
            time: chrono::Utc::now().to_rfc3339(),
        }],
    })
}

/// GET /metrics — authorisation counters in Prometheus text format.
pub async fn metrics(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        handle.render(),
    )
}
