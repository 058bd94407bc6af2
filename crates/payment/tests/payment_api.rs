//! Integration tests for the payment service API.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain::Money;
use metrics_exporter_prometheus::PrometheusHandle;
use payment::Authoriser;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            metrics_exporter_prometheus::PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    payment::create_app(
        Arc::new(Authoriser::new(Money::from_cents(10_500))),
        get_metrics_handle(),
    )
}

fn payment_body(amount: serde_json::Value) -> Body {
    Body::from(
        serde_json::to_string(&serde_json::json!({
            "address": {"id": "a-1", "street": "Whitelees Road"},
            "customer": {"id": "cust-1", "firstName": "Eve"},
            "card": {"id": "card-1", "longNum": "5953580604169678"},
            "amount": amount
        }))
        .unwrap(),
    )
}

async fn post_auth(app: axum::Router, amount: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/paymentauth")
                .header("content-type", "application/json")
                .body(payment_body(amount))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_authorises_small_amount() {
    let (status, json) = post_auth(setup(), serde_json::json!(30.49)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["authorised"], true);
    assert_eq!(json["message"], "Payment authorised");
}

#[tokio::test]
async fn test_declines_large_amount() {
    let (status, json) = post_auth(setup(), serde_json::json!(105.01)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["authorised"], false);
    assert_eq!(json["message"], "Payment declined: amount exceeds 105.00");
}

#[tokio::test]
async fn test_rejects_zero_amount() {
    let (status, json) = post_auth(setup(), serde_json::json!(0)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("Invalid payment amount"));
}

#[tokio::test]
async fn test_health() {
    let response = setup()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["health"][0]["service"], "payment");
    assert_eq!(json["health"][0]["status"], "OK");
}

#[tokio::test]
async fn test_metrics_count_outcomes() {
    let (status, _) = post_auth(setup(), serde_json::json!(12.5)).await;
    assert_eq!(status, StatusCode::OK);

    let response = setup()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("payment_authorisations_total"));
    assert!(text.contains("outcome=\"authorised\""));
}
