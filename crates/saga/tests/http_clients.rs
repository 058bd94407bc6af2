//! HTTP collaborator tests against a stub upstream bound on a local port.

use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use domain::{
    Address, Authorisation, Card, Customer, Item, Money, PaymentRequest, ResourceKind,
};
use saga::{CallError, HttpPaymentAuthorizer, HttpResourceClient, PaymentAuthorizer, ResourceClient};
use tokio::net::TcpListener;

async fn authorise(Json(request): Json<PaymentRequest>) -> Json<Authorisation> {
    if request.amount > Money::from_cents(10_500) {
        Json(Authorisation::declined("Payment declined: amount exceeds 105.00"))
    } else {
        Json(Authorisation::approved(format!(
            "Payment authorised for {}",
            request.customer.id
        )))
    }
}

fn upstream() -> Router {
    Router::new()
        .route(
            "/carts/1/items",
            get(|| async {
                Json(serde_json::json!([
                    {"id": "i-1", "cartId": "1", "quantity": 2, "unitPrice": 10.0},
                    {"id": "i-2", "cartId": "1", "quantity": 1, "unitPrice": 5.5}
                ]))
            }),
        )
        .route(
            "/addresses/1",
            get(|| async { Json(serde_json::json!({"id": "a-1", "city": "Glasgow"})) }),
        )
        .route("/broken", get(|| async { "this is not json" }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(serde_json::json!({}))
            }),
        )
        .route("/paymentauth", post(authorise))
        .route(
            "/paymentauth-down",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        )
        .route("/paymentauth-garbled", post(|| async { "{\"authorised\":" }))
}

/// Bind to port 0, spawn the stub, and return its base URL.
async fn start_upstream() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream()).await.unwrap();
    });
    format!("http://{addr}")
}

fn client() -> HttpResourceClient {
    HttpResourceClient::new(Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn fetch_decodes_items_and_address() {
    let base = start_upstream().await;
    let client = client();

    let items: Vec<Item> = client
        .fetch(ResourceKind::Items, &format!("{base}/carts/1/items"))
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(domain::pricing::total(&items).unwrap().cents(), 3049);

    let address: Address = client
        .fetch(ResourceKind::Address, &format!("{base}/addresses/1"))
        .await
        .unwrap();
    assert_eq!(address.city, "Glasgow");
}

#[tokio::test]
async fn fetch_reports_status_decode_and_transport_failures() {
    let base = start_upstream().await;
    let client = client();

    let missing = client
        .fetch::<Card>(ResourceKind::Card, &format!("{base}/cards/404"))
        .await
        .unwrap_err();
    assert_eq!(missing.kind, ResourceKind::Card);
    assert!(matches!(missing.cause, CallError::Status { status: 404, .. }));

    let broken = client
        .fetch::<Customer>(ResourceKind::Customer, &format!("{base}/broken"))
        .await
        .unwrap_err();
    assert!(matches!(broken.cause, CallError::Decode(_)));

    // Nothing listens on port 9 of the loopback interface.
    let unreachable = client
        .fetch::<Address>(ResourceKind::Address, "http://127.0.0.1:9/addresses/1")
        .await
        .unwrap_err();
    assert!(matches!(unreachable.cause, CallError::Transport(_)));
}

#[tokio::test]
async fn fetch_times_out() {
    let base = start_upstream().await;
    let client = HttpResourceClient::new(Duration::from_millis(200)).unwrap();

    let err = client
        .fetch::<Address>(ResourceKind::Address, &format!("{base}/slow"))
        .await
        .unwrap_err();
    assert_eq!(err.cause, CallError::Timeout(Duration::from_millis(200)));
}

#[tokio::test]
async fn authorizer_posts_request_and_reads_verdict() {
    let base = start_upstream().await;
    let authorizer =
        HttpPaymentAuthorizer::new(&format!("{base}/paymentauth"), Duration::from_secs(2)).unwrap();
    let customer = Customer {
        id: "cust-1".to_string(),
        ..Default::default()
    };

    let approved = authorizer
        .authorize(&Address::default(), &customer, &Card::default(), Money::from_cents(3049))
        .await
        .unwrap();
    assert!(approved.authorised);
    assert_eq!(approved.message, "Payment authorised for cust-1");

    let declined = authorizer
        .authorize(&Address::default(), &customer, &Card::default(), Money::from_cents(20_000))
        .await
        .unwrap();
    assert!(!declined.authorised);
}

#[tokio::test]
async fn authorizer_failures_are_errors_not_declines() {
    let base = start_upstream().await;

    let down =
        HttpPaymentAuthorizer::new(&format!("{base}/paymentauth-down"), Duration::from_secs(2))
            .unwrap();
    let err = down
        .authorize(&Address::default(), &Customer::default(), &Card::default(), Money::from_cents(100))
        .await
        .unwrap_err();
    assert!(matches!(err, CallError::Status { status: 503, .. }));

    let garbled =
        HttpPaymentAuthorizer::new(&format!("{base}/paymentauth-garbled"), Duration::from_secs(2))
            .unwrap();
    let err = garbled
        .authorize(&Address::default(), &Customer::default(), &Card::default(), Money::from_cents(100))
        .await
        .unwrap_err();
    assert!(matches!(err, CallError::Decode(_)));
}
