//! Payment authorizer trait, HTTP implementation and in-memory implementation.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use domain::{Address, Authorisation, Card, Customer, Money, PaymentRequest};
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::error::CallError;

/// Asks the payment service whether an amount may be charged.
///
/// # Contract
///
/// Authorisation is a stateless approval check. A positive verdict places no
/// hold and books no charge, so there is nothing to void if a later step of
/// the saga fails, and this trait deliberately has no release operation. An
/// implementation backed by a gateway that does reserve funds would break
/// that contract and needs a compensating void step in the saga first.
///
/// A declined payment is a successful call: `Ok` with `authorised == false`.
/// `Err` means the verdict could not be obtained at all.
#[async_trait]
pub trait PaymentAuthorizer: Send + Sync {
    /// Requests an authorisation for `amount`.
    async fn authorize(
        &self,
        address: &Address,
        customer: &Customer,
        card: &Card,
        amount: Money,
    ) -> Result<Authorisation, CallError>;
}

/// Payment authorizer that posts a [`PaymentRequest`] to the payment service.
#[derive(Debug, Clone)]
pub struct HttpPaymentAuthorizer {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpPaymentAuthorizer {
    /// Creates an authorizer for the given endpoint (e.g. `http://payment/paymentauth`).
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, CallError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| CallError::InvalidTarget(format!("invalid payment endpoint '{endpoint}': {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("order-service/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CallError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }
}

#[async_trait]
impl PaymentAuthorizer for HttpPaymentAuthorizer {
    #[tracing::instrument(skip(self, address, customer, card), fields(customer_id = %customer.id))]
    async fn authorize(
        &self,
        address: &Address,
        customer: &Customer,
        card: &Card,
        amount: Money,
    ) -> Result<Authorisation, CallError> {
        let body = PaymentRequest {
            address: address.clone(),
            customer: customer.clone(),
            card: card.clone(),
            amount,
        };
        debug!(endpoint = %self.endpoint, %amount, "requesting payment authorisation");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| CallError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(%status, "payment authorisation request failed");
            return Err(CallError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CallError::from_reqwest(e, self.timeout))?;
        serde_json::from_slice(&bytes).map_err(|e| CallError::Decode(e.to_string()))
    }
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    decline_over: Option<Money>,
    fail_on_authorize: bool,
    latency: Option<Duration>,
    amounts: Vec<Money>,
}

/// In-memory payment authorizer for testing.
///
/// Approves everything unless a decline limit is set.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentAuthorizer {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentAuthorizer {
    /// Creates a new in-memory payment authorizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declines amounts strictly greater than `limit`.
    pub fn set_decline_over(&self, limit: Money) {
        self.state.write().unwrap().decline_over = Some(limit);
    }

    /// Configures the authorizer to fail the call itself.
    pub fn set_fail_on_authorize(&self, fail: bool) {
        self.state.write().unwrap().fail_on_authorize = fail;
    }

    /// Delays every answer by `delay`.
    pub fn set_latency(&self, delay: Duration) {
        self.state.write().unwrap().latency = Some(delay);
    }

    /// Returns the number of authorisation requests received.
    pub fn call_count(&self) -> usize {
        self.state.read().unwrap().amounts.len()
    }

    /// Returns the amounts that were submitted for authorisation.
    pub fn amounts(&self) -> Vec<Money> {
        self.state.read().unwrap().amounts.clone()
    }
}

#[async_trait]
impl PaymentAuthorizer for InMemoryPaymentAuthorizer {
    async fn authorize(
        &self,
        _address: &Address,
        _customer: &Customer,
        _card: &Card,
        amount: Money,
    ) -> Result<Authorisation, CallError> {
        let (latency, outcome) = {
            let mut state = self.state.write().unwrap();
            state.amounts.push(amount);
            let outcome = if state.fail_on_authorize {
                Err(CallError::Transport("payment service unreachable".to_string()))
            } else {
                Ok(match state.decline_over {
                    Some(limit) if amount > limit => Authorisation::declined(format!(
                        "Payment declined: amount exceeds {limit}"
                    )),
                    _ => Authorisation::approved("Payment authorised"),
                })
            };
            (state.latency, outcome)
        };

        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }
        outcome
    }
}
