//! Orchestrator for the order-creation saga.

use std::future::Future;
use std::time::{Duration, Instant};

use chrono::Utc;
use domain::{
    Address, Card, Customer, CustomerOrder, Item, OrderRequest, ResourceKind, pricing,
};
use order_store::{OrderStore, OrderStoreError};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{CallError, FetchError, Result, SagaError};
use crate::services::{PaymentAuthorizer, ResourceClient};
use crate::state::SagaState;

/// Deadline applied to each outbound call unless configured otherwise.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Drives order creation from request to persisted order.
///
/// The orchestrator holds no per-request state; one instance serves any
/// number of concurrent `create_order` calls. Dropping a `create_order`
/// future abandons every outbound call it has in flight.
pub struct OrderOrchestrator<R, P, S>
where
    R: ResourceClient,
    P: PaymentAuthorizer,
    S: OrderStore,
{
    resources: R,
    payment: P,
    store: S,
    call_timeout: Duration,
}

impl<R, P, S> OrderOrchestrator<R, P, S>
where
    R: ResourceClient,
    P: PaymentAuthorizer,
    S: OrderStore,
{
    /// Creates a new orchestrator with the default per-call deadline.
    pub fn new(resources: R, payment: P, store: S) -> Self {
        Self {
            resources,
            payment,
            store,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Sets the deadline applied to each fetch, authorisation and insert.
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Returns the per-call deadline.
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Returns the store orders are written to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the saga for one order request.
    ///
    /// On success the returned order carries the ID assigned by the store.
    /// On failure nothing has been written.
    #[tracing::instrument(skip(self, request), fields(saga_id = %Uuid::new_v4()))]
    pub async fn create_order(&self, request: &OrderRequest) -> Result<CustomerOrder> {
        metrics::counter!("saga_executions_total").increment(1);
        let started = Instant::now();

        let mut run = SagaRun::default();
        let result = self.run(&mut run, request).await;

        let duration = started.elapsed().as_secs_f64();
        metrics::histogram!("saga_duration_seconds").record(duration);

        match &result {
            Ok(order) => {
                run.advance(SagaState::Completed);
                metrics::counter!("saga_completed").increment(1);
                tracing::info!(
                    order_id = %order.id().map(|id| id.as_str()).unwrap_or_default(),
                    customer_id = order.customer_id(),
                    total = %order.total(),
                    duration,
                    "order created"
                );
            }
            Err(err) => {
                let failed_in = run.state();
                run.advance(SagaState::Failed);
                metrics::counter!("saga_failed", "kind" => err.kind()).increment(1);
                tracing::warn!(
                    state = %failed_in,
                    kind = err.kind(),
                    error = %err,
                    duration,
                    "order creation failed"
                );
            }
        }

        result
    }

    async fn run(&self, run: &mut SagaRun, request: &OrderRequest) -> Result<CustomerOrder> {
        // Validating: nothing leaves the process until every locator checks out.
        request.validate()?;
        for kind in ResourceKind::ALL {
            self.resources
                .check_locator(kind, request.locator(kind))?;
        }

        // The fetches are independent and run together. Results are consumed
        // in precedence order, so the reported failure does not depend on
        // timing; the remaining calls are dropped as soon as it is known.
        run.advance(SagaState::FetchingItems);
        let items_call = self.fetch::<Vec<Item>>(ResourceKind::Items, &request.items);
        let address_call = self.fetch::<Address>(ResourceKind::Address, &request.address);
        let customer_call = self.fetch::<Customer>(ResourceKind::Customer, &request.customer);
        let card_call = self.fetch::<Card>(ResourceKind::Card, &request.card);
        tokio::pin!(items_call, address_call, customer_call, card_call);

        let mut items: Slot<Vec<Item>> = None;
        let mut address: Slot<Address> = None;
        let mut customer: Slot<Customer> = None;
        let mut card: Slot<Card> = None;
        let (items, address, customer, card) = loop {
            let outcomes = [
                Outcome::of(&items),
                Outcome::of(&address),
                Outcome::of(&customer),
                Outcome::of(&card),
            ];
            for (kind, outcome) in ResourceKind::ALL.into_iter().zip(outcomes) {
                run.reach(SagaState::fetching(kind));
                match outcome {
                    Outcome::Pending => break,
                    Outcome::Fetched => {}
                    Outcome::Failed(err) => return Err(err.into()),
                }
            }

            match (items.take(), address.take(), customer.take(), card.take()) {
                (Some(Ok(i)), Some(Ok(a)), Some(Ok(c)), Some(Ok(k))) => break (i, a, c, k),
                (i, a, c, k) => (items, address, customer, card) = (i, a, c, k),
            }

            tokio::select! {
                result = &mut items_call, if items.is_none() => items = Some(result),
                result = &mut address_call, if address.is_none() => address = Some(result),
                result = &mut customer_call, if customer.is_none() => customer = Some(result),
                result = &mut card_call, if card.is_none() => card = Some(result),
            }
        };

        run.advance(SagaState::CalculatingTotal);
        let total = pricing::total(&items).map_err(|err| {
            FetchError::new(
                ResourceKind::Items,
                &request.items,
                CallError::Decode(err.to_string()),
            )
        })?;

        run.advance(SagaState::AuthorizingPayment);
        let verdict = self
            .within_deadline(self.payment.authorize(&address, &customer, &card, total))
            .await
            .and_then(|r| r)
            .map_err(SagaError::AuthorizationUnavailable)?;
        if !verdict.authorised {
            return Err(SagaError::PaymentDeclined {
                message: verdict.message,
            });
        }

        run.advance(SagaState::Persisting);
        let order = CustomerOrder::assemble(customer, address, card, items, total, Utc::now());
        let inserted = match self.within_deadline(self.store.insert(&order)).await {
            Ok(inserted) => inserted,
            Err(timeout) => Err(OrderStoreError::Unavailable(format!("insert {timeout}"))),
        };
        match inserted {
            Ok(id) => Ok(order.persisted_as(id)),
            Err(source) => Err(SagaError::Persistence {
                order: Box::new(order),
                source,
            }),
        }
    }

    async fn fetch<T>(&self, kind: ResourceKind, locator: &str) -> std::result::Result<T, FetchError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.within_deadline(self.resources.fetch::<T>(kind, locator))
            .await
            .map_err(|timeout| FetchError::new(kind, locator, timeout))?
    }

    async fn within_deadline<F>(&self, call: F) -> std::result::Result<F::Output, CallError>
    where
        F: Future,
    {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| CallError::Timeout(self.call_timeout))
    }
}

/// The result of one fetch, once it has arrived.
type Slot<T> = Option<std::result::Result<T, FetchError>>;

/// Where a single fetch stands.
enum Outcome {
    Pending,
    Fetched,
    Failed(FetchError),
}

impl Outcome {
    fn of<T>(slot: &Slot<T>) -> Self {
        match slot {
            None => Outcome::Pending,
            Some(Ok(_)) => Outcome::Fetched,
            Some(Err(err)) => Outcome::Failed(err.clone()),
        }
    }
}

/// Tracks the state of a single saga run.
#[derive(Debug, Default)]
struct SagaRun {
    state: SagaState,
}

impl SagaRun {
    fn state(&self) -> SagaState {
        self.state
    }

    fn advance(&mut self, to: SagaState) {
        debug_assert!(
            self.state.can_transition_to(to),
            "invalid saga transition {} -> {}",
            self.state,
            to
        );
        tracing::debug!(from = %self.state, to = %to, remote = to.is_remote(), "saga transition");
        self.state = to;
    }

    /// Walks the success path up to `target`; a no-op once it is reached.
    fn reach(&mut self, target: SagaState) {
        while self.state != target {
            match self.state.next() {
                Some(next) => self.advance(next),
                None => break,
            }
        }
    }
}
