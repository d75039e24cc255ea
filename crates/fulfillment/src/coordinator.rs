//! Order coordinator orchestrating the fulfillment saga.

use common::{OrderId, UserId};
use domain::{Order, OrderDraft, OrderStatus, Transaction};
use order_store::OrderStore;

use crate::error::{FulfillmentError, Result};
use crate::saga::{SagaExecution, Step};
use crate::services::car::CarAvailabilityGateway;
use crate::services::ledger::BalanceLedger;
use crate::services::transactions::TransactionRecorder;

/// Orchestrates order creation, status changes, and cancellation across
/// the order store, car gateway, balance ledger, and transaction log.
///
/// Creation runs as a 4-step saga (persist → debit → reserve → record)
/// with compensating actions applied in reverse when a step fails. All
/// collaborators are injected at construction.
pub struct OrderCoordinator<S, C, L, T>
where
    S: OrderStore,
    C: CarAvailabilityGateway,
    L: BalanceLedger,
    T: TransactionRecorder,
{
    store: S,
    cars: C,
    ledger: L,
    transactions: T,
}

impl<S, C, L, T> OrderCoordinator<S, C, L, T>
where
    S: OrderStore,
    C: CarAvailabilityGateway,
    L: BalanceLedger,
    T: TransactionRecorder,
{
    /// Creates a new order coordinator.
    pub fn new(store: S, cars: C, ledger: L, transactions: T) -> Self {
        Self {
            store,
            cars,
            ledger,
            transactions,
        }
    }

    /// Creates an order from a draft, driving the full fulfillment saga.
    ///
    /// Preconditions (validation, availability, balance) are checked
    /// before the first durable write, so their failures leave no trace.
    /// After the order is persisted, any step failure compensates the
    /// completed steps in reverse and leaves the order Cancelled.
    ///
    /// Returns the new order's identifier on full success.
    #[tracing::instrument(
        skip(self, draft),
        fields(user_id = %draft.user_id, car_id = %draft.car_id)
    )]
    pub async fn create_order(&self, draft: OrderDraft) -> Result<OrderId> {
        metrics::counter!("order_sagas_total").increment(1);
        let saga_start = std::time::Instant::now();

        draft.validate()?;

        if !self
            .cars
            .check_availability(draft.car_id, &draft.window)
            .await?
        {
            return Err(FulfillmentError::CarUnavailable(draft.car_id));
        }

        if !self
            .ledger
            .check_balance(draft.user_id, draft.total_price)
            .await?
        {
            return Err(FulfillmentError::InsufficientFunds {
                user_id: draft.user_id,
                required: draft.total_price,
            });
        }

        let user_id = draft.user_id;
        let car_id = draft.car_id;
        let total = draft.total_price;

        let mut saga = SagaExecution::new();
        saga.begin();

        // Step 1: persist the order (first durable side effect)
        tracing::info!(step = Step::PersistOrder.name(), "saga step started");
        let order = match self.store.create(draft).await {
            Ok(order) => {
                saga.complete_step(Step::PersistOrder);
                order
            }
            Err(e) => {
                metrics::counter!("order_sagas_failed").increment(1);
                tracing::warn!(step = Step::PersistOrder.name(), error = %e, "order saga failed");
                return Err(e.into());
            }
        };
        let order_id = order.id();

        // Step 2: debit the balance
        tracing::info!(step = Step::DebitBalance.name(), "saga step started");
        if let Err(e) = self.ledger.debit(user_id, total).await {
            saga.fail_step(Step::DebitBalance, e.to_string());
            self.compensate(&mut saga, &order).await;
            metrics::histogram!("order_saga_duration_seconds")
                .record(saga_start.elapsed().as_secs_f64());
            return Err(e);
        }
        saga.complete_step(Step::DebitBalance);

        // Step 3: reserve the car
        tracing::info!(step = Step::ReserveCar.name(), "saga step started");
        if let Err(e) = self.cars.reserve(car_id).await {
            saga.fail_step(Step::ReserveCar, e.to_string());
            self.compensate(&mut saga, &order).await;
            metrics::histogram!("order_saga_duration_seconds")
                .record(saga_start.elapsed().as_secs_f64());
            return Err(e);
        }
        saga.complete_step(Step::ReserveCar);

        // Step 4: record the payment
        tracing::info!(step = Step::RecordTransaction.name(), "saga step started");
        if let Err(e) = self
            .transactions
            .record(Transaction::order_payment(user_id, order_id, total))
            .await
        {
            saga.fail_step(Step::RecordTransaction, e.to_string());
            self.compensate(&mut saga, &order).await;
            metrics::histogram!("order_saga_duration_seconds")
                .record(saga_start.elapsed().as_secs_f64());
            return Err(e);
        }
        saga.complete_step(Step::RecordTransaction);

        saga.finish();
        let duration = saga_start.elapsed().as_secs_f64();
        metrics::histogram!("order_saga_duration_seconds").record(duration);
        metrics::counter!("order_sagas_completed").increment(1);
        tracing::info!(%order_id, duration, "order saga completed");

        Ok(order_id)
    }

    /// Runs compensating actions in reverse order of completed steps.
    ///
    /// Compensation failures are logged and the chain continues; they
    /// never mask the step error that triggered compensation.
    #[tracing::instrument(skip(self, saga, order), fields(order_id = %order.id()))]
    async fn compensate(&self, saga: &mut SagaExecution, order: &Order) {
        let reason = saga.failure_reason().unwrap_or("unknown").to_string();
        metrics::counter!("order_saga_compensations_total").increment(1);

        let completed: Vec<Step> = saga.completed_steps().to_vec();
        for step in completed.iter().rev() {
            match step {
                Step::RecordTransaction => {
                    // Append-only log, nothing to undo
                }
                Step::ReserveCar => {
                    if let Err(e) = self.cars.release(order.car_id()).await {
                        tracing::warn!(step = step.name(), error = %e, "compensation step failed");
                    }
                }
                Step::DebitBalance => {
                    if let Err(e) = self
                        .ledger
                        .credit(order.user_id(), order.total_price())
                        .await
                    {
                        tracing::warn!(step = step.name(), error = %e, "compensation step failed");
                    }
                }
                Step::PersistOrder => {
                    // Orders are never deleted; the row stays as a Cancelled tombstone
                    if let Err(e) = self
                        .store
                        .update_status(order.id(), OrderStatus::Cancelled, order.version())
                        .await
                    {
                        tracing::warn!(step = step.name(), error = %e, "compensation step failed");
                    }
                }
            }
        }

        saga.finish_compensated();
        metrics::counter!("order_sagas_failed").increment(1);
        tracing::warn!(reason = %reason, "order saga failed");
    }

    /// Changes an order's status.
    ///
    /// Rejects mutations of terminal orders with `OrderAlreadyClosed` and
    /// transitions outside the state-machine table with
    /// `InvalidTransition`. The write is version-checked, so a concurrent
    /// writer surfaces as a store conflict instead of a lost update.
    /// Moving to a terminal status additionally releases the car.
    #[tracing::instrument(skip(self))]
    pub async fn update_order_status(&self, id: OrderId, new_status: OrderStatus) -> Result<()> {
        let order = self
            .store
            .get(id)
            .await?
            .ok_or(FulfillmentError::OrderNotFound(id))?;

        if order.status().is_terminal() {
            return Err(FulfillmentError::OrderAlreadyClosed {
                id,
                status: order.status(),
            });
        }

        if !order.status().can_transition_to(new_status) {
            return Err(FulfillmentError::InvalidTransition {
                from: order.status(),
                to: new_status,
            });
        }

        self.store
            .update_status(id, new_status, order.version())
            .await?;
        metrics::counter!("order_status_updates_total").increment(1);
        tracing::info!(status = %new_status, "order status updated");

        // The status write above has already committed
        if new_status.is_terminal()
            && let Err(e) = self.cars.release(order.car_id()).await
        {
            tracing::warn!(error = %e, "car release failed after status write");
            return Err(e);
        }

        Ok(())
    }

    /// Cancels an order, releasing its car and refunding its total price.
    ///
    /// The version-checked status write is the commit point; the car
    /// release, refund credit, and refund record that follow are
    /// best-effort. Their failures are logged and the first one is
    /// returned after all three have been attempted.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<()> {
        let order = self
            .store
            .get(id)
            .await?
            .ok_or(FulfillmentError::OrderNotFound(id))?;

        if order.status().is_terminal() {
            return Err(FulfillmentError::OrderAlreadyClosed {
                id,
                status: order.status(),
            });
        }

        self.store
            .update_status(id, OrderStatus::Cancelled, order.version())
            .await?;
        metrics::counter!("order_cancellations_total").increment(1);
        tracing::info!("order cancelled");

        let mut first_error = None;

        if let Err(e) = self.cars.release(order.car_id()).await {
            tracing::warn!(error = %e, "car release failed during cancellation");
            first_error.get_or_insert(e);
        }

        if let Err(e) = self
            .ledger
            .credit(order.user_id(), order.total_price())
            .await
        {
            tracing::warn!(error = %e, "refund credit failed during cancellation");
            first_error.get_or_insert(e);
        }

        if let Err(e) = self
            .transactions
            .record(Transaction::order_refund(
                order.user_id(),
                id,
                order.total_price(),
            ))
            .await
        {
            tracing::warn!(error = %e, "refund record failed during cancellation");
            first_error.get_or_insert(e);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Retrieves an order by its identifier.
    pub async fn get_order(&self, id: OrderId) -> Result<Order> {
        self.store
            .get(id)
            .await?
            .ok_or(FulfillmentError::OrderNotFound(id))
    }

    /// Retrieves all orders placed by a user.
    pub async fn get_orders_by_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        Ok(self.store.get_by_user(user_id).await?)
    }

    /// Retrieves every order.
    pub async fn list_all_orders(&self) -> Result<Vec<Order>> {
        Ok(self.store.list_all().await?)
    }
}
