//! Transaction recorder trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::UserId;
use domain::Transaction;

use crate::error::FulfillmentError;

/// Trait for appending financial transaction records.
///
/// The log is append-only; records are never mutated or deleted.
#[async_trait]
pub trait TransactionRecorder: Send + Sync {
    /// Appends a transaction to the audit log.
    async fn record(&self, transaction: Transaction) -> Result<(), FulfillmentError>;
}

#[derive(Debug, Default)]
struct InMemoryRecorderState {
    transactions: Vec<Transaction>,
    fail_on_record: bool,
    record_calls: usize,
}

/// In-memory transaction recorder for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransactionRecorder {
    state: Arc<RwLock<InMemoryRecorderState>>,
}

impl InMemoryTransactionRecorder {
    /// Creates a new empty in-memory recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the recorder to fail on the next record call.
    pub fn set_fail_on_record(&self, fail: bool) {
        self.state.write().unwrap().fail_on_record = fail;
    }

    /// Returns the number of recorded transactions.
    pub fn transaction_count(&self) -> usize {
        self.state.read().unwrap().transactions.len()
    }

    /// Returns all transactions recorded for a user, oldest first.
    pub fn transactions_for(&self, user_id: UserId) -> Vec<Transaction> {
        self.state
            .read()
            .unwrap()
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Returns how many record calls have been made.
    pub fn record_call_count(&self) -> usize {
        self.state.read().unwrap().record_calls
    }
}

#[async_trait]
impl TransactionRecorder for InMemoryTransactionRecorder {
    async fn record(&self, transaction: Transaction) -> Result<(), FulfillmentError> {
        let mut state = self.state.write().unwrap();
        state.record_calls += 1;

        if state.fail_on_record {
            return Err(FulfillmentError::Recorder(
                "audit log unavailable".to_string(),
            ));
        }

        state.transactions.push(transaction);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::OrderId;
    use domain::{Money, TransactionKind};

    #[tokio::test]
    async fn test_record_appends() {
        let recorder = InMemoryTransactionRecorder::new();
        let user = UserId::new();
        let order = OrderId::new();

        recorder
            .record(Transaction::order_payment(
                user,
                order,
                Money::from_dollars(100),
            ))
            .await
            .unwrap();

        assert_eq!(recorder.transaction_count(), 1);
        let recorded = recorder.transactions_for(user);
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].kind, TransactionKind::OrderPayment);
        assert_eq!(recorded[0].amount, Money::from_dollars(100));
    }

    #[tokio::test]
    async fn test_fail_on_record_drops_nothing() {
        let recorder = InMemoryTransactionRecorder::new();
        recorder.set_fail_on_record(true);

        let result = recorder
            .record(Transaction::order_payment(
                UserId::new(),
                OrderId::new(),
                Money::from_dollars(10),
            ))
            .await;

        assert!(matches!(result, Err(FulfillmentError::Recorder(_))));
        assert_eq!(recorder.transaction_count(), 0);
        assert_eq!(recorder.record_call_count(), 1);
    }

    #[tokio::test]
    async fn test_transactions_for_filters_by_user() {
        let recorder = InMemoryTransactionRecorder::new();
        let user = UserId::new();

        recorder
            .record(Transaction::order_payment(
                user,
                OrderId::new(),
                Money::from_dollars(10),
            ))
            .await
            .unwrap();
        recorder
            .record(Transaction::order_payment(
                UserId::new(),
                OrderId::new(),
                Money::from_dollars(20),
            ))
            .await
            .unwrap();

        assert_eq!(recorder.transaction_count(), 2);
        assert_eq!(recorder.transactions_for(user).len(), 1);
    }
}
