//! Balance ledger trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::UserId;
use domain::Money;

use crate::error::FulfillmentError;

/// Trait for user balance operations.
///
/// The ledger owns the authoritative balance value. `debit` performs an
/// atomic check-and-deduct, so `check_balance` is only an advisory probe
/// and a concurrent drain between the two still fails safely.
#[async_trait]
pub trait BalanceLedger: Send + Sync {
    /// Reports whether the user's balance covers `amount`.
    async fn check_balance(&self, user_id: UserId, amount: Money)
    -> Result<bool, FulfillmentError>;

    /// Atomically deducts `amount` from the user's balance.
    ///
    /// Fails with `InsufficientFunds` if the balance does not cover the
    /// amount; the balance is left untouched in that case.
    async fn debit(&self, user_id: UserId, amount: Money) -> Result<(), FulfillmentError>;

    /// Adds `amount` back to the user's balance.
    async fn credit(&self, user_id: UserId, amount: Money) -> Result<(), FulfillmentError>;
}

#[derive(Debug, Default)]
struct InMemoryLedgerState {
    balances: HashMap<UserId, Money>,
    fail_on_debit: bool,
    fail_on_credit: bool,
    check_calls: usize,
    debit_calls: usize,
    credit_calls: usize,
}

/// In-memory balance ledger for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBalanceLedger {
    state: Arc<RwLock<InMemoryLedgerState>>,
}

impl InMemoryBalanceLedger {
    /// Creates a new in-memory ledger with no balances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a user's balance directly.
    pub fn set_balance(&self, user_id: UserId, balance: Money) {
        self.state.write().unwrap().balances.insert(user_id, balance);
    }

    /// Returns a user's current balance (zero if never funded).
    pub fn balance_of(&self, user_id: UserId) -> Money {
        self.state
            .read()
            .unwrap()
            .balances
            .get(&user_id)
            .copied()
            .unwrap_or_default()
    }

    /// Configures the ledger to fail on the next debit call.
    pub fn set_fail_on_debit(&self, fail: bool) {
        self.state.write().unwrap().fail_on_debit = fail;
    }

    /// Configures the ledger to fail on the next credit call.
    pub fn set_fail_on_credit(&self, fail: bool) {
        self.state.write().unwrap().fail_on_credit = fail;
    }

    /// Returns how many balance checks have been made.
    pub fn check_call_count(&self) -> usize {
        self.state.read().unwrap().check_calls
    }

    /// Returns how many debit calls have been made.
    pub fn debit_call_count(&self) -> usize {
        self.state.read().unwrap().debit_calls
    }

    /// Returns how many credit calls have been made.
    pub fn credit_call_count(&self) -> usize {
        self.state.read().unwrap().credit_calls
    }
}

#[async_trait]
impl BalanceLedger for InMemoryBalanceLedger {
    async fn check_balance(
        &self,
        user_id: UserId,
        amount: Money,
    ) -> Result<bool, FulfillmentError> {
        let mut state = self.state.write().unwrap();
        state.check_calls += 1;
        let balance = state.balances.get(&user_id).copied().unwrap_or_default();
        Ok(balance >= amount)
    }

    async fn debit(&self, user_id: UserId, amount: Money) -> Result<(), FulfillmentError> {
        let mut state = self.state.write().unwrap();
        state.debit_calls += 1;

        if state.fail_on_debit {
            return Err(FulfillmentError::Ledger(
                "ledger backend unavailable".to_string(),
            ));
        }

        let balance = state.balances.entry(user_id).or_default();
        if *balance < amount {
            return Err(FulfillmentError::InsufficientFunds {
                user_id,
                required: amount,
            });
        }
        *balance -= amount;
        Ok(())
    }

    async fn credit(&self, user_id: UserId, amount: Money) -> Result<(), FulfillmentError> {
        let mut state = self.state.write().unwrap();
        state.credit_calls += 1;

        if state.fail_on_credit {
            return Err(FulfillmentError::Ledger(
                "ledger backend unavailable".to_string(),
            ));
        }

        *state.balances.entry(user_id).or_default() += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_debit_and_credit() {
        let ledger = InMemoryBalanceLedger::new();
        let user = UserId::new();
        ledger.set_balance(user, Money::from_dollars(150));

        assert!(
            ledger
                .check_balance(user, Money::from_dollars(100))
                .await
                .unwrap()
        );

        ledger.debit(user, Money::from_dollars(100)).await.unwrap();
        assert_eq!(ledger.balance_of(user), Money::from_dollars(50));

        ledger.credit(user, Money::from_dollars(100)).await.unwrap();
        assert_eq!(ledger.balance_of(user), Money::from_dollars(150));
    }

    #[tokio::test]
    async fn test_debit_rejects_overdraft_and_leaves_balance() {
        let ledger = InMemoryBalanceLedger::new();
        let user = UserId::new();
        ledger.set_balance(user, Money::from_dollars(50));

        let err = ledger
            .debit(user, Money::from_dollars(100))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FulfillmentError::InsufficientFunds { user_id, required }
                if user_id == user && required == Money::from_dollars(100)
        ));
        assert_eq!(ledger.balance_of(user), Money::from_dollars(50));
    }

    #[tokio::test]
    async fn test_unfunded_user_has_zero_balance() {
        let ledger = InMemoryBalanceLedger::new();
        let user = UserId::new();

        assert!(!ledger.check_balance(user, Money::from_cents(1)).await.unwrap());
        assert!(ledger.check_balance(user, Money::zero()).await.unwrap());
    }

    #[tokio::test]
    async fn test_fail_on_debit() {
        let ledger = InMemoryBalanceLedger::new();
        let user = UserId::new();
        ledger.set_balance(user, Money::from_dollars(100));
        ledger.set_fail_on_debit(true);

        let err = ledger
            .debit(user, Money::from_dollars(10))
            .await
            .unwrap_err();
        assert!(matches!(err, FulfillmentError::Ledger(_)));
        assert_eq!(ledger.balance_of(user), Money::from_dollars(100));
    }

    #[tokio::test]
    async fn test_call_counts() {
        let ledger = InMemoryBalanceLedger::new();
        let user = UserId::new();
        ledger.set_balance(user, Money::from_dollars(100));

        ledger
            .check_balance(user, Money::from_dollars(10))
            .await
            .unwrap();
        ledger.debit(user, Money::from_dollars(10)).await.unwrap();
        ledger.credit(user, Money::from_dollars(10)).await.unwrap();

        assert_eq!(ledger.check_call_count(), 1);
        assert_eq!(ledger.debit_call_count(), 1);
        assert_eq!(ledger.credit_call_count(), 1);
    }
}
