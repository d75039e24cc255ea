//! Immutable financial transaction records.

use chrono::{DateTime, Utc};
use common::{OrderId, UserId};
use serde::{Deserialize, Serialize};

use crate::Money;

/// The kind of a financial transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Debit taken when an order is created.
    OrderPayment,

    /// Credit returned when an order is cancelled.
    OrderRefund,
}

impl TransactionKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::OrderPayment => "order_payment",
            TransactionKind::OrderRefund => "order_refund",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An append-only record of money moving for a user.
///
/// Once created a transaction is never mutated or deleted; the log exists
/// for audit and history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The user whose balance moved.
    pub user_id: UserId,

    /// Signed amount: positive for debits, negative for credits.
    pub amount: Money,

    /// What the movement was for.
    pub kind: TransactionKind,

    /// Free-text description referencing the order.
    pub description: String,

    /// When the transaction was recorded.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates the payment record for a newly created order.
    pub fn order_payment(user_id: UserId, order_id: OrderId, total: Money) -> Self {
        Self {
            user_id,
            amount: total,
            kind: TransactionKind::OrderPayment,
            description: format!("Payment for order {order_id}"),
            created_at: Utc::now(),
        }
    }

    /// Creates the refund record for a cancelled order.
    pub fn order_refund(user_id: UserId, order_id: OrderId, total: Money) -> Self {
        Self {
            user_id,
            amount: -total,
            kind: TransactionKind::OrderRefund,
            description: format!("Refund for order {order_id}"),
            created_at: Utc::now(),
        }
    }
}
