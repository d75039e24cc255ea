use common::{CarId, OrderId, UserId};
use domain::{Money, OrderError, OrderStatus};
use order_store::StoreError;
use thiserror::Error;

/// Errors that can occur during order fulfillment.
#[derive(Debug, Error)]
pub enum FulfillmentError {
    /// The submitted order data failed structural validation.
    #[error("Invalid order data: {0}")]
    InvalidOrderData(#[from] OrderError),

    /// The requested car is not available for the rental window.
    #[error("Car not available: {0}")]
    CarUnavailable(CarId),

    /// The user's balance does not cover the total price.
    #[error("Insufficient funds for user {user_id}: {required} required")]
    InsufficientFunds { user_id: UserId, required: Money },

    /// No order exists with the given identifier.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order is in a terminal status and cannot be mutated.
    #[error("Order {id} is already closed ({status})")]
    OrderAlreadyClosed { id: OrderId, status: OrderStatus },

    /// The requested status change is not in the transition table.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// An error occurred in the order store.
    #[error("Order store error: {0}")]
    Store(#[from] StoreError),

    /// The car availability gateway failed.
    #[error("Car gateway error: {0}")]
    CarGateway(String),

    /// The balance ledger failed.
    #[error("Balance ledger error: {0}")]
    Ledger(String),

    /// The transaction recorder failed.
    #[error("Transaction recorder error: {0}")]
    Recorder(String),
}

/// Result type for fulfillment operations.
pub type Result<T> = std::result::Result<T, FulfillmentError>;
