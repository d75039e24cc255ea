//! Order record and related types.

mod record;
mod state;
mod value_objects;

pub use record::{Order, OrderDraft};
pub use state::OrderStatus;
pub use value_objects::{Money, RentalWindow};

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur when validating order data.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Total price must be strictly positive.
    #[error("Invalid total price: {cents} cents (must be greater than 0)")]
    InvalidPrice { cents: i64 },

    /// Deposit must not be negative.
    #[error("Invalid deposit: {cents} cents (must not be negative)")]
    InvalidDeposit { cents: i64 },

    /// Rental window must end after it starts.
    #[error("Invalid rental window: end {end} is not after start {start}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Status string did not match any known status.
    #[error("Unknown order status: {0}")]
    UnknownStatus(String),
}
