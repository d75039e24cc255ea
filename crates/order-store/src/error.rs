use common::{OrderId, Version};
use thiserror::Error;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The order was not found in the store.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// A concurrency conflict occurred on a status write.
    /// The expected version did not match the stored version.
    #[error("Version conflict for order {order_id}: expected version {expected}, found {actual}")]
    VersionConflict {
        order_id: OrderId,
        expected: Version,
        actual: Version,
    },
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
