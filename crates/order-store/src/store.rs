use async_trait::async_trait;
use common::{OrderId, UserId, Version};
use domain::{Order, OrderDraft, OrderStatus};

use crate::Result;

/// Core trait for order store implementations.
///
/// The store owns the durable order records and their lifecycle state.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a draft as a new Pending order.
    ///
    /// The store assigns the identifier, the first version, and the
    /// creation timestamp. Returns the stored order.
    async fn create(&self, draft: OrderDraft) -> Result<Order>;

    /// Retrieves an order by its identifier.
    ///
    /// Returns None if the order doesn't exist.
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;

    /// Retrieves all orders placed by a user, oldest first.
    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<Order>>;

    /// Writes a new status for an order, checked against `expected`.
    ///
    /// Fails with `VersionConflict` if the stored version does not match,
    /// so a stale writer can never silently overwrite a concurrent
    /// status change. On success the stored version is bumped and the
    /// updated order is returned.
    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        expected: Version,
    ) -> Result<Order>;

    /// Retrieves every order in the store, oldest first.
    async fn list_all(&self) -> Result<Vec<Order>>;
}
