use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, UserId, Version};
use domain::{Order, OrderDraft, OrderStatus};
use tokio::sync::RwLock;

use crate::{Result, StoreError, store::OrderStore};

/// In-memory order store implementation.
///
/// Keeps all orders in a map behind an async lock. Version checks on
/// status writes behave exactly as a durable implementation would, so
/// optimistic-concurrency paths can be exercised in tests.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Clears all orders.
    pub async fn clear(&self) {
        self.orders.write().await.clear();
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, draft: OrderDraft) -> Result<Order> {
        let order = Order::create(OrderId::new(), draft);
        let mut orders = self.orders.write().await;
        orders.insert(order.id(), order.clone());
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut result: Vec<_> = orders
            .values()
            .filter(|o| o.user_id() == user_id)
            .cloned()
            .collect();
        result.sort_by_key(|o| o.created_at());
        Ok(result)
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        expected: Version,
    ) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if order.version() != expected {
            return Err(StoreError::VersionConflict {
                order_id: id,
                expected,
                actual: order.version(),
            });
        }

        order.apply_status(status);
        Ok(order.clone())
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut result: Vec<_> = orders.values().cloned().collect();
        result.sort_by_key(|o| o.created_at());
        Ok(result)
    }
}
