//! Order record and creation draft.

use chrono::{DateTime, Utc};
use common::{CarId, OrderId, UserId, Version};
use serde::{Deserialize, Serialize};

use super::{Money, OrderError, OrderStatus, RentalWindow};

/// A candidate order as submitted by a caller.
///
/// Carries no identifier, status, or timestamps; those are assigned when
/// the order is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// The paying customer.
    pub user_id: UserId,

    /// The car being rented.
    pub car_id: CarId,

    /// Refundable deposit, zero or more.
    pub deposit: Money,

    /// Total rental price, strictly positive.
    pub total_price: Money,

    /// The requested rental interval.
    pub window: RentalWindow,
}

impl OrderDraft {
    /// Creates a new draft.
    pub fn new(
        user_id: UserId,
        car_id: CarId,
        deposit: Money,
        total_price: Money,
        window: RentalWindow,
    ) -> Self {
        Self {
            user_id,
            car_id,
            deposit,
            total_price,
            window,
        }
    }

    /// Validates the draft's structural invariants.
    pub fn validate(&self) -> Result<(), OrderError> {
        if !self.total_price.is_positive() {
            return Err(OrderError::InvalidPrice {
                cents: self.total_price.cents(),
            });
        }
        if self.deposit.is_negative() {
            return Err(OrderError::InvalidDeposit {
                cents: self.deposit.cents(),
            });
        }
        Ok(())
    }
}

/// A persisted rental order.
///
/// Created from an [`OrderDraft`] when first stored; thereafter mutated
/// only through status writes, which bump the [`Version`] used for
/// optimistic concurrency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    car_id: CarId,
    status: OrderStatus,
    deposit: Money,
    total_price: Money,
    window: RentalWindow,
    version: Version,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new Pending order from a draft.
    pub fn create(id: OrderId, draft: OrderDraft) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id: draft.user_id,
            car_id: draft.car_id,
            status: OrderStatus::Pending,
            deposit: draft.deposit,
            total_price: draft.total_price,
            window: draft.window,
            version: Version::first(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the order identifier.
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Returns the paying customer.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the rented car.
    pub fn car_id(&self) -> CarId {
        self.car_id
    }

    /// Returns the current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the deposit.
    pub fn deposit(&self) -> Money {
        self.deposit
    }

    /// Returns the total price.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Returns the rental window.
    pub fn window(&self) -> RentalWindow {
        self.window
    }

    /// Returns the current version for optimistic concurrency.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns when the order was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the order was last written.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Records a status write: sets the status, bumps the version, and
    /// refreshes the updated timestamp.
    ///
    /// Transition legality and version checks are the caller's concern;
    /// this only applies the write.
    pub fn apply_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.version = self.version.next();
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn window() -> RentalWindow {
        let start = Utc::now();
        RentalWindow::new(start, start + Duration::days(2)).unwrap()
    }

    fn draft() -> OrderDraft {
        OrderDraft::new(
            UserId::new(),
            CarId::new(),
            Money::zero(),
            Money::from_dollars(100),
            window(),
        )
    }

    #[test]
    fn test_valid_draft_passes_validation() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_draft_rejects_non_positive_price() {
        let mut d = draft();
        d.total_price = Money::zero();
        assert!(matches!(
            d.validate(),
            Err(OrderError::InvalidPrice { cents: 0 })
        ));

        d.total_price = Money::from_cents(-100);
        assert!(matches!(
            d.validate(),
            Err(OrderError::InvalidPrice { cents: -100 })
        ));
    }

    #[test]
    fn test_draft_rejects_negative_deposit() {
        let mut d = draft();
        d.deposit = Money::from_cents(-1);
        assert!(matches!(
            d.validate(),
            Err(OrderError::InvalidDeposit { cents: -1 })
        ));
    }

    #[test]
    fn test_create_assigns_pending_and_first_version() {
        let d = draft();
        let id = OrderId::new();
        let order = Order::create(id, d.clone());

        assert_eq!(order.id(), id);
        assert_eq!(order.user_id(), d.user_id);
        assert_eq!(order.car_id(), d.car_id);
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.total_price(), d.total_price);
        assert_eq!(order.version(), Version::first());
        assert_eq!(order.created_at(), order.updated_at());
    }

    #[test]
    fn test_apply_status_bumps_version() {
        let mut order = Order::create(OrderId::new(), draft());
        let before = order.version();

        order.apply_status(OrderStatus::Confirmed);

        assert_eq!(order.status(), OrderStatus::Confirmed);
        assert_eq!(order.version(), before.next());
    }

    #[test]
    fn test_order_serialization_roundtrip() {
        let order = Order::create(OrderId::new(), draft());
        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deserialized);
    }
}
