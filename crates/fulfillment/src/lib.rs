//! Order fulfillment workflow with compensating rollback.
//!
//! This crate coordinates the multi-step creation of rental orders
//! across the order store, the balance ledger, the car reservation
//! subsystem, and the transaction audit log.
//!
//! The order creation saga follows these steps:
//! 1. Persist the order record
//! 2. Debit the user's balance
//! 3. Reserve the car
//! 4. Record the payment transaction
//!
//! If any step fails, previously completed steps are compensated in
//! reverse order and the order is left as a Cancelled tombstone.

pub mod coordinator;
pub mod error;
pub mod saga;
pub mod services;

pub use coordinator::OrderCoordinator;
pub use error::{FulfillmentError, Result};
pub use saga::{SagaExecution, SagaState, Step};
pub use services::{
    BalanceLedger, CarAvailabilityGateway, CarStatus, InMemoryBalanceLedger, InMemoryCarGateway,
    InMemoryTransactionRecorder, TransactionRecorder,
};
