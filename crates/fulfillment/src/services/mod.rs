//! External service contracts consumed by the coordinator, with
//! in-memory implementations for tests and local runs.

pub mod car;
pub mod ledger;
pub mod transactions;

pub use car::{CarAvailabilityGateway, CarStatus, InMemoryCarGateway};
pub use ledger::{BalanceLedger, InMemoryBalanceLedger};
pub use transactions::{InMemoryTransactionRecorder, TransactionRecorder};
