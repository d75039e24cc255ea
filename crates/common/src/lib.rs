//! Shared types for the rental fulfillment system.
//!
//! Identifier newtypes keep order, user, and car references from being
//! mixed up, and [`Version`] carries the optimistic-concurrency counter
//! used by the order store.

pub mod types;
pub mod version;

pub use types::{CarId, OrderId, UserId};
pub use version::Version;
