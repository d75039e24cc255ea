//! Car availability gateway trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::CarId;
use domain::RentalWindow;

use crate::error::FulfillmentError;

/// Reservation status of a car, owned by the car subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarStatus {
    /// Car can be reserved.
    Available,

    /// Car is held by a pending or confirmed order.
    Reserved,

    /// Car has left the rental fleet.
    Sold,
}

impl CarStatus {
    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CarStatus::Available => "available",
            CarStatus::Reserved => "reserved",
            CarStatus::Sold => "sold",
        }
    }
}

impl std::fmt::Display for CarStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for car availability operations.
#[async_trait]
pub trait CarAvailabilityGateway: Send + Sync {
    /// Reports whether the car can be reserved for the window.
    async fn check_availability(
        &self,
        car_id: CarId,
        window: &RentalWindow,
    ) -> Result<bool, FulfillmentError>;

    /// Marks the car Reserved.
    ///
    /// The transition is an atomic compare-and-set from Available; the
    /// second of two racing callers fails with `CarUnavailable`.
    async fn reserve(&self, car_id: CarId) -> Result<(), FulfillmentError>;

    /// Returns the car to Available.
    async fn release(&self, car_id: CarId) -> Result<(), FulfillmentError>;
}

#[derive(Debug, Default)]
struct InMemoryCarState {
    cars: HashMap<CarId, CarStatus>,
    fail_on_reserve: bool,
    fail_on_release: bool,
    check_calls: usize,
    reserve_calls: usize,
    release_calls: usize,
}

/// In-memory car gateway for testing.
///
/// Availability is keyed on status alone; the window parameter is part
/// of the contract for real scheduling backends.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCarGateway {
    state: Arc<RwLock<InMemoryCarState>>,
}

impl InMemoryCarGateway {
    /// Creates a new in-memory car gateway with no cars.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a car as Available.
    pub fn add_car(&self, car_id: CarId) {
        self.state
            .write()
            .unwrap()
            .cars
            .insert(car_id, CarStatus::Available);
    }

    /// Sets a car's status directly.
    pub fn set_status(&self, car_id: CarId, status: CarStatus) {
        self.state.write().unwrap().cars.insert(car_id, status);
    }

    /// Returns a car's current status.
    pub fn status(&self, car_id: CarId) -> Option<CarStatus> {
        self.state.read().unwrap().cars.get(&car_id).copied()
    }

    /// Configures the gateway to fail on the next reserve call.
    pub fn set_fail_on_reserve(&self, fail: bool) {
        self.state.write().unwrap().fail_on_reserve = fail;
    }

    /// Configures the gateway to fail on the next release call.
    pub fn set_fail_on_release(&self, fail: bool) {
        self.state.write().unwrap().fail_on_release = fail;
    }

    /// Returns the number of Reserved cars.
    pub fn reserved_count(&self) -> usize {
        self.state
            .read()
            .unwrap()
            .cars
            .values()
            .filter(|s| **s == CarStatus::Reserved)
            .count()
    }

    /// Returns how many availability checks have been made.
    pub fn check_call_count(&self) -> usize {
        self.state.read().unwrap().check_calls
    }

    /// Returns how many reserve calls have been made.
    pub fn reserve_call_count(&self) -> usize {
        self.state.read().unwrap().reserve_calls
    }

    /// Returns how many release calls have been made.
    pub fn release_call_count(&self) -> usize {
        self.state.read().unwrap().release_calls
    }
}

#[async_trait]
impl CarAvailabilityGateway for InMemoryCarGateway {
    async fn check_availability(
        &self,
        car_id: CarId,
        _window: &RentalWindow,
    ) -> Result<bool, FulfillmentError> {
        let mut state = self.state.write().unwrap();
        state.check_calls += 1;
        Ok(state.cars.get(&car_id) == Some(&CarStatus::Available))
    }

    async fn reserve(&self, car_id: CarId) -> Result<(), FulfillmentError> {
        let mut state = self.state.write().unwrap();
        state.reserve_calls += 1;

        if state.fail_on_reserve {
            return Err(FulfillmentError::CarGateway(
                "reservation backend unavailable".to_string(),
            ));
        }

        match state.cars.get_mut(&car_id) {
            Some(status @ CarStatus::Available) => {
                *status = CarStatus::Reserved;
                Ok(())
            }
            _ => Err(FulfillmentError::CarUnavailable(car_id)),
        }
    }

    async fn release(&self, car_id: CarId) -> Result<(), FulfillmentError> {
        let mut state = self.state.write().unwrap();
        state.release_calls += 1;

        if state.fail_on_release {
            return Err(FulfillmentError::CarGateway(
                "reservation backend unavailable".to_string(),
            ));
        }

        if let Some(status) = state.cars.get_mut(&car_id) {
            *status = CarStatus::Available;
        }
        Ok(())
    }
}
