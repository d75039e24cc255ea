//! Saga step and state bookkeeping.

use serde::{Deserialize, Serialize};

/// A forward step of the order creation saga.
///
/// Steps execute in declaration order; compensation runs over the
/// completed steps in reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Persist the draft as a Pending order.
    PersistOrder,

    /// Debit the user's balance by the total price.
    DebitBalance,

    /// Mark the car Reserved.
    ReserveCar,

    /// Append the order payment transaction.
    RecordTransaction,
}

impl Step {
    /// Returns the step name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Step::PersistOrder => "persist_order",
            Step::DebitBalance => "debit_balance",
            Step::ReserveCar => "reserve_car",
            Step::RecordTransaction => "record_transaction",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The state of a saga in its lifecycle.
///
/// State transitions:
/// ```text
/// NotStarted ──► Running ──┬──► Completed
///                          └──► Compensating ──► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SagaState {
    /// Saga has not started yet.
    #[default]
    NotStarted,

    /// Saga steps are being executed.
    Running,

    /// A step failed and compensating actions are in progress.
    Compensating,

    /// All steps completed successfully (terminal state).
    Completed,

    /// Compensation finished after a failure (terminal state).
    Failed,
}

impl SagaState {
    /// Returns true if the saga can begin running.
    pub fn can_run(&self) -> bool {
        matches!(self, SagaState::NotStarted)
    }

    /// Returns true if the saga can begin compensation.
    pub fn can_compensate(&self) -> bool {
        matches!(self, SagaState::Running)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SagaState::Completed | SagaState::Failed)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SagaState::NotStarted => "NotStarted",
            SagaState::Running => "Running",
            SagaState::Compensating => "Compensating",
            SagaState::Completed => "Completed",
            SagaState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for SagaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bookkeeping for one saga run.
///
/// Tracks which forward steps have completed so that compensation can
/// walk them in reverse, plus the failure reason once a step fails.
#[derive(Debug, Clone, Default)]
pub struct SagaExecution {
    state: SagaState,
    completed: Vec<Step>,
    failure_reason: Option<String>,
}

impl SagaExecution {
    /// Creates a saga that has not started yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the saga as running.
    pub fn begin(&mut self) {
        if self.state.can_run() {
            self.state = SagaState::Running;
        }
    }

    /// Records a completed forward step.
    pub fn complete_step(&mut self, step: Step) {
        self.completed.push(step);
    }

    /// Records a step failure and enters compensation.
    pub fn fail_step(&mut self, step: Step, reason: impl Into<String>) {
        self.failure_reason = Some(format!("{}: {}", step.name(), reason.into()));
        if self.state.can_compensate() {
            self.state = SagaState::Compensating;
        }
    }

    /// Marks the saga as completed.
    pub fn finish(&mut self) {
        self.state = SagaState::Completed;
    }

    /// Marks the saga as failed once compensation has run.
    pub fn finish_compensated(&mut self) {
        self.state = SagaState::Failed;
    }

    /// Returns the current saga state.
    pub fn state(&self) -> SagaState {
        self.state
    }

    /// Returns the completed forward steps in execution order.
    pub fn completed_steps(&self) -> &[Step] {
        &self.completed
    }

    /// Returns the failure reason, if a step has failed.
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }
}
