// error.rs - Errors raised by the simulation driver

use conway_engine::EngineError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    /// Only one run loop may be active per simulation.
    #[error("a run is already in progress")]
    AlreadyRunning,

    /// Single steps and clears are disabled while a run is active.
    #[error("simulation is running; stop it first")]
    Busy,

    #[error("rate {0} is outside 1..=10")]
    InvalidRate(u32),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type DriverResult<T> = Result<T, DriverError>;
