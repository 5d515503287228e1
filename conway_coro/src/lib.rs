//! Drives a [`conway_engine::GridEngine`] for an interactive or headless front end.
//!
//! [`Simulation`] serializes edits and steps on one shared engine and runs at
//! most one paced stepping loop at a time, stopped cooperatively.

pub mod config;
mod error;
pub mod simulation;

pub use error::{DriverError, DriverResult};
pub use simulation::{Rate, RunOptions, RunOutcome, SharedEngine, Simulation, StopReason};
