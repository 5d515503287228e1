//! Conway's Game of Life (B3/S23) on a fixed-size, non-wrapping grid.
//!
//! [`GridEngine`] owns the cells and steps them one generation at a time
//! with a double buffer. Front ends hold the engine and go through its
//! accessors; they never reach into the grid storage.

mod cell;
mod engine;
mod error;
mod grid;
pub mod history;
pub mod patterns;
mod rule;

pub use cell::CellState;
pub use engine::GridEngine;
pub use error::{EngineError, EngineResult};
pub use grid::Grid;
pub use history::CycleDetector;
pub use patterns::Pattern;
pub use rule::{Life, Rule};

/// Side length of the default square grid.
pub const DEFAULT_GRID_SIZE: usize = 50;
