// error.rs - Errors raised by the engine

use thiserror::Error;

/// Caller errors. Stepping itself never fails on a valid grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A grid needs at least one row and one column.
    #[error("invalid grid dimensions {rows}x{cols}: both must be positive")]
    InvalidDimension { rows: usize, cols: usize },

    /// Coordinate outside `[0, rows) x [0, cols)`.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: isize,
        col: isize,
        rows: usize,
        cols: usize,
    },

    /// Random fill density must be a probability.
    #[error("density {0} is not within [0, 1]")]
    InvalidDensity(f64),

    /// Text grid with ragged rows or unknown characters.
    #[error("invalid pattern text: {0}")]
    InvalidPattern(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
