// cell.rs - The two states a cell can be in

use std::fmt;

/// State of a single cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Alive,
    #[default]
    Dead,
}

impl CellState {
    #[inline]
    pub fn is_alive(self) -> bool {
        self == CellState::Alive
    }

    /// The opposite state; what a pointer click does to a cell.
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            CellState::Alive => CellState::Dead,
            CellState::Dead => CellState::Alive,
        }
    }

    /// Text form used by grid dumps: `#` alive, `.` dead.
    pub fn as_char(self) -> char {
        match self {
            CellState::Alive => '#',
            CellState::Dead => '.',
        }
    }
}

impl From<bool> for CellState {
    fn from(alive: bool) -> Self {
        if alive { CellState::Alive } else { CellState::Dead }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellState::Alive => write!(f, "ALIVE"),
            CellState::Dead => write!(f, "DEAD"),
        }
    }
}
