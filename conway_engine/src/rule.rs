// rule.rs - Transition rule applied to every cell

use crate::CellState;

/// Maps a cell's current state and live-neighbor count to its next state.
///
/// Implementations must be pure: the engine evaluates cells in any order,
/// possibly on several threads at once.
pub trait Rule: Send + Sync {
    fn next_state(&self, current: CellState, live_neighbors: u8) -> CellState;
}

/// Conway's Game of Life, B3/S23.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Life;

impl Rule for Life {
    #[inline]
    fn next_state(&self, current: CellState, live_neighbors: u8) -> CellState {
        match (current, live_neighbors) {
            (CellState::Alive, 2) | (CellState::Alive, 3) => CellState::Alive, // Survival
            (CellState::Dead, 3) => CellState::Alive,                          // Birth
            _ => CellState::Dead, // Under/over-population or stays dead
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dead_cell_is_born_with_exactly_three() {
        for n in 0..=8 {
            let expected = if n == 3 { CellState::Alive } else { CellState::Dead };
            assert_eq!(Life.next_state(CellState::Dead, n), expected, "dead with {n}");
        }
    }

    #[test]
    fn live_cell_survives_with_two_or_three() {
        for n in 0..=8 {
            let expected = if n == 2 || n == 3 { CellState::Alive } else { CellState::Dead };
            assert_eq!(Life.next_state(CellState::Alive, n), expected, "alive with {n}");
        }
    }
}
