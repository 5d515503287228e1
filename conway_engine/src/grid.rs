// grid.rs - Fixed-size bounded grid of cells
//
// Storage keeps a one-cell DEAD halo around the active area so neighbor
// counting never needs a bounds check. The halo is never written: cells
// outside the grid do not exist and contribute nothing to a count.

use std::fmt;

use crate::error::{EngineError, EngineResult};
use crate::rule::Rule;
use crate::CellState;

const HALO: usize = 1; // Border width on every side

/// Storage offsets of the 8 neighbors, relative to a cell, for a given row stride.
#[inline]
fn neighbor_offsets(stride: usize) -> [isize; 8] {
    let s = stride as isize;
    [-s - 1, -s, -s + 1, -1, 1, s - 1, s, s + 1]
}

/// A `rows x cols` grid of cells, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<CellState>, // (rows + 2) x (cols + 2), row-major, halo included
}

impl Grid {
    /// Creates an all-DEAD grid. Both dimensions must be positive.
    pub fn new(rows: usize, cols: usize) -> EngineResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(EngineError::InvalidDimension { rows, cols });
        }
        let total = rows
            .checked_add(2 * HALO)
            .zip(cols.checked_add(2 * HALO))
            .and_then(|(r, c)| r.checked_mul(c))
            .filter(|&total| total <= isize::MAX as usize)
            .ok_or(EngineError::InvalidDimension { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            cells: vec![CellState::Dead; total],
        })
    }

    /// Parses rows of `#` (alive) and `.` (dead). All rows must have equal width.
    pub fn from_rows(rows: &[&str]) -> EngineResult<Self> {
        let cols = rows.first().map_or(0, |r| r.chars().count());
        let mut grid = Grid::new(rows.len(), cols)?;
        for (r, line) in rows.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(EngineError::InvalidPattern(format!(
                    "row {r} has width {}, expected {cols}",
                    line.chars().count()
                )));
            }
            for (c, ch) in line.chars().enumerate() {
                let state = match ch {
                    '#' => CellState::Alive,
                    '.' => CellState::Dead,
                    other => {
                        return Err(EngineError::InvalidPattern(format!(
                            "unexpected character {other:?} at ({r}, {c})"
                        )));
                    }
                };
                grid.put(r, c, state);
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn stride(&self) -> usize {
        self.cols + 2 * HALO
    }

    /// Storage index of an in-bounds active cell.
    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        (row + HALO) * self.stride() + (col + HALO)
    }

    /// Validates a signed coordinate pair against the active area.
    pub fn check_bounds(&self, row: isize, col: isize) -> EngineResult<(usize, usize)> {
        let in_bounds = row >= 0
            && col >= 0
            && (row as usize) < self.rows
            && (col as usize) < self.cols;
        if !in_bounds {
            return Err(EngineError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok((row as usize, col as usize))
    }

    pub fn get(&self, row: isize, col: isize) -> EngineResult<CellState> {
        let (r, c) = self.check_bounds(row, col)?;
        Ok(self.at(r, c))
    }

    pub fn set(&mut self, row: isize, col: isize, state: CellState) -> EngineResult<()> {
        let (r, c) = self.check_bounds(row, col)?;
        self.put(r, c, state);
        Ok(())
    }

    #[inline]
    pub(crate) fn at(&self, row: usize, col: usize) -> CellState {
        self.cells[self.index(row, col)]
    }

    #[inline]
    pub(crate) fn put(&mut self, row: usize, col: usize, state: CellState) {
        let i = self.index(row, col);
        self.cells[i] = state;
    }

    /// Live neighbors of an in-bounds cell, read through the halo.
    #[inline]
    pub(crate) fn live_neighbors(&self, row: usize, col: usize) -> u8 {
        let center = self.index(row, col) as isize;
        neighbor_offsets(self.stride())
            .iter()
            .filter(|&&d| self.cells[(center + d) as usize].is_alive())
            .count() as u8
    }

    /// Number of ALIVE neighbors among the up to 8 cells that exist around `(row, col)`.
    pub fn count_live_neighbors(&self, row: isize, col: isize) -> EngineResult<u8> {
        let (r, c) = self.check_bounds(row, col)?;
        Ok(self.live_neighbors(r, c))
    }

    /// Number of ALIVE cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Coordinates of every ALIVE cell in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols).filter_map(move |c| self.at(r, c).is_alive().then_some((r, c)))
        })
    }

    pub(crate) fn fill_dead(&mut self) {
        self.cells.fill(CellState::Dead);
    }

    /// Writes the next state of active row `row` of `self` into `out`,
    /// which is the full storage row (halo columns included) of another grid.
    pub(crate) fn next_row_into<R: Rule + ?Sized>(
        &self,
        rule: &R,
        row: usize,
        out: &mut [CellState],
    ) {
        debug_assert_eq!(out.len(), self.stride());
        for col in 0..self.cols {
            let live = self.live_neighbors(row, col); // Counted once per cell
            out[col + HALO] = rule.next_state(self.at(row, col), live);
        }
    }

    /// Storage rows of the active area, each including its two halo columns.
    pub(crate) fn active_rows_mut(&mut self) -> impl Iterator<Item = &mut [CellState]> {
        let stride = self.stride();
        let rows = self.rows;
        self.cells
            .chunks_mut(stride)
            .skip(HALO)
            .take(rows)
    }

    /// Same rows as [`Grid::active_rows_mut`], as one contiguous slice for parallel splitting.
    pub(crate) fn active_storage_mut(&mut self) -> (&mut [CellState], usize) {
        let stride = self.stride();
        let start = HALO * stride;
        let end = start + self.rows * stride;
        (&mut self.cells[start..end], stride)
    }

    /// True when every halo cell is DEAD.
    pub(crate) fn halo_is_dead(&self) -> bool {
        let stride = self.stride();
        self.cells.chunks(stride).enumerate().all(|(r, line)| {
            if r < HALO || r >= self.rows + HALO {
                line.iter().all(|c| !c.is_alive())
            } else {
                !line[0].is_alive() && !line[stride - 1].is_alive()
            }
        })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            let line: String = (0..self.cols).map(|c| self.at(r, c).as_char()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_dead() {
        let grid = Grid::new(4, 7).unwrap();
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cols(), 7);
        assert_eq!(grid.population(), 0);
        assert!(grid.halo_is_dead());
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert_eq!(
            Grid::new(0, 5),
            Err(EngineError::InvalidDimension { rows: 0, cols: 5 })
        );
        assert_eq!(
            Grid::new(5, 0),
            Err(EngineError::InvalidDimension { rows: 5, cols: 0 })
        );
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert_eq!(
            Grid::new(usize::MAX, 1),
            Err(EngineError::InvalidDimension { rows: usize::MAX, cols: 1 })
        );
        assert_eq!(
            Grid::new(usize::MAX / 2, 3),
            Err(EngineError::InvalidDimension { rows: usize::MAX / 2, cols: 3 })
        );
    }

    #[test]
    fn bounds_are_checked_on_every_side() {
        let grid = Grid::new(3, 4).unwrap();
        for (row, col) in [(-1, 0), (0, -1), (3, 0), (0, 4), (-5, 9)] {
            assert!(
                matches!(grid.get(row, col), Err(EngineError::OutOfBounds { .. })),
                "({row}, {col}) should be out of bounds"
            );
        }
        assert_eq!(grid.get(2, 3), Ok(CellState::Dead));
    }

    #[test]
    fn text_round_trips_through_display() {
        let rows = [".#.", "##.", "..#"];
        let grid = Grid::from_rows(&rows).unwrap();
        assert_eq!(grid.to_string(), ".#.\n##.\n..#\n");
        assert_eq!(grid.population(), 4);
        assert_eq!(grid.live_cells().collect::<Vec<_>>(), vec![(0, 1), (1, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn ragged_or_foreign_text_is_rejected() {
        assert!(matches!(
            Grid::from_rows(&["..", "..."]),
            Err(EngineError::InvalidPattern(_))
        ));
        assert!(matches!(
            Grid::from_rows(&[".x"]),
            Err(EngineError::InvalidPattern(_))
        ));
        assert!(matches!(
            Grid::from_rows(&[]),
            Err(EngineError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn edge_cells_do_not_see_past_the_border() {
        // Fully alive grid: neighbor count equals the number of existing neighbors.
        let grid = Grid::from_rows(&["###", "###", "###"]).unwrap();
        assert_eq!(grid.count_live_neighbors(0, 0), Ok(3));
        assert_eq!(grid.count_live_neighbors(0, 1), Ok(5));
        assert_eq!(grid.count_live_neighbors(1, 1), Ok(8));
        assert_eq!(grid.count_live_neighbors(2, 2), Ok(3));
        assert!(grid.halo_is_dead());
    }

    #[test]
    fn single_row_grid_counts_only_left_and_right() {
        let grid = Grid::from_rows(&["###"]).unwrap();
        assert_eq!(grid.count_live_neighbors(0, 0), Ok(1));
        assert_eq!(grid.count_live_neighbors(0, 1), Ok(2));
    }
}
