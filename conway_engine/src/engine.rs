// engine.rs - Double-buffered generation stepping
//
// The next generation is always computed into the back buffer from the
// current one, then the two are swapped. No cell is ever read from the
// buffer being written.

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::{EngineError, EngineResult};
use crate::grid::Grid;
use crate::patterns::Pattern;
use crate::rule::{Life, Rule};
use crate::CellState;

/// Owns the canonical grid and advances it one generation at a time.
#[derive(Debug, Clone)]
pub struct GridEngine<R: Rule = Life> {
    current: Grid,
    next: Grid, // Back buffer, fully overwritten on every step
    generation: u64,
    rule: R,
}

impl GridEngine<Life> {
    /// An all-DEAD `rows x cols` engine at generation 0, running B3/S23.
    pub fn new(rows: usize, cols: usize) -> EngineResult<Self> {
        Self::with_rule(rows, cols, Life)
    }
}

impl<R: Rule> GridEngine<R> {
    pub fn with_rule(rows: usize, cols: usize, rule: R) -> EngineResult<Self> {
        let current = Grid::new(rows, cols)?;
        let next = current.clone();
        debug!("created {rows}x{cols} engine");
        Ok(Self {
            current,
            next,
            generation: 0,
            rule,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.current.rows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.current.cols()
    }

    /// Generations stepped since construction or the last reset.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Read-only view of the current generation.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.current
    }

    pub fn population(&self) -> usize {
        self.current.population()
    }

    pub fn get_cell(&self, row: isize, col: isize) -> EngineResult<CellState> {
        self.current.get(row, col)
    }

    pub fn set_cell(&mut self, row: isize, col: isize, state: CellState) -> EngineResult<()> {
        self.current.set(row, col, state)
    }

    /// Flips one cell and returns its new state.
    pub fn toggle_cell(&mut self, row: isize, col: isize) -> EngineResult<CellState> {
        let state = self.current.get(row, col)?.toggled();
        self.current.set(row, col, state)?;
        Ok(state)
    }

    pub fn count_live_neighbors(&self, row: isize, col: isize) -> EngineResult<u8> {
        self.current.count_live_neighbors(row, col)
    }

    /// Kills every cell and resets the generation counter.
    pub fn clear(&mut self) {
        self.current.fill_dead();
        self.generation = 0;
        debug!("grid cleared");
    }

    /// Computes the next generation and returns the new generation number.
    pub fn step(&mut self) -> u64 {
        let (current, next, rule) = (&self.current, &mut self.next, &self.rule);
        for (row, out) in next.active_rows_mut().enumerate() {
            current.next_row_into(rule, row, out);
        }
        self.publish()
    }

    /// Same result as [`GridEngine::step`], with rows computed on the rayon pool.
    pub fn step_parallel(&mut self) -> u64 {
        let (current, next, rule) = (&self.current, &mut self.next, &self.rule);
        let (storage, stride) = next.active_storage_mut();
        storage
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(row, out)| current.next_row_into(rule, row, out));
        self.publish()
    }

    /// Steps `n` times and returns the final generation number.
    pub fn step_n(&mut self, n: u64) -> u64 {
        for _ in 0..n {
            self.step();
        }
        self.generation
    }

    fn publish(&mut self) -> u64 {
        std::mem::swap(&mut self.current, &mut self.next);
        debug_assert!(self.current.halo_is_dead(), "halo cells must stay dead");
        self.generation += 1;
        trace!("generation {} population {}", self.generation, self.current.population());
        self.generation
    }

    /// Clears the grid, then places `pattern` with its top-left corner at the origin.
    ///
    /// Cells that land outside the grid are dropped. Returns how many were placed.
    pub fn load_pattern(
        &mut self,
        pattern: &Pattern,
        origin_row: usize,
        origin_col: usize,
    ) -> usize {
        self.clear();
        let mut placed = 0;
        for &(dr, dc) in pattern.cells {
            let (Some(row), Some(col)) = (origin_row.checked_add(dr), origin_col.checked_add(dc))
            else {
                continue;
            };
            if row < self.rows() && col < self.cols() {
                self.current.put(row, col, CellState::Alive);
                placed += 1;
            }
        }
        if placed < pattern.cells.len() {
            debug!(
                "pattern {} clipped: {placed} of {} cells placed",
                pattern.name,
                pattern.cells.len()
            );
        }
        placed
    }

    /// Places `pattern` centered in the grid. See [`GridEngine::load_pattern`].
    pub fn load_pattern_centered(&mut self, pattern: &Pattern) -> usize {
        let origin_row = self.rows().saturating_sub(pattern.height()) / 2;
        let origin_col = self.cols().saturating_sub(pattern.width()) / 2;
        self.load_pattern(pattern, origin_row, origin_col)
    }

    /// Clears the grid and makes each cell ALIVE with probability `density`.
    ///
    /// The same seed always yields the same grid.
    pub fn randomize(&mut self, seed: u64, density: f64) -> EngineResult<()> {
        if !(0.0..=1.0).contains(&density) {
            return Err(EngineError::InvalidDensity(density));
        }
        self.clear();
        let mut rng = StdRng::seed_from_u64(seed);
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                if rng.gen_bool(density) {
                    self.current.put(row, col, CellState::Alive);
                }
            }
        }
        debug!("randomized with seed {seed:#x}, population {}", self.population());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns;

    #[test]
    fn step_on_empty_grid_only_advances_generation() {
        let mut engine = GridEngine::new(6, 6).unwrap();
        assert_eq!(engine.step(), 1);
        assert_eq!(engine.step(), 2);
        assert_eq!(engine.population(), 0);
    }

    #[test]
    fn back_buffer_does_not_leak_old_cells() {
        // After a swap the back buffer holds generation N-1; the next step
        // must overwrite every cell of it.
        let mut engine = GridEngine::new(5, 5).unwrap();
        engine.set_cell(2, 2, CellState::Alive).unwrap();
        engine.step(); // lone cell dies
        engine.step(); // back buffer held the lone cell
        assert_eq!(engine.population(), 0);
    }

    #[test]
    fn toggle_returns_new_state() {
        let mut engine = GridEngine::new(3, 3).unwrap();
        assert_eq!(engine.toggle_cell(1, 2), Ok(CellState::Alive));
        assert_eq!(engine.get_cell(1, 2), Ok(CellState::Alive));
        assert_eq!(engine.toggle_cell(1, 2), Ok(CellState::Dead));
        assert!(engine.toggle_cell(3, 0).is_err());
    }

    #[test]
    fn load_pattern_clips_outside_cells() {
        let mut engine = GridEngine::new(4, 4).unwrap();
        let glider = patterns::find("glider").unwrap();
        assert_eq!(engine.load_pattern(glider, 0, 0), 5);
        assert_eq!(engine.load_pattern(glider, 3, 3), 0);
        assert_eq!(engine.load_pattern(glider, 2, 2), 1);
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn load_pattern_far_origin_places_nothing() {
        let mut engine = GridEngine::new(4, 4).unwrap();
        let glider = patterns::find("glider").unwrap();
        assert_eq!(engine.load_pattern(glider, usize::MAX, 0), 0);
        assert_eq!(engine.load_pattern(glider, 0, usize::MAX), 0);
        assert_eq!(engine.load_pattern(glider, usize::MAX - 1, usize::MAX - 1), 0);
        assert_eq!(engine.population(), 0);
    }

    #[test]
    fn randomize_rejects_bad_density() {
        let mut engine = GridEngine::new(4, 4).unwrap();
        assert_eq!(engine.randomize(1, 1.5), Err(EngineError::InvalidDensity(1.5)));
        assert!(engine.randomize(1, f64::NAN).is_err());
        engine.randomize(1, 1.0).unwrap();
        assert_eq!(engine.population(), 16);
        engine.randomize(1, 0.0).unwrap();
        assert_eq!(engine.population(), 0);
    }
}
