// history.rs - Detects when a run has settled into a repeating state

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::grid::Grid;

pub const DEFAULT_HISTORY: usize = 10;

/// Remembers hashes of the most recent grids in a ring buffer.
///
/// A grid whose hash is already remembered means the run is a still life,
/// an oscillator with period up to the capacity, or extinct.
#[derive(Debug, Clone)]
pub struct CycleDetector {
    hashes: Vec<u64>,
    capacity: usize,
    count: usize, // Total grids recorded; next slot is count % capacity
}

impl Default for CycleDetector {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY)
    }
}

impl CycleDetector {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            hashes: Vec::with_capacity(capacity),
            capacity,
            count: 0,
        }
    }

    fn hash_grid(grid: &Grid) -> u64 {
        let mut hasher = DefaultHasher::new();
        grid.hash(&mut hasher);
        hasher.finish()
    }

    /// Records `grid`, returning `true` if it repeats a remembered one.
    pub fn observe(&mut self, grid: &Grid) -> bool {
        let hash = Self::hash_grid(grid);
        if self.hashes.contains(&hash) {
            return true;
        }
        if self.hashes.len() < self.capacity {
            self.hashes.push(hash);
        } else {
            self.hashes[self.count % self.capacity] = hash;
        }
        self.count += 1;
        false
    }

    pub fn reset(&mut self) {
        self.hashes.clear();
        self.count = 0;
    }
}
