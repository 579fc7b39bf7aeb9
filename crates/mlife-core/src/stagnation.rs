#![forbid(unsafe_code)]

//! Bounded detection of still lifes, short oscillators and extinction.
//!
//! The detector remembers fingerprints of the most recent grids in a small
//! ring. A grid whose fingerprint is already in the ring has repeated within
//! the window, so the soup is cycling with period at most the window length.

use std::collections::VecDeque;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::grid::Grid;

/// Number of generations remembered.
pub const DEFAULT_WINDOW: usize = 16;

/// Ring of recent grid fingerprints.
#[derive(Debug, Clone)]
pub struct StagnationDetector {
    window: usize,
    recent: VecDeque<u64>,
}

impl StagnationDetector {
    /// Detector remembering the last `window` grids (at least one).
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            recent: VecDeque::with_capacity(window),
        }
    }

    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Record `grid` and report whether it repeats one of the remembered grids.
    pub fn observe(&mut self, grid: &Grid) -> bool {
        let print = fingerprint(grid);
        let repeated = self.recent.contains(&print);
        if self.recent.len() == self.window {
            self.recent.pop_front();
        }
        self.recent.push_back(print);
        repeated
    }

    /// Forget all history, e.g. after the model is re-seeded.
    pub fn clear(&mut self) {
        self.recent.clear();
    }
}

impl Default for StagnationDetector {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

fn fingerprint(grid: &Grid) -> u64 {
    let mut hasher = DefaultHasher::new();
    grid.hash(&mut hasher);
    hasher.finish()
}
