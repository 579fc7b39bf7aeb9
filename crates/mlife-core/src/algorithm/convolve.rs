#![forbid(unsafe_code)]

//! Weighted 3×3 convolution with wraparound boundary.
//!
//! The kernel weighs the cell itself 1 and each neighbour 2, so the result
//! `v = a + 2n` encodes both the current state and the neighbour count.
//! A single band test (`5 <= v <= 7`) then yields B3/S23.

use super::Stepper;
use crate::grid::Grid;
use crate::rule;

/// Convolution kernel, indexed `[dy + 1][dx + 1]`.
pub const KERNEL: [[u32; 3]; 3] = [[2, 2, 2], [2, 1, 2], [2, 2, 2]];

/// Convolution engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvolutionStepper;

impl ConvolutionStepper {
    /// Wrap-mode convolution of the grid with [`KERNEL`], row-major.
    #[must_use]
    pub fn convolve(grid: &Grid) -> Vec<u32> {
        let (width, height) = grid.size();
        let (w, h) = (width as i64, height as i64);
        let mut out = Vec::with_capacity(width * height);
        for y in 0..h {
            for x in 0..w {
                let mut v = 0;
                for (ky, row) in KERNEL.iter().enumerate() {
                    for (kx, &weight) in row.iter().enumerate() {
                        v += weight * u32::from(grid.get(x + kx as i64 - 1, y + ky as i64 - 1));
                    }
                }
                out.push(v);
            }
        }
        out
    }
}

impl Stepper for ConvolutionStepper {
    fn advance(&mut self, grid: &Grid) -> Grid {
        let cells = Self::convolve(grid)
            .into_iter()
            .map(rule::next_state_weighted)
            .collect();
        let (width, height) = grid.size();
        Grid::from_cells(width, height, cells)
    }
}
