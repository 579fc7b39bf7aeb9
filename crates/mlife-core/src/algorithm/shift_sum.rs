#![forbid(unsafe_code)]

//! Neighbour counts by summing eight shifted copies of the grid.

use super::Stepper;
use crate::grid::Grid;
use crate::rule;

/// Offsets of the eight Moore neighbours.
const NEIGHBOURHOOD: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Sum of toroidally rolled copies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftSumStepper;

impl Stepper for ShiftSumStepper {
    fn advance(&mut self, grid: &Grid) -> Grid {
        let mut counts = vec![0u32; grid.cells().len()];
        for (dx, dy) in NEIGHBOURHOOD {
            let shifted = grid.rolled(dx, dy);
            for (count, &cell) in counts.iter_mut().zip(shifted.cells()) {
                *count += u32::from(cell);
            }
        }
        let (width, height) = grid.size();
        Grid::from_cells(width, height, rule::threshold(grid.cells(), &counts))
    }
}
