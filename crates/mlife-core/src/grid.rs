#![forbid(unsafe_code)]

//! Toroidal binary grid.
//!
//! A [`Grid`] is a row-major `width × height` array of cells holding exactly
//! `0` or `1`. Coordinates wrap in both axes: column `-1` is the last column,
//! row `height` is row `0`, so every cell has exactly eight neighbours.

use std::fmt;

use rand::Rng;

use crate::error::{LifeError, Result};

/// Largest grid accepted, in cells.
pub const MAX_CELLS: usize = 1 << 30;

/// A fixed-size toroidal grid of binary cells.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Row-major cells, each `0` or `1`.
    cells: Vec<u8>,
}

impl Grid {
    /// Create an all-dead grid.
    ///
    /// # Errors
    ///
    /// Returns [`LifeError::Configuration`] if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let len = check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![0; len],
        })
    }

    /// Create a grid with each cell alive independently with probability `density`.
    ///
    /// # Errors
    ///
    /// Returns [`LifeError::Configuration`] for a zero dimension or a density
    /// outside `[0, 1]`.
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        density: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let len = check_dimensions(width, height)?;
        if !density.is_finite() || !(0.0..=1.0).contains(&density) {
            return Err(LifeError::config(format!(
                "density must be within [0, 1], got {density}"
            )));
        }
        let cells = (0..len)
            .map(|_| u8::from(rng.random_bool(density)))
            .collect();
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a grid from rows of cell values. Any non-zero value counts as alive.
    ///
    /// # Errors
    ///
    /// Returns [`LifeError::Configuration`] if there are no rows, a row is
    /// empty, or rows have different lengths.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let len = check_dimensions(width, height)?;
        let mut cells = Vec::with_capacity(len);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(LifeError::config(format!(
                    "row {y} has {} cells, expected {width}",
                    row.len()
                )));
            }
            cells.extend(row.iter().map(|&v| u8::from(v != 0)));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a grid from raw row-major cells without re-validating values.
    ///
    /// Used by the stepping engines, whose thresholding already produces
    /// values in `{0, 1}`.
    pub(crate) fn from_cells(width: usize, height: usize, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        debug_assert!(cells.iter().all(|&c| c <= 1));
        Self {
            width,
            height,
            cells,
        }
    }

    /// Grid width in cells (number of columns).
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells (number of rows).
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Row-major cell slice.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(self.width)
    }

    /// Cell value at `(x, y)` with toroidal wrapping.
    #[inline]
    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> u8 {
        self.cells[self.wrap_index(x, y)]
    }

    /// Set the cell at `(x, y)` (wrapping) to alive (`true`) or dead.
    #[inline]
    pub fn set(&mut self, x: i64, y: i64, alive: bool) {
        let idx = self.wrap_index(x, y);
        self.cells[idx] = u8::from(alive);
    }

    /// Number of live cells.
    #[must_use]
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// True if no cell is alive.
    #[must_use]
    pub fn is_extinct(&self) -> bool {
        self.cells.iter().all(|&c| c == 0)
    }

    /// Copy of the grid cyclically shifted by `(dx, dy)`.
    ///
    /// The cell at `(x, y)` moves to `(x + dx, y + dy)` modulo the grid size.
    #[must_use]
    pub fn rolled(&self, dx: i64, dy: i64) -> Grid {
        let mut out = vec![0u8; self.cells.len()];
        let w = self.width as i64;
        let h = self.height as i64;
        for y in 0..h {
            let src_row = (y - dy).rem_euclid(h) as usize * self.width;
            let dst_row = y as usize * self.width;
            for x in 0..w {
                let src_x = (x - dx).rem_euclid(w) as usize;
                out[dst_row + x as usize] = self.cells[src_row + src_x];
            }
        }
        Grid::from_cells(self.width, self.height, out)
    }

    fn wrap_index(&self, x: i64, y: i64) -> usize {
        let col = x.rem_euclid(self.width as i64) as usize;
        let row = y.rem_euclid(self.height as i64) as usize;
        row * self.width + col
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.width, self.height)?;
        for row in self.rows() {
            let line: String = row.iter().map(|&c| if c != 0 { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Validate a `width × height` grid and return its cell count.
fn check_dimensions(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(LifeError::config(format!(
            "grid dimensions must be positive, got {width}x{height}"
        )));
    }
    width
        .checked_mul(height)
        .filter(|&cells| cells <= MAX_CELLS)
        .ok_or_else(|| {
            LifeError::config(format!(
                "grid {width}x{height} exceeds the {MAX_CELLS}-cell limit"
            ))
        })
}
