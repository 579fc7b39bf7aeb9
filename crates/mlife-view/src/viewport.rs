#![forbid(unsafe_code)]

//! Pan and zoom state, and rasterisation of a grid into target units.
//!
//! For a target of `tw × th` units, a `w × h` grid and pan `(x, y)`:
//!
//! ```text
//! (sx, sy) = (s, s)            explicit scale s
//!          = (tw / w, th / h)  fit-to-target
//! unit (j, i) shows cell ((floor(j / sx) - x) mod w, (floor(i / sy) - y) mod h)
//! ```
//!
//! Units past the scaled grid wrap around, so a small grid tiles the target.

use mlife_core::Grid;

use crate::surface::{Extent, Raster};

/// Smallest zoom [`Viewport::scale_by`] will reach.
pub const MIN_SCALE: f64 = 0.125;

/// Pan and zoom for one view.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    position: (i64, i64),
    scale: Option<f64>,
    /// Factor used by the last fitted rasterisation; base for relative zoom.
    fitted: f64,
}

impl Viewport {
    /// Viewport at `position` with `scale` (`None` fits the grid to the target).
    #[must_use]
    pub const fn new(position: (i64, i64), scale: Option<f64>) -> Self {
        Self {
            position,
            scale,
            fitted: 1.0,
        }
    }

    #[must_use]
    pub const fn position(&self) -> (i64, i64) {
        self.position
    }

    #[must_use]
    pub const fn scale(&self) -> Option<f64> {
        self.scale
    }

    pub fn move_by(&mut self, (dx, dy): (i64, i64)) {
        self.position = (
            self.position.0.wrapping_add(dx),
            self.position.1.wrapping_add(dy),
        );
    }

    pub fn move_to(&mut self, position: (i64, i64)) {
        self.position = position;
    }

    /// Zoom relative to the current factor, never below [`MIN_SCALE`].
    ///
    /// A fitted viewport switches to an explicit scale starting from the
    /// factor of its last rasterisation.
    pub fn scale_by(&mut self, delta: f64) {
        let base = self.scale.unwrap_or(self.fitted);
        let next = base + delta;
        self.scale = Some(if next.is_finite() { next.max(MIN_SCALE) } else { base });
    }

    /// Set an explicit zoom. The caller validates `value`.
    pub fn scale_to(&mut self, value: f64) {
        self.scale = Some(value);
    }

    /// Return to fit-to-target.
    pub fn fit(&mut self) {
        self.scale = None;
    }

    /// Rasterise `grid` into a target of `extent` units.
    pub fn rasterise(&mut self, grid: &Grid, extent: Extent) -> Raster {
        let (w, h) = grid.size();
        let (sx, sy) = match self.scale {
            Some(s) => (s, s),
            None => {
                let sx = extent.width as f64 / w as f64;
                let sy = extent.height as f64 / h as f64;
                self.fitted = sx.min(sy).max(MIN_SCALE);
                (sx, sy)
            }
        };
        // A fitted axis of a target smaller than the grid still maps each
        // unit to a cell; zero-sized targets produce an empty raster.
        let sx = if sx > 0.0 { sx } else { 1.0 };
        let sy = if sy > 0.0 { sy } else { 1.0 };
        let (x, y) = self.position;

        let columns: Vec<i64> = (0..extent.width)
            .map(|j| (j as f64 / sx).floor() as i64)
            .map(|c| c.wrapping_sub(x))
            .collect();
        let mut values = Vec::with_capacity(extent.width * extent.height);
        for i in 0..extent.height {
            let row = ((i as f64 / sy).floor() as i64).wrapping_sub(y);
            values.extend(columns.iter().map(|&col| grid.get(col, row)));
        }
        Raster::new(extent, values)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new((0, 0), None)
    }
}
