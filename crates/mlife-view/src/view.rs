#![forbid(unsafe_code)]

//! The view: a cached grid, a dirty flag, pan/zoom, and a surface.
//!
//! # Redraw policy
//!
//! Only a change of grid *value* marks the view dirty. Pan and zoom adjust
//! the viewport for the next redraw but do not trigger one themselves, and a
//! flush with nothing dirty does no work, so each distinct grid is drawn at
//! most once.

use mlife_core::{Grid, LifeError, Result};

use crate::colour::Palette;
use crate::surface::Surface;
use crate::viewport::Viewport;

const COMPONENT: &str = "View";

/// Operations a controller drives on a view.
pub trait View {
    /// Cache `matrix` if it differs from the cached grid, and redraw when
    /// `flush` is set and the cache is dirty.
    ///
    /// # Errors
    ///
    /// [`LifeError::InvalidState`] after close; [`LifeError::Io`] when the
    /// surface fails.
    fn update(&mut self, matrix: Option<&Grid>, flush: bool) -> Result<()>;

    /// Pan by `delta` cells.
    ///
    /// # Errors
    ///
    /// [`LifeError::InvalidState`] after close.
    fn move_by(&mut self, delta: (i64, i64)) -> Result<()>;

    /// Pan to an absolute offset.
    ///
    /// # Errors
    ///
    /// [`LifeError::InvalidState`] after close.
    fn move_to(&mut self, position: (i64, i64)) -> Result<()>;

    /// Zoom by `delta`, clamped to a small positive minimum.
    ///
    /// # Errors
    ///
    /// [`LifeError::InvalidState`] after close.
    fn scale_by(&mut self, delta: f64) -> Result<()>;

    /// Set the zoom factor.
    ///
    /// # Errors
    ///
    /// [`LifeError::InvalidState`] after close; [`LifeError::Configuration`]
    /// for a non-finite or non-positive value.
    fn scale_to(&mut self, value: f64) -> Result<()>;

    /// Release the surface. Idempotent.
    fn close(&mut self);

    /// True once [`View::close`] has been called.
    fn is_closed(&self) -> bool;
}

/// Construction options for [`SurfaceView`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    pub position: (i64, i64),
    /// Units per cell; `None` fits the grid to the surface.
    pub scale: Option<f64>,
    pub palette: Palette,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            position: (0, 0),
            scale: None,
            palette: Palette::default(),
        }
    }
}

/// A [`View`] drawing through a [`Surface`].
#[derive(Debug)]
pub struct SurfaceView<S: Surface> {
    surface: S,
    viewport: Viewport,
    palette: Palette,
    last_matrix: Option<Grid>,
    dirty: bool,
    closed: bool,
}

impl<S: Surface> SurfaceView<S> {
    /// Wrap `surface`.
    ///
    /// # Errors
    ///
    /// [`LifeError::Configuration`] for an invalid explicit scale. The
    /// surface is released before returning the error.
    pub fn new(mut surface: S, options: ViewOptions) -> Result<Self> {
        if let Some(scale) = options.scale {
            if let Err(e) = check_scale(scale) {
                release_logged(&mut surface);
                return Err(e);
            }
        }
        Ok(Self {
            surface,
            viewport: Viewport::new(options.position, options.scale),
            palette: options.palette,
            last_matrix: None,
            dirty: false,
            closed: false,
        })
    }

    #[must_use]
    pub const fn position(&self) -> (i64, i64) {
        self.viewport.position()
    }

    #[must_use]
    pub const fn scale(&self) -> Option<f64> {
        self.viewport.scale()
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The cached grid, if any.
    #[must_use]
    pub fn last_matrix(&self) -> Option<&Grid> {
        self.last_matrix.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(LifeError::closed(COMPONENT))
        } else {
            Ok(())
        }
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(grid) = &self.last_matrix else {
            return Ok(());
        };
        let extent = self.surface.extent()?;
        let raster = self.viewport.rasterise(grid, extent);
        self.surface.present(&raster, &self.palette)?;
        mlife_core::trace!(width = extent.width, height = extent.height, "view flushed");
        Ok(())
    }
}

impl<S: Surface> View for SurfaceView<S> {
    fn update(&mut self, matrix: Option<&Grid>, flush: bool) -> Result<()> {
        self.ensure_open()?;
        if let Some(matrix) = matrix {
            if self.last_matrix.as_ref() != Some(matrix) {
                self.last_matrix = Some(matrix.clone());
                self.dirty = true;
            }
        }
        if flush && self.dirty {
            self.redraw()?;
            self.dirty = false;
        }
        Ok(())
    }

    fn move_by(&mut self, delta: (i64, i64)) -> Result<()> {
        self.ensure_open()?;
        self.viewport.move_by(delta);
        Ok(())
    }

    fn move_to(&mut self, position: (i64, i64)) -> Result<()> {
        self.ensure_open()?;
        self.viewport.move_to(position);
        Ok(())
    }

    fn scale_by(&mut self, delta: f64) -> Result<()> {
        self.ensure_open()?;
        self.viewport.scale_by(delta);
        Ok(())
    }

    fn scale_to(&mut self, value: f64) -> Result<()> {
        self.ensure_open()?;
        check_scale(value)?;
        self.viewport.scale_to(value);
        Ok(())
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.last_matrix = None;
        self.dirty = false;
        release_logged(&mut self.surface);
        mlife_core::debug!("view closed");
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Release `surface`, logging instead of returning a failure.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn release_logged<S: Surface>(surface: &mut S) {
    if let Err(e) = surface.release() {
        mlife_core::warn!(error = %e, "failed to release view surface");
    }
}

impl<S: Surface> Drop for SurfaceView<S> {
    fn drop(&mut self) {
        self.close();
    }
}

fn check_scale(value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LifeError::config(format!("scale must be positive and finite, got {value}")))
    }
}
