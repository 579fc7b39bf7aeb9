#![forbid(unsafe_code)]

//! The drawing contract between a view and its render target.
//!
//! A surface is measured in *units*: character cells for the text surface,
//! half-block pixels for the pixel surface. The view rasterises the grid into
//! a [`Raster`] of exactly [`Surface::extent`] units and hands it over with
//! the palette; the surface owns everything after that.

use std::io;

use crate::colour::Palette;

/// Width and height of a render target, in units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent {
    pub width: usize,
    pub height: usize,
}

impl Extent {
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Row-major cell values laid out in target units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    extent: Extent,
    values: Vec<u8>,
}

impl Raster {
    #[must_use]
    pub fn new(extent: Extent, values: Vec<u8>) -> Self {
        debug_assert_eq!(values.len(), extent.width * extent.height);
        Self { extent, values }
    }

    #[must_use]
    pub const fn extent(&self) -> Extent {
        self.extent
    }

    #[must_use]
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Value at unit `(x, y)`. Panics when out of range.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.values[y * self.extent.width + x]
    }

    /// Iterate rows.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.values.chunks_exact(self.extent.width.max(1))
    }
}

/// Reports the terminal size as `(columns, rows)`.
pub type SizeSource = Box<dyn FnMut() -> io::Result<(u16, u16)>>;

/// [`SizeSource`] backed by the real terminal.
#[must_use]
pub fn terminal_size() -> SizeSource {
    Box::new(crossterm::terminal::size)
}

/// [`SizeSource`] reporting a fixed size, for tests and headless use.
#[must_use]
pub fn fixed_size(columns: u16, rows: u16) -> SizeSource {
    Box::new(move || Ok((columns, rows)))
}

/// A render target.
pub trait Surface {
    /// Current drawable size in units. May change between frames.
    fn extent(&mut self) -> io::Result<Extent>;

    /// Draw a raster whose extent was obtained from [`Surface::extent`].
    fn present(&mut self, raster: &Raster, palette: &Palette) -> io::Result<()>;

    /// Restore whatever the surface altered. Called once by the view on close.
    fn release(&mut self) -> io::Result<()>;
}
