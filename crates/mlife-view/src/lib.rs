#![forbid(unsafe_code)]

//! Views for Matrix Life.
//!
//! A [`SurfaceView`] caches the most recent grid, tracks whether it still
//! needs drawing, and rasterises it through a [`Viewport`] onto a
//! [`Surface`]. Three surfaces are provided:
//!
//! - [`TextSurface`]: one character per unit inside a border.
//! - [`PixelSurface`]: half-block pixels, two per character cell.
//! - [`MemorySurface`]: records frames, for headless runs and tests.

pub mod colour;
pub mod memory;
pub mod pixel;
pub mod session;
pub mod surface;
pub mod text;
pub mod view;
pub mod viewport;

pub use colour::{Colour, ColourProfile, Palette};
pub use memory::{MemoryLog, MemorySurface};
pub use pixel::PixelSurface;
pub use session::{SessionOptions, TerminalSession};
pub use surface::{Extent, Raster, Surface};
pub use text::TextSurface;
pub use view::{SurfaceView, View, ViewOptions};
pub use viewport::Viewport;
