#![forbid(unsafe_code)]

//! Half-block pixel surface.
//!
//! Each terminal cell carries two vertically stacked pixels drawn with `▀`:
//! the foreground colour is the top pixel, the background the bottom one.
//! A `C × R` terminal therefore offers `C × 2R` pixels, and every pixel is
//! coloured from the palette, dead cells included.

use std::io::{self, Stdout, Write};

use crossterm::style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue};

use crate::colour::{ColourProfile, Palette};
use crate::session::{SessionOptions, TerminalSession, release_terminal};
use crate::surface::{Extent, Raster, SizeSource, Surface, terminal_size};

const UPPER_HALF: char = '▀';

/// Pixel surface writing to `W`.
pub struct PixelSurface<W: Write> {
    out: W,
    size: SizeSource,
    /// Requested pixel resolution; `None` uses the whole terminal.
    resolution: Option<(usize, usize)>,
    profile: ColourProfile,
    session: Option<TerminalSession>,
}

impl PixelSurface<Stdout> {
    /// Take over the terminal. `fullscreen` draws on the alternate screen
    /// across the whole terminal, ignoring `resolution`.
    ///
    /// # Errors
    ///
    /// Fails if the terminal modes cannot be enabled.
    pub fn stdout(
        resolution: Option<(usize, usize)>,
        fullscreen: bool,
        profile: ColourProfile,
    ) -> io::Result<Self> {
        let session = TerminalSession::new(SessionOptions {
            alternate_screen: fullscreen,
            hide_cursor: true,
        })?;
        let resolution = if fullscreen { None } else { resolution };
        let mut surface = Self::new(io::stdout(), terminal_size(), resolution, profile);
        surface.session = Some(session);
        Ok(surface)
    }
}

impl<W: Write> PixelSurface<W> {
    /// Surface over an arbitrary writer, without touching terminal modes.
    pub fn new(
        out: W,
        size: SizeSource,
        resolution: Option<(usize, usize)>,
        profile: ColourProfile,
    ) -> Self {
        Self {
            out,
            size,
            resolution,
            profile,
            session: None,
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Surface for PixelSurface<W> {
    fn extent(&mut self) -> io::Result<Extent> {
        let (columns, rows) = (self.size)()?;
        let max_w = usize::from(columns);
        let max_h = usize::from(rows) * 2;
        let (w, h) = match self.resolution {
            Some((w, h)) => (w.min(max_w), h.min(max_h)),
            None => (max_w, max_h),
        };
        // Whole character rows only.
        Ok(Extent::new(w, h & !1))
    }

    fn present(&mut self, raster: &Raster, palette: &Palette) -> io::Result<()> {
        let extent = raster.extent();
        for row in 0..extent.height / 2 {
            queue!(self.out, cursor::MoveTo(0, row as u16))?;
            let mut current = None;
            for x in 0..extent.width {
                let top = palette.get(raster.get(x, 2 * row)).to_terminal(self.profile);
                let bottom = palette.get(raster.get(x, 2 * row + 1)).to_terminal(self.profile);
                if current != Some((top, bottom)) {
                    queue!(self.out, SetForegroundColor(top), SetBackgroundColor(bottom))?;
                    current = Some((top, bottom));
                }
                queue!(self.out, Print(UPPER_HALF))?;
            }
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }

    fn release(&mut self) -> io::Result<()> {
        release_terminal(&mut self.out, &mut self.session)
    }
}
