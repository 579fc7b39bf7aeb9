#![forbid(unsafe_code)]

//! Character-cell surface: one terminal cell per unit, inside a border.
//!
//! Live cells are drawn as `█` in their palette colour, dead cells as a
//! blank on the slot-0 colour. The drawing area is framed with a double-line
//! border and is the requested resolution clamped to the terminal size minus
//! the border.

use std::io::{self, Stdout, Write};

use crossterm::style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue, terminal};

use crate::colour::{ColourProfile, Palette};
use crate::session::{SessionOptions, TerminalSession, release_terminal};
use crate::surface::{Extent, Raster, SizeSource, Surface, terminal_size};

const LIVE: char = '█';
const DEAD: char = ' ';

/// Text surface writing to `W`.
pub struct TextSurface<W: Write> {
    out: W,
    size: SizeSource,
    resolution: Option<(usize, usize)>,
    profile: ColourProfile,
    session: Option<TerminalSession>,
    /// Extent the border was last drawn for.
    framed: Option<Extent>,
}

impl TextSurface<Stdout> {
    /// Take over the terminal: raw mode, alternate screen, hidden cursor.
    ///
    /// # Errors
    ///
    /// Fails if the terminal modes cannot be enabled.
    pub fn stdout(resolution: Option<(usize, usize)>, profile: ColourProfile) -> io::Result<Self> {
        let session = TerminalSession::new(SessionOptions {
            alternate_screen: true,
            hide_cursor: true,
        })?;
        let mut surface = Self::new(io::stdout(), terminal_size(), resolution, profile);
        surface.session = Some(session);
        Ok(surface)
    }
}

impl<W: Write> TextSurface<W> {
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
            framed: None,
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn draw_border(&mut self, extent: Extent, fg: TermColor, bg: TermColor) -> io::Result<()> {
        let bar = "═".repeat(extent.width);
        queue!(
            self.out,
            ResetColor,
            terminal::Clear(terminal::ClearType::All),
            SetForegroundColor(fg),
            SetBackgroundColor(bg),
            cursor::MoveTo(0, 0),
            Print(format!("╔{bar}╗"))
        )?;
        for row in 1..=extent.height {
            queue!(
                self.out,
                cursor::MoveTo(0, row as u16),
                Print('║'),
                cursor::MoveTo(extent.width as u16 + 1, row as u16),
                Print('║')
            )?;
        }
        queue!(
            self.out,
            cursor::MoveTo(0, extent.height as u16 + 1),
            Print(format!("╚{bar}╝"))
        )?;
        self.framed = Some(extent);
        Ok(())
    }
}

impl<W: Write> Surface for TextSurface<W> {
    fn extent(&mut self) -> io::Result<Extent> {
        let (columns, rows) = (self.size)()?;
        let max_w = usize::from(columns).saturating_sub(2);
        let max_h = usize::from(rows).saturating_sub(2);
        Ok(match self.resolution {
            Some((w, h)) => Extent::new(w.min(max_w), h.min(max_h)),
            None => Extent::new(max_w, max_h),
        })
    }

    fn present(&mut self, raster: &Raster, palette: &Palette) -> io::Result<()> {
        let extent = raster.extent();
        let background = palette.get(0).to_terminal(self.profile);
        if self.framed != Some(extent) {
            let border = palette.get(1).to_terminal(self.profile);
            self.draw_border(extent, border, background)?;
        }

        queue!(self.out, SetBackgroundColor(background))?;
        let mut current_fg = None;
        for (i, row) in raster.rows().enumerate() {
            queue!(self.out, cursor::MoveTo(1, i as u16 + 1))?;
            for &value in row {
                if value == 0 {
                    queue!(self.out, Print(DEAD))?;
                    continue;
                }
                let fg = palette.get(value).to_terminal(self.profile);
                if current_fg != Some(fg) {
                    queue!(self.out, SetForegroundColor(fg))?;
                    current_fg = Some(fg);
                }
                queue!(self.out, Print(LIVE))?;
            }
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }

    fn release(&mut self) -> io::Result<()> {
        self.framed = None;
        release_terminal(&mut self.out, &mut self.session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::fixed_size;

    fn surface(columns: u16, rows: u16, resolution: Option<(usize, usize)>) -> TextSurface<Vec<u8>> {
        TextSurface::new(Vec::new(), fixed_size(columns, rows), resolution, ColourProfile::TrueColor)
    }

    #[test]
    fn extent_leaves_room_for_the_border() {
        assert_eq!(surface(80, 24, None).extent().unwrap(), Extent::new(78, 22));
        assert_eq!(surface(80, 24, Some((40, 10))).extent().unwrap(), Extent::new(40, 10));
        assert_eq!(surface(80, 24, Some((200, 100))).extent().unwrap(), Extent::new(78, 22));
        assert_eq!(surface(1, 1, None).extent().unwrap(), Extent::new(0, 0));
    }

    #[test]
    fn present_draws_border_and_glyphs() {
        let mut s = surface(10, 5, None);
        let raster = Raster::new(Extent::new(3, 1), vec![1, 0, 1]);
        s.present(&raster, &Palette::default()).unwrap();
        let out = String::from_utf8(s.writer().clone()).unwrap();
        assert!(out.contains("╔═══╗"));
        assert!(out.contains("╚═══╝"));
        assert_eq!(out.matches(LIVE).count(), 2);
    }

    #[test]
    fn border_is_drawn_once_per_extent() {
        let mut s = surface(10, 5, None);
        let raster = Raster::new(Extent::new(2, 2), vec![1, 0, 0, 1]);
        s.present(&raster, &Palette::default()).unwrap();
        s.present(&raster, &Palette::default()).unwrap();
        let out = String::from_utf8(s.writer().clone()).unwrap();
        assert_eq!(out.matches('╔').count(), 1);
    }

    #[test]
    fn release_without_session_is_harmless() {
        let mut s = surface(10, 5, None);
        s.release().unwrap();
        s.release().unwrap();
    }
}
