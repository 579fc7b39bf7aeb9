#![forbid(unsafe_code)]

//! In-memory surface for headless runs and tests.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use crate::colour::Palette;
use crate::surface::{Extent, Raster, Surface};

/// What a [`MemorySurface`] has seen. Shared so tests can inspect it after the
/// surface has moved into a view.
#[derive(Debug, Default)]
pub struct MemoryLog {
    /// Number of successful presents.
    pub presents: usize,
    /// Most recent raster.
    pub last: Option<Raster>,
    /// True once released.
    pub released: bool,
}

/// Surface that records frames instead of drawing them.
#[derive(Debug)]
pub struct MemorySurface {
    extent: Extent,
    log: Rc<RefCell<MemoryLog>>,
    fail_present: bool,
}

impl MemorySurface {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            extent: Extent::new(width, height),
            log: Rc::default(),
            fail_present: false,
        }
    }

    /// Surface whose every present fails, for error-path tests.
    #[must_use]
    pub fn failing(width: usize, height: usize) -> Self {
        Self {
            fail_present: true,
            ..Self::new(width, height)
        }
    }

    /// Handle to the shared log.
    #[must_use]
    pub fn log(&self) -> Rc<RefCell<MemoryLog>> {
        Rc::clone(&self.log)
    }
}

impl Surface for MemorySurface {
    fn extent(&mut self) -> io::Result<Extent> {
        Ok(self.extent)
    }

    fn present(&mut self, raster: &Raster, _palette: &Palette) -> io::Result<()> {
        if self.fail_present {
            return Err(io::Error::other("present failed"));
        }
        let mut log = self.log.borrow_mut();
        log.presents += 1;
        log.last = Some(raster.clone());
        Ok(())
    }

    fn release(&mut self) -> io::Result<()> {
        self.log.borrow_mut().released = true;
        Ok(())
    }
}
