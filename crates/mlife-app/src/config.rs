#![forbid(unsafe_code)]

//! The run configuration and the name tables the command line accepts.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use mlife_core::grid::MAX_CELLS;
use mlife_core::model::DEFAULT_DENSITY;
use mlife_core::{Algorithm, LifeError, Result};
use mlife_view::{Colour, Palette};

/// Default grid size in cells.
pub const DEFAULT_SIZE: (usize, usize) = (96, 54);

/// Default delay between generations, in seconds.
pub const DEFAULT_DELAY_SECS: f64 = 0.05;

/// Default graphical resolution in pixels.
pub const DEFAULT_RESOLUTION: (usize, usize) = (960, 540);

/// Names accepted for "pick the default".
const DEFAULT_NAMES: &[&str] = &["default", "def", "deflt", "dflt", "d"];

const SHIFT_SUM_NAMES: &[&str] = &[
    "shift-sum", "shift", "numpy-roll", "np-roll", "n-roll", "nr", "roll", "r",
];
const DENSE_NAMES: &[&str] = &[
    "dense-matrix", "dense", "numpy-matmul", "np-matmul", "n-matmul", "nm", "numpy", "np", "n",
];
const SPARSE_NAMES: &[&str] = &[
    "sparse-matrix", "scipy-matmul", "sparse-matmul", "sp-matmul", "s-matmul", "sm", "scipy",
    "sparse", "sp", "s", "matmul", "m",
];
const CONVOLUTION_NAMES: &[&str] = &[
    "convolution", "scipy-convolve", "scipy-conv", "sp-convolve", "sp-conv", "sc", "convolve",
    "conv", "c",
];

const TERMINAL_NAMES: &[&str] = &["terminal", "term", "t", "ncurses", "nc", "curses", "c"];
const GRAPHICAL_NAMES: &[&str] = &["graphical", "graph", "g", "pygame", "pg", "p"];

/// Resolve an algorithm name or alias, case-insensitively.
///
/// # Errors
///
/// [`LifeError::Configuration`] for an unknown name.
pub fn parse_algorithm(name: &str) -> Result<Algorithm> {
    let name = name.trim().to_ascii_lowercase();
    let tables = [
        (DEFAULT_NAMES, Algorithm::default()),
        (SHIFT_SUM_NAMES, Algorithm::ShiftSum),
        (DENSE_NAMES, Algorithm::DenseMatrix),
        (SPARSE_NAMES, Algorithm::SparseMatrix),
        (CONVOLUTION_NAMES, Algorithm::Convolution),
    ];
    tables
        .iter()
        .find(|(names, _)| names.contains(&name.as_str()))
        .map(|&(_, algorithm)| algorithm)
        .ok_or_else(|| LifeError::config(format!("unknown algorithm: {name}")))
}

/// Which kind of view to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewKind {
    /// One character per cell inside a border.
    Terminal,
    /// Half-block pixels fitted to a resolution.
    #[default]
    Graphical,
}

impl ViewKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ViewKind::Terminal => "terminal",
            ViewKind::Graphical => "graphical",
        }
    }

    /// Initial zoom: one character per cell for text, fit for pixels.
    #[must_use]
    pub const fn initial_scale(self) -> Option<f64> {
        match self {
            ViewKind::Terminal => Some(1.0),
            ViewKind::Graphical => None,
        }
    }
}

impl FromStr for ViewKind {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        let name = name.as_str();
        if DEFAULT_NAMES.contains(&name) {
            Ok(ViewKind::default())
        } else if TERMINAL_NAMES.contains(&name) {
            Ok(ViewKind::Terminal)
        } else if GRAPHICAL_NAMES.contains(&name) {
            Ok(ViewKind::Graphical)
        } else {
            Err(LifeError::config(format!("unknown output mode: {s}")))
        }
    }
}

/// Everything needed to start a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Grid `(width, height)` in cells.
    pub size: (usize, usize),
    /// Requested drawing area; `None` picks the view's default.
    pub resolution: Option<(usize, usize)>,
    pub algorithm: Algorithm,
    pub view: ViewKind,
    /// Delay between generations, in seconds.
    pub delay: f64,
    pub fullscreen: bool,
    pub paused: bool,
    /// Palette overrides, applied in order over the default palette.
    pub colours: Vec<(usize, Colour)>,
    /// Random seed; `None` seeds from the operating system.
    pub seed: Option<u64>,
    /// Probability that a cell starts alive.
    pub density: f64,
    /// Reset the grid when it stops changing.
    pub reseed: bool,
    /// Write logs here. No file, no logs.
    pub log_file: Option<PathBuf>,
    /// Net `-v` count minus `-q` count.
    pub verbosity: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            resolution: None,
            algorithm: Algorithm::default(),
            view: ViewKind::default(),
            delay: DEFAULT_DELAY_SECS,
            fullscreen: false,
            paused: false,
            colours: Vec::new(),
            seed: None,
            density: DEFAULT_DENSITY,
            reseed: false,
            log_file: None,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Check values the parser cannot rule out on its own.
    ///
    /// # Errors
    ///
    /// [`LifeError::Configuration`] for a zero or oversized grid, a zero
    /// resolution, a negative or non-finite delay, or a density outside
    /// `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        let (w, h) = self.size;
        if w == 0 || h == 0 {
            return Err(LifeError::config(format!("grid size must be positive, got {w}x{h}")));
        }
        if w.checked_mul(h).is_none_or(|cells| cells > MAX_CELLS) {
            return Err(LifeError::config(format!(
                "grid size {w}x{h} exceeds {MAX_CELLS} cells"
            )));
        }
        if let Some((w, h)) = self.resolution
            && (w == 0 || h == 0)
        {
            return Err(LifeError::config(format!("resolution must be positive, got {w}x{h}")));
        }
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(LifeError::config(format!("delay must be >= 0, got {}", self.delay)));
        }
        if !(0.0..=1.0).contains(&self.density) {
            return Err(LifeError::config(format!(
                "density must be within [0, 1], got {}",
                self.density
            )));
        }
        Ok(())
    }

    /// The delay as a duration.
    #[must_use]
    pub fn frame_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay).unwrap_or_default()
    }

    /// The resolution to hand to the view.
    ///
    /// The graphical view falls back to its default resolution; the text view
    /// uses the whole terminal when none is given.
    #[must_use]
    pub fn effective_resolution(&self) -> Option<(usize, usize)> {
        match self.view {
            ViewKind::Terminal => self.resolution,
            ViewKind::Graphical => Some(self.resolution.unwrap_or(DEFAULT_RESOLUTION)),
        }
    }

    /// Default palette with the configured overrides applied.
    #[must_use]
    pub fn palette(&self) -> Palette {
        let mut palette = Palette::default();
        for &(slot, colour) in &self.colours {
            palette.set(slot, colour);
        }
        palette
    }
}
