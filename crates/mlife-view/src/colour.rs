#![forbid(unsafe_code)]

//! Cell colours, terminal colour profiles, and downgrade utilities.
//!
//! A [`Palette`] maps cell values to [`Colour`]s. Before drawing, surfaces
//! resolve each colour against the detected [`ColourProfile`] so a truecolor
//! palette still renders sensibly on 256-colour, 16-colour, or monochrome
//! terminals.

use std::env;

use crossterm::style::Color as TermColor;

/// Terminal colour profile used for downgrade decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColourProfile {
    /// No colour output.
    Mono,
    /// Standard 16 ANSI colours.
    Ansi16,
    /// Extended 256-colour palette.
    Ansi256,
    /// Full 24-bit RGB colour.
    TrueColor,
}

#[derive(Debug, Clone, Default)]
struct DetectInputs {
    no_color: bool,
    term: String,
    colorterm: String,
}

impl DetectInputs {
    fn from_env() -> Self {
        Self {
            no_color: env::var("NO_COLOR").is_ok(),
            term: env::var("TERM").unwrap_or_default(),
            colorterm: env::var("COLORTERM").unwrap_or_default(),
        }
    }
}

impl ColourProfile {
    /// Choose the best available profile from detection flags.
    ///
    /// `no_color` should reflect explicit user intent (e.g. NO_COLOR).
    #[must_use]
    pub const fn from_flags(true_color: bool, colors_256: bool, no_color: bool) -> Self {
        if no_color {
            Self::Mono
        } else if true_color {
            Self::TrueColor
        } else if colors_256 {
            Self::Ansi256
        } else {
            Self::Ansi16
        }
    }

    /// Detect the profile from `NO_COLOR`, `COLORTERM` and `TERM`.
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_from_inputs(&DetectInputs::from_env())
    }

    fn detect_from_inputs(env: &DetectInputs) -> Self {
        let term = env.term.as_str();
        let colorterm = env.colorterm.as_str();
        let is_dumb = term == "dumb";
        let true_color = colorterm.contains("truecolor") || colorterm.contains("24bit");
        let colors_256 = true_color || term.contains("256");
        Self::from_flags(true_color, colors_256, env.no_color || is_dumb)
    }
}

/// One palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    /// Opaque RGB.
    Rgb(u8, u8, u8),
    /// RGB with alpha; composited over black for terminal output.
    Rgba(u8, u8, u8, u8),
    /// Grey level, 0 black to 255 white.
    Grey(u8),
    /// A terminal palette index.
    Indexed(u8),
}

impl Colour {
    /// Background for dead cells.
    pub const DEAD: Colour = Colour::Rgb(31, 1, 46);
    /// Foreground for live cells.
    pub const ALIVE: Colour = Colour::Rgb(29, 206, 166);

    /// RGB triplet regardless of how the colour was specified.
    #[must_use]
    pub fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            Colour::Rgb(r, g, b) => (r, g, b),
            Colour::Rgba(r, g, b, a) => (over_black(r, a), over_black(g, a), over_black(b, a)),
            Colour::Grey(v) => (v, v, v),
            Colour::Indexed(idx) => ansi256_to_rgb(idx),
        }
    }

    /// Resolve to a crossterm colour that fits `profile`.
    #[must_use]
    pub fn to_terminal(self, profile: ColourProfile) -> TermColor {
        match (self, profile) {
            (Colour::Indexed(idx), ColourProfile::TrueColor | ColourProfile::Ansi256) => {
                TermColor::AnsiValue(idx)
            }
            (Colour::Indexed(idx), ColourProfile::Ansi16) if idx < 16 => TermColor::AnsiValue(idx),
            (_, ColourProfile::TrueColor) => {
                let (r, g, b) = self.to_rgb();
                TermColor::Rgb { r, g, b }
            }
            (_, ColourProfile::Ansi256) => {
                let (r, g, b) = self.to_rgb();
                TermColor::AnsiValue(rgb_to_256(r, g, b))
            }
            (_, ColourProfile::Ansi16) => {
                let (r, g, b) = self.to_rgb();
                TermColor::AnsiValue(rgb_to_ansi16(r, g, b))
            }
            (_, ColourProfile::Mono) => {
                let (r, g, b) = self.to_rgb();
                if luminance(r, g, b) >= 128 {
                    TermColor::White
                } else {
                    TermColor::Black
                }
            }
        }
    }
}

/// Ordered colours indexed by cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colours: Vec<Colour>,
}

impl Palette {
    /// Palette from explicit colours. Empty input yields the default palette.
    #[must_use]
    pub fn new(colours: Vec<Colour>) -> Self {
        if colours.is_empty() {
            Self::default()
        } else {
            Self { colours }
        }
    }

    /// Colour for a cell value; values past the end reuse the last entry.
    #[must_use]
    pub fn get(&self, value: u8) -> Colour {
        let idx = usize::from(value).min(self.colours.len() - 1);
        self.colours[idx]
    }

    /// Replace slot `slot`, growing the palette with defaults if needed.
    pub fn set(&mut self, slot: usize, colour: Colour) {
        let defaults = [Colour::DEAD, Colour::ALIVE];
        while self.colours.len() <= slot {
            let next = defaults.get(self.colours.len()).copied().unwrap_or(Colour::ALIVE);
            self.colours.push(next);
        }
        self.colours[slot] = colour;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colours: vec![Colour::DEAD, Colour::ALIVE],
        }
    }
}

const ANSI16_PALETTE: [(u8, u8, u8); 16] = [
    (0, 0, 0),       // Black
    (205, 0, 0),     // Red
    (0, 205, 0),     // Green
    (205, 205, 0),   // Yellow
    (0, 0, 238),     // Blue
    (205, 0, 205),   // Magenta
    (0, 205, 205),   // Cyan
    (229, 229, 229), // White
    (127, 127, 127), // Bright Black
    (255, 0, 0),     // Bright Red
    (0, 255, 0),     // Bright Green
    (255, 255, 0),   // Bright Yellow
    (92, 92, 255),   // Bright Blue
    (255, 0, 255),   // Bright Magenta
    (0, 255, 255),   // Bright Cyan
    (255, 255, 255), // Bright White
];

fn over_black(channel: u8, alpha: u8) -> u8 {
    ((u16::from(channel) * u16::from(alpha) + 127) / 255) as u8
}

/// BT.709 luma as a `u8`.
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let luma = 2126 * u32::from(r) + 7152 * u32::from(g) + 722 * u32::from(b);
    ((luma + 5000) / 10_000) as u8
}

/// Nearest ANSI 256-colour index.
#[must_use]
pub fn rgb_to_256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        if r < 8 {
            return 16;
        }
        if r > 248 {
            return 231;
        }
        return 232 + ((r - 8) / 10).min(23);
    }
    16 + 36 * cube_index(r) + 6 * cube_index(g) + cube_index(b)
}

/// Nearest level of the 6×6×6 cube, whose levels `[0, 95, 135, 175, 215, 255]`
/// are not evenly spaced.
fn cube_index(v: u8) -> u8 {
    if v < 48 {
        0
    } else if v < 115 {
        1
    } else {
        (v - 35) / 40
    }
}

/// RGB value of an ANSI 256-colour index.
#[must_use]
pub fn ansi256_to_rgb(index: u8) -> (u8, u8, u8) {
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    if index < 16 {
        return ANSI16_PALETTE[usize::from(index)];
    }
    if index >= 232 {
        let grey = 8 + 10 * (index - 232);
        return (grey, grey, grey);
    }
    let idx = index - 16;
    (
        LEVELS[usize::from(idx / 36)],
        LEVELS[usize::from((idx / 6) % 6)],
        LEVELS[usize::from(idx % 6)],
    )
}

/// Nearest of the 16 ANSI colours, by luma-weighted distance.
#[must_use]
pub fn rgb_to_ansi16(r: u8, g: u8, b: u8) -> u8 {
    let mut best = 0;
    let mut best_dist = u64::MAX;
    for (idx, &candidate) in ANSI16_PALETTE.iter().enumerate() {
        let dist = weighted_distance((r, g, b), candidate);
        if dist < best_dist {
            best = idx as u8;
            best_dist = dist;
        }
    }
    best
}

fn weighted_distance(a: (u8, u8, u8), b: (u8, u8, u8)) -> u64 {
    let sq = |x: u8, y: u8| {
        let d = i64::from(x) - i64::from(y);
        (d * d) as u64
    };
    2126 * sq(a.0, b.0) + 7152 * sq(a.1, b.1) + 722 * sq(a.2, b.2)
}
