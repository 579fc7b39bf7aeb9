#![forbid(unsafe_code)]

//! The `SLOT=SPEC` colour grammar used by `--colour`.
//!
//! | Spec          | Meaning                        |
//! |---------------|--------------------------------|
//! | `#rrggbb`     | RGB in hex                     |
//! | `#rrggbbaa`   | RGBA in hex                    |
//! | `R,G,B`       | RGB, each 0-255                |
//! | `R,G,B,A`     | RGBA, each 0-255               |
//! | `grey:N`      | grey level 0-255 (or `gray:N`) |
//! | `@N`          | terminal palette index 0-255   |
//!
//! Slot 0 colours dead cells, slot 1 live cells.

use mlife_core::{LifeError, Result};
use mlife_view::Colour;

/// Parse `SLOT=SPEC`.
///
/// # Errors
///
/// [`LifeError::Configuration`] if the slot or spec is malformed.
pub fn parse_assignment(input: &str) -> Result<(usize, Colour)> {
    let (slot, spec) = input
        .split_once('=')
        .ok_or_else(|| LifeError::config(format!("expected SLOT=COLOUR, got {input:?}")))?;
    let slot: u8 = slot
        .trim()
        .parse()
        .map_err(|_| LifeError::config(format!("bad colour slot {slot:?}")))?;
    Ok((usize::from(slot), parse_colour(spec)?))
}

/// Parse one colour spec.
///
/// # Errors
///
/// [`LifeError::Configuration`] if `spec` matches none of the forms.
pub fn parse_colour(spec: &str) -> Result<Colour> {
    let spec = spec.trim();
    let bad = || LifeError::config(format!("bad colour {spec:?}"));

    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(bad);
    }
    if let Some(index) = spec.strip_prefix('@') {
        return index.parse().map(Colour::Indexed).map_err(|_| bad());
    }
    let lower = spec.to_ascii_lowercase();
    if let Some(level) = lower
        .strip_prefix("grey:")
        .or_else(|| lower.strip_prefix("gray:"))
    {
        return level.trim().parse().map(Colour::Grey).map_err(|_| bad());
    }

    let parts: Vec<u8> = spec
        .split(',')
        .map(|p| p.trim().parse::<u8>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| bad())?;
    match parts[..] {
        [r, g, b] => Ok(Colour::Rgb(r, g, b)),
        [r, g, b, a] => Ok(Colour::Rgba(r, g, b, a)),
        _ => Err(bad()),
    }
}

fn parse_hex(hex: &str) -> Option<Colour> {
    if !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(Colour::Rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Colour::Rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}
