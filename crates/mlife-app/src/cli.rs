#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args by hand, in the same spirit as the options table below.
//! Environment variables with the `MLIFE_` prefix set defaults that explicit
//! flags override.

use std::path::PathBuf;

use mlife_core::{LifeError, Result};

use crate::colour_spec;
use crate::config::{Config, parse_algorithm};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
Matrix Life - Conway's Game of Life on a torus

USAGE:
    mlife [OPTIONS]

OPTIONS:
    -A, --algorithm NAME     Stepping algorithm (default: shift-sum)
    -O, --outmode MODE       Output: 'graphical' (default) or 'terminal'
    -s, --size W [H]         Grid size in cells (default: 96 54)
    -r, --resolution W [H]   Drawing area; pixels for graphical output
                             (default 960 540), characters for terminal
                             output (default: the whole terminal)
    -d, --delay SECONDS      Delay between generations (default: 0.05)
    -p, --paused             Start paused
    -F, --fullscreen         Graphical output across the whole terminal
    -c, --colour SLOT=SPEC   Colour for cell value SLOT (0 dead, 1 alive)
        --density P          Initial live-cell probability (default: 0.5)
        --seed N             Seed the random soup
        --reseed             Start a new soup when the grid stops changing
        --log-file PATH      Write logs to PATH
    -v, --verbose            More log output (repeatable)
    -q, --quiet              Less log output (repeatable)
    -h, --help               Show this help message
    -V, --version            Show version

    Long options also accept --name=VALUE; sizes then take W or WxH.

ALGORITHMS:
    shift-sum      roll, numpy-roll, np-roll, nr, r, default
    dense-matrix   dense, numpy-matmul, np-matmul, numpy, np, nm, n
    sparse-matrix  sparse, scipy-matmul, sp-matmul, scipy, matmul, sp, sm, s, m
    convolution    conv, convolve, scipy-convolve, sp-conv, sc, c

OUTPUT MODES:
    graphical      graph, pygame, pg, g, p, default
    terminal       term, curses, ncurses, nc, t, c

COLOURS:
    #rrggbb  #rrggbbaa  R,G,B  R,G,B,A  grey:N  gray:N  @N (palette index)

KEYBINDINGS:
    Space / p       Toggle pause
    Enter / s       Single step while paused
    Arrows, 1-9     Pan (5 or Home recentres)
    + / -           Zoom
    q / Esc         Quit
    Ctrl+C          Cancel

ENVIRONMENT VARIABLES:
    MLIFE_ALGORITHM   Override --algorithm
    MLIFE_OUTMODE     Override --outmode
    MLIFE_SIZE        Override --size (W or WxH)
    MLIFE_DELAY       Override --delay
    MLIFE_SEED        Override --seed
    MLIFE_LOG_FILE    Override --log-file
    MLIFE_LOG         Log filter directives (default: info)";

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Config),
    Help,
    Version,
}

/// Parse the process arguments and environment.
///
/// # Errors
///
/// [`LifeError::Configuration`] for unknown flags or malformed values.
pub fn parse_env() -> Result<Command> {
    parse(std::env::args().skip(1), |key| std::env::var(key).ok())
}

/// Parse `args` (without the program name), reading `MLIFE_*` defaults
/// through `env`.
///
/// # Errors
///
/// [`LifeError::Configuration`] for unknown flags or malformed values.
pub fn parse<I, F>(args: I, env: F) -> Result<Command>
where
    I: IntoIterator<Item = String>,
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();
    apply_env(&mut config, &env)?;

    let args: Vec<String> = args.into_iter().collect();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        i += 1;
        match arg {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            "--paused" | "-p" => config.paused = true,
            "--fullscreen" | "-F" => config.fullscreen = true,
            "--reseed" => config.reseed = true,
            "--verbose" | "-v" => config.verbosity += 1,
            "--quiet" | "-q" => config.verbosity -= 1,
            "--algorithm" | "-A" => {
                config.algorithm = parse_algorithm(value(&args, &mut i, arg)?)?;
            }
            "--outmode" | "-O" => config.view = value(&args, &mut i, arg)?.parse()?,
            "--delay" | "-d" => config.delay = number(arg, value(&args, &mut i, arg)?)?,
            "--density" => config.density = number(arg, value(&args, &mut i, arg)?)?,
            "--seed" => config.seed = Some(number(arg, value(&args, &mut i, arg)?)?),
            "--log-file" => config.log_file = Some(PathBuf::from(value(&args, &mut i, arg)?)),
            "--colour" | "--color" | "-c" => {
                let assignment = colour_spec::parse_assignment(value(&args, &mut i, arg)?)?;
                config.colours.push(assignment);
            }
            "--size" | "-s" => config.size = dimensions(&args, &mut i, arg)?,
            "--resolution" | "-r" => config.resolution = Some(dimensions(&args, &mut i, arg)?),
            other => apply_long_value(&mut config, other)?,
        }
    }

    config.validate()?;
    Ok(Command::Run(config))
}

fn apply_env<F: Fn(&str) -> Option<String>>(config: &mut Config, env: &F) -> Result<()> {
    if let Some(val) = env("MLIFE_ALGORITHM") {
        config.algorithm = parse_algorithm(&val)?;
    }
    if let Some(val) = env("MLIFE_OUTMODE") {
        config.view = val.parse()?;
    }
    if let Some(val) = env("MLIFE_SIZE") {
        config.size = packed_dimensions("MLIFE_SIZE", &val)?;
    }
    if let Some(val) = env("MLIFE_DELAY") {
        config.delay = number("MLIFE_DELAY", &val)?;
    }
    if let Some(val) = env("MLIFE_SEED") {
        config.seed = Some(number("MLIFE_SEED", &val)?);
    }
    if let Some(val) = env("MLIFE_LOG_FILE") {
        config.log_file = Some(PathBuf::from(val));
    }
    Ok(())
}

/// `--name=VALUE` forms.
fn apply_long_value(config: &mut Config, arg: &str) -> Result<()> {
    let Some((name, val)) = arg.split_once('=').filter(|_| arg.starts_with("--")) else {
        return Err(LifeError::config(format!(
            "unknown argument: {arg} (run with --help for usage)"
        )));
    };
    match name {
        "--algorithm" => config.algorithm = parse_algorithm(val)?,
        "--outmode" => config.view = val.parse()?,
        "--delay" => config.delay = number(name, val)?,
        "--density" => config.density = number(name, val)?,
        "--seed" => config.seed = Some(number(name, val)?),
        "--log-file" => config.log_file = Some(PathBuf::from(val)),
        "--colour" | "--color" => config.colours.push(colour_spec::parse_assignment(val)?),
        "--size" => config.size = packed_dimensions(name, val)?,
        "--resolution" => config.resolution = Some(packed_dimensions(name, val)?),
        _ => {
            return Err(LifeError::config(format!(
                "unknown argument: {name} (run with --help for usage)"
            )));
        }
    }
    Ok(())
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    let val = args
        .get(*i)
        .ok_or_else(|| LifeError::config(format!("{flag} needs a value")))?;
    *i += 1;
    Ok(val.as_str())
}

fn number<T: std::str::FromStr>(flag: &str, val: &str) -> Result<T> {
    val.trim()
        .parse()
        .map_err(|_| LifeError::config(format!("invalid {flag} value: {val}")))
}

/// `W [H]`: a second number is consumed when one follows.
fn dimensions(args: &[String], i: &mut usize, flag: &str) -> Result<(usize, usize)> {
    let width = number(flag, value(args, i, flag)?)?;
    let height = match args.get(*i).and_then(|next| next.parse().ok()) {
        Some(height) => {
            *i += 1;
            height
        }
        None => width,
    };
    Ok((width, height))
}

/// `W`, `WxH` or `W,H`.
fn packed_dimensions(flag: &str, val: &str) -> Result<(usize, usize)> {
    match val.split_once(['x', 'X', ',']) {
        Some((w, h)) => Ok((number(flag, w)?, number(flag, h)?)),
        None => {
            let side = number(flag, val)?;
            Ok((side, side))
        }
    }
}
