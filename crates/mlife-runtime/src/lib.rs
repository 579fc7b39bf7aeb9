#![forbid(unsafe_code)]

//! Matrix Life Runtime
//!
//! Input handling and the run loop that ties a model to a view.
//!
//! # Key Components
//!
//! - [`Event`] - Canonical input events, converted from crossterm
//! - [`EventSource`] - Non-blocking input, from the terminal or a script
//! - [`Action`] - What a key asks for (quit, pause, pan, zoom, ...)
//! - [`Interrupt`] - Cooperative cancellation flag, set by [`SignalWatcher`]
//! - [`LoopController`] - The frame loop implementing [`Controller`]

pub mod action;
pub mod controller;
pub mod event;
pub mod input;
pub mod interrupt;

pub use action::{Action, action_for};
pub use controller::{Controller, LoopController, RunOutcome};
pub use event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use input::{CrosstermEvents, EventSource, ScriptedEvents};
pub use interrupt::{Interrupt, SignalWatcher};
