#![forbid(unsafe_code)]

//! The run loop that drives a [`Model`] and a [`View`].
//!
//! The controller owns at most one model and one view. Each frame it drains
//! pending input, advances the model by one generation unless paused, hands
//! the new grid to the view, and sleeps. Every way out of [`Controller::run`]
//! (quit, cancellation, error) goes through [`Controller::close`], which
//! closes the model, then the view, and leaves the controller unusable.
//!
//! # Example
//!
//! ```
//! use mlife_core::{Algorithm, Grid, LifeModel, SimContext};
//! use mlife_runtime::{Controller, LoopController, RunOutcome, ScriptedEvents};
//! use mlife_view::{MemorySurface, SurfaceView, ViewOptions};
//! use std::time::Duration;
//!
//! let grid = Grid::from_rows(&[[0u8, 1, 0], [0, 1, 0], [0, 1, 0]]).unwrap();
//! let model = LifeModel::from_grid(grid, Algorithm::ShiftSum, SimContext::seeded(1));
//! let view = SurfaceView::new(MemorySurface::new(6, 6), ViewOptions::default()).unwrap();
//! let events = ScriptedEvents::new().idle(3).then_close();
//!
//! let mut controller = LoopController::new(events)
//!     .with_model(model)
//!     .with_view(view)
//!     .delay(Duration::ZERO);
//! assert_eq!(controller.run().unwrap(), RunOutcome::Finished);
//! assert!(controller.is_closed());
//! ```

use std::time::Duration;

use mlife_core::{LifeError, Model, Result, StagnationDetector};
use mlife_view::View;
use tracing::{debug, info, warn};

use crate::action::{Action, action_for};
use crate::input::EventSource;
use crate::interrupt::Interrupt;

const COMPONENT: &str = "Controller";

/// Default inter-frame delay.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(50);

/// Input polling interval while paused, and the longest stretch the loop
/// sleeps without checking the interrupt.
pub const PAUSED_POLL: Duration = Duration::from_millis(10);

/// How a run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The user quit.
    Finished,
    /// Ctrl+C or a termination signal.
    Cancelled,
}

impl RunOutcome {
    /// Process exit status. Cancellation is not a failure.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        0
    }

    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Run-loop capability.
pub trait Controller {
    /// Drain and act on pending input.
    ///
    /// # Errors
    ///
    /// `InvalidState` after close; otherwise whatever the model or view
    /// report while acting on the input.
    fn handle_events(&mut self) -> Result<()>;

    /// Run until quit, cancellation or error, then close.
    ///
    /// # Errors
    ///
    /// `InvalidState` if already closed, or the first error raised inside
    /// the loop (after closing).
    fn run(&mut self) -> Result<RunOutcome>;

    /// Close the model, then the view, then the controller. Idempotent.
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

/// The frame loop over a model `M`, a view `V` and an input source `E`.
#[derive(Debug)]
pub struct LoopController<M, V, E> {
    model: Option<M>,
    view: Option<V>,
    events: E,
    delay: Duration,
    running: bool,
    paused: bool,
    closed: bool,
    cancelled: bool,
    interrupt: Option<Interrupt>,
    stagnation: Option<StagnationDetector>,
    reseed: bool,
}

impl<M: Model, V: View, E: EventSource> LoopController<M, V, E> {
    /// A controller with nothing attached, reading input from `events`.
    #[must_use]
    pub fn new(events: E) -> Self {
        Self {
            model: None,
            view: None,
            events,
            delay: DEFAULT_DELAY,
            running: false,
            paused: false,
            closed: false,
            cancelled: false,
            interrupt: None,
            stagnation: None,
            reseed: false,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: M) -> Self {
        self.model = Some(model);
        self
    }

    #[must_use]
    pub fn with_view(mut self, view: V) -> Self {
        self.view = Some(view);
        self
    }

    #[must_use]
    pub const fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Start paused.
    #[must_use]
    pub const fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// Poll `interrupt` each frame and during the frame delay; cancel when it is set.
    #[must_use]
    pub fn interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// Watch for repeating grids. With `reseed`, a stagnant model is reset.
    #[must_use]
    pub fn stagnation(mut self, detector: StagnationDetector, reseed: bool) -> Self {
        self.stagnation = Some(detector);
        self.reseed = reseed;
        self
    }

    /// Attach a model, returning the one it replaces.
    ///
    /// # Errors
    ///
    /// `InvalidState` after close.
    pub fn connect_model(&mut self, model: M) -> Result<Option<M>> {
        self.ensure_open()?;
        Ok(self.model.replace(model))
    }

    /// Attach a view, returning the one it replaces.
    ///
    /// # Errors
    ///
    /// `InvalidState` after close.
    pub fn connect_view(&mut self, view: V) -> Result<Option<V>> {
        self.ensure_open()?;
        Ok(self.view.replace(view))
    }

    /// Detach the model so that closing the controller leaves it open.
    pub fn take_model(&mut self) -> Option<M> {
        self.model.take()
    }

    /// Detach the view so that closing the controller leaves it open.
    pub fn take_view(&mut self) -> Option<V> {
        self.view.take()
    }

    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(LifeError::closed(COMPONENT));
        }
        Ok(())
    }

    fn interrupted(&self) -> bool {
        self.interrupt.as_ref().is_some_and(Interrupt::is_triggered)
    }

    /// Sleep for `total` in slices of at most [`PAUSED_POLL`], returning as
    /// soon as the interrupt is raised.
    fn wait(&self, total: Duration) {
        let mut left = total;
        while !left.is_zero() && !self.interrupted() {
            let slice = left.min(PAUSED_POLL);
            std::thread::sleep(slice);
            left -= slice;
        }
    }

    fn steps_taken(&self) -> Result<u64> {
        match &self.model {
            Some(model) => model.steps_taken(),
            None => Ok(0),
        }
    }

    /// One generation: step, redraw, check for stagnation.
    fn advance(&mut self) -> Result<()> {
        let Some(model) = self.model.as_mut() else {
            return Ok(());
        };
        model.step(1)?;
        let grid = model.grid()?;
        if let Some(view) = self.view.as_mut() {
            view.update(Some(grid), true)?;
        }
        let stagnant = self
            .stagnation
            .as_mut()
            .is_some_and(|detector| detector.observe(grid));
        if !stagnant {
            return Ok(());
        }

        let steps = model.steps_taken()?;
        if !self.reseed {
            debug!(steps, "grid is repeating");
            return Ok(());
        }
        info!(steps, "grid stagnated, reseeding");
        model.reset()?;
        if let Some(detector) = self.stagnation.as_mut() {
            detector.clear();
        }
        if let Some(view) = self.view.as_mut() {
            view.update(Some(model.grid()?), true)?;
        }
        Ok(())
    }

    fn apply(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => {
                info!("quit requested");
                self.running = false;
            }
            Action::Cancel => {
                info!("cancel requested");
                self.cancelled = true;
                self.running = false;
            }
            Action::TogglePause => {
                self.paused = !self.paused;
                debug!(paused = self.paused, "pause toggled");
            }
            Action::Step if self.paused => self.advance()?,
            Action::Step => {
                debug!("step ignored while running");
            }
            Action::Move(dx, dy) => {
                if let Some(view) = self.view.as_mut() {
                    view.move_by((dx, dy))?;
                }
            }
            Action::Recentre => {
                if let Some(view) = self.view.as_mut() {
                    view.move_to((0, 0))?;
                }
            }
            Action::Zoom(delta) => {
                if let Some(view) = self.view.as_mut() {
                    view.scale_by(delta)?;
                }
            }
        }
        Ok(())
    }

    fn run_loop(&mut self) -> Result<RunOutcome> {
        self.running = true;
        let mut first = true;
        while self.running {
            if self.interrupted() {
                warn!("interrupted");
                self.cancelled = true;
                break;
            }
            self.handle_events()?;
            if !self.running {
                break;
            }
            let fresh = first && self.steps_taken()? == 0;
            if !self.paused || fresh {
                self.advance()?;
            }
            first = false;
            self.wait(if self.paused { PAUSED_POLL } else { self.delay });
        }
        self.running = false;
        Ok(if self.cancelled {
            RunOutcome::Cancelled
        } else {
            RunOutcome::Finished
        })
    }
}

impl<M: Model, V: View, E: EventSource> Controller for LoopController<M, V, E> {
    fn handle_events(&mut self) -> Result<()> {
        self.ensure_open()?;
        for event in self.events.drain()? {
            match action_for(&event) {
                Some(action) => self.apply(action)?,
                None => info!(?event, "unbound input ignored"),
            }
            if self.cancelled {
                break;
            }
        }
        Ok(())
    }

    fn run(&mut self) -> Result<RunOutcome> {
        self.ensure_open()?;
        let result = self.run_loop();
        if let Err(e) = &result {
            warn!(error = %e, "run loop failed, closing");
        }
        self.close();
        result
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        if let Some(model) = self.model.as_mut() {
            model.close();
        }
        if let Some(view) = self.view.as_mut() {
            view.close();
        }
        self.running = false;
        self.closed = true;
        debug!("controller closed");
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, KeyCode};
    use crate::input::ScriptedEvents;
    use mlife_core::{Algorithm, Grid, LifeModel, SimContext};
    use mlife_view::{MemorySurface, SurfaceView, ViewOptions};

    type Loop = LoopController<LifeModel, SurfaceView<MemorySurface>, ScriptedEvents>;

    fn blinker() -> Grid {
        Grid::from_rows(&[
            [0u8, 0, 0, 0, 0],
            [0, 0, 1, 0, 0],
            [0, 0, 1, 0, 0],
            [0, 0, 1, 0, 0],
            [0, 0, 0, 0, 0],
        ])
        .unwrap()
    }

    fn controller(events: ScriptedEvents) -> Loop {
        let model = LifeModel::from_grid(blinker(), Algorithm::ShiftSum, SimContext::seeded(7));
        let view = SurfaceView::new(MemorySurface::new(5, 5), ViewOptions::default()).unwrap();
        LoopController::new(events)
            .with_model(model)
            .with_view(view)
            .delay(Duration::ZERO)
    }

    fn steps(controller: &Loop) -> u64 {
        controller.model().unwrap().steps_taken().unwrap()
    }

    #[test]
    fn quit_finishes_and_closes_everything() {
        let mut c = controller(ScriptedEvents::new().idle(4).batch([Event::char('q')]));
        assert_eq!(c.run().unwrap(), RunOutcome::Finished);
        assert!(c.is_closed());
        assert!(c.model().unwrap().is_closed());
        assert!(c.view().unwrap().is_closed());
    }

    #[test]
    fn unpaused_loop_steps_once_per_frame() {
        let mut c = controller(ScriptedEvents::new().idle(5));
        for _ in 0..5 {
            c.handle_events().unwrap();
            c.advance().unwrap();
        }
        assert_eq!(steps(&c), 5);
    }

    #[test]
    fn toggle_pause_flips_state() {
        let mut c = controller(ScriptedEvents::new().batch([Event::char(' ')]).batch([Event::char('p')]));
        c.handle_events().unwrap();
        assert!(c.is_paused());
        c.handle_events().unwrap();
        assert!(!c.is_paused());
    }

    #[test]
    fn step_only_acts_while_paused() {
        let mut c = controller(
            ScriptedEvents::new()
                .batch([Event::char('s')])
                .batch([Event::char('p'), Event::char('s'), Event::key(KeyCode::Enter)]),
        );
        c.handle_events().unwrap();
        assert_eq!(steps(&c), 0);
        c.handle_events().unwrap();
        assert_eq!(steps(&c), 2);
    }

    #[test]
    fn starting_paused_draws_one_generation() {
        let mut c = controller(ScriptedEvents::new().idle(5).then_close()).paused(true);
        let log = c.view().unwrap().surface().log();
        assert_eq!(c.run().unwrap(), RunOutcome::Finished);
        assert_eq!(log.borrow().presents, 1);
        assert!(log.borrow().released);
    }

    #[test]
    fn ctrl_c_cancels() {
        let ctrl_c = Event::Key(
            crate::event::KeyEvent::new(KeyCode::Char('c')).with_modifiers(crate::event::Modifiers::CTRL),
        );
        let mut c = controller(ScriptedEvents::new().idle(2).batch([ctrl_c, Event::char('p')]));
        let outcome = c.run().unwrap();
        assert!(outcome.is_cancelled());
        assert_eq!(outcome.exit_code(), 0);
        assert!(!c.is_paused(), "events after a cancel are not processed");
        assert!(c.model().unwrap().is_closed());
    }

    #[test]
    fn pan_and_zoom_reach_the_view() {
        let mut c = controller(
            ScriptedEvents::new()
                .batch([Event::key(KeyCode::Left), Event::char('8'), Event::char('+')])
                .batch([Event::char('5')]),
        );
        c.handle_events().unwrap();
        assert_eq!(c.view().unwrap().position(), (1, 1));
        assert!(c.view().unwrap().scale().is_some());
        c.handle_events().unwrap();
        assert_eq!(c.view().unwrap().position(), (0, 0));
    }

    #[test]
    fn closed_controller_rejects_everything() {
        let mut c = controller(ScriptedEvents::new());
        c.close();
        c.close();
        assert!(c.handle_events().unwrap_err().is_invalid_state());
        assert!(c.run().unwrap_err().is_invalid_state());
        let model = LifeModel::from_grid(blinker(), Algorithm::ShiftSum, SimContext::seeded(1));
        assert!(c.connect_model(model).unwrap_err().is_invalid_state());
    }

    #[test]
    fn detached_parts_survive_close() {
        let mut c = controller(ScriptedEvents::new());
        let model = c.take_model().unwrap();
        let view = c.take_view().unwrap();
        c.close();
        assert!(!model.is_closed());
        assert!(!view.is_closed());
    }

    #[test]
    fn stagnation_reseeds_when_asked() {
        let block = Grid::from_rows(&[[0u8, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]]).unwrap();
        let model = LifeModel::from_grid(block, Algorithm::ShiftSum, SimContext::seeded(3));
        let mut c: Loop = LoopController::new(ScriptedEvents::new())
            .with_model(model)
            .delay(Duration::ZERO)
            .stagnation(StagnationDetector::new(4), true);
        c.advance().unwrap();
        assert_eq!(steps(&c), 1);
        c.advance().unwrap();
        assert_eq!(steps(&c), 0, "still life is reseeded on its second sighting");
    }
}
