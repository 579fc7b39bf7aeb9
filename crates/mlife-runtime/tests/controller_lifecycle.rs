#![forbid(unsafe_code)]

//! Run-loop lifecycle tests.
//!
//! Every exit path (quit, Ctrl+C, signal flag, error) must leave the model,
//! the view and the controller closed. Test doubles share their state through
//! `Rc` handles so it can be inspected after the controller has closed them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use mlife_core::{Grid, LifeError, Model, Result};
use mlife_runtime::{
    Controller, Event, EventSource, Interrupt, KeyCode, KeyEvent, LoopController, Modifiers,
    RunOutcome, ScriptedEvents,
};
use mlife_view::{MemoryLog, MemorySurface, SurfaceView, View, ViewOptions};

// ============================================================================
// Test doubles
// ============================================================================

#[derive(Debug, Default)]
struct Record {
    steps: Cell<u64>,
    closes: Cell<u32>,
}

/// Model that counts calls and never changes its grid.
#[derive(Debug)]
struct CountingModel {
    grid: Grid,
    record: Rc<Record>,
    closed: bool,
}

impl CountingModel {
    fn new() -> (Self, Rc<Record>) {
        let record = Rc::new(Record::default());
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set(1, 1, true);
        let model = Self {
            grid,
            record: Rc::clone(&record),
            closed: false,
        };
        (model, record)
    }

    fn check(&self) -> Result<()> {
        if self.closed {
            return Err(LifeError::closed("Model"));
        }
        Ok(())
    }
}

impl Model for CountingModel {
    fn step(&mut self, steps: i64) -> Result<()> {
        self.check()?;
        let steps = u64::try_from(steps).map_err(|_| LifeError::unsupported("negative steps"))?;
        self.record.steps.set(self.record.steps.get() + steps);
        Ok(())
    }

    fn step_to(&mut self, target: u64) -> Result<()> {
        self.check()?;
        self.record.steps.set(target);
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.check()?;
        self.record.steps.set(0);
        Ok(())
    }

    fn grid(&self) -> Result<&Grid> {
        self.check()?;
        Ok(&self.grid)
    }

    fn steps_taken(&self) -> Result<u64> {
        self.check()?;
        Ok(self.record.steps.get())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.record.closes.set(self.record.closes.get() + 1);
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Event source that raises an interrupt on a given drain.
struct InterruptingEvents {
    interrupt: Interrupt,
    at: usize,
    drains: usize,
}

impl EventSource for InterruptingEvents {
    fn drain(&mut self) -> std::io::Result<Vec<Event>> {
        self.drains += 1;
        if self.drains == self.at {
            self.interrupt.trigger();
        }
        Ok(Vec::new())
    }
}

type MemoryView = SurfaceView<MemorySurface>;

fn memory_view(surface: MemorySurface) -> (MemoryView, Rc<RefCell<MemoryLog>>) {
    let log = surface.log();
    let view = SurfaceView::new(surface, ViewOptions::default()).unwrap();
    (view, log)
}

fn ctrl_c() -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL))
}

// ============================================================================
// Exit paths
// ============================================================================

#[test]
fn quit_closes_model_then_view() {
    let (model, record) = CountingModel::new();
    let (view, log) = memory_view(MemorySurface::new(8, 8));
    let events = ScriptedEvents::new().idle(3).batch([Event::key(KeyCode::Escape)]);
    let mut controller = LoopController::new(events)
        .with_model(model)
        .with_view(view)
        .delay(Duration::ZERO);

    assert_eq!(controller.run().unwrap(), RunOutcome::Finished);
    assert_eq!(record.steps.get(), 3);
    assert_eq!(record.closes.get(), 1);
    assert!(log.borrow().released);
    assert!(controller.is_closed());
}

#[test]
fn ctrl_c_is_a_clean_cancellation() {
    let (model, record) = CountingModel::new();
    let (view, log) = memory_view(MemorySurface::new(8, 8));
    let events = ScriptedEvents::new().idle(2).batch([ctrl_c()]);
    let mut controller = LoopController::new(events)
        .with_model(model)
        .with_view(view)
        .delay(Duration::ZERO);

    let outcome = controller.run().unwrap();
    assert_eq!(outcome, RunOutcome::Cancelled);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(record.closes.get(), 1);
    assert!(log.borrow().released);
}

#[test]
fn signal_flag_cancels_and_cleans_up() {
    let (model, record) = CountingModel::new();
    let (view, log) = memory_view(MemorySurface::new(8, 8));
    let interrupt = Interrupt::new();
    let events = InterruptingEvents {
        interrupt: interrupt.clone(),
        at: 4,
        drains: 0,
    };
    let mut controller = LoopController::new(events)
        .with_model(model)
        .with_view(view)
        .delay(Duration::ZERO)
        .interrupt(interrupt);

    assert_eq!(controller.run().unwrap(), RunOutcome::Cancelled);
    // The flag is raised during the fourth drain and seen before the fifth.
    assert_eq!(record.steps.get(), 4);
    assert_eq!(controller.events().drains, 4);
    assert_eq!(record.closes.get(), 1);
    assert!(log.borrow().released);
}

#[test]
fn interrupt_cuts_a_long_frame_delay_short() {
    let (model, record) = CountingModel::new();
    let (view, log) = memory_view(MemorySurface::new(8, 8));
    let interrupt = Interrupt::new();
    let mut controller = LoopController::new(ScriptedEvents::new())
        .with_model(model)
        .with_view(view)
        .delay(Duration::from_secs(60))
        .interrupt(interrupt.clone());

    let raiser = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        interrupt.trigger();
    });
    let started = Instant::now();
    assert_eq!(controller.run().unwrap(), RunOutcome::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(10), "{:?}", started.elapsed());
    raiser.join().unwrap();

    assert!(record.steps.get() <= 1);
    assert_eq!(record.closes.get(), 1);
    assert!(log.borrow().released);
}

#[test]
fn interrupt_raised_before_run_steps_nothing() {
    let (model, record) = CountingModel::new();
    let interrupt = Interrupt::new();
    interrupt.trigger();
    let mut controller: LoopController<_, MemoryView, _> = LoopController::new(ScriptedEvents::new())
        .with_model(model)
        .interrupt(interrupt);

    assert_eq!(controller.run().unwrap(), RunOutcome::Cancelled);
    assert_eq!(record.steps.get(), 0);
    assert_eq!(record.closes.get(), 1);
}

#[test]
fn render_failure_closes_then_propagates() {
    let (model, record) = CountingModel::new();
    let (view, log) = memory_view(MemorySurface::failing(8, 8));
    let mut controller = LoopController::new(ScriptedEvents::new())
        .with_model(model)
        .with_view(view)
        .delay(Duration::ZERO);

    let err = controller.run().unwrap_err();
    assert!(matches!(err, LifeError::Io(_)), "{err}");
    assert_eq!(record.closes.get(), 1);
    assert!(log.borrow().released);
    assert!(controller.is_closed());
}

// ============================================================================
// Pause and step
// ============================================================================

#[test]
fn paused_run_only_advances_on_step() {
    let (model, record) = CountingModel::new();
    let (view, _log) = memory_view(MemorySurface::new(8, 8));
    let events = ScriptedEvents::new()
        .idle(3)
        .batch([Event::char('s')])
        .idle(2)
        .batch([Event::key(KeyCode::Enter), Event::char('S')])
        .then_close();
    let mut controller = LoopController::new(events)
        .with_model(model)
        .with_view(view)
        .paused(true);

    assert_eq!(controller.run().unwrap(), RunOutcome::Finished);
    // One generation to show the starting state, then three single steps.
    assert_eq!(record.steps.get(), 4);
}

#[test]
fn unpausing_resumes_stepping() {
    let (model, record) = CountingModel::new();
    let events = ScriptedEvents::new()
        .idle(2)
        .batch([Event::char('p')])
        .idle(3)
        .batch([Event::char('q')]);
    let mut controller: LoopController<_, MemoryView, _> = LoopController::new(events)
        .with_model(model)
        .delay(Duration::ZERO)
        .paused(true);

    controller.run().unwrap();
    // The first frame draws, the second is paused, then the unpause frame
    // and three idle frames step.
    assert_eq!(record.steps.get(), 5);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn close_without_model_or_view_is_safe() {
    let mut controller: LoopController<CountingModel, MemoryView, _> =
        LoopController::new(ScriptedEvents::new());
    controller.close();
    assert!(controller.is_closed());
    controller.close();
}

#[test]
fn loop_without_parts_still_quits() {
    let mut controller: LoopController<CountingModel, MemoryView, _> =
        LoopController::new(ScriptedEvents::new().idle(2).then_close()).delay(Duration::ZERO);
    assert_eq!(controller.run().unwrap(), RunOutcome::Finished);
}

#[test]
fn everything_fails_after_close() {
    let (model, _record) = CountingModel::new();
    let (view, _log) = memory_view(MemorySurface::new(8, 8));
    let mut controller = LoopController::new(ScriptedEvents::new().then_close())
        .with_model(model)
        .with_view(view)
        .delay(Duration::ZERO);
    controller.run().unwrap();

    assert!(controller.run().unwrap_err().is_invalid_state());
    assert!(controller.handle_events().unwrap_err().is_invalid_state());
    let (replacement, _) = CountingModel::new();
    assert!(controller.connect_model(replacement).unwrap_err().is_invalid_state());
    let (view, _) = memory_view(MemorySurface::new(2, 2));
    assert!(controller.connect_view(view).unwrap_err().is_invalid_state());

    let model = controller.take_model().unwrap();
    assert!(model.grid().unwrap_err().is_invalid_state());
    let mut view = controller.take_view().unwrap();
    assert!(view.update(None, true).unwrap_err().is_invalid_state());
}

#[test]
fn detached_model_outlives_the_controller() {
    let (model, record) = CountingModel::new();
    let mut controller: LoopController<_, MemoryView, _> =
        LoopController::new(ScriptedEvents::new()).with_model(model);
    let mut model = controller.take_model().unwrap();
    controller.close();
    assert_eq!(record.closes.get(), 0);
    model.step(2).unwrap();
    assert_eq!(record.steps.get(), 2);
}
