#![forbid(unsafe_code)]

//! Matrix Life application wiring.
//!
//! [`run`] turns a [`Config`] into a model, a view and a controller, runs the
//! loop, and reports how it ended. Everything is resolved once here; the run
//! loop itself is statically dispatched over the chosen view.

pub mod cli;
pub mod colour_spec;
pub mod config;
pub mod logging;

use mlife_core::model::ModelOptions;
use mlife_core::stagnation::StagnationDetector;
use mlife_core::{LifeModel, Result, SimContext};
use mlife_runtime::{
    Controller, CrosstermEvents, EventSource, Interrupt, LoopController, RunOutcome, SignalWatcher,
};
use mlife_view::{ColourProfile, PixelSurface, SurfaceView, TextSurface, View, ViewOptions};

pub use config::{Config, ViewKind};

/// Build the model from `config`.
///
/// # Errors
///
/// Whatever [`LifeModel::new`] rejects.
pub fn build_model(config: &Config) -> Result<LifeModel> {
    let (width, height) = config.size;
    let options = ModelOptions::new(width, height).density(config.density);
    LifeModel::new(&options, config.algorithm, SimContext::new(config.seed))
}

/// View options from `config`.
#[must_use]
pub fn view_options(config: &Config) -> ViewOptions {
    ViewOptions {
        position: (0, 0),
        scale: config.view.initial_scale(),
        palette: config.palette(),
    }
}

/// Run the simulation described by `config` until the user quits.
///
/// # Errors
///
/// Configuration errors abort before the terminal is touched. Errors inside
/// the loop are returned after the model and view have been closed.
pub fn run(config: &Config) -> Result<RunOutcome> {
    config.validate()?;
    let model = build_model(config)?;
    let profile = ColourProfile::detect();
    let resolution = config.effective_resolution();
    tracing::info!(
        algorithm = config.algorithm.name(),
        view = config.view.name(),
        width = config.size.0,
        height = config.size.1,
        ?resolution,
        ?profile,
        "starting"
    );

    let interrupt = Interrupt::new();
    let _signals = SignalWatcher::spawn(interrupt.clone())?;
    match config.view {
        ViewKind::Terminal => {
            let surface = TextSurface::stdout(resolution, profile)?;
            let view = SurfaceView::new(surface, view_options(config))?;
            drive(config, model, view, CrosstermEvents, interrupt)
        }
        ViewKind::Graphical => {
            let surface = PixelSurface::stdout(resolution, config.fullscreen, profile)?;
            let view = SurfaceView::new(surface, view_options(config))?;
            drive(config, model, view, CrosstermEvents, interrupt)
        }
    }
}

/// Run a controller over an already built model and view.
///
/// # Errors
///
/// As [`Controller::run`].
pub fn drive<V: View, E: EventSource>(
    config: &Config,
    model: LifeModel,
    view: V,
    events: E,
    interrupt: Interrupt,
) -> Result<RunOutcome> {
    let mut controller = LoopController::new(events)
        .with_model(model)
        .with_view(view)
        .delay(config.frame_delay())
        .paused(config.paused)
        .interrupt(interrupt)
        .stagnation(StagnationDetector::default(), config.reseed);
    let outcome = controller.run();
    match &outcome {
        Ok(outcome) => tracing::info!(?outcome, "finished"),
        Err(e) => tracing::error!(error = %e, "run failed"),
    }
    outcome
}
