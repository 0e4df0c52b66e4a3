use std::time::Instant;

use ising_core::IsingError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::equilibration::{EquilibrationDetector, Observation};
use crate::metropolis::Metropolis;
use crate::moments::RunningMoments;
use crate::observer::{Frame, RunHooks, Signal};

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Waiting for the equilibration latch.
    Sampling,
    /// Accumulating moments after the latch.
    Averaging,
    /// Budget exhausted or cancelled.
    Done,
}

/// Summary returned to callers after a run completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Mean `|m|` over the averaging phase (NaN if averaging never started).
    pub mean_magnetization: f64,
    /// Post-equilibration moments.
    pub moments: RunningMoments,
    /// Cycle at which equilibration latched.
    pub initial_cycle: Option<u64>,
    /// Cycle count when the run stopped.
    pub final_cycle: u64,
    /// Elementary steps performed.
    pub iterations: u64,
    /// Last slope computed by the equilibration detector.
    pub last_slope: Option<f64>,
    /// Whether the run was stopped by cancellation instead of its budget.
    pub cancelled: bool,
}

/// Drives `engine` through the sampling and averaging phases.
///
/// Every iteration performs `eval_cycles * L^2` elementary steps, feeds the
/// detector and, once it has latched, the moment accumulator. Snapshots are
/// emitted before the first iteration and then every `frame_cycles` cycles;
/// that is also the only place cancellation is observed. The run ends when
/// `cycle >= initial_cycle + cycles_budget`.
///
/// The recorder is finalized and the logger closed however the run ends,
/// including when a collaborator fails mid-run.
pub fn run(
    engine: &mut Metropolis,
    config: &RunConfig,
    hooks: &mut RunHooks,
) -> Result<RunOutcome, IsingError> {
    config.validate()?;
    let started = Instant::now();
    let mut detector = EquilibrationDetector::from_config(config);
    let mut moments = RunningMoments::new();

    let sampled = sample(engine, config, hooks, &mut detector, &mut moments);
    let released = release(hooks);
    let cancelled = sampled?;
    released?;

    let outcome = RunOutcome {
        mean_magnetization: moments.mean_abs_magnetization(),
        initial_cycle: detector.initial_cycle(),
        final_cycle: engine.cycle(),
        iterations: engine.iterations(),
        last_slope: detector.last_slope(),
        moments,
        cancelled,
    };
    info!(
        beta = engine.beta(),
        size = engine.lattice().size(),
        final_cycle = outcome.final_cycle,
        samples = outcome.moments.count(),
        cancelled,
        elapsed_secs = started.elapsed().as_secs(),
        "run finished"
    );
    Ok(outcome)
}

/// Runs the phase loop and reports whether it stopped on cancellation.
fn sample(
    engine: &mut Metropolis,
    config: &RunConfig,
    hooks: &mut RunHooks,
    detector: &mut EquilibrationDetector,
    moments: &mut RunningMoments,
) -> Result<bool, IsingError> {
    let size = engine.lattice().size();
    let budget = config.cycles_budget(size);
    let frame_cycles = config.frame_interval(size);
    let steps_per_observation = config.eval_cycles * engine.sites();

    let mut phase = RunPhase::Sampling;
    let mut end_cycle = u64::MAX;
    let mut last_frame = 0u64;
    let mut cancelled = false;

    let (m0, e0) = (engine.magnetization(), engine.energy());
    if emit_snapshot(engine, hooks, m0, e0)? == Signal::Cancel {
        cancelled = true;
        phase = RunPhase::Done;
    }

    while phase != RunPhase::Done {
        engine.sweep(steps_per_observation);
        let cycle = engine.cycle();
        let magnetization = engine.magnetization();
        let energy = engine.energy();

        if let Observation::Latched { slope, cycle } = detector.observe(cycle, magnetization) {
            info!(slope = slope.abs(), cycle, "target slope reached");
            end_cycle = cycle.saturating_add(budget);
            phase = RunPhase::Averaging;
        }
        if phase == RunPhase::Averaging {
            moments.push(magnetization, energy);
        }

        if cycle >= last_frame.saturating_add(frame_cycles) {
            if emit_snapshot(engine, hooks, magnetization, energy)? == Signal::Cancel {
                cancelled = true;
            }
            last_frame = cycle;
        }

        if cancelled || (phase == RunPhase::Averaging && cycle >= end_cycle) {
            phase = RunPhase::Done;
        }
    }
    Ok(cancelled)
}

/// Finalizes the recorder and closes the logger, reporting the first failure.
fn release(hooks: &mut RunHooks) -> Result<(), IsingError> {
    let finalized = hooks
        .recorder
        .as_mut()
        .map_or(Ok(()), |recorder| recorder.finalize());
    let closed = hooks.logger.as_mut().map_or(Ok(()), |logger| logger.close());
    finalized.and(closed)
}

fn emit_snapshot(
    engine: &Metropolis,
    hooks: &mut RunHooks,
    magnetization: f64,
    energy: f64,
) -> Result<Signal, IsingError> {
    let cycle = engine.cycle_fraction();
    debug!(cycle, magnetization, energy, "snapshot");

    let mut signal = Signal::Continue;
    if hooks.wants_frames() {
        let frame = Frame::from_lattice(engine.lattice()).annotate(cycle, magnetization);
        if let Some(renderer) = hooks.renderer.as_mut() {
            match renderer.display(&frame) {
                Ok(answer) => signal = answer,
                Err(err) => warn!(%err, "renderer failed; continuing without display"),
            }
        }
        if let Some(recorder) = hooks.recorder.as_mut() {
            recorder.append_frame(&frame)?;
        }
    }
    if let Some(logger) = hooks.logger.as_mut() {
        logger.append_row(cycle, magnetization, energy)?;
    }
    if hooks.cancel.is_cancelled() {
        signal = Signal::Cancel;
    }
    Ok(signal)
}
