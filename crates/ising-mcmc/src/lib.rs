#![deny(missing_docs)]

//! Single-spin-flip Metropolis sampler for the 2D ferromagnetic Ising model.
//!
//! A [`Metropolis`] engine owns a periodic [`Lattice`] and its RNG. The
//! [`run`] controller drives it cycle by cycle, feeds the magnetization
//! trajectory to the [`EquilibrationDetector`], accumulates [`RunningMoments`]
//! once the trajectory has flattened, and reports snapshots to optional
//! collaborators attached through [`RunHooks`].

/// YAML configuration schema and defaults.
pub mod config;
/// Deterministic per-run seed derivation.
pub mod determinism;
/// Local energy change and per-spin observables.
pub mod energy;
/// Sliding-window slope heuristic deciding when to start averaging.
pub mod equilibration;
/// Run controller and its `run` entry point.
pub mod kernel;
/// Periodic boolean spin grid.
pub mod lattice;
/// Sweep manifest serialization helpers.
pub mod manifest;
/// Metropolis engine owning a lattice and its RNG.
pub mod metropolis;
/// Exact running means of the sampled moments and derived observables.
pub mod moments;
/// Collaborator traits (renderer, frame recorder, series logger) and cancellation.
pub mod observer;
/// Temperature and bias sweeps with cross-bias aggregation.
pub mod sweep;

pub use config::{BiasSchedule, OutputConfig, RunConfig, SeedPolicy, SimulationConfig};
pub use equilibration::{EquilibrationDetector, Observation};
pub use kernel::{run, RunOutcome, RunPhase};
pub use lattice::Lattice;
pub use manifest::SweepManifest;
pub use metropolis::{FlipAttempt, Metropolis};
pub use moments::{Observables, RunningMoments};
pub use observer::{
    Annotation, CancelToken, Frame, FrameRecorder, Renderer, RunHooks, SeriesLogger, Signal,
};
pub use sweep::{run_temperature, BiasRun, RunLabel, TemperatureResult, TemperatureSummary};
