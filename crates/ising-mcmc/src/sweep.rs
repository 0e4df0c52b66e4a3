use ising_core::{IsingError, RngHandle, Summary};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SimulationConfig;
use crate::determinism;
use crate::kernel::{self, RunOutcome};
use crate::metropolis::Metropolis;
use crate::moments::Observables;
use crate::observer::{CancelToken, RunHooks};

/// Identifies one (temperature, bias) run within a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunLabel {
    /// Linear lattice size.
    pub size: usize,
    /// Temperature `T`.
    pub temperature: f64,
    /// Inverse temperature `1 / T`.
    pub beta: f64,
    /// Initial-condition bias.
    pub bias: f64,
    /// Position of the temperature in the sweep.
    pub temperature_index: usize,
    /// Position of the bias in the schedule.
    pub bias_index: usize,
}

/// Result of one (temperature, bias) run, i.e. one row of the distribution table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasRun {
    /// Run identity.
    pub label: RunLabel,
    /// Observables derived from the post-equilibration moments.
    pub observables: Observables,
    /// Raw controller outcome.
    pub outcome: RunOutcome,
}

/// Mean and sample standard deviation of every observable across the biases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    /// Mean `|m|`.
    pub mag: Summary,
    /// Mean `m^2`.
    pub mag2: Summary,
    /// Mean `m^4`.
    pub mag4: Summary,
    /// Mean energy.
    pub e: Summary,
    /// Mean squared energy.
    pub e2: Summary,
    /// Susceptibility.
    pub susceptibility: Summary,
    /// Heat capacity.
    pub heat_capacity: Summary,
    /// Binder cumulant.
    pub binder_cumulant: Summary,
}

impl TemperatureSummary {
    /// Aggregates the observables of the provided runs.
    pub fn from_runs(runs: &[BiasRun]) -> Self {
        let column = |select: fn(&Observables) -> f64| -> Summary {
            let values: Vec<f64> = runs.iter().map(|run| select(&run.observables)).collect();
            Summary::of(&values)
        };
        Self {
            mag: column(|o| o.mag),
            mag2: column(|o| o.mag2),
            mag4: column(|o| o.mag4),
            e: column(|o| o.e),
            e2: column(|o| o.e2),
            susceptibility: column(|o| o.susceptibility),
            heat_capacity: column(|o| o.heat_capacity),
            binder_cumulant: column(|o| o.binder_cumulant),
        }
    }
}

/// All runs at one temperature plus their aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureResult {
    /// Temperature `T`.
    pub temperature: f64,
    /// Completed runs in bias order.
    pub runs: Vec<BiasRun>,
    /// Cross-bias aggregate.
    pub summary: TemperatureSummary,
    /// Whether cancellation cut the bias schedule short.
    pub cancelled: bool,
}

/// Runs every bias of the schedule at `temperature`.
///
/// `make_hooks` supplies the collaborators for each run; the shared `cancel`
/// token is installed into them. `on_run` sees every finished run before the
/// next one starts. A cancelled run is kept and ends the schedule.
pub fn run_temperature<H, F>(
    config: &SimulationConfig,
    temperature: f64,
    temperature_index: usize,
    cancel: &CancelToken,
    mut make_hooks: H,
    mut on_run: F,
) -> Result<TemperatureResult, IsingError>
where
    H: FnMut(&RunLabel) -> Result<RunHooks, IsingError>,
    F: FnMut(&BiasRun) -> Result<(), IsingError>,
{
    config.validate()?;
    let size = config.lattice_size;
    let beta = 1.0 / temperature;
    let mut runs = Vec::with_capacity(config.biases.count);
    let mut cancelled = false;

    for (bias_index, bias) in config.biases.values().into_iter().enumerate() {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }
        let label = RunLabel {
            size,
            temperature,
            beta,
            bias,
            temperature_index,
            bias_index,
        };
        let seed = config
            .seed_policy
            .master_seed
            .map(|master| determinism::run_seed(master, temperature_index, bias_index));
        let mut engine =
            Metropolis::with_bias(size, beta, bias, RngHandle::seeded_or_entropy(seed))?;
        let mut hooks = make_hooks(&label)?.with_cancel(cancel.clone());
        let outcome = kernel::run(&mut engine, &config.run, &mut hooks)?;
        let observables = outcome.moments.observables(temperature, engine.sites());

        info!(
            size,
            temperature,
            bias,
            seed = ?seed,
            m = observables.mag,
            m2 = observables.mag2,
            e = observables.e,
            e2 = observables.e2,
            x = observables.susceptibility,
            c = observables.heat_capacity,
            u_l = observables.binder_cumulant,
            "bias run complete"
        );

        let run_cancelled = outcome.cancelled;
        let run = BiasRun {
            label,
            observables,
            outcome,
        };
        on_run(&run)?;
        runs.push(run);
        if run_cancelled {
            cancelled = true;
            break;
        }
    }

    let summary = TemperatureSummary::from_runs(&runs);
    info!(
        size,
        temperature,
        m = summary.mag.mean,
        m_stdev = summary.mag.stdev,
        e = summary.e.mean,
        e_stdev = summary.e.stdev,
        x = summary.susceptibility.mean,
        x_stdev = summary.susceptibility.stdev,
        c = summary.heat_capacity.mean,
        c_stdev = summary.heat_capacity.stdev,
        u_l = summary.binder_cumulant.mean,
        u_l_stdev = summary.binder_cumulant.stdev,
        "temperature summary"
    );
    Ok(TemperatureResult {
        temperature,
        runs,
        summary,
        cancelled,
    })
}
