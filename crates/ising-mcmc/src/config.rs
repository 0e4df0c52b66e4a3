use std::path::PathBuf;

use ising_core::{ErrorInfo, IsingError};
use serde::{Deserialize, Serialize};

/// YAML-configurable parameters governing a full temperature sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Linear extent `L` of the square lattice.
    #[serde(default = "default_lattice_size")]
    pub lattice_size: usize,
    /// Per-run cycle budget and equilibration settings.
    #[serde(default)]
    pub run: RunConfig,
    /// Initial-condition biases simulated at every temperature.
    #[serde(default)]
    pub biases: BiasSchedule,
    /// Master seed policy.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Output layout for per-run artefacts.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_lattice_size() -> usize {
    256
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            lattice_size: default_lattice_size(),
            run: RunConfig::default(),
            biases: BiasSchedule::default(),
            seed_policy: SeedPolicy::default(),
            output: OutputConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses a configuration from YAML text, filling omitted fields with defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, IsingError> {
        let config: SimulationConfig = serde_yaml::from_str(text)
            .map_err(|err| IsingError::Serde(ErrorInfo::new("config-parse", err.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the sweep-level invariants and the nested run configuration.
    pub fn validate(&self) -> Result<(), IsingError> {
        if self.lattice_size == 0 {
            return Err(IsingError::Config(
                ErrorInfo::new("invalid-lattice-size", "lattice_size must be at least 1")
                    .with_context("lattice_size", "0"),
            ));
        }
        if self.biases.count == 0 {
            return Err(IsingError::Config(
                ErrorInfo::new("invalid-bias-count", "at least one bias per temperature is required")
                    .with_hint("the reference sweep uses count: 10"),
            ));
        }
        let usable = |bias: f64| bias.is_finite() && bias > 0.0 && (1.0 / bias).is_finite();
        if !self.biases.exponent_step.is_finite() || !self.biases.values().into_iter().all(usable) {
            return Err(IsingError::Config(
                ErrorInfo::new(
                    "invalid-bias-step",
                    "exponent_step must keep every bias finite with a finite reciprocal",
                )
                .with_context("exponent_step", self.biases.exponent_step.to_string())
                .with_context("count", self.biases.count.to_string()),
            ));
        }
        self.run.validate()
    }
}

/// Cycle budget, snapshot cadence and equilibration heuristic for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Cycle count that must be exceeded before equilibration may latch.
    #[serde(default = "default_min_cycles")]
    pub min_cycles: u64,
    /// Cycles averaged after equilibration. Derived from the lattice size when unset.
    #[serde(default)]
    pub cycles: Option<u64>,
    /// Cycles executed between successive observations.
    #[serde(default = "default_eval_cycles")]
    pub eval_cycles: u64,
    /// Cycles between emitted snapshots. Derived from the lattice size when unset.
    #[serde(default)]
    pub frame_cycles: Option<u64>,
    /// Base capacity of the equilibration window, divided by `eval_cycles` when that exceeds one.
    #[serde(default = "default_window_base")]
    pub window_base: usize,
    /// Absolute slope below which the magnetization trend counts as flat.
    #[serde(default = "default_slope_threshold")]
    pub slope_threshold: f64,
}

fn default_min_cycles() -> u64 {
    2000
}

fn default_eval_cycles() -> u64 {
    1
}

fn default_window_base() -> usize {
    1000
}

fn default_slope_threshold() -> f64 {
    1e-6
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            min_cycles: default_min_cycles(),
            cycles: None,
            eval_cycles: default_eval_cycles(),
            frame_cycles: None,
            window_base: default_window_base(),
            slope_threshold: default_slope_threshold(),
        }
    }
}

impl RunConfig {
    /// Post-equilibration cycle budget for a lattice of linear size `size`.
    pub fn cycles_budget(&self, size: usize) -> u64 {
        self.cycles.unwrap_or_else(|| default_cycles_budget(size))
    }

    /// Snapshot cadence in cycles for a lattice of linear size `size`.
    pub fn frame_interval(&self, size: usize) -> u64 {
        self.frame_cycles
            .unwrap_or_else(|| default_frame_interval(size))
    }

    /// Capacity of the equilibration window.
    pub fn averaging_over(&self) -> usize {
        if self.eval_cycles > 1 {
            self.window_base / self.eval_cycles as usize
        } else {
            self.window_base
        }
    }

    /// Rejects settings that would stall or never terminate the run loop.
    pub fn validate(&self) -> Result<(), IsingError> {
        if self.eval_cycles == 0 {
            return Err(IsingError::Config(
                ErrorInfo::new("invalid-eval-cycles", "eval_cycles must be at least 1")
                    .with_context("eval_cycles", "0"),
            ));
        }
        if self.cycles == Some(0) {
            return Err(IsingError::Config(
                ErrorInfo::new("invalid-cycles", "the averaging budget must be at least 1 cycle")
                    .with_hint("omit `cycles` to use the size-dependent default"),
            ));
        }
        if self.frame_cycles == Some(0) {
            return Err(IsingError::Config(ErrorInfo::new(
                "invalid-frame-cycles",
                "frame_cycles must be at least 1",
            )));
        }
        if self.averaging_over() < 2 {
            return Err(IsingError::Config(
                ErrorInfo::new(
                    "invalid-window",
                    "the equilibration window must hold at least two samples",
                )
                .with_context("window_base", self.window_base.to_string())
                .with_context("eval_cycles", self.eval_cycles.to_string()),
            ));
        }
        if self.slope_threshold.is_nan() || self.slope_threshold <= 0.0 {
            return Err(IsingError::Config(
                ErrorInfo::new("invalid-slope-threshold", "slope_threshold must be positive")
                    .with_context("slope_threshold", self.slope_threshold.to_string()),
            ));
        }
        Ok(())
    }
}

/// Default averaging budget: long runs for tiny lattices, `512000 / L` otherwise.
pub fn default_cycles_budget(size: usize) -> u64 {
    let l = size.max(1) as u64;
    let cycles = if l < 32 {
        50_000 * 128 / l * 128 / l
    } else {
        1000 * 512 / l
    };
    cycles.max(1)
}

/// Default snapshot cadence, roughly constant wall-clock time per frame.
pub fn default_frame_interval(size: usize) -> u64 {
    let l = size.max(1) as u64;
    let frames = if l < 256 {
        2 * 512 / l * 512 / l
    } else {
        20 * l / 256
    };
    frames.max(1)
}

/// Biases `exp(exponent_step * k)` for `k = 1..=count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasSchedule {
    /// Number of initial conditions per temperature.
    #[serde(default = "default_bias_count")]
    pub count: usize,
    /// Exponent increment between consecutive biases.
    #[serde(default = "default_exponent_step")]
    pub exponent_step: f64,
}

fn default_bias_count() -> usize {
    10
}

fn default_exponent_step() -> f64 {
    0.2
}

impl Default for BiasSchedule {
    fn default() -> Self {
        Self {
            count: default_bias_count(),
            exponent_step: default_exponent_step(),
        }
    }
}

impl BiasSchedule {
    /// Materialises the bias values in sweep order.
    pub fn values(&self) -> Vec<f64> {
        (1..=self.count)
            .map(|k| (self.exponent_step * k as f64).exp())
            .collect()
    }
}

/// Seeding configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed; per-run seeds are derived from it. OS entropy is used when unset.
    #[serde(default)]
    pub master_seed: Option<u64>,
}

/// Output layout for per-run artefacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving per-run time series and frame dumps.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    /// Write a `cycle m e` time series for every run.
    #[serde(default = "default_time_series")]
    pub time_series: bool,
    /// Dump snapshot frames as PGM images.
    #[serde(default)]
    pub frames: bool,
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_time_series() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            time_series: default_time_series(),
            frames: false,
        }
    }
}
