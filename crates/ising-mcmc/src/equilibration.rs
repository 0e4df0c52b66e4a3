use std::collections::VecDeque;

use ising_core::stats;
use serde::{Deserialize, Serialize};

use crate::config::RunConfig;

/// What the detector did with one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Observation {
    /// The window is not full yet; no slope was computed.
    Filling,
    /// The slope was computed but did not satisfy the latch condition.
    Evaluated {
        /// Least-squares slope of magnetization against cycle.
        slope: f64,
    },
    /// The latch fired on this observation.
    Latched {
        /// Slope that satisfied the threshold.
        slope: f64,
        /// Cycle recorded as the start of averaging.
        cycle: u64,
    },
    /// Already latched; the slope is no longer evaluated.
    Settled,
}

/// Sliding window over `(cycle, magnetization)` with a one-shot flatness latch.
///
/// The latch fires the first time the window is full, `|slope| < threshold`
/// and `cycle > min_cycles`. NaN slopes (constant cycle values) never pass the
/// comparison.
#[derive(Debug, Clone)]
pub struct EquilibrationDetector {
    cycles: VecDeque<f64>,
    magnetizations: VecDeque<f64>,
    capacity: usize,
    threshold: f64,
    min_cycles: u64,
    initial_cycle: Option<u64>,
    last_slope: Option<f64>,
}

impl EquilibrationDetector {
    /// Creates a detector with explicit window capacity, slope threshold and cycle gate.
    pub fn new(capacity: usize, threshold: f64, min_cycles: u64) -> Self {
        Self {
            cycles: VecDeque::with_capacity(capacity + 1),
            magnetizations: VecDeque::with_capacity(capacity + 1),
            capacity,
            threshold,
            min_cycles,
            initial_cycle: None,
            last_slope: None,
        }
    }

    /// Creates a detector from the run settings.
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(
            config.averaging_over(),
            config.slope_threshold,
            config.min_cycles,
        )
    }

    /// Appends one sample, evicting the oldest when over capacity, and evaluates the latch.
    pub fn observe(&mut self, cycle: u64, magnetization: f64) -> Observation {
        self.cycles.push_back(cycle as f64);
        self.magnetizations.push_back(magnetization);
        if self.cycles.len() > self.capacity {
            self.cycles.pop_front();
            self.magnetizations.pop_front();
        }

        if self.initial_cycle.is_some() {
            return Observation::Settled;
        }
        if self.cycles.len() < self.capacity {
            return Observation::Filling;
        }

        let slope = stats::slope(
            self.cycles.make_contiguous(),
            self.magnetizations.make_contiguous(),
        );
        self.last_slope = Some(slope);
        if slope.abs() < self.threshold && cycle > self.min_cycles {
            self.initial_cycle = Some(cycle);
            Observation::Latched { slope, cycle }
        } else {
            Observation::Evaluated { slope }
        }
    }

    /// Whether the latch has fired.
    pub fn is_equilibrated(&self) -> bool {
        self.initial_cycle.is_some()
    }

    /// Cycle at which the latch fired.
    pub fn initial_cycle(&self) -> Option<u64> {
        self.initial_cycle
    }

    /// Most recently computed slope.
    pub fn last_slope(&self) -> Option<f64> {
        self.last_slope
    }

    /// Samples currently held.
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    /// Whether the window holds no samples.
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Maximum number of samples held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
