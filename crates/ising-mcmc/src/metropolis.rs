use ising_core::{ErrorInfo, IsingError, RngHandle};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::energy;
use crate::lattice::Lattice;

/// Result of one elementary Metropolis step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipAttempt {
    /// Site `(i, j)` that was proposed.
    pub site: (usize, usize),
    /// Energy change the flip would cause (before the decision).
    pub delta_energy: i32,
    /// Whether the flip was applied.
    pub accepted: bool,
}

/// Single-spin-flip Metropolis engine at fixed inverse temperature.
#[derive(Debug, Clone)]
pub struct Metropolis {
    lattice: Lattice,
    rng: RngHandle,
    beta: f64,
    iterations: u64,
}

impl Metropolis {
    /// Wraps an existing lattice. `beta` must be finite and non-negative.
    pub fn new(lattice: Lattice, beta: f64, rng: RngHandle) -> Result<Self, IsingError> {
        if !(beta.is_finite() && beta >= 0.0) {
            return Err(IsingError::Config(
                ErrorInfo::new("invalid-beta", "beta must be finite and non-negative")
                    .with_context("beta", beta.to_string()),
            ));
        }
        Ok(Self {
            lattice,
            rng,
            beta,
            iterations: 0,
        })
    }

    /// Builds a biased random lattice from `rng` and wraps it.
    pub fn with_bias(
        size: usize,
        beta: f64,
        bias: f64,
        mut rng: RngHandle,
    ) -> Result<Self, IsingError> {
        let lattice = Lattice::random(size, bias, &mut rng)?;
        Self::new(lattice, beta, rng)
    }

    /// Current spin configuration.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Inverse temperature.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Elementary steps attempted so far, accepted or not.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Number of sites, i.e. steps per cycle.
    pub fn sites(&self) -> u64 {
        self.lattice.sites() as u64
    }

    /// Completed cycles (`iterations / L^2`, truncated).
    pub fn cycle(&self) -> u64 {
        self.iterations / self.sites()
    }

    /// Cycle position including the partial cycle.
    pub fn cycle_fraction(&self) -> f64 {
        self.iterations as f64 / self.sites() as f64
    }

    /// Energy change from flipping `(i, j)` in the current configuration.
    pub fn energy_change_upon_flip(&self, i: usize, j: usize) -> i32 {
        energy::energy_change_upon_flip(&self.lattice, i, j)
    }

    /// Picks a site uniformly at random (with replacement) and applies the Metropolis test.
    pub fn attempt_flip(&mut self) -> FlipAttempt {
        let size = self.lattice.size();
        let i = self.rng.gen_range(0..size);
        let j = self.rng.gen_range(0..size);
        self.attempt_flip_at(i, j)
    }

    /// Metropolis test at a fixed site. Downhill and neutral moves are always accepted
    /// without consuming a random draw.
    pub fn attempt_flip_at(&mut self, i: usize, j: usize) -> FlipAttempt {
        let delta_energy = self.energy_change_upon_flip(i, j);
        let accepted = if delta_energy <= 0 {
            true
        } else {
            let draw: f64 = self.rng.gen();
            draw < (-self.beta * f64::from(delta_energy)).exp()
        };
        if accepted {
            self.lattice.invert_spin(i, j);
        }
        self.iterations += 1;
        FlipAttempt {
            site: (i, j),
            delta_energy,
            accepted,
        }
    }

    /// Runs `steps` consecutive elementary steps.
    pub fn sweep(&mut self, steps: u64) {
        for _ in 0..steps {
            self.attempt_flip();
        }
    }

    /// Magnetization per spin.
    pub fn magnetization(&self) -> f64 {
        energy::magnetization(&self.lattice)
    }

    /// Energy per spin.
    pub fn energy(&self) -> f64 {
        energy::energy(&self.lattice)
    }
}
