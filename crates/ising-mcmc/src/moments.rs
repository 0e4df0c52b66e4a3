use serde::{Deserialize, Serialize};

/// Exact running means of `|m|`, `m^2`, `m^4`, `e` and `e^2`.
///
/// Each mean is updated as `mean_n = (mean_{n-1} * (n - 1) + x_n) / n`, which
/// equals the plain cumulative average. Means of an empty accumulator are NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningMoments {
    count: u64,
    abs_magnetization: f64,
    magnetization_sq: f64,
    magnetization_quad: f64,
    energy: f64,
    energy_sq: f64,
}

fn update(mean: &mut f64, count: u64, value: f64) {
    *mean = if count == 0 {
        value
    } else {
        let n = count as f64;
        (*mean * n + value) / (n + 1.0)
    };
}

impl RunningMoments {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one post-equilibration sample into every mean.
    pub fn push(&mut self, magnetization: f64, energy: f64) {
        let m2 = magnetization * magnetization;
        update(&mut self.abs_magnetization, self.count, magnetization.abs());
        update(&mut self.magnetization_sq, self.count, m2);
        update(&mut self.magnetization_quad, self.count, m2 * m2);
        update(&mut self.energy, self.count, energy);
        update(&mut self.energy_sq, self.count, energy * energy);
        self.count += 1;
    }

    /// Number of samples folded in.
    pub fn count(&self) -> u64 {
        self.count
    }

    fn guarded(&self, value: f64) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            value
        }
    }

    /// Mean of `|m|`.
    pub fn mean_abs_magnetization(&self) -> f64 {
        self.guarded(self.abs_magnetization)
    }

    /// Mean of `m^2`.
    pub fn mean_magnetization_sq(&self) -> f64 {
        self.guarded(self.magnetization_sq)
    }

    /// Mean of `m^4`.
    pub fn mean_magnetization_quad(&self) -> f64 {
        self.guarded(self.magnetization_quad)
    }

    /// Mean of `e`.
    pub fn mean_energy(&self) -> f64 {
        self.guarded(self.energy)
    }

    /// Mean of `e^2`.
    pub fn mean_energy_sq(&self) -> f64 {
        self.guarded(self.energy_sq)
    }

    /// Magnetic susceptibility `(<m^2> - <|m|>^2) L^2 / T`.
    pub fn susceptibility(&self, temperature: f64, sites: u64) -> f64 {
        let m = self.mean_abs_magnetization();
        (self.mean_magnetization_sq() - m * m) / temperature * sites as f64
    }

    /// Heat capacity `(<e^2> - <e>^2) L^2 / T^2`.
    pub fn heat_capacity(&self, temperature: f64, sites: u64) -> f64 {
        let e = self.mean_energy();
        (self.mean_energy_sq() - e * e) / (temperature * temperature) * sites as f64
    }

    /// Binder cumulant `1 - <m^4> / (3 <m^2>^2)`.
    pub fn binder_cumulant(&self) -> f64 {
        let m2 = self.mean_magnetization_sq();
        1.0 - self.mean_magnetization_quad() / (3.0 * m2 * m2)
    }

    /// Bundles the means with the derived response functions.
    pub fn observables(&self, temperature: f64, sites: u64) -> Observables {
        Observables {
            mag: self.mean_abs_magnetization(),
            mag2: self.mean_magnetization_sq(),
            mag4: self.mean_magnetization_quad(),
            e: self.mean_energy(),
            e2: self.mean_energy_sq(),
            susceptibility: self.susceptibility(temperature, sites),
            heat_capacity: self.heat_capacity(temperature, sites),
            binder_cumulant: self.binder_cumulant(),
        }
    }
}

/// Per-run observables as written to the result tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observables {
    /// Mean `|m|`.
    pub mag: f64,
    /// Mean `m^2`.
    pub mag2: f64,
    /// Mean `m^4`.
    pub mag4: f64,
    /// Mean energy per spin.
    pub e: f64,
    /// Mean squared energy per spin.
    pub e2: f64,
    /// Magnetic susceptibility.
    pub susceptibility: f64,
    /// Heat capacity.
    pub heat_capacity: f64,
    /// Binder cumulant.
    pub binder_cumulant: f64,
}
