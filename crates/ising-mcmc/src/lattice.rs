use ising_core::{ErrorInfo, IsingError};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Square `L x L` grid of Ising spins with periodic boundaries.
///
/// Spins are stored as booleans in row-major order: `true` is the physical
/// `+1` state, `false` is `-1`. The extent is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lattice {
    size: usize,
    spins: Vec<bool>,
}

impl Lattice {
    /// Fills a lattice by drawing `x` uniformly from `[0, 1 + 1/bias)` per site; the
    /// site starts up when `x >= 1`, i.e. with probability `1 / (1 + bias)`.
    pub fn random<R: Rng + ?Sized>(size: usize, bias: f64, rng: &mut R) -> Result<Self, IsingError> {
        check_size(size)?;
        let upper = 1.0 + 1.0 / bias;
        if !(bias.is_finite() && bias > 0.0 && upper.is_finite()) {
            return Err(IsingError::Lattice(
                ErrorInfo::new("invalid-bias", "bias must be finite, positive and not subnormal")
                    .with_context("bias", bias.to_string()),
            ));
        }
        let spins = (0..size * size)
            .map(|_| rng.gen_range(0.0..upper) >= 1.0)
            .collect();
        Ok(Self { size, spins })
    }

    /// Lattice with every spin set to `up`.
    pub fn uniform(size: usize, up: bool) -> Result<Self, IsingError> {
        check_size(size)?;
        Ok(Self {
            size,
            spins: vec![up; size * size],
        })
    }

    /// Linear extent `L`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of sites `L^2`.
    pub fn sites(&self) -> usize {
        self.spins.len()
    }

    /// Wraps a signed coordinate onto `[0, L)`.
    pub fn periodic_index(&self, x: isize) -> usize {
        x.rem_euclid(self.size as isize) as usize
    }

    /// Stored state of site `(i, j)`.
    #[inline]
    pub fn spin(&self, i: usize, j: usize) -> bool {
        self.spins[i * self.size + j]
    }

    /// Physical value (`+1` or `-1`) of site `(i, j)`.
    #[inline]
    pub fn spin_value(&self, i: usize, j: usize) -> i32 {
        if self.spin(i, j) {
            1
        } else {
            -1
        }
    }

    /// Physical value of the site at signed, wrapped coordinates.
    #[inline]
    pub fn wrapped_value(&self, i: isize, j: isize) -> i32 {
        self.spin_value(self.periodic_index(i), self.periodic_index(j))
    }

    /// Overwrites site `(i, j)`.
    pub fn set_spin(&mut self, i: usize, j: usize, up: bool) {
        self.spins[i * self.size + j] = up;
    }

    /// Flips site `(i, j)`.
    #[inline]
    pub fn invert_spin(&mut self, i: usize, j: usize) {
        let site = &mut self.spins[i * self.size + j];
        *site = !*site;
    }

    /// Number of up spins.
    pub fn up_count(&self) -> usize {
        self.spins.iter().filter(|&&up| up).count()
    }

    /// Grayscale projection: 255 for up, 0 for down, row-major.
    pub fn to_image(&self) -> Vec<u8> {
        self.spins
            .iter()
            .map(|&up| if up { u8::MAX } else { 0 })
            .collect()
    }
}

fn check_size(size: usize) -> Result<(), IsingError> {
    if size == 0 {
        return Err(IsingError::Lattice(
            ErrorInfo::new("invalid-size", "lattice size must be positive")
                .with_context("size", size.to_string()),
        ));
    }
    Ok(())
}
