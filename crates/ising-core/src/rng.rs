//! Per-run random number generation.

use std::hash::Hasher;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use siphasher::sip::SipHasher13;

/// Generator owned by one lattice run.
///
/// Wraps `StdRng` and remembers the seed it was built from, if any, so a run
/// can report how to replay it. Entropy-seeded handles have no seed to report.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
    seed: Option<u64>,
}

impl RngHandle {
    /// Reproducible handle.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Handle seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// [`RngHandle::from_seed`] when a seed is given, [`RngHandle::from_entropy`] otherwise.
    pub fn seeded_or_entropy(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }

    /// Seed this handle was built from.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Seed of the substream addressed by `path` under `master_seed`.
///
/// The master seed and every path component are fed to SipHash-1-3 with zero
/// keys, so the mapping is identical on every platform and distinct paths of
/// the same length give unrelated seeds.
pub fn derive_substream_seed(master_seed: u64, path: &[u64]) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_usize(path.len());
    for &component in path {
        hasher.write_u64(component);
    }
    hasher.finish()
}
