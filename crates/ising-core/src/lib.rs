#![deny(missing_docs)]
#![doc = "Shared building blocks for the Ising Metropolis sampler: the structured error type, the seeded RNG handle and the sequence statistics used by the equilibration detector and the bias aggregation."]

pub mod errors;
pub mod rng;
pub mod stats;

pub use errors::{ErrorInfo, IsingError};
pub use rng::{derive_substream_seed, RngHandle};
pub use stats::{correlation_like, mean, sample_stdev, slope, Summary};
