use ising_core::derive_substream_seed;

/// Seed of the run at (`temperature_index`, `bias_index`) of a sweep.
pub fn run_seed(master_seed: u64, temperature_index: usize, bias_index: usize) -> u64 {
    derive_substream_seed(master_seed, &[temperature_index as u64, bias_index as u64])
}
