//! Seeded randomness for synthetic networks.

use std::hash::Hasher;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use siphasher::sip::SipHasher13;

use crate::Capacity;

/// Seeded generator behind the synthetic network builders.
///
/// Besides raw `RngCore` output it offers the draws the builders need:
/// capacities, arc endpoints without self loops and biased coin flips.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
    seed: u64,
}

impl RngHandle {
    /// Seeds a generator.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Independent stream `substream` of `master_seed`, e.g. one per layer.
    pub fn substream(master_seed: u64, substream: u64) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, substream))
    }

    /// Seed this generator was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Capacity drawn uniformly from `0..=max`; negative bounds yield 0.
    pub fn capacity(&mut self, max: Capacity) -> Capacity {
        self.rng.gen_range(0..=max.max(0))
    }

    /// Capacity drawn uniformly from `1..=max`, never zero.
    pub fn positive_capacity(&mut self, max: Capacity) -> Capacity {
        self.rng.gen_range(1..=max.max(1))
    }

    /// Two distinct indices below `num_nodes`; needs at least two nodes.
    pub fn distinct_pair(&mut self, num_nodes: usize) -> (usize, usize) {
        debug_assert!(num_nodes >= 2);
        let from = self.rng.gen_range(0..num_nodes);
        let mut to = self.rng.gen_range(0..num_nodes - 1);
        if to >= from {
            to += 1;
        }
        (from, to)
    }

    /// Index drawn uniformly from `0..len`.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
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

/// Seed of stream `substream` under `master_seed` (SipHash-1-3, fixed keys).
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0x7066_6c6f_77, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}
