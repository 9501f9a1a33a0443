//! Deterministic RNG wrapper, random-source seam and seed-derivation helpers.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Source of uniform draws consumed by the collision criteria.
///
/// Every probability decision in the engine goes through this trait; a seeded
/// [`RngHandle`] drives production runs and scripted sources drive tests.
pub trait RandomSource {
    /// Returns a uniformly distributed value in `[min, max)`.
    fn uniform(&mut self, min: f64, max: f64) -> f64;
}

/// Deterministic RNG handle exposed to scatter consumers.
///
/// The handle is a thin wrapper around `StdRng` that documents the seeding
/// policy used throughout the project. A master `seed: u64` must be provided by
/// the caller. Per-cell substreams are derived by hashing
/// `(master_seed, substream_id)` with SipHash-1-3 configured with fixed zero
/// keys, so cells can be evaluated independently without sharing a generator.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Creates a new RNG handle from a master seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates the handle for a derived substream (typically one per cell).
    pub fn substream(master_seed: u64, substream: u64) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, substream))
    }

    /// Returns a mutable reference to the underlying RNG for advanced usage.
    pub fn inner_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl RandomSource for RngHandle {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.rng.gen::<f64>()
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

/// Derives the deterministic seed for a specific substream.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}
