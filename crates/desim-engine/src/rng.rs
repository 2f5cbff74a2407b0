//! # desim-engine::rng
//!
//! Deterministic, named random-number streams. Every stream is derived from
//! a single master seed and its name, so re-running with the same seed and
//! the same set of stream names reproduces bit-identical draws regardless
//! of process, machine, or draw order across *different* streams — the
//! same stream drawn in the same order always returns the same sequence.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::collections::HashMap;

/// Derives a 64-bit seed for `name` from `master_seed`. Uses a fixed FNV-1a
/// hash (never `std`'s `RandomState`-seeded `DefaultHasher`, which varies
/// per process) folded through a SplitMix64 step, so stream seeding is
/// reproducible across runs and platforms.
fn derive_seed(master_seed: u64, name: &str) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;
    let mut hash = FNV_OFFSET;
    for byte in name.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    splitmix64(master_seed ^ hash)
}

/// One round of SplitMix64, used to mix the master seed with a stream's
/// name hash into a well-distributed 64-bit seed.
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e3779b97f4a7c15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// A registry of independent, reproducible RNG streams keyed by name. Each
/// name maps to its own `ChaCha20Rng`, seeded once on first access and
/// never reseeded, so draws from one stream never perturb another.
pub struct RngStreams {
    master_seed: u64,
    streams: HashMap<String, ChaCha20Rng>,
}

impl RngStreams {
    pub fn new(master_seed: u64) -> Self {
        Self {
            master_seed,
            streams: HashMap::new(),
        }
    }

    /// Returns the named stream, creating and seeding it deterministically
    /// on first request.
    pub fn stream(&mut self, name: &str) -> &mut ChaCha20Rng {
        self.streams
            .entry(name.to_string())
            .or_insert_with(|| ChaCha20Rng::seed_from_u64(derive_seed(self.master_seed, name)))
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }
}
