//! Pseudorandom stream plumbing.
//!
//! Every simulator owns exactly one [`SimRng`]; all topology construction,
//! value randomization, noise and rewiring draws flow through it in a fixed
//! order, so a seed fully determines a trajectory.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generator type owned by each simulator instance.
pub type SimRng = ChaCha8Rng;

/// Create a generator from a 64-bit seed.
pub fn seeded_rng(seed: u64) -> SimRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Uniform sample in `[0, 1)`.
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}
