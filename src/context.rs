//! Shared engine state: the random source and the innovation registry.
//!
//! Both used to be hidden process globals in older NEAT engines. Carrying
//! them in one explicit value threaded through constructors keeps innovation
//! issuance serialised by construction and makes multi-engine tests possible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The mutable state every randomised or structural operation draws on:
/// a uniform `[0, 1)` generator and a monotonic innovation counter.
///
/// One context per engine. Callers that parallelise evaluation must give
/// each worker its own context, or serialise access to this one.
#[derive(Debug, Clone)]
pub struct EngineContext {
    rng: ChaCha8Rng,
    current_innovation: u64,
}

impl EngineContext {
    /// Context seeded from the OS entropy source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_rng(&mut rand::rng()),
            current_innovation: 0,
        }
    }

    /// Deterministically seeded context, for tests and repeatable runs.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            current_innovation: 0,
        }
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform index in `[0, len)`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    #[inline]
    pub fn random_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    /// Issue a fresh innovation number, strictly greater than every number
    /// issued before it by this context.
    pub fn next_innovation(&mut self) -> u64 {
        self.current_innovation += 1;
        self.current_innovation
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
