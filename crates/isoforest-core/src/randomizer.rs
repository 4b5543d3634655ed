//! Random number generation used during tree construction.
//!
//! The forest only ever asks for uniform `u64` values, so the capability is a
//! single-method trait. Swap in a [`ScriptedRandomizer`] to make tree shape
//! fully predictable, or a seeded [`DefaultRandomizer`] for reproducible but
//! realistic runs.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniformly distributed unsigned 64-bit integers.
pub trait Randomizer: Send + Sync {
    /// Return the next value, uniform over the full `u64` range.
    fn next_u64(&mut self) -> u64;

    /// Return a value in `[min, max]`.
    ///
    /// Computed as `min + next_u64() % (max - min + 1)`. The modulo mapping is
    /// slightly biased whenever the span does not divide 2^64; tree shapes
    /// depend on this exact mapping, so implementors should not override it.
    /// When the span covers all of `u64` the raw draw is returned.
    fn uniform(&mut self, min: u64, max: u64) -> u64 {
        debug_assert!(min <= max, "uniform called with min {min} > max {max}");
        match (max - min).checked_add(1) {
            Some(span) => min + self.next_u64() % span,
            None => self.next_u64(),
        }
    }
}

/// ChaCha8-backed randomizer.
#[derive(Debug, Clone)]
pub struct DefaultRandomizer {
    rng: ChaCha8Rng,
}

impl DefaultRandomizer {
    /// Create a randomizer with a fixed seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a randomizer seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl Default for DefaultRandomizer {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl Randomizer for DefaultRandomizer {
    fn next_u64(&mut self) -> u64 {
        self.rng.r#gen()
    }
}

/// Replays a fixed sequence of values, wrapping around at the end.
///
/// An empty script always yields `0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandomizer {
    values: Vec<u64>,
    cursor: usize,
}

impl ScriptedRandomizer {
    /// Create a randomizer that replays `values` in order.
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Return how many values have been drawn so far.
    #[must_use]
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl Randomizer for ScriptedRandomizer {
    fn next_u64(&mut self) -> u64 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
