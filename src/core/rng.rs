//! Deterministic random number generation for dealing.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces the same deal
//! - **Forkable**: One independent stream per session from a root RNG
//!
//! ## Usage
//!
//! ```
//! use memorama::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//!
//! // Fork a stream for the next session
//! let mut session_rng = rng.fork();
//!
//! // Forks are deterministic: same seed, same fork counter, same sequence
//! let mut rng2 = GameRng::new(42);
//! let mut session_rng2 = rng2.fork();
//! assert_eq!(session_rng.seed(), session_rng2.seed());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded RNG used for shuffling decks.
///
/// Uses ChaCha8 for speed while keeping high quality randomness, so every
/// permutation of a deck is equally likely.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Create an RNG seeded from the thread-local entropy source.
    ///
    /// Used for real play; tests should always pass an explicit seed.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// Seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork this RNG to create an independent stream.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self::new(fork_seed)
    }

    /// Shuffle a slice in place (Fisher-Yates).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}
