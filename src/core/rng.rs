//! Deterministic randomness handed to move resolution.
//!
//! The obligation core holds no random state. Moves that need randomness
//! (drawing cards, refilling a market) receive a `&mut GameRng` from the
//! Turn Driver, so replaying the same moves from the same seed reproduces
//! the same game.
//!
//! ```
//! use tabletop_turns::core::GameRng;
//!
//! let mut rng = GameRng::new(7);
//! let mut replay = GameRng::new(7);
//! assert_eq!(replay.gen_index(100), rng.gen_index(100));
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded ChaCha8 generator.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform index in `0..len`.
    ///
    /// Panics if `len` is zero.
    pub fn gen_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Shuffle a slice in place (e.g. a draw pile being rebuilt).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}
