//! The single random source of a game.
//!
//! Every random draw of a session (playlist shuffle, track pick, hint target)
//! goes through [`GameRng`], so a seeded game replays identically.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

#[derive(Debug, Clone)]
pub struct GameRng {
    inner: StdRng,
}

impl GameRng {
    /// `None` draws the seed from OS entropy
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self {
                inner: StdRng::from_os_rng(),
            },
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn pick_index(&mut self, len: usize) -> usize {
        self.inner.random_range(0..len)
    }

    pub fn coin_flip(&mut self) -> bool {
        self.inner.random_bool(0.5)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}
