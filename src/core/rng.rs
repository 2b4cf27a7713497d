//! Deterministic random number generation with forking.
//!
//! Every source of randomness in a match flows through `GameRng`:
//! deck shuffles, AI suboptimality rolls and session codes. A session owns
//! one generator and forks an independent child for each AI decision, so
//! the search never advances the session stream in surprising ways.
//!
//! ```
//! use rally_engine::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let mut ai_rng = rng.fork();
//!
//! // Forks are deterministic: same parent seed and fork count, same stream.
//! let mut rng2 = GameRng::new(42);
//! let mut ai_rng2 = rng2.fork();
//! assert_eq!(ai_rng.gen_index(1000), ai_rng2.gen_index(1000));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Seed from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork an independent, deterministic child stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn gen_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// True with the given probability.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Random string of `len` characters drawn from `alphabet`.
    pub fn gen_code(&mut self, alphabet: &[u8], len: usize) -> String {
        (0..len)
            .map(|_| char::from(alphabet[self.gen_index(alphabet.len())]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_index(1000), rng2.gen_index(1000));
        }
    }

    #[test]
    fn test_fork_produces_different_sequence() {
        let mut rng = GameRng::new(42);
        let mut forked = rng.fork();

        let seq1: Vec<_> = (0..10).map(|_| rng.gen_index(1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| forked.gen_index(1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_successive_forks_differ() {
        let mut rng = GameRng::new(7);
        let a = rng.fork();
        let b = rng.fork();
        assert_ne!(a.seed(), b.seed());
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = GameRng::new(1);
        for _ in 0..50 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
            assert!(rng.chance(3.0));
        }
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = GameRng::new(42);
        let mut data: Vec<i32> = (1..=10).collect();
        rng.shuffle(&mut data);
        assert_ne!(data, (1..=10).collect::<Vec<_>>());
        data.sort_unstable();
        assert_eq!(data, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_gen_code() {
        let mut rng = GameRng::new(11);
        let code = rng.gen_code(b"AB", 8);
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c == 'A' || c == 'B'));
    }
}
