//! Random draw sources for scenario synthesis.
//!
//! All randomness in the synthesizer, composer and batch generator flows through
//! the [`Draws`] trait so callers can inject either a seeded ChaCha8 stream
//! ([`SeededDraws`]) or a fixed script of values ([`ScriptedDraws`]).

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// A source of uniformly distributed draws.
pub trait Draws {
    /// A float drawn uniformly from the closed interval `[lo, hi]`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64;

    /// An integer drawn uniformly from the closed interval `[lo, hi]`.
    fn integer(&mut self, lo: u64, hi: u64) -> u64;

    /// An index drawn uniformly from `0..len`. Returns 0 when `len` is 0.
    fn index(&mut self, len: usize) -> usize;
}

/// Picks one element of a non-empty slice.
///
/// Stands in for `IndexedRandom::choose`, which needs an `Rng` and so cannot
/// replay a [`ScriptedDraws`] script.
pub fn pick<'a, T, D: Draws + ?Sized>(draws: &mut D, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(draws.index(items.len()))
}

/// In-place Fisher-Yates shuffle driven by `draws`.
///
/// `SliceRandom::shuffle` would bypass the injected source for the same reason.
pub fn shuffle<T, D: Draws + ?Sized>(draws: &mut D, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = draws.index(i + 1);
        items.swap(i, j);
    }
}

/// Draws backed by a ChaCha8 stream.
pub struct SeededDraws {
    rng: ChaCha8Rng,
}

impl SeededDraws {
    /// Reproducible draws: the same seed always yields the same sequence.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draws seeded from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }
}

impl Draws for SeededDraws {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if lo >= hi {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }

    fn integer(&mut self, lo: u64, hi: u64) -> u64 {
        if lo >= hi {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }

    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

/// Replays fixed draw values, for golden-output tests and fixtures.
///
/// Each kind of draw has its own queue. Values are clamped into the requested
/// range; an exhausted queue yields the range minimum (or index 0).
#[derive(Debug, Clone, Default)]
pub struct ScriptedDraws {
    uniforms: VecDeque<f64>,
    integers: VecDeque<u64>,
    indices: VecDeque<usize>,
}

impl ScriptedDraws {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uniforms(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.uniforms.extend(values);
        self
    }

    pub fn with_integers(mut self, values: impl IntoIterator<Item = u64>) -> Self {
        self.integers.extend(values);
        self
    }

    pub fn with_indices(mut self, values: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(values);
        self
    }

    /// Number of scripted values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.uniforms.len() + self.integers.len() + self.indices.len()
    }
}

impl Draws for ScriptedDraws {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        match self.uniforms.pop_front() {
            Some(value) => value.clamp(lo, hi.max(lo)),
            None => lo,
        }
    }

    fn integer(&mut self, lo: u64, hi: u64) -> u64 {
        match self.integers.pop_front() {
            Some(value) => value.clamp(lo, hi.max(lo)),
            None => lo,
        }
    }

    fn index(&mut self, len: usize) -> usize {
        let value = self.indices.pop_front().unwrap_or(0);
        value.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let mut a = SeededDraws::from_seed(42);
        let mut b = SeededDraws::from_seed(42);
        for _ in 0..50 {
            assert_eq!(a.uniform(0.5, 1.5), b.uniform(0.5, 1.5));
            assert_eq!(a.integer(1500, 5000), b.integer(1500, 5000));
            assert_eq!(a.index(7), b.index(7));
        }
    }

    #[test]
    fn test_seeded_draws_stay_in_range() {
        let mut draws = SeededDraws::from_seed(7);
        for _ in 0..1000 {
            let f = draws.uniform(1.2, 2.0);
            assert!((1.2..=2.0).contains(&f));
            let n = draws.integer(3000, 12000);
            assert!((3000..=12000).contains(&n));
            assert!(draws.index(3) < 3);
        }
    }

    #[test]
    fn test_degenerate_ranges_do_not_panic() {
        let mut draws = SeededDraws::from_seed(1);
        assert_eq!(draws.uniform(2.0, 2.0), 2.0);
        assert_eq!(draws.integer(9, 9), 9);
        assert_eq!(draws.index(0), 0);
        assert_eq!(draws.index(1), 0);
    }

    #[test]
    fn test_scripted_draws_replay_and_clamp() {
        let mut draws = ScriptedDraws::new()
            .with_uniforms([1.5, 9.0])
            .with_integers([3000])
            .with_indices([2, 10]);

        assert_eq!(draws.remaining(), 5);
        assert_eq!(draws.uniform(1.0, 2.0), 1.5);
        assert_eq!(draws.uniform(1.0, 2.0), 2.0);
        assert_eq!(draws.integer(1500, 5000), 3000);
        assert_eq!(draws.index(4), 2);
        assert_eq!(draws.index(4), 3);
        assert_eq!(draws.remaining(), 0);

        // exhausted queues fall back to the range minimum
        assert_eq!(draws.uniform(0.35, 0.5), 0.35);
        assert_eq!(draws.integer(10, 20), 10);
        assert_eq!(draws.index(5), 0);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut items: Vec<u32> = (0..20).collect();
        shuffle(&mut SeededDraws::from_seed(3), &mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_pick() {
        let items = ["a", "b", "c"];
        let mut draws = ScriptedDraws::new().with_indices([1]);
        assert_eq!(pick(&mut draws, &items), Some(&"b"));
        let empty: [&str; 0] = [];
        assert_eq!(pick(&mut draws, &empty), None);
    }
}
