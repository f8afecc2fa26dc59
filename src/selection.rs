//! Play order construction.
//!
//! `sequential` keeps the puzzles in file order. `random` and `shuffled` are
//! the same strategy: a Fisher–Yates permutation drawn from a [`SessionRng`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{config::SelectionStrategy, puzzle::Puzzle};

/// Random stream used for shuffling.
///
/// Seeded runs are reproducible: the same seed and the same sequence of
/// sessions yield the same play orders.
#[derive(Clone, Debug)]
pub struct SessionRng {
    inner: ChaCha8Rng,
    seed: Option<u64>,
}

impl SessionRng {
    pub fn new(seed: Option<u64>) -> Self {
        let inner = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { inner, seed }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Uniform integer in `0..=upper`
    pub fn index_up_to(&mut self, upper: usize) -> usize {
        self.inner.gen_range(0..=upper)
    }
}

/// Strategy for turning the full puzzle collection into a play order
pub trait PuzzleSelector {
    fn select(&self, puzzles: &[Puzzle], rng: &mut SessionRng) -> Vec<Puzzle>;
}

pub struct SequentialSelector;

impl PuzzleSelector for SequentialSelector {
    fn select(&self, puzzles: &[Puzzle], _rng: &mut SessionRng) -> Vec<Puzzle> {
        puzzles.to_vec()
    }
}

pub struct ShuffledSelector;

impl PuzzleSelector for ShuffledSelector {
    fn select(&self, puzzles: &[Puzzle], rng: &mut SessionRng) -> Vec<Puzzle> {
        let mut order = puzzles.to_vec();
        fisher_yates(&mut order, rng);
        order
    }
}

/// In-place shuffle walking from the last index down to 1
pub fn fisher_yates<T>(items: &mut [T], rng: &mut SessionRng) {
    for i in (1..items.len()).rev() {
        let j = rng.index_up_to(i);
        items.swap(i, j);
    }
}

pub fn selector_for(strategy: SelectionStrategy) -> Box<dyn PuzzleSelector> {
    match strategy {
        SelectionStrategy::Sequential => Box::new(SequentialSelector),
        SelectionStrategy::Random | SelectionStrategy::Shuffled => Box::new(ShuffledSelector),
    }
}
