//! Random source for fallback replies
//!
//! The resolver only ever asks two questions: "did the coin land heads?" and
//! "which of `len` items?". Tests script the answers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

pub trait RandomSource {
    /// True with probability `p`
    fn chance(&mut self, p: f64) -> bool;

    /// Uniform index in `0..len`; `len` is never zero
    fn pick(&mut self, len: usize) -> usize;
}

/// Standard generator, optionally seeded for reproducible sessions
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map(Self::seeded).unwrap_or_else(Self::from_entropy)
    }
}

impl RandomSource for StdRandom {
    fn chance(&mut self, p: f64) -> bool {
        if !p.is_finite() {
            return false;
        }
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays fixed answers; falls back to `false` / `0` once exhausted
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    coins: VecDeque<bool>,
    picks: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new<C, P>(coins: C, picks: P) -> Self
    where
        C: IntoIterator<Item = bool>,
        P: IntoIterator<Item = usize>,
    {
        Self {
            coins: coins.into_iter().collect(),
            picks: picks.into_iter().collect(),
        }
    }

    /// Always take the category branch, always pick `index`
    pub fn always(heads: bool, index: usize) -> Self {
        Self::new(std::iter::repeat(heads).take(1024), std::iter::repeat(index).take(1024))
    }
}

impl RandomSource for ScriptedRandom {
    fn chance(&mut self, _p: f64) -> bool {
        self.coins.pop_front().unwrap_or(false)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn chance(&mut self, p: f64) -> bool {
        (**self).chance(p)
    }

    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}
