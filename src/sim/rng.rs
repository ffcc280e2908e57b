//! Random source injected into the simulation
//!
//! Gameplay code only ever asks for uniform `[0, 1)` samples through
//! [`RandomSource`], so tests can drive it with a scripted sequence while the
//! game itself runs on a seeded `Pcg32`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A source of uniform random samples
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`
    fn next_f32(&mut self) -> f32;

    /// Uniform sample in `[lo, hi)`
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }

    /// Uniform integer in `[lo, hi)`, i.e. `floor(range(lo, hi))`
    fn index(&mut self, lo: u32, hi: u32) -> u32 {
        let v = self.range(lo as f32, hi as f32).floor() as u32;
        v.clamp(lo, hi.saturating_sub(1).max(lo))
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

impl RandomSource for Pcg32 {
    fn next_f32(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Seeded generator used by [`super::Session`]
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of samples, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    samples: Vec<f32>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(samples: impl Into<Vec<f32>>) -> Self {
        Self {
            samples: samples.into(),
            cursor: 0,
        }
    }

    /// A source that always returns the same value
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of samples drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRng {
    fn next_f32(&mut self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let v = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        v
    }
}
