//! A seeded game run
//!
//! Bundles a [`GameState`] with the PCG stream that drives it, so two
//! sessions built from the same seed and fed the same inputs stay in lockstep.

use rand_pcg::Pcg32;

use super::control::TickInput;
use super::rng::seeded;
use super::state::{FrameReport, GameState, Snapshot};
use super::tick::tick;
use crate::Tuning;

#[derive(Debug, Clone)]
pub struct Session {
    seed: u64,
    rng: Pcg32,
    state: GameState,
}

impl Session {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut rng = seeded(seed);
        let state = GameState::new(tuning, &mut rng);
        log::info!("Session started with seed {seed}");
        Self { seed, rng, state }
    }

    /// Simulate one frame
    pub fn tick(&mut self, input: &TickInput) -> FrameReport {
        tick(&mut self.state, input, &mut self.rng)
    }

    /// Start a fresh run on the same RNG stream.
    ///
    /// The new arena differs from the first one because the stream has
    /// advanced; reports after this carry the next generation number.
    pub fn reset(&mut self) {
        self.state.reset(&mut self.rng);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for tools and tests that stage scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
