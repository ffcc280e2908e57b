//! Visual-only explosion effects
//!
//! Gameplay never reads these beyond the `finished` flag, which decides when
//! an effect is reaped.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::consts::*;

/// Explosion lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionStage {
    Growing,
    Fading,
}

/// A debris particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// 0-255, decreases by `decay` per frame
    pub alpha: f32,
    pub decay: f32,
}

/// An expanding fireball with debris
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub stage: ExplosionStage,
    pub size: f32,
    pub max_size: f32,
    /// 0-255
    pub alpha: f32,
    pub particles: Vec<Particle>,
    pub finished: bool,
}

impl Explosion {
    /// Spawn at `pos`; `scale` shrinks both the fireball and the debris
    pub fn new(pos: Vec2, scale: f32, rng: &mut impl RandomSource) -> Self {
        let count = (EXPLOSION_PARTICLES * scale).floor() as usize;
        let particles = (0..count)
            .map(|_| Particle {
                pos,
                vel: Vec2::new(rng.range(-3.0, 3.0), rng.range(-3.0, 3.0)) * scale,
                size: rng.range(2.0, 6.0) * scale,
                alpha: 255.0,
                decay: rng.range(3.0, 7.0),
            })
            .collect();

        Self {
            pos,
            stage: ExplosionStage::Growing,
            size: EXPLOSION_START_SIZE,
            max_size: EXPLOSION_MAX_SIZE * scale,
            alpha: 255.0,
            particles,
            finished: false,
        }
    }

    /// Advance one frame: grow to full size, then fade out
    pub fn update(&mut self) {
        match self.stage {
            ExplosionStage::Growing => {
                self.size += EXPLOSION_GROWTH;
                if self.size >= self.max_size {
                    self.stage = ExplosionStage::Fading;
                }
            }
            ExplosionStage::Fading => {
                self.alpha -= EXPLOSION_FADE;
                if self.alpha <= 0.0 {
                    self.finished = true;
                }
            }
        }

        for p in &mut self.particles {
            p.pos += p.vel;
            p.alpha -= p.decay;
        }
    }
}
