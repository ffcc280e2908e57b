//! Enemy tank AI: a two-state chase/patrol machine
//!
//! The hull steers smoothly toward a goal heading while the turret either
//! locks onto the player (chase) or sweeps with the occasional glance
//! (patrol). Mode switches are a small random per-frame toggle, not a
//! reaction to the situation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::Projectile;
use super::rng::RandomSource;
use super::state::GameEvent;
use super::vehicle::{EntityId, Side, Vehicle};
use crate::Tuning;
use crate::angle_delta;
use crate::consts::*;

/// Current AI mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    Chase,
    Patrol,
}

impl Behavior {
    pub fn flipped(self) -> Self {
        match self {
            Behavior::Chase => Behavior::Patrol,
            Behavior::Patrol => Behavior::Chase,
        }
    }
}

/// Per-enemy AI state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiBrain {
    pub behavior: Behavior,
    /// Patrol goal heading (degrees)
    pub patrol_angle: f32,
    /// Frames spent on the current patrol leg
    pub patrol_timer: u32,
    /// Frames before a new patrol heading is rolled
    pub patrol_duration: f32,
    /// Frames until the next fire decision
    pub shoot_cooldown: i32,
}

/// What the AI may observe about the rest of the world this frame
#[derive(Debug, Clone, Copy)]
pub struct AiContext {
    /// Player position as committed at the end of the previous frame
    pub player_pos: Vec2,
    pub difficulty: f32,
}

/// An AI-driven tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub tank: Vehicle,
    pub brain: AiBrain,
}

impl Enemy {
    /// Roll a fresh enemy at `pos`; tougher at higher difficulty
    pub fn spawn(
        id: EntityId,
        pos: Vec2,
        difficulty: f32,
        tuning: &Tuning,
        rng: &mut impl RandomSource,
    ) -> Self {
        let mut tank = Vehicle::new(
            id,
            Side::Enemy,
            pos,
            tuning.enemy_health(difficulty),
            tuning.vehicle_size,
        );
        tank.max_speed = tuning.enemy_base_speed + rng.range(0.0, tuning.enemy_speed_jitter);
        tank.rotation_speed = tuning.enemy_rotation_speed;

        let shoot_cooldown = rng.range(INITIAL_COOLDOWN.0, INITIAL_COOLDOWN.1).floor() as i32;
        let behavior = if rng.chance(0.5) {
            Behavior::Chase
        } else {
            Behavior::Patrol
        };
        let patrol_angle = rng.range(0.0, 360.0);
        let patrol_duration = rng.range(PATROL_DURATION.0, PATROL_DURATION.1);

        Self {
            tank,
            brain: AiBrain {
                behavior,
                patrol_angle,
                patrol_timer: 0,
                patrol_duration,
                shoot_cooldown,
            },
        }
    }

    /// Decide this frame's movement, aim and fire. Does not move the hull;
    /// the director integrates afterwards.
    pub fn think(
        &mut self,
        ctx: &AiContext,
        tuning: &Tuning,
        rng: &mut impl RandomSource,
        projectiles: &mut Vec<Projectile>,
        events: &mut Vec<GameEvent>,
    ) {
        match self.brain.behavior {
            Behavior::Chase => self.chase(ctx),
            Behavior::Patrol => self.patrol(ctx, rng),
        }

        if rng.chance(BEHAVIOR_FLIP_CHANCE) {
            self.brain.behavior = self.brain.behavior.flipped();
        }

        self.brain.shoot_cooldown -= 1;
        if self.brain.shoot_cooldown <= 0 {
            self.tank.turret_angle = self.tank.bearing_to(ctx.player_pos);
            let error = angle_delta(self.tank.heading, self.tank.turret_angle).abs();
            if error < FIRE_CONE && rng.chance(FIRE_CHANCE) {
                self.tank.shoot(tuning, projectiles, events);
            }
            let rearm = rng.range(REARM_COOLDOWN.0, REARM_COOLDOWN.1) / ctx.difficulty;
            self.brain.shoot_cooldown = rearm.floor() as i32;
        }
    }

    fn chase(&mut self, ctx: &AiContext) {
        let target = self.tank.bearing_to(ctx.player_pos);
        let diff = steer(&mut self.tank, target);

        if diff.abs() < AI_DRIVE_CONE {
            self.tank.speed = self.tank.max_speed;
        } else {
            self.tank.speed *= AI_TURN_DECAY;
        }
        self.tank.turret_angle = target;
    }

    fn patrol(&mut self, ctx: &AiContext, rng: &mut impl RandomSource) {
        self.brain.patrol_timer += 1;
        if self.brain.patrol_timer as f32 > self.brain.patrol_duration {
            self.brain.patrol_angle = rng.range(0.0, 360.0);
            self.brain.patrol_timer = 0;
            self.brain.patrol_duration = rng.range(PATROL_DURATION.0, PATROL_DURATION.1);
        }

        let diff = steer(&mut self.tank, self.brain.patrol_angle);
        if diff.abs() < AI_DRIVE_CONE {
            self.tank.speed = self.tank.max_speed * PATROL_SPEED_FACTOR;
        } else {
            self.tank.speed *= AI_TURN_DECAY;
        }

        self.tank.turret_angle += TURRET_SWEEP;
        if rng.chance(GLANCE_CHANCE) {
            self.tank.turret_angle = self.tank.bearing_to(ctx.player_pos);
        }
    }
}

/// Turn the hull one step toward `target`, snapping inside the deadband.
///
/// Returns the heading error measured before turning, in (-180, 180].
fn steer(tank: &mut Vehicle, target: f32) -> f32 {
    let diff = angle_delta(tank.heading, target);
    if diff.abs() > AI_SNAP_DEADBAND {
        tank.heading += tank.rotation_speed.copysign(diff);
    } else {
        tank.heading = target;
    }
    diff
}
