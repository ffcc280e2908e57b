//! Shared vehicle physics for the player and enemy tanks
//!
//! Hull and turret are independent: `heading` drives motion, `turret_angle`
//! decides where shots go.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::ArenaGrid;
use super::projectile::Projectile;
use super::state::GameEvent;
use crate::Tuning;
use crate::consts::{MUZZLE_OFFSET, RELOAD_FRAMES};
use crate::{bearing, heading_vector};

/// Stable identifier for a vehicle within one game generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Which team a vehicle or projectile belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

/// A tank hull with turret
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: EntityId,
    pub side: Side,
    pub pos: Vec2,
    /// Hull facing (degrees)
    pub heading: f32,
    /// Weapon facing (degrees)
    pub turret_angle: f32,
    /// Signed forward speed (units/frame)
    pub speed: f32,
    pub max_speed: f32,
    /// Hull turn rate (degrees/frame)
    pub rotation_speed: f32,
    pub health: f32,
    pub max_health: f32,
    /// Frames until the next shot is allowed
    pub reload_timer: u32,
    /// Half the hull edge length (hull is square)
    pub half_extent: f32,
}

impl Vehicle {
    pub fn new(id: EntityId, side: Side, pos: Vec2, health: f32, size: f32) -> Self {
        Self {
            id,
            side,
            pos,
            heading: 0.0,
            turret_angle: 0.0,
            speed: 0.0,
            max_speed: 2.0,
            rotation_speed: 3.0,
            health,
            max_health: health,
            reload_timer: 0,
            half_extent: size / 2.0,
        }
    }

    /// The player's tank, parked at the arena center
    pub fn player(id: EntityId, tuning: &Tuning) -> Self {
        let mut v = Self::new(
            id,
            Side::Player,
            tuning.arena_center(),
            tuning.player_health,
            tuning.vehicle_size,
        );
        v.max_speed = tuning.player_max_speed;
        v.rotation_speed = tuning.player_rotation_speed;
        v
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Angle from this vehicle to a point (degrees)
    pub fn bearing_to(&self, target: Vec2) -> f32 {
        bearing(self.pos, target)
    }

    /// Axis-aligned overlap test against a rectangle with top-left `origin`
    pub fn collides_with(&self, origin: Vec2, size: Vec2) -> bool {
        self.pos.x - self.half_extent < origin.x + size.x
            && self.pos.x + self.half_extent > origin.x
            && self.pos.y - self.half_extent < origin.y + size.y
            && self.pos.y + self.half_extent > origin.y
    }

    /// Advance one frame: move along the heading, stay inside the arena, get
    /// pushed out of obstacles, and count down the reload.
    pub fn integrate(&mut self, grid: &ArenaGrid) {
        self.pos += heading_vector(self.heading) * self.speed;

        let bounds = Vec2::new(
            grid.width() as f32 * grid.cell_size(),
            grid.height() as f32 * grid.cell_size(),
        );
        self.clamp_to(bounds);
        self.resolve_collisions(grid);
        // A push off one obstacle can cross the arena edge near corners
        self.clamp_to(bounds);

        self.reload_timer = self.reload_timer.saturating_sub(1);
    }

    fn clamp_to(&mut self, bounds: Vec2) {
        let lo = Vec2::splat(self.half_extent);
        self.pos = self.pos.clamp(lo, bounds - lo);
    }

    /// Positional correction against each overlapping obstacle, in list order.
    ///
    /// The vehicle is placed on the ray from the obstacle's center through
    /// its own center, at `half_extent + half_cell + 1`. Each push is applied
    /// before the next obstacle is tested.
    pub fn resolve_collisions(&mut self, grid: &ArenaGrid) {
        let cell = grid.cell_size();
        let cell_extent = Vec2::splat(cell);
        let clearance = self.half_extent + cell / 2.0 + 1.0;

        for obstacle in grid.obstacles() {
            if !self.collides_with(obstacle.origin(cell), cell_extent) {
                continue;
            }
            let center = obstacle.center(cell);
            let away = bearing(center, self.pos);
            self.pos = center + heading_vector(away) * clearance;
        }
    }

    /// Fire from the muzzle along the turret if reloaded.
    ///
    /// Returns whether a projectile was spawned.
    pub fn shoot(
        &mut self,
        tuning: &Tuning,
        projectiles: &mut Vec<Projectile>,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if self.reload_timer > 0 {
            return false;
        }

        let muzzle = self.pos + heading_vector(self.turret_angle) * MUZZLE_OFFSET;
        projectiles.push(Projectile::new(muzzle, self.turret_angle, self.side, tuning));
        self.reload_timer = RELOAD_FRAMES;
        events.push(GameEvent::ShotFired {
            by: self.id,
            side: self.side,
        });
        true
    }

    /// Subtract health; can go negative, removal is decided by the director
    pub fn take_damage(&mut self, amount: f32, events: &mut Vec<GameEvent>) {
        self.health -= amount;
        events.push(GameEvent::EntityDamaged {
            target: self.id,
            side: self.side,
            amount,
        });
    }
}
