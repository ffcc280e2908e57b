//! Player input snapshot and how it drives the player's tank

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::Projectile;
use super::state::GameEvent;
use super::vehicle::Vehicle;
use crate::Tuning;
use crate::consts::{PLAYER_FRICTION, REVERSE_FACTOR};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Throttle forward (W / Up)
    pub forward: bool,
    /// Reverse (S / Down); ignored while `forward` is held
    pub backward: bool,
    /// Turn hull counter-clockwise (A / Left)
    pub left: bool,
    /// Turn hull clockwise (D / Right)
    pub right: bool,
    /// Arena-space point the turret tracks (mouse position)
    pub aim_point: Vec2,
    /// Trigger held
    pub fire: bool,
}

/// Map one frame of input onto the player's tank.
///
/// Holding `fire` retries every frame; [`Vehicle::shoot`] gates the rate.
pub fn apply_input(
    player: &mut Vehicle,
    input: &TickInput,
    tuning: &Tuning,
    projectiles: &mut Vec<Projectile>,
    events: &mut Vec<GameEvent>,
) {
    if input.forward {
        player.speed = player.max_speed;
    } else if input.backward {
        player.speed = -player.max_speed * REVERSE_FACTOR;
    } else {
        player.speed *= PLAYER_FRICTION;
    }

    if input.left {
        player.heading -= player.rotation_speed;
    }
    if input.right {
        player.heading += player.rotation_speed;
    }

    player.turret_angle = player.bearing_to(input.aim_point);

    if input.fire {
        player.shoot(tuning, projectiles, events);
    }
}
