//! Tank Arena - A tile-arena tank combat simulation
//!
//! Core modules:
//! - `sim`: Simulation engine (vehicles, projectiles, enemy AI, director)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio and leaderboards live outside this crate. They read
//! [`sim::Snapshot`]s and consume [`sim::GameEvent`]s.

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError, TuningResult};

use glam::Vec2;

/// Fixed gameplay constants (not data-driven)
pub mod consts {
    /// Distance from hull center to muzzle
    pub const MUZZLE_OFFSET: f32 = 20.0;
    /// Frames between shots
    pub const RELOAD_FRAMES: u32 = 30;

    /// Reverse speed as a fraction of max speed
    pub const REVERSE_FACTOR: f32 = 0.7;
    /// Player speed decay per frame with no throttle
    pub const PLAYER_FRICTION: f32 = 0.8;

    /// Heading error below which the AI snaps instead of rotating (degrees)
    pub const AI_SNAP_DEADBAND: f32 = 5.0;
    /// Heading error below which the AI drives forward (degrees)
    pub const AI_DRIVE_CONE: f32 = 30.0;
    /// Speed decay per frame while the AI is turning
    pub const AI_TURN_DECAY: f32 = 0.9;
    /// Patrol cruise speed as a fraction of max speed
    pub const PATROL_SPEED_FACTOR: f32 = 0.7;
    /// Patrol turret sweep per frame (degrees)
    pub const TURRET_SWEEP: f32 = 1.0;
    /// Per-frame chance a patrolling turret glances at the player
    pub const GLANCE_CHANCE: f32 = 0.2;
    /// Per-frame chance of flipping between chase and patrol
    pub const BEHAVIOR_FLIP_CHANCE: f32 = 5.0 / 1000.0;
    /// Turret/hull error (degrees) above which the AI holds fire
    pub const FIRE_CONE: f32 = 45.0;
    /// Chance the AI takes a shot once its cooldown elapses and it is lined up
    pub const FIRE_CHANCE: f32 = 0.7;
    /// Patrol leg duration range (frames)
    pub const PATROL_DURATION: (f32, f32) = (60.0, 180.0);
    /// Initial AI shot cooldown range (frames)
    pub const INITIAL_COOLDOWN: (f32, f32) = (60.0, 120.0);
    /// AI shot cooldown range before difficulty scaling (frames)
    pub const REARM_COOLDOWN: (f32, f32) = (90.0, 150.0);

    /// Explosion starting radius
    pub const EXPLOSION_START_SIZE: f32 = 5.0;
    /// Explosion radius at full scale
    pub const EXPLOSION_MAX_SIZE: f32 = 40.0;
    /// Explosion radius growth per frame
    pub const EXPLOSION_GROWTH: f32 = 2.0;
    /// Explosion alpha lost per frame while fading
    pub const EXPLOSION_FADE: f32 = 10.0;
    /// Particles per full-scale explosion
    pub const EXPLOSION_PARTICLES: f32 = 10.0;
    /// Scale of explosions caused by bullets hitting terrain
    pub const IMPACT_EXPLOSION_SCALE: f32 = 0.5;
}

/// Normalize an angle in degrees to (-180, 180]
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation (degrees) that turns `from` onto `to`
#[inline]
pub fn angle_delta(from: f32, to: f32) -> f32 {
    normalize_degrees(to - from)
}

/// Unit vector for a heading in degrees
#[inline]
pub fn heading_vector(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Angle in degrees of the ray from `from` to `to`
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x).to_degrees()
}
