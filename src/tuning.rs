//! Data-driven game balance
//!
//! Every knob has a default that reproduces the classic arcade feel. A JSON
//! document may override any subset of them.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a [`Tuning`].
#[derive(Debug, Error)]
pub enum TuningError {
    /// The tuning file could not be read
    #[error("Failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    /// The tuning document is not valid JSON for [`Tuning`]
    #[error("Malformed tuning document: {0}")]
    Parse(#[from] serde_json::Error),
    /// A knob has a value the simulation cannot run with
    #[error("Invalid tuning value `{field}`: {reason}")]
    Invalid {
        /// Offending field name
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Result type for tuning operations.
pub type TuningResult<T> = Result<T, TuningError>;

/// Balance and geometry knobs for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    /// Cell edge length in arena units
    pub grid_size: f32,
    /// Arena width in cells
    pub map_width: u32,
    /// Arena height in cells
    pub map_height: u32,
    /// Random obstacle placement attempts per arena
    pub obstacle_attempts: u32,
    /// No obstacles are placed this close to the arena center
    pub spawn_clearance: f32,
    /// Chance an obstacle is a solid wall rather than destructible
    pub wall_chance: f32,

    // === Vehicles ===
    /// Vehicle hull edge length (square hull)
    pub vehicle_size: f32,
    pub player_health: f32,
    pub player_max_speed: f32,
    pub player_rotation_speed: f32,
    /// Enemy base speed; each enemy adds a random bonus in `[0, enemy_speed_jitter)`
    pub enemy_base_speed: f32,
    pub enemy_speed_jitter: f32,
    pub enemy_rotation_speed: f32,
    /// Enemy health is `enemy_base_health + enemy_health_per_difficulty * difficulty`
    pub enemy_base_health: f32,
    pub enemy_health_per_difficulty: f32,

    // === Projectiles ===
    pub projectile_speed: f32,
    pub projectile_size: f32,
    pub player_damage: f32,
    pub enemy_damage: f32,

    // === Director ===
    pub score_per_kill: u64,
    /// Frames between enemy spawns at difficulty 1
    pub base_spawn_interval: f32,
    /// Enemies never spawn closer than this to the player
    pub spawn_min_distance: f32,
    /// Rejection sampling attempts before a spawn is skipped
    pub spawn_max_attempts: u32,
    pub difficulty_step: f32,
    /// Frames between difficulty increases
    pub difficulty_interval: u32,
    pub max_difficulty: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            grid_size: 20.0,
            map_width: 40,
            map_height: 30,
            obstacle_attempts: 60,
            spawn_clearance: 100.0,
            wall_chance: 0.3,

            vehicle_size: 30.0,
            player_health: 100.0,
            player_max_speed: 2.5,
            player_rotation_speed: 3.0,
            enemy_base_speed: 1.0,
            enemy_speed_jitter: 0.5,
            enemy_rotation_speed: 2.0,
            enemy_base_health: 30.0,
            enemy_health_per_difficulty: 10.0,

            projectile_speed: 6.0,
            projectile_size: 5.0,
            player_damage: 15.0,
            enemy_damage: 10.0,

            score_per_kill: 10,
            base_spawn_interval: 180.0,
            spawn_min_distance: 200.0,
            spawn_max_attempts: 100,
            difficulty_step: 0.5,
            difficulty_interval: 1800,
            max_difficulty: 5.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> TuningResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> TuningResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Check every knob is usable
    pub fn validate(&self) -> TuningResult<()> {
        positive("grid_size", self.grid_size)?;
        positive("vehicle_size", self.vehicle_size)?;
        positive("player_health", self.player_health)?;
        positive("player_max_speed", self.player_max_speed)?;
        positive("enemy_base_speed", self.enemy_base_speed)?;
        positive("enemy_base_health", self.enemy_base_health)?;
        positive("projectile_speed", self.projectile_speed)?;
        positive("projectile_size", self.projectile_size)?;
        positive("base_spawn_interval", self.base_spawn_interval)?;
        positive("difficulty_step", self.difficulty_step)?;
        non_negative("enemy_speed_jitter", self.enemy_speed_jitter)?;
        non_negative("player_damage", self.player_damage)?;
        non_negative("enemy_damage", self.enemy_damage)?;
        non_negative("spawn_clearance", self.spawn_clearance)?;
        non_negative("spawn_min_distance", self.spawn_min_distance)?;
        probability("wall_chance", self.wall_chance)?;

        // Interior placement samples [2, dim - 2) and spawns use rows/columns 2 and dim - 3
        if self.map_width < 6 {
            return Err(invalid("map_width", format!("{} is below the minimum of 6 cells", self.map_width)));
        }
        if self.map_height < 6 {
            return Err(invalid("map_height", format!("{} is below the minimum of 6 cells", self.map_height)));
        }
        if self.max_difficulty < 1.0 {
            return Err(invalid("max_difficulty", format!("{} is below the starting difficulty of 1", self.max_difficulty)));
        }
        if self.spawn_max_attempts == 0 {
            return Err(invalid("spawn_max_attempts", "must allow at least one attempt".to_string()));
        }
        if self.difficulty_interval == 0 {
            return Err(invalid("difficulty_interval", "must be at least one frame".to_string()));
        }
        Ok(())
    }

    /// Arena width in arena units
    #[inline]
    pub fn arena_width(&self) -> f32 {
        self.map_width as f32 * self.grid_size
    }

    /// Arena height in arena units
    #[inline]
    pub fn arena_height(&self) -> f32 {
        self.map_height as f32 * self.grid_size
    }

    /// Arena center (player spawn point)
    pub fn arena_center(&self) -> Vec2 {
        Vec2::new(self.arena_width() / 2.0, self.arena_height() / 2.0)
    }

    /// Frames between enemy spawns at the given difficulty
    pub fn spawn_interval(&self, difficulty: f32) -> f32 {
        self.base_spawn_interval / difficulty
    }

    /// Starting health of an enemy spawned at the given difficulty
    pub fn enemy_health(&self, difficulty: f32) -> f32 {
        self.enemy_base_health + self.enemy_health_per_difficulty * difficulty
    }
}

fn invalid(field: &'static str, reason: String) -> TuningError {
    TuningError::Invalid { field, reason }
}

fn positive(field: &'static str, value: f32) -> TuningResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be a positive number")))
    }
}

fn non_negative(field: &'static str, value: f32) -> TuningResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must not be negative")))
    }
}

fn probability(field: &'static str, value: f32) -> TuningResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is not a probability")))
    }
}
