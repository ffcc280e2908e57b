//! Game state and the data handed to observers
//!
//! `GameState` owns every collection the director mutates. Renderers read a
//! [`Snapshot`]; audio, score and network layers consume [`GameEvent`]s.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::{Behavior, Enemy};
use super::explosion::Explosion;
use super::grid::{ArenaGrid, Obstacle};
use super::projectile::Projectile;
use super::rng::RandomSource;
use super::vehicle::{EntityId, Side, Vehicle};
use crate::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player destroyed; only effects keep animating
    GameOver,
}

/// Discrete notifications emitted during a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    ShotFired {
        by: EntityId,
        side: Side,
    },
    EntityDamaged {
        target: EntityId,
        side: Side,
        amount: f32,
    },
    EntityDestroyed {
        target: EntityId,
        side: Side,
        score_delta: u64,
    },
    GameOver {
        final_score: u64,
    },
}

/// Everything observers learn from one call to [`super::tick`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    /// Run this frame belongs to; bumped by [`GameState::reset`]
    pub generation: u32,
    /// Frame counter after the tick
    pub frame: u64,
    pub events: Vec<GameEvent>,
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Incremented on every reset
    pub generation: u32,
    /// Frames simulated in this run
    pub frame: u64,
    pub phase: GamePhase,
    pub score: u64,
    /// Spawn-rate and fire-rate multiplier, starts at 1
    pub difficulty: f32,
    /// Frames since the last enemy spawn
    pub spawn_timer: u32,
    /// Frames since the last difficulty increase
    pub difficulty_timer: u32,
    pub grid: ArenaGrid,
    pub player: Vehicle,
    /// Live enemies (spawn order)
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    /// Visual effects (not gameplay-affecting)
    pub explosions: Vec<Explosion>,
    next_id: u32,
}

impl GameState {
    /// Start a run: fresh arena, player at the center, no enemies
    pub fn new(tuning: Tuning, rng: &mut impl RandomSource) -> Self {
        let grid = ArenaGrid::generate(&tuning, rng);
        let player = Vehicle::player(EntityId(1), &tuning);
        Self {
            tuning,
            generation: 0,
            frame: 0,
            phase: GamePhase::Playing,
            score: 0,
            difficulty: 1.0,
            spawn_timer: 0,
            difficulty_timer: 0,
            grid,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            explosions: Vec::new(),
            next_id: 2,
        }
    }

    /// Throw away the current run and start over with a new arena.
    ///
    /// Only valid between ticks. Reports produced afterwards carry the new
    /// generation number.
    pub fn reset(&mut self, rng: &mut impl RandomSource) {
        let generation = self.generation.wrapping_add(1);
        let tuning = std::mem::take(&mut self.tuning);
        *self = Self::new(tuning, rng);
        self.generation = generation;
        log::info!("Reset simulation (generation {generation})");
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// HUD level (whole difficulty steps)
    pub fn level(&self) -> u32 {
        self.difficulty.floor() as u32
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.tank.id == id)
    }

    /// Read-only copy of everything a renderer needs
    pub fn snapshot(&self) -> Snapshot {
        let mut vehicles = Vec::with_capacity(self.enemies.len() + 1);
        vehicles.push(VehicleView::of(&self.player, None));
        vehicles.extend(
            self.enemies
                .iter()
                .map(|e| VehicleView::of(&e.tank, Some(e.brain.behavior))),
        );

        Snapshot {
            generation: self.generation,
            frame: self.frame,
            phase: self.phase,
            score: self.score,
            difficulty: self.difficulty,
            level: self.level(),
            vehicles,
            projectiles: self
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    pos: p.pos,
                    angle: p.angle,
                    owner: p.owner,
                })
                .collect(),
            explosions: self.explosions.clone(),
            grid_size: self.grid.cell_size(),
            obstacles: self.grid.obstacles().to_vec(),
        }
    }
}

/// Pose and status of one tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleView {
    pub id: EntityId,
    pub side: Side,
    pub pos: Vec2,
    pub heading: f32,
    pub turret_angle: f32,
    pub health: f32,
    pub max_health: f32,
    /// AI mode, `None` for the player
    pub behavior: Option<Behavior>,
}

impl VehicleView {
    fn of(v: &Vehicle, behavior: Option<Behavior>) -> Self {
        Self {
            id: v.id,
            side: v.side,
            pos: v.pos,
            heading: v.heading,
            turret_angle: v.turret_angle,
            health: v.health,
            max_health: v.max_health,
            behavior,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub angle: f32,
    pub owner: Side,
}

/// Frame-consistent view of the simulation for renderers and HUDs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub generation: u32,
    pub frame: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub difficulty: f32,
    pub level: u32,
    /// Player first, then enemies in spawn order
    pub vehicles: Vec<VehicleView>,
    pub projectiles: Vec<ProjectileView>,
    pub explosions: Vec<Explosion>,
    pub grid_size: f32,
    pub obstacles: Vec<Obstacle>,
}
