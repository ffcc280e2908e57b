//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to [`tick`] is one frame)
//! - Randomness only through an injected [`RandomSource`]
//! - Stable iteration order (spawn order for enemies and projectiles)
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod control;
pub mod explosion;
pub mod grid;
pub mod projectile;
pub mod rng;
pub mod session;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use ai::{AiBrain, AiContext, Behavior, Enemy};
pub use control::{TickInput, apply_input};
pub use explosion::{Explosion, ExplosionStage, Particle};
pub use grid::{ArenaGrid, CellKind, Obstacle};
pub use projectile::{Projectile, ProjectileWorld};
pub use rng::{RandomSource, ScriptedRng, seeded};
pub use session::Session;
pub use state::{
    FrameReport, GameEvent, GamePhase, GameState, ProjectileView, Snapshot, VehicleView,
};
pub use tick::{spawn_enemy, tick};
pub use vehicle::{EntityId, Side, Vehicle};
