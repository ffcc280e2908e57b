//! Bullets: straight-line travel, terrain hits and vehicle hits

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::Enemy;
use super::explosion::Explosion;
use super::grid::{ArenaGrid, CellKind};
use super::rng::RandomSource;
use super::state::GameEvent;
use super::vehicle::{Side, Vehicle};
use crate::Tuning;
use crate::consts::IMPACT_EXPLOSION_SCALE;
use crate::heading_vector;

/// A bullet in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Travel direction (degrees)
    pub angle: f32,
    pub speed: f32,
    /// Diameter used for hit tests
    pub size: f32,
    pub owner: Side,
    pub damage: f32,
    pub expired: bool,
}

/// Everything a projectile may touch while advancing
pub struct ProjectileWorld<'a, R: RandomSource> {
    pub grid: &'a mut ArenaGrid,
    pub player: &'a mut Vehicle,
    pub enemies: &'a mut [Enemy],
    pub explosions: &'a mut Vec<Explosion>,
    pub events: &'a mut Vec<GameEvent>,
    pub rng: &'a mut R,
}

impl Projectile {
    pub fn new(pos: Vec2, angle: f32, owner: Side, tuning: &Tuning) -> Self {
        let damage = match owner {
            Side::Player => tuning.player_damage,
            Side::Enemy => tuning.enemy_damage,
        };
        Self {
            pos,
            angle,
            speed: tuning.projectile_speed,
            size: tuning.projectile_size,
            owner,
            damage,
            expired: false,
        }
    }

    /// Move one frame and resolve at most one hit.
    ///
    /// Order: arena bounds, then terrain, then vehicles. A projectile that
    /// hits terrain never tests vehicles on the same frame.
    pub fn advance<R: RandomSource>(&mut self, world: &mut ProjectileWorld<'_, R>) {
        if self.expired {
            return;
        }
        self.pos += heading_vector(self.angle) * self.speed;

        let width = world.grid.width() as f32 * world.grid.cell_size();
        let height = world.grid.height() as f32 * world.grid.cell_size();
        if self.pos.x < 0.0 || self.pos.x > width || self.pos.y < 0.0 || self.pos.y > height {
            self.expired = true;
            return;
        }

        if self.hit_terrain(world) {
            return;
        }

        match self.owner {
            Side::Player => self.hit_enemies(&mut *world.enemies, &mut *world.events),
            Side::Enemy => self.hit_player(&mut *world.player, &mut *world.events),
        }
    }

    fn hit_terrain<R: RandomSource>(&mut self, world: &mut ProjectileWorld<'_, R>) -> bool {
        let (cx, cy) = world.grid.cell_of(self.pos);
        let kind = world.grid.cell_at(cx, cy);
        if !kind.is_solid() {
            return false;
        }

        self.expired = true;
        if kind == CellKind::Destructible {
            world.grid.destroy(cx, cy);
            world
                .explosions
                .push(Explosion::new(self.pos, IMPACT_EXPLOSION_SCALE, &mut *world.rng));
        }
        true
    }

    /// First enemy in list order within reach takes the hit
    fn hit_enemies(&mut self, enemies: &mut [Enemy], events: &mut Vec<GameEvent>) {
        let reach = self.size / 2.0;
        if let Some(enemy) = enemies
            .iter_mut()
            .find(|e| self.pos.distance(e.tank.pos) < e.tank.half_extent + reach)
        {
            enemy.tank.take_damage(self.damage, events);
            self.expired = true;
        }
    }

    fn hit_player(&mut self, player: &mut Vehicle, events: &mut Vec<GameEvent>) {
        if self.pos.distance(player.pos) < player.half_extent + self.size / 2.0 {
            player.take_damage(self.damage, events);
            self.expired = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ai::Enemy;
    use crate::sim::rng::ScriptedRng;
    use crate::sim::vehicle::EntityId;

    struct Fixture {
        grid: ArenaGrid,
        player: Vehicle,
        enemies: Vec<Enemy>,
        explosions: Vec<Explosion>,
        events: Vec<GameEvent>,
        rng: ScriptedRng,
    }

    impl Fixture {
        fn new() -> Self {
            let tuning = Tuning::default();
            Self {
                grid: ArenaGrid::walled(40, 30, 20.0),
                player: Vehicle::player(EntityId(1), &tuning),
                enemies: Vec::new(),
                explosions: Vec::new(),
                events: Vec::new(),
                rng: ScriptedRng::constant(0.5),
            }
        }

        fn advance(&mut self, p: &mut Projectile) {
            let mut world = ProjectileWorld {
                grid: &mut self.grid,
                player: &mut self.player,
                enemies: &mut self.enemies,
                explosions: &mut self.explosions,
                events: &mut self.events,
                rng: &mut self.rng,
            };
            p.advance(&mut world);
        }

        fn add_enemy(&mut self, id: u32, pos: Vec2) {
            let tuning = Tuning::default();
            let mut rng = ScriptedRng::constant(0.5);
            self.enemies
                .push(Enemy::spawn(EntityId(id), pos, 1.0, &tuning, &mut rng));
        }
    }

    fn bullet(x: f32, y: f32, angle: f32, owner: Side) -> Projectile {
        Projectile::new(Vec2::new(x, y), angle, owner, &Tuning::default())
    }

    #[test]
    fn test_damage_by_owner() {
        assert_eq!(bullet(0.0, 0.0, 0.0, Side::Player).damage, 15.0);
        assert_eq!(bullet(0.0, 0.0, 0.0, Side::Enemy).damage, 10.0);
    }

    #[test]
    fn test_leaving_arena_expires() {
        let mut fx = Fixture::new();
        let mut p = bullet(797.0, 100.0, 0.0, Side::Player);
        fx.advance(&mut p);
        assert!(p.expired);
        assert!(fx.explosions.is_empty());
    }

    #[test]
    fn test_wall_hit_expires_without_destroying() {
        let mut fx = Fixture::new();
        fx.grid.place(10, 10, CellKind::Wall);
        let before = fx.grid.obstacles().len();
        let mut p = bullet(196.0, 210.0, 0.0, Side::Enemy);
        fx.advance(&mut p);
        assert!(p.expired);
        assert_eq!(fx.grid.cell_at(10, 10), CellKind::Wall);
        assert_eq!(fx.grid.obstacles().len(), before);
    }

    #[test]
    fn test_destructible_hit_clears_cell_once() {
        let mut fx = Fixture::new();
        fx.grid.place(10, 10, CellKind::Destructible);
        let before = fx.grid.obstacles().len();

        let mut first = bullet(196.0, 210.0, 0.0, Side::Player);
        fx.advance(&mut first);
        assert!(first.expired);
        assert_eq!(fx.grid.cell_at(10, 10), CellKind::Empty);
        assert_eq!(fx.grid.obstacles().len(), before - 1);
        assert_eq!(fx.explosions.len(), 1);
        assert!(fx.grid.is_consistent());

        let mut second = bullet(196.0, 210.0, 0.0, Side::Player);
        fx.advance(&mut second);
        assert!(!second.expired);
        assert_eq!(fx.grid.obstacles().len(), before - 1);
    }

    #[test]
    fn test_player_bullet_hits_first_enemy_only() {
        let mut fx = Fixture::new();
        fx.add_enemy(2, Vec2::new(208.0, 100.0));
        fx.add_enemy(3, Vec2::new(206.0, 100.0));
        let start = fx.enemies[0].tank.health;

        let mut p = bullet(194.0, 100.0, 0.0, Side::Player);
        fx.advance(&mut p);
        assert!(p.expired);
        // List order wins even though enemy 3 is closer
        assert_eq!(fx.enemies[0].tank.health, start - 15.0);
        assert_eq!(fx.enemies[1].tank.health, start);
        assert_eq!(fx.player.health, 100.0);
        assert_eq!(fx.events.len(), 1);
    }

    #[test]
    fn test_player_bullet_ignores_player() {
        let mut fx = Fixture::new();
        let pos = fx.player.pos;
        let mut p = bullet(pos.x - 6.0, pos.y, 0.0, Side::Player);
        fx.advance(&mut p);
        assert!(!p.expired);
        assert_eq!(fx.player.health, 100.0);
    }

    #[test]
    fn test_enemy_bullet_hits_player_not_enemies() {
        let mut fx = Fixture::new();
        let pos = fx.player.pos;
        fx.add_enemy(2, pos);
        let enemy_start = fx.enemies[0].tank.health;

        let mut p = bullet(pos.x - 6.0, pos.y, 0.0, Side::Enemy);
        fx.advance(&mut p);
        assert!(p.expired);
        assert_eq!(fx.player.health, 90.0);
        assert_eq!(fx.enemies[0].tank.health, enemy_start);
    }

    #[test]
    fn test_hit_radius_is_strict() {
        let mut fx = Fixture::new();
        // Distance after moving 6 units is exactly 15 + 2.5
        fx.add_enemy(2, Vec2::new(217.5, 100.0));
        let mut p = bullet(194.0, 100.0, 0.0, Side::Player);
        fx.advance(&mut p);
        assert!(!p.expired);
    }
}
