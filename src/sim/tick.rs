//! Per-frame director
//!
//! Advances the simulation one frame in a fixed phase order. Entities are
//! only removed in the reap phase, after every update for the frame has been
//! applied.

use glam::Vec2;

use super::ai::{AiContext, Enemy};
use super::control::{TickInput, apply_input};
use super::explosion::Explosion;
use super::grid::CellKind;
use super::projectile::ProjectileWorld;
use super::rng::RandomSource;
use super::state::{FrameReport, GameEvent, GamePhase, GameState};
use super::vehicle::Side;

/// Advance the game state by one frame
pub fn tick<R: RandomSource>(state: &mut GameState, input: &TickInput, rng: &mut R) -> FrameReport {
    let mut events = Vec::new();

    if state.phase == GamePhase::GameOver {
        // Let the final explosions play out
        advance_explosions(state);
        state.explosions.retain(|e| !e.finished);
        return report(state, events);
    }

    state.frame += 1;

    // AI sees the player where the previous frame left it
    let ai_ctx = AiContext {
        player_pos: state.player.pos,
        difficulty: state.difficulty,
    };

    apply_input(
        &mut state.player,
        input,
        &state.tuning,
        &mut state.projectiles,
        &mut events,
    );
    state.player.integrate(&state.grid);

    for enemy in &mut state.enemies {
        enemy.think(
            &ai_ctx,
            &state.tuning,
            &mut *rng,
            &mut state.projectiles,
            &mut events,
        );
        enemy.tank.integrate(&state.grid);
    }

    {
        let mut world = ProjectileWorld {
            grid: &mut state.grid,
            player: &mut state.player,
            enemies: &mut state.enemies,
            explosions: &mut state.explosions,
            events: &mut events,
            rng: &mut *rng,
        };
        for projectile in &mut state.projectiles {
            projectile.advance(&mut world);
        }
    }

    advance_explosions(state);
    reap(state, &mut events, rng);
    advance_spawn_cadence(state, rng);
    advance_difficulty(state);

    if !state.player.is_alive() {
        end_game(state, &mut events, rng);
    }

    report(state, events)
}

fn report(state: &GameState, events: Vec<GameEvent>) -> FrameReport {
    FrameReport {
        generation: state.generation,
        frame: state.frame,
        events,
    }
}

fn advance_explosions(state: &mut GameState) {
    for explosion in &mut state.explosions {
        explosion.update();
    }
}

/// Remove dead enemies, spent projectiles and finished effects
fn reap(state: &mut GameState, events: &mut Vec<GameEvent>, rng: &mut impl RandomSource) {
    let (dead, alive): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut state.enemies)
        .into_iter()
        .partition(|e| !e.tank.is_alive());
    state.enemies = alive;

    for enemy in dead {
        let score_delta = state.tuning.score_per_kill;
        state.score += score_delta;
        state.explosions.push(Explosion::new(enemy.tank.pos, 1.0, rng));
        events.push(GameEvent::EntityDestroyed {
            target: enemy.tank.id,
            side: Side::Enemy,
            score_delta,
        });
        log::debug!("Enemy {:?} destroyed, score {}", enemy.tank.id, state.score);
    }

    state.projectiles.retain(|p| !p.expired);
    state.explosions.retain(|e| !e.finished);
}

/// Count toward the next spawn; spawn once the interval is exceeded.
///
/// Returns whether an enemy was added this frame.
pub(crate) fn advance_spawn_cadence(state: &mut GameState, rng: &mut impl RandomSource) -> bool {
    state.spawn_timer += 1;
    if state.spawn_timer as f32 <= state.tuning.spawn_interval(state.difficulty) {
        return false;
    }
    state.spawn_timer = 0;
    spawn_enemy(state, rng)
}

/// Place a new enemy on an edge-adjacent cell, or skip if none is found
pub fn spawn_enemy(state: &mut GameState, rng: &mut impl RandomSource) -> bool {
    let Some(pos) = pick_spawn_point(state, rng) else {
        log::warn!(
            "No valid spawn point after {} attempts, skipping spawn",
            state.tuning.spawn_max_attempts
        );
        return false;
    };

    let id = state.next_entity_id();
    let enemy = Enemy::spawn(id, pos, state.difficulty, &state.tuning, rng);
    log::debug!("Spawned enemy {:?} at {:?} ({:?})", id, pos, enemy.brain.behavior);
    state.enemies.push(enemy);
    true
}

/// Rejection-sample a cell one ring in from the border walls that is empty
/// and far enough from the player. Returns the cell's corner.
fn pick_spawn_point(state: &GameState, rng: &mut impl RandomSource) -> Option<Vec2> {
    let t = &state.tuning;
    let near = 2.0;
    let far_x = (t.map_width - 3) as f32;
    let far_y = (t.map_height - 3) as f32;

    for _ in 0..t.spawn_max_attempts {
        let cell = if rng.chance(0.5) {
            // Top or bottom band
            let x = rng.index(2, t.map_width - 2) as f32;
            let y = if rng.chance(0.5) { near } else { far_y };
            Vec2::new(x, y)
        } else {
            // Left or right band
            let x = if rng.chance(0.5) { near } else { far_x };
            let y = rng.index(2, t.map_height - 2) as f32;
            Vec2::new(x, y)
        };
        let pos = cell * t.grid_size;

        if pos.distance(state.player.pos) > t.spawn_min_distance
            && state.grid.cell_at_point(pos) == CellKind::Empty
        {
            return Some(pos);
        }
    }
    None
}

/// Step the difficulty ramp. Returns whether difficulty went up this frame.
pub(crate) fn advance_difficulty(state: &mut GameState) -> bool {
    state.difficulty_timer += 1;
    if state.difficulty_timer < state.tuning.difficulty_interval {
        return false;
    }
    state.difficulty_timer = 0;

    let next = (state.difficulty + state.tuning.difficulty_step).min(state.tuning.max_difficulty);
    if next == state.difficulty {
        return false;
    }
    state.difficulty = next;
    log::info!("Difficulty raised to {:.1}", state.difficulty);
    true
}

fn end_game(state: &mut GameState, events: &mut Vec<GameEvent>, rng: &mut impl RandomSource) {
    state
        .explosions
        .push(Explosion::new(state.player.pos, 1.0, rng));
    events.push(GameEvent::EntityDestroyed {
        target: state.player.id,
        side: Side::Player,
        score_delta: 0,
    });
    events.push(GameEvent::GameOver {
        final_score: state.score,
    });
    state.phase = GamePhase::GameOver;
    log::info!("Game over at frame {} with score {}", state.frame, state.score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::grid::ArenaGrid;
    use crate::sim::projectile::Projectile;
    use crate::sim::rng::{ScriptedRng, seeded};

    /// Walled arena with no interior obstacles
    fn open_state(rng: &mut impl RandomSource) -> GameState {
        let mut state = GameState::new(Tuning::default(), rng);
        state.grid = ArenaGrid::walled(40, 30, 20.0);
        state
    }

    fn add_enemy(state: &mut GameState, pos: Vec2, rng: &mut impl RandomSource) -> crate::sim::EntityId {
        let id = state.next_entity_id();
        let mut enemy = Enemy::spawn(id, pos, state.difficulty, &state.tuning, rng);
        enemy.brain.shoot_cooldown = 10_000;
        state.enemies.push(enemy);
        id
    }

    #[test]
    fn test_tick_advances_frame_and_reports_generation() {
        let mut rng = seeded(1);
        let mut state = open_state(&mut rng);
        let report = tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(report.frame, 1);
        assert_eq!(report.generation, 0);
        assert_eq!(state.spawn_timer, 1);
        assert_eq!(state.difficulty_timer, 1);
    }

    #[test]
    fn test_spawn_when_timer_exceeds_interval() {
        let mut rng = seeded(5);
        let mut state = open_state(&mut rng);
        state.spawn_timer = 179;

        // Timer reaches 180: not yet past the interval
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.spawn_timer, 180);
        assert!(state.enemies.is_empty());

        // Timer reaches 181: exactly one spawn, timer back to 0
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.spawn_timer, 0);

        let enemy = &state.enemies[0];
        assert!(enemy.tank.pos.distance(state.player.pos) > 200.0);
        assert_eq!(enemy.tank.max_health, 40.0);
    }

    #[test]
    fn test_spawn_lands_on_empty_edge_band() {
        let mut rng = seeded(11);
        let mut state = GameState::new(Tuning::default(), &mut rng);
        for _ in 0..50 {
            assert!(spawn_enemy(&mut state, &mut rng));
        }
        for enemy in &state.enemies {
            let (cx, cy) = state.grid.cell_of(enemy.tank.pos);
            assert!(cx == 2 || cx == 37 || cy == 2 || cy == 27, "cell ({cx}, {cy})");
        }
    }

    #[test]
    fn test_spawn_skipped_when_no_cell_qualifies() {
        let tuning = Tuning {
            spawn_min_distance: 10_000.0,
            ..Default::default()
        };
        let mut rng = seeded(2);
        let mut state = GameState::new(tuning, &mut rng);
        state.spawn_timer = 180;
        let report = tick(&mut state, &TickInput::default(), &mut rng);
        assert!(state.enemies.is_empty());
        assert_eq!(state.spawn_timer, 0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_spawn_rejects_occupied_cells() {
        let mut rng = seeded(2);
        let mut state = open_state(&mut rng);
        state.grid.place(2, 2, CellKind::Destructible);
        // Each attempt rolls band, column, then top/bottom. The first lands on
        // the blocked cell (2, 2); the second picks the bottom row instead.
        // The trailing sample feeds the enemy's own rolls.
        let mut script = ScriptedRng::new(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.9, 0.5]);
        assert!(spawn_enemy(&mut state, &mut script));
        let (cx, cy) = state.grid.cell_of(state.enemies[0].tank.pos);
        assert_eq!((cx, cy), (2, 27));
    }

    #[test]
    fn test_difficulty_ramps_every_interval_to_cap() {
        let mut rng = seeded(1);
        let mut state = open_state(&mut rng);
        let mut levels = Vec::new();
        for _ in 0..(1800 * 10) {
            if advance_difficulty(&mut state) {
                levels.push(state.difficulty);
            }
        }
        assert_eq!(levels, vec![1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0]);
        assert_eq!(state.difficulty, 5.0);
    }

    #[test]
    fn test_difficulty_step_lands_on_frame_1800() {
        let mut rng = seeded(1);
        let mut state = open_state(&mut rng);
        state.difficulty_timer = 1798;
        assert!(!advance_difficulty(&mut state));
        assert!(advance_difficulty(&mut state));
        assert_eq!(state.difficulty, 1.5);
        assert_eq!(state.difficulty_timer, 0);
    }

    #[test]
    fn test_spawn_interval_decreases_with_difficulty() {
        let tuning = Tuning::default();
        let mut last = f32::INFINITY;
        let mut d = 1.0;
        while d <= tuning.max_difficulty {
            let interval = tuning.spawn_interval(d);
            assert!(interval < last);
            last = interval;
            d += tuning.difficulty_step;
        }
        assert_eq!(last, 36.0);
    }

    #[test]
    fn test_enemy_killed_in_same_frame_reap() {
        let mut rng = seeded(4);
        let mut state = open_state(&mut rng);
        let id = add_enemy(&mut state, Vec2::new(200.0, 100.0), &mut rng);
        state.enemies[0].tank.health = 15.0;
        state.enemies[0].tank.max_speed = 0.0;
        state.enemies[0].tank.speed = 0.0;

        let tuning = state.tuning.clone();
        state.projectiles.push(Projectile::new(
            Vec2::new(188.0, 100.0),
            0.0,
            Side::Player,
            &tuning,
        ));

        let report = tick(&mut state, &TickInput::default(), &mut rng);
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 10);
        assert!(state.projectiles.is_empty());

        let destroyed: Vec<_> = report
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EntityDestroyed { .. }))
            .collect();
        assert_eq!(destroyed.len(), 1);
        assert_eq!(
            destroyed[0],
            &GameEvent::EntityDestroyed {
                target: id,
                side: Side::Enemy,
                score_delta: 10
            }
        );
        // Death explosion queued for the renderer
        assert_eq!(state.explosions.len(), 1);
    }

    #[test]
    fn test_damaged_enemy_survives() {
        let mut rng = seeded(4);
        let mut state = open_state(&mut rng);
        add_enemy(&mut state, Vec2::new(200.0, 100.0), &mut rng);
        state.enemies[0].tank.max_speed = 0.0;
        let start = state.enemies[0].tank.health;

        let tuning = state.tuning.clone();
        state.projectiles.push(Projectile::new(
            Vec2::new(188.0, 100.0),
            0.0,
            Side::Player,
            &tuning,
        ));
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].tank.health, start - 15.0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut rng = seeded(8);
        let mut state = open_state(&mut rng);
        state.score = 70;
        state.player.health = 5.0;
        let target = state.player.pos;
        let tuning = state.tuning.clone();
        state.projectiles.push(Projectile::new(
            target - Vec2::new(6.0, 0.0),
            0.0,
            Side::Enemy,
            &tuning,
        ));

        let report = tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(report.events.contains(&GameEvent::GameOver { final_score: 70 }));
        assert!(report.events.contains(&GameEvent::EntityDestroyed {
            target: state.player.id,
            side: Side::Player,
            score_delta: 0,
        }));
        let frame = state.frame;

        // Later ticks only animate effects
        for _ in 0..100 {
            let report = tick(&mut state, &TickInput { fire: true, ..Default::default() }, &mut rng);
            assert!(report.events.is_empty());
        }
        assert_eq!(state.frame, frame);
        assert!(state.explosions.is_empty());
    }

    #[test]
    fn test_ai_reads_player_pose_from_previous_frame() {
        let mut rng = seeded(6);
        let mut state = open_state(&mut rng);
        add_enemy(&mut state, Vec2::new(100.0, 300.0), &mut rng);
        state.enemies[0].brain.behavior = crate::sim::Behavior::Chase;
        state.enemies[0].tank.heading = 0.0;
        state.player.heading = 90.0;
        let before = state.player.pos;

        tick(
            &mut state,
            &TickInput { forward: true, ..Default::default() },
            &mut rng,
        );
        assert!(state.player.pos.y > before.y);
        // Turret locked onto where the player started the frame (dead ahead)
        assert!(state.enemies[0].tank.turret_angle.abs() < 1e-4);
    }

    #[test]
    fn test_player_fire_spawns_and_advances_projectile() {
        let mut rng = seeded(3);
        let mut state = open_state(&mut rng);
        let aim = state.player.pos + Vec2::new(100.0, 0.0);
        let report = tick(
            &mut state,
            &TickInput { fire: true, aim_point: aim, ..Default::default() },
            &mut rng,
        );
        assert_eq!(state.projectiles.len(), 1);
        // Muzzle at +20, then one frame of travel
        let expected = state.player.pos + Vec2::new(26.0, 0.0);
        assert!((state.projectiles[0].pos - expected).length() < 1e-3);
        assert!(matches!(report.events[0], GameEvent::ShotFired { side: Side::Player, .. }));
    }

    #[test]
    fn test_long_run_keeps_invariants() {
        let mut rng = seeded(99);
        let mut state = GameState::new(Tuning::default(), &mut rng);
        let input = TickInput {
            fire: true,
            right: true,
            forward: true,
            aim_point: Vec2::new(100.0, 100.0),
            ..Default::default()
        };
        let mut game_overs = 0;
        for _ in 0..5000 {
            let report = tick(&mut state, &input, &mut rng);
            game_overs += report
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver { .. }))
                .count();

            assert!(state.grid.is_consistent());
            for v in std::iter::once(&state.player).chain(state.enemies.iter().map(|e| &e.tank)) {
                assert!(v.pos.x >= 15.0 && v.pos.x <= 785.0);
                assert!(v.pos.y >= 15.0 && v.pos.y <= 585.0);
            }
            assert!(state.enemies.iter().all(|e| e.tank.is_alive()));
            assert!(state.projectiles.iter().all(|p| !p.expired));
        }
        assert!(game_overs <= 1);
    }
}
