//! Tank Arena headless runner
//!
//! Plays a seeded session with a simple autopilot and prints the final
//! snapshot as JSON. Useful for soak testing and for checking tuning files.
//!
//! Usage: `tank-arena [seed] [frames] [tuning.json]`

use std::error::Error;

use glam::Vec2;
use tank_arena::Tuning;
use tank_arena::sim::{GameEvent, GamePhase, GameState, Session, TickInput};

const DEFAULT_FRAMES: u64 = 20_000;

fn main() -> Result<(), Box<dyn Error>> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => 0x7A4C,
    };
    let frames: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => DEFAULT_FRAMES,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    log::info!("Tank Arena (headless) starting: seed {seed}, {frames} frames");

    let mut session = Session::new(tuning, seed);
    let mut shots = 0u32;
    let mut kills = 0u32;

    for _ in 0..frames {
        let input = autopilot(session.state());
        let report = session.tick(&input);

        for event in &report.events {
            match event {
                GameEvent::ShotFired { .. } => shots += 1,
                GameEvent::EntityDestroyed { target, side, .. } => {
                    kills += 1;
                    log::debug!("Frame {}: {:?} {:?} destroyed", report.frame, side, target);
                }
                GameEvent::GameOver { final_score } => {
                    log::info!("Frame {}: game over, score {}", report.frame, final_score);
                }
                GameEvent::EntityDamaged { .. } => {}
            }
        }

        if session.state().phase == GamePhase::GameOver && session.state().explosions.is_empty() {
            break;
        }
    }

    let snapshot = session.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    log::info!(
        "Finished at frame {}: score {}, level {}, {} shots, {} vehicles destroyed",
        snapshot.frame,
        snapshot.score,
        snapshot.level,
        shots,
        kills
    );

    Ok(())
}

/// Circle the arena center and shoot at the closest enemy
fn autopilot(state: &GameState) -> TickInput {
    let player = &state.player;
    let target = state
        .enemies
        .iter()
        .map(|e| e.tank.pos)
        .min_by(|a, b| a.distance(player.pos).total_cmp(&b.distance(player.pos)));

    TickInput {
        forward: state.frame % 120 < 60,
        right: state.frame % 120 < 10,
        aim_point: target.unwrap_or(player.pos + Vec2::X),
        fire: target.is_some(),
        ..Default::default()
    }
}
