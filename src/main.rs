//! Star Sentinel headless driver
//!
//! Runs one autopiloted session through the fixed-timestep loop and prints a
//! summary. Rendering, windowing and real audio are host concerns; this binary
//! only logs what a host would draw and play.

use star_sentinel::audio::{AudioManager, LogSink};
use star_sentinel::consts::*;
use star_sentinel::sim::{Category, GameEvent, TickInput};
use star_sentinel::snapshot::Snapshot;
use star_sentinel::{Action, Game, GameConfig, GamePhase};

use glam::Vec2;

/// Host frame rate the driver pretends to render at
const FRAME_DT: f32 = 1.0 / 60.0;
/// Session length cap when the autopilot survives
const DEFAULT_SECONDS: f32 = 180.0;

fn main() {
    env_logger::init();
    log::info!("Star Sentinel (headless) starting...");

    let seconds = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| *s > 0.0)
        .unwrap_or(DEFAULT_SECONDS);

    let config = GameConfig::from_env();
    let mut game = Game::new(&config);
    let mut audio = AudioManager::new(Box::new(LogSink), game.settings());

    game.finish_loading();
    game.handle_action(Action::Start);

    let max_frames = (seconds / FRAME_DT) as u64;
    let mut accumulator = 0.0f32;
    for _ in 0..max_frames {
        let input = autopilot(&game.snapshot());

        accumulator += FRAME_DT.min(0.1);
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            game.tick(SIM_DT, &input);
            accumulator -= SIM_DT;
            substeps += 1;
        }

        let events = game.drain_events();
        report(&events);
        audio.dispatch(&events);

        if game.phase() == GamePhase::GameOver && game.game_over_ready() {
            game.handle_action(Action::Exit);
        }
        if game.exit_requested() {
            break;
        }
    }

    let snapshot = game.snapshot();
    match snapshot.to_json() {
        Ok(json) => log::debug!("Final snapshot: {json}"),
        Err(e) => log::warn!("Could not encode final snapshot: {e}"),
    }

    println!("Seed:             {}", config.seed);
    println!("Final phase:      {:?}", snapshot.phase);
    println!("Score:            {}", snapshot.score);
    println!("Hearts left:      {}/{}", snapshot.hearts, snapshot.max_hearts);
    println!("Enemies defeated: {}", snapshot.enemies_defeated);
    println!("Bosses defeated:  {}", snapshot.boss_count);
    println!("High score:       {}", snapshot.high_score);
}

fn report(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::BossSpawned { health, .. } => println!("Boss incoming ({health} hp)"),
            GameEvent::BossDefeated { boss_count } => println!("Boss #{boss_count} defeated"),
            GameEvent::GameOver { score, new_high_score } => {
                println!("Game over at {score}{}", if *new_high_score { " - new high score!" } else { "" });
            }
            _ => {}
        }
    }
}

/// Track the nearest target horizontally, sidestep incoming fire and keep
/// the ship facing up
fn autopilot(snapshot: &Snapshot) -> TickInput {
    if snapshot.phase != GamePhase::Playing || snapshot.paused {
        return TickInput::default();
    }
    let me = snapshot.player.pos;

    let target_x = snapshot
        .entities
        .iter()
        .filter(|e| matches!(e.category, Category::Enemy | Category::Boss | Category::Asteroid))
        .min_by(|a, b| a.pos.distance_squared(me).total_cmp(&b.pos.distance_squared(me)))
        .map(|e| e.pos.x + PLAYER_MUZZLE_OFFSET)
        .unwrap_or(FIELD_WIDTH / 2.0);

    let mut movement = Vec2::new((target_x - me.x).clamp(-1.0, 1.0), 0.0);

    let threat = snapshot.entities.iter().find(|e| {
        let incoming = matches!(e.category, Category::EnemyBullet | Category::Enemy | Category::Asteroid);
        incoming && (e.pos.x - me.x).abs() < 60.0 && e.pos.y < me.y && me.y - e.pos.y < 220.0
    });
    if let Some(threat) = threat {
        movement.x = if threat.pos.x > me.x { -1.0 } else { 1.0 };
    }

    let turn = (-snapshot.player.angle_deg / 10.0).clamp(-1.0, 1.0);
    TickInput::new(movement, turn)
}
