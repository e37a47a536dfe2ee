//! Star Sentinel - a vertical arcade space shooter
//!
//! Core modules:
//! - `sim`: Entity simulation (spawning, movement, collisions, difficulty)
//! - `game`: Top-level state machine gating the simulation
//! - `snapshot`: Read-only per-tick view for an external renderer
//! - `ui`: Menu cursors that turn navigation into discrete actions
//! - `highscores`: Plain-text high score persistence
//! - `settings`: User preferences
//! - `audio`: Sound trigger sink

pub mod audio;
pub mod game;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod ui;

pub use game::{Action, Game, GameConfig, GamePhase};
pub use highscores::{HighScoreFile, HighScoreStore, MemoryHighScores};
pub use settings::Settings;
pub use snapshot::Snapshot;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the native driver (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 1200.0;
    pub const FIELD_HEIGHT: f32 = 900.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 600.0;
    pub const PLAYER_START_Y: f32 = 750.0;
    pub const PLAYER_SPEED: f32 = 400.0;
    /// Degrees per second
    pub const PLAYER_ROTATION_SPEED: f32 = 150.0;
    pub const PLAYER_ATTACK_COOLDOWN: f32 = 0.2;
    pub const MAX_HEARTS: u8 = 10;
    pub const TRIPLE_SHOT_DURATION: f32 = 10.0;
    /// Side bullets of a triple shot fan out by this many degrees
    pub const TRIPLE_SHOT_SPREAD_DEG: f32 = 15.0;
    /// Player bullets leave slightly left of the ship's centre
    pub const PLAYER_MUZZLE_OFFSET: f32 = 12.5;
    /// Triple-shot side bullets leave a little further left
    pub const PLAYER_SIDE_MUZZLE_OFFSET: f32 = 15.0;

    /// Bullets
    pub const BULLET_SPEED: f32 = 500.0;

    /// Enemies
    pub const ENEMY_HP: i32 = 70;
    pub const ENEMY_SPEED: f32 = 50.0;
    pub const ENEMY_SWAY_AMPLITUDE: f32 = 100.0;
    pub const ENEMY_SWAY_FREQUENCY: f32 = 0.5;
    pub const ENEMY_SPAWN_Y: f32 = -50.0;
    pub const ENEMY_VARIANTS: u32 = 3;

    /// Boss
    pub const BOSS_SPEED: f32 = 75.0;
    pub const BOSS_DESCENT_SPEED: f32 = 50.0;
    pub const BOSS_CRUISE_Y: f32 = 150.0;
    pub const BOSS_ATTACK_INTERVAL: f32 = 1.25;
    pub const BOSS_SPREAD_DEG: f32 = 25.0;
    pub const FIRST_BOSS_SCORE: u64 = 500;
    pub const BOSS_SCORE_STEP: u64 = 600;

    /// Asteroids
    pub const ASTEROID_HP: i32 = 15;
    pub const ASTEROID_SPEED: f32 = 20.0;
    /// Degrees per second
    pub const ASTEROID_SPIN: f32 = 45.0;
    pub const ASTEROID_SPAWN_Y: f32 = -50.0;

    /// Powerups
    pub const POWERUP_SPEED: f32 = 100.0;
    pub const POWERUP_DROP_CHANCE: f32 = 0.5;
    pub const POWERUP_MESSAGE_DURATION: f32 = 2.0;
    pub const SCORE_BONUS_POINTS: u64 = 50;
    pub const HEAL_AMOUNT: u8 = 3;

    /// Explosions
    pub const EXPLOSION_FRAMES: u32 = 8;
    pub const EXPLOSION_FRAME_DURATION: f32 = 0.05;

    /// Spawn timers (seconds)
    pub const SPAWN_TIMER_MAX: f32 = 4.25;
    pub const ASTEROID_SPAWN_TIMER_MAX: f32 = 20.0;

    /// Damage and rewards
    pub const PLAYER_BULLET_DAMAGE: i32 = 10;
    pub const ASTEROID_BULLET_DAMAGE: i32 = 1;
    pub const RAM_HEART_LOSS: u8 = 5;
    pub const ENEMY_KILL_SCORE: u64 = 10;
    pub const ASTEROID_KILL_SCORE: u64 = 30;
    pub const BOSS_KILL_SCORE: u64 = 100;

    /// Game over screen animation (frames x seconds per frame)
    pub const GAME_OVER_FRAMES: u32 = 10;
    pub const GAME_OVER_FRAME_DURATION: f32 = 0.1;
}

/// Unit direction for a heading measured clockwise from "up" (screen space, y down)
#[inline]
pub fn heading_to_dir(angle_rad: f32) -> Vec2 {
    Vec2::new(angle_rad.sin(), -angle_rad.cos())
}

/// Unit direction fanned `angle_rad` away from straight down
#[inline]
pub fn downward_dir(angle_rad: f32) -> Vec2 {
    Vec2::new(angle_rad.sin(), angle_rad.cos())
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
