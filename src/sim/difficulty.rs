//! Score-driven difficulty scaling
//!
//! Pure functions of integer inputs so results are reproducible bit-for-bit.

use serde::{Deserialize, Serialize};

/// Spawn rate grows by this much per 100 points
const MULTIPLIER_STEP: f32 = 0.2;
/// Spawn rate never exceeds this multiple of the base rate
const MULTIPLIER_CAP: f32 = 2.2;

const BOSS_BASE_HEALTH: i32 = 250;
const BOSS_HEALTH_PER_DEFEAT: i32 = 100;
const BOSS_BASE_BULLET_SPEED: f32 = 300.0;
const BOSS_BULLET_SPEED_PER_DEFEAT: f32 = 30.0;
/// Bullet speed stops scaling after this many defeated bosses
const BOSS_SPEED_SCALING_CAP: u32 = 5;

/// Stats for the next boss to spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossStats {
    pub health: i32,
    pub bullet_speed: f32,
}

/// Factor dividing the base enemy spawn interval (higher = more frequent)
pub fn spawn_rate_multiplier(score: u64) -> f32 {
    let steps = (score / 100) as f32;
    (1.0 + steps * MULTIPLIER_STEP).min(MULTIPLIER_CAP)
}

/// Health and bullet speed of a boss given how many were defeated before it
pub fn boss_stats(boss_count: u32) -> BossStats {
    let health = BOSS_BASE_HEALTH.saturating_add((boss_count as i32).saturating_mul(BOSS_HEALTH_PER_DEFEAT));
    let speed_steps = boss_count.min(BOSS_SPEED_SCALING_CAP) as f32;
    BossStats {
        health,
        bullet_speed: BOSS_BASE_BULLET_SPEED + speed_steps * BOSS_BULLET_SPEED_PER_DEFEAT,
    }
}
