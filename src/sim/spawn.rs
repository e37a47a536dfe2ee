//! Spawn scheduling for enemies, asteroids and the boss

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::difficulty::{boss_stats, spawn_rate_multiplier};
use super::rng::RandomSource;
use super::state::{Asteroid, Boss, Enemy, GameEvent, Session};
use super::store::EntityStore;
use crate::consts::*;

/// What a spawn pass produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub enemy: bool,
    pub asteroid: bool,
    pub boss: bool,
}

/// Accumulates elapsed time and decides when new entities appear
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnDirector {
    pub spawn_timer: f32,
    pub asteroid_spawn_timer: f32,
    pub spawn_timer_max: f32,
    pub asteroid_spawn_timer_max: f32,
}

impl Default for SpawnDirector {
    fn default() -> Self {
        Self {
            spawn_timer: 0.0,
            asteroid_spawn_timer: 0.0,
            spawn_timer_max: SPAWN_TIMER_MAX,
            asteroid_spawn_timer_max: ASTEROID_SPAWN_TIMER_MAX,
        }
    }
}

impl SpawnDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.spawn_timer = 0.0;
        self.asteroid_spawn_timer = 0.0;
    }

    /// Current enemy spawn interval after difficulty scaling
    pub fn enemy_interval(&self, score: u64) -> f32 {
        self.spawn_timer_max / spawn_rate_multiplier(score)
    }

    /// Advance timers and spawn whatever is due this tick
    pub fn maybe_spawn(
        &mut self,
        dt: f32,
        session: &Session,
        store: &mut EntityStore,
        rng: &mut dyn RandomSource,
        events: &mut Vec<GameEvent>,
    ) -> SpawnReport {
        let mut report = SpawnReport::default();

        // Regular enemies hold off while a boss is on the field
        if !store.has_boss() {
            self.spawn_timer += dt;
            if self.spawn_timer >= self.enemy_interval(session.score) {
                self.spawn_timer = 0.0;
                self.spawn_enemy(store, rng);
                report.enemy = true;
            }
        }

        self.asteroid_spawn_timer += dt;
        if self.asteroid_spawn_timer >= self.asteroid_spawn_timer_max {
            self.asteroid_spawn_timer = 0.0;
            let x = rng.range(0.0, FIELD_WIDTH);
            let size = store.sizes.asteroid;
            store.asteroids.add(Asteroid::new(Vec2::new(x, ASTEROID_SPAWN_Y), size));
            log::debug!("Asteroid spawned at x={x:.0}");
            report.asteroid = true;
        }

        report.boss = self.try_spawn_boss(session, store, events);
        report
    }

    fn spawn_enemy(&self, store: &mut EntityStore, rng: &mut dyn RandomSource) {
        let size = store.sizes.enemy;
        let x = rng.range(0.0, (FIELD_WIDTH - size.x).max(0.0));
        let variant = rng.below(ENEMY_VARIANTS);
        // 2.0 to 5.9 seconds in tenths
        let shoot_cooldown = (rng.below(40) + 20) as f32 / 10.0;
        store
            .enemies
            .add(Enemy::new(Vec2::new(x, ENEMY_SPAWN_Y), size, shoot_cooldown, variant));
        log::debug!("Enemy spawned at x={x:.0} variant={variant} cooldown={shoot_cooldown:.1}s");
    }

    /// Spawn the boss once the score reaches the threshold and the slot is
    /// empty. The threshold itself only moves when a boss is defeated.
    pub fn try_spawn_boss(
        &self,
        session: &Session,
        store: &mut EntityStore,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if session.score < session.next_boss_score || store.has_boss() {
            return false;
        }
        let stats = boss_stats(session.boss_count);
        let size = store.sizes.boss;
        let pos = Vec2::new(FIELD_WIDTH / 2.0, -size.y / 2.0);
        if !store.spawn_boss(Boss::new(pos, size, stats.health, stats.bullet_speed)) {
            return false;
        }
        log::info!(
            "Boss #{} spawned (hp={}, bullet speed={})",
            session.boss_count + 1,
            stats.health,
            stats.bullet_speed
        );
        events.push(GameEvent::BossSpawned {
            health: stats.health,
            bullet_speed: stats.bullet_speed,
        });
        true
    }
}
