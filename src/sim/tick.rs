//! One frame of active gameplay
//!
//! Order within a frame: HUD timers, player steering and auto-fire, spawning,
//! movement of every other entity, collision resolution, then compaction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::resolve::{Resolution, resolve};
use super::rng::RandomSource;
use super::spawn::SpawnDirector;
use super::state::{GameEvent, Session, SpriteSizes};
use super::store::EntityStore;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::downward_dir;

/// Continuous controls sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Desired movement direction; normalized by the player update
    pub movement: Vec2,
    /// Rotation request, -1 (counter-clockwise) to 1 (clockwise)
    pub turn: f32,
}

impl TickInput {
    pub fn new(movement: Vec2, turn: f32) -> Self {
        Self { movement, turn }
    }
}

/// Everything a running session mutates each frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub store: EntityStore,
    pub session: Session,
    pub director: SpawnDirector,
}

impl World {
    pub fn new(sizes: SpriteSizes) -> Self {
        Self {
            store: EntityStore::new(sizes),
            session: Session::new(),
            director: SpawnDirector::new(),
        }
    }

    /// Fresh session: full hearts, zero score, empty field
    pub fn reset(&mut self) {
        self.store.reset();
        self.session = Session::new();
        self.director.reset();
    }
}

/// Advance the world by `dt` seconds
pub fn tick(
    world: &mut World,
    input: &TickInput,
    dt: f32,
    rng: &mut dyn RandomSource,
    events: &mut Vec<GameEvent>,
) -> Resolution {
    world.session.update(dt);

    let player = &mut world.store.player;
    player.update(dt, input.movement, input.turn);
    if player.can_attack() {
        player.reset_attack_timer();
        for (muzzle, dir) in player.volley() {
            world.store.add_player_bullet(muzzle, dir, BULLET_SPEED);
        }
        events.push(GameEvent::Sound(SoundEffect::Shoot));
    }

    world
        .director
        .maybe_spawn(dt, &world.session, &mut world.store, rng, events);

    advance_entities(&mut world.store, dt);

    let resolution = resolve(dt, &mut world.store, &mut world.session, rng, events);
    world.store.compact();
    resolution
}

/// Move everything except the player; enemies and the boss fire here
fn advance_entities(store: &mut EntityStore, dt: f32) {
    let mut shots: Vec<(Vec2, Vec2, f32)> = Vec::new();

    for enemy in store.enemies.iter_alive_mut() {
        if enemy.advance(dt) {
            shots.push((enemy.pos, downward_dir(0.0), BULLET_SPEED));
        }
    }
    if let Some(boss) = store.boss.as_mut() {
        if boss.advance(dt) {
            let muzzle = boss.muzzle();
            for dir in boss.volley_dirs() {
                shots.push((muzzle, dir, boss.bullet_speed));
            }
        }
    }
    for (pos, dir, speed) in shots {
        store.add_enemy_bullet(pos, dir, speed);
    }

    for asteroid in store.asteroids.iter_alive_mut() {
        asteroid.advance(dt);
    }
    for bullet in store.player_bullets.iter_alive_mut() {
        bullet.advance(dt);
    }
    for bullet in store.enemy_bullets.iter_alive_mut() {
        bullet.advance(dt);
    }
    for powerup in store.powerups.iter_alive_mut() {
        powerup.advance(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{ScriptedRng, SimRng};
    use crate::sim::state::{Boss, Enemy};

    fn run(world: &mut World, input: &TickInput, dt: f32, steps: usize) -> Vec<GameEvent> {
        let mut rng = ScriptedRng::constant(0.9);
        let mut events = Vec::new();
        for _ in 0..steps {
            tick(world, input, dt, &mut rng, &mut events);
        }
        events
    }

    #[test]
    fn test_auto_fire_cadence() {
        let mut world = World::new(SpriteSizes::default());
        // 1 second of 1/16s steps: first volley immediately, then every fourth step
        let events = run(&mut world, &TickInput::default(), 0.0625, 16);
        let shots = events
            .iter()
            .filter(|e| **e == GameEvent::Sound(SoundEffect::Shoot))
            .count();
        assert_eq!(shots, 4);
        assert_eq!(world.store.player_bullets.alive_count(), shots);
    }

    #[test]
    fn test_triple_shot_fires_three() {
        let mut world = World::new(SpriteSizes::default());
        world.store.player.activate_triple_shot(TRIPLE_SHOT_DURATION);
        run(&mut world, &TickInput::default(), 0.01, 1);
        assert_eq!(world.store.player_bullets.alive_count(), 3);
    }

    #[test]
    fn test_player_moves_and_turns() {
        let mut world = World::new(SpriteSizes::default());
        let input = TickInput::new(Vec2::new(-1.0, 0.0), 1.0);
        run(&mut world, &input, 0.1, 5);
        let p = &world.store.player;
        assert!((p.pos.x - (PLAYER_START_X - PLAYER_SPEED * 0.5)).abs() < 1e-2);
        assert!((p.angle - 75f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn test_enemy_fires_downward() {
        let mut world = World::new(SpriteSizes::default());
        let size = world.store.sizes.enemy;
        world
            .store
            .enemies
            .add(Enemy::new(Vec2::new(200.0, 100.0), size, 0.5, 0));
        run(&mut world, &TickInput::default(), 0.25, 2);
        let bullets: Vec<_> = world.store.enemy_bullets.iter_alive().collect();
        assert_eq!(bullets.len(), 1);
        assert!(bullets[0].dir.x.abs() < 1e-6);
        assert!(bullets[0].dir.y > 0.99);
    }

    #[test]
    fn test_boss_volley_uses_scaled_speed() {
        let mut world = World::new(SpriteSizes::default());
        let size = world.store.sizes.boss;
        world
            .store
            .spawn_boss(Boss::new(Vec2::new(600.0, 150.0), size, 250, 360.0));
        world.session.next_boss_score = u64::MAX;
        run(&mut world, &TickInput::default(), 0.25, 5);
        let speeds: Vec<f32> = world.store.enemy_bullets.iter_alive().map(|b| b.speed).collect();
        assert_eq!(speeds, vec![360.0; 3]);
    }

    #[test]
    fn test_player_bullets_leave_through_top() {
        let mut world = World::new(SpriteSizes::default());
        let mut rng = ScriptedRng::constant(0.9);
        let mut events = Vec::new();
        tick(&mut world, &TickInput::default(), 0.05, &mut rng, &mut events);
        assert_eq!(world.store.player_bullets.alive_count(), 1);

        // 750px at 500px/s takes 1.5s; keep the cannon cold for 2s
        for _ in 0..40 {
            world.store.player.reset_attack_timer();
            tick(&mut world, &TickInput::default(), 0.05, &mut rng, &mut events);
        }
        assert!(world.store.player_bullets.is_empty());
        assert_eq!(world.store.player_bullets.slots(), 0);
    }

    #[test]
    fn test_determinism() {
        let mut world1 = World::new(SpriteSizes::default());
        let mut world2 = World::new(SpriteSizes::default());
        let mut rng1 = SimRng::new(99999);
        let mut rng2 = SimRng::new(99999);
        let mut events1 = Vec::new();
        let mut events2 = Vec::new();

        let inputs = [
            TickInput::new(Vec2::new(1.0, 0.0), 0.0),
            TickInput::new(Vec2::ZERO, -1.0),
            TickInput::new(Vec2::new(-1.0, -1.0), 0.5),
            TickInput::default(),
        ];
        for step in 0..4000 {
            let input = &inputs[step % inputs.len()];
            tick(&mut world1, input, SIM_DT, &mut rng1, &mut events1);
            tick(&mut world2, input, SIM_DT, &mut rng2, &mut events2);
        }

        assert_eq!(events1, events2);
        assert_eq!(world1.session.score, world2.session.score);
        assert_eq!(world1.store.enemies.alive_count(), world2.store.enemies.alive_count());
        assert_eq!(world1.store.player.pos, world2.store.player.pos);
    }

    #[test]
    fn test_reset_restores_fresh_session() {
        let mut world = World::new(SpriteSizes::default());
        world.session.score = 700;
        world.store.player.lose_hearts(9);
        world.director.spawn_timer = 3.0;
        world.reset();
        assert_eq!(world.session.score, 0);
        assert_eq!(world.session.next_boss_score, FIRST_BOSS_SCORE);
        assert_eq!(world.store.player.hearts, MAX_HEARTS);
        assert_eq!(world.director.spawn_timer, 0.0);
    }
}
