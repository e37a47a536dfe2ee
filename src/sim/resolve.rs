//! Per-tick collision resolution
//!
//! Steps run in a fixed order and each one sees the removals made by the
//! ones before it. A bullet is consumed by its first hit, so it can never
//! damage two targets in the same tick. Resolution stops as soon as the
//! player runs out of hearts; the caller owns the GAME_OVER transition.

use super::collision::{center_below_field, exited_bottom, exited_top, first_overlap, overlaps};
use super::rng::RandomSource;
use super::state::{Entity, ExplosionKind, GameEvent, PowerupKind, Session};
use super::store::EntityStore;
use crate::audio::SoundEffect;
use crate::consts::*;

/// Outcome of one resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Continue,
    /// Hearts reached zero; nothing after the fatal hit was processed
    PlayerDown,
}

/// Mutable world handed to each resolution step
pub struct Resolver<'a> {
    pub store: &'a mut EntityStore,
    pub session: &'a mut Session,
    pub rng: &'a mut dyn RandomSource,
    pub events: &'a mut Vec<GameEvent>,
}

impl Resolver<'_> {
    /// Run every step in order
    pub fn run(&mut self, dt: f32) -> Resolution {
        self.enemies_vs_player();
        if !self.store.player.is_alive() {
            return Resolution::PlayerDown;
        }
        self.enemies_leaving_field();
        self.asteroids_vs_player();
        if !self.store.player.is_alive() {
            return Resolution::PlayerDown;
        }
        self.asteroids_vs_player_bullets();
        self.boss_vs_player_bullets();
        self.boss_vs_player();
        if !self.store.player.is_alive() {
            return Resolution::PlayerDown;
        }
        self.player_bullets_vs_enemies();
        self.player_bullets_leaving_field();
        self.enemy_bullets_vs_player();
        if !self.store.player.is_alive() {
            return Resolution::PlayerDown;
        }
        self.enemy_bullets_leaving_field();
        self.advance_explosions(dt);
        self.powerups_vs_player();
        Resolution::Continue
    }

    fn shake(&mut self, amount: f32, duration: f32) {
        self.session.shake.shake(amount, duration);
        self.events.push(GameEvent::Shake { amount, duration });
    }

    fn player_hit(&mut self, hearts_lost: u8) {
        self.store.player.lose_hearts(hearts_lost);
        let hearts = self.store.player.hearts;
        log::debug!("Player hit (-{hearts_lost}), {hearts} hearts left");
        self.events.push(GameEvent::PlayerHit { hearts });
    }

    /// 1. Enemies ramming the player
    fn enemies_vs_player(&mut self) {
        let player_box = self.store.player.bounds();
        for i in 0..self.store.enemies.slots() {
            let Some(enemy) = self.store.enemies.get(i) else {
                continue;
            };
            if !overlaps(&player_box, &enemy.bounds()) {
                continue;
            }
            let pos = enemy.pos;
            self.store.enemies.remove_at(i);
            self.events.push(GameEvent::Sound(SoundEffect::Explosion));
            self.store.add_explosion(pos, ExplosionKind::Standard);
            self.shake(4.0, 0.3);
            self.player_hit(RAM_HEART_LOSS);
            if !self.store.player.is_alive() {
                return;
            }
        }
    }

    /// 2. Enemies that fell past the bottom edge
    fn enemies_leaving_field(&mut self) {
        self.store.enemies.for_each_alive(|_, enemy| {
            if center_below_field(enemy.pos.y) {
                enemy.kill();
            }
        });
    }

    /// 3. Asteroids ramming the player
    fn asteroids_vs_player(&mut self) {
        let player_box = self.store.player.bounds();
        for i in 0..self.store.asteroids.slots() {
            let Some(asteroid) = self.store.asteroids.get(i) else {
                continue;
            };
            if !overlaps(&player_box, &asteroid.bounds()) {
                continue;
            }
            let pos = asteroid.pos;
            self.store.asteroids.remove_at(i);
            self.events.push(GameEvent::Sound(SoundEffect::Explosion));
            self.store.add_explosion(pos, ExplosionKind::Standard);
            self.shake(4.0, 0.2);
            self.player_hit(RAM_HEART_LOSS);
            if !self.store.player.is_alive() {
                return;
            }
        }
    }

    /// 4. Player bullets chipping at asteroids
    fn asteroids_vs_player_bullets(&mut self) {
        for ai in 0..self.store.asteroids.slots() {
            let Some(asteroid) = self.store.asteroids.get(ai) else {
                continue;
            };
            let asteroid_box = asteroid.bounds();

            for bi in 0..self.store.player_bullets.slots() {
                let Some(bullet) = self.store.player_bullets.get(bi) else {
                    continue;
                };
                if !overlaps(&asteroid_box, &bullet.bounds()) {
                    continue;
                }
                self.store.player_bullets.remove_at(bi);
                let Some(asteroid) = self.store.asteroids.get_mut(ai) else {
                    break;
                };
                asteroid.take_damage(ASTEROID_BULLET_DAMAGE);
                let (pos, dead) = (asteroid.pos, asteroid.is_dead());
                self.store.add_explosion(pos, ExplosionKind::Standard);
                self.shake(4.0, 0.15);
                if dead {
                    break;
                }
            }

            let Some(asteroid) = self.store.asteroids.get(ai) else {
                continue;
            };
            let (pos, dead) = (asteroid.pos, asteroid.is_dead());
            if dead {
                self.store.asteroids.remove_at(ai);
                self.session.add_score(ASTEROID_KILL_SCORE);
                self.events.push(GameEvent::Sound(SoundEffect::Explosion));
                self.store.add_explosion(pos, ExplosionKind::Standard);
                self.events.push(GameEvent::AsteroidDestroyed { pos });
                log::debug!("Asteroid destroyed at ({:.0}, {:.0})", pos.x, pos.y);
            } else if center_below_field(pos.y) {
                self.store.asteroids.remove_at(ai);
            }
        }
    }

    /// 5. Player bullets against the boss
    fn boss_vs_player_bullets(&mut self) {
        let Some(boss_box) = self.store.boss.as_ref().map(|b| b.bounds()) else {
            return;
        };
        for bi in 0..self.store.player_bullets.slots() {
            let Some(bullet) = self.store.player_bullets.get(bi) else {
                continue;
            };
            if !overlaps(&boss_box, &bullet.bounds()) {
                continue;
            }
            let bullet_pos = bullet.pos;
            self.store.player_bullets.remove_at(bi);

            let Some(boss) = self.store.boss.as_mut() else {
                return;
            };
            boss.take_damage(PLAYER_BULLET_DAMAGE);
            let (boss_pos, alive) = (boss.pos, boss.is_alive());

            self.events.push(GameEvent::Sound(SoundEffect::BossHit));
            self.store.add_explosion(bullet_pos, ExplosionKind::Standard);
            self.shake(4.0, 0.1);

            if !alive {
                self.store.boss = None;
                self.session.add_score(BOSS_KILL_SCORE);
                self.session.add_enemy_defeated();
                self.store.add_explosion(boss_pos, ExplosionKind::Standard);
                self.shake(12.5, 0.5);
                self.store.add_powerup(boss_pos, PowerupKind::Heal);
                self.session.record_boss_defeat();
                log::info!(
                    "Boss defeated ({} total), next boss at {} points",
                    self.session.boss_count,
                    self.session.next_boss_score
                );
                self.events.push(GameEvent::BossDefeated {
                    boss_count: self.session.boss_count,
                });
                return;
            }
        }
    }

    /// 6. Boss body contact, one heart per tick
    fn boss_vs_player(&mut self) {
        let touching = self
            .store
            .boss
            .as_ref()
            .is_some_and(|boss| overlaps(&boss.bounds(), &self.store.player.bounds()));
        if touching {
            self.shake(10.0, 0.2);
            self.player_hit(1);
        }
    }

    /// 7. Player bullets against enemies; first match in spawn order wins
    fn player_bullets_vs_enemies(&mut self) {
        for bi in 0..self.store.player_bullets.slots() {
            let Some(bullet) = self.store.player_bullets.get(bi) else {
                continue;
            };
            let Some(ei) = first_overlap(&bullet.bounds(), &self.store.enemies) else {
                continue;
            };
            self.store.player_bullets.remove_at(bi);

            let Some(enemy) = self.store.enemies.get_mut(ei) else {
                continue;
            };
            enemy.take_damage(PLAYER_BULLET_DAMAGE);
            let (pos, dead) = (enemy.pos, enemy.is_dead());
            self.store.add_explosion(pos, ExplosionKind::Standard);

            if !dead {
                self.shake(4.0, 0.1);
                continue;
            }

            self.store.enemies.remove_at(ei);
            self.events.push(GameEvent::Sound(SoundEffect::Explosion));
            self.session.add_score(ENEMY_KILL_SCORE);
            self.session.add_enemy_defeated();
            self.events.push(GameEvent::EnemyDestroyed { pos });
            if self.rng.chance(POWERUP_DROP_CHANCE) {
                let kind = PowerupKind::ALL[self.rng.below(PowerupKind::ALL.len() as u32) as usize];
                self.store.add_powerup(pos, kind);
                log::debug!("{kind:?} powerup dropped");
                self.events.push(GameEvent::PowerupDropped { kind, pos });
            }
            self.shake(4.0, 0.2);
        }
    }

    /// 8. Player bullets past the top edge
    fn player_bullets_leaving_field(&mut self) {
        self.store.player_bullets.for_each_alive(|_, bullet| {
            if exited_top(&bullet.bounds()) {
                bullet.kill();
            }
        });
    }

    /// 9. Enemy and boss bullets hitting the player
    fn enemy_bullets_vs_player(&mut self) {
        let player_box = self.store.player.bounds();
        for i in 0..self.store.enemy_bullets.slots() {
            let Some(bullet) = self.store.enemy_bullets.get(i) else {
                continue;
            };
            if !overlaps(&player_box, &bullet.bounds()) {
                continue;
            }
            self.store.enemy_bullets.remove_at(i);
            let player_pos = self.store.player.pos;
            self.store.add_explosion(player_pos, ExplosionKind::Player);
            self.shake(4.0, 0.1);
            self.player_hit(1);
            if !self.store.player.is_alive() {
                return;
            }
        }
    }

    /// 10. Enemy bullets past the bottom edge
    fn enemy_bullets_leaving_field(&mut self) {
        self.store.enemy_bullets.for_each_alive(|_, bullet| {
            if exited_bottom(&bullet.bounds()) {
                bullet.kill();
            }
        });
    }

    /// 11. Explosion animations
    fn advance_explosions(&mut self, dt: f32) {
        self.store.explosions.for_each_alive(|_, explosion| {
            if explosion.advance(dt) {
                explosion.kill();
            }
        });
    }

    /// 12. Pickups
    fn powerups_vs_player(&mut self) {
        let player_box = self.store.player.bounds();
        for i in 0..self.store.powerups.slots() {
            let Some(powerup) = self.store.powerups.get(i) else {
                continue;
            };
            let bounds = powerup.bounds();
            let kind = powerup.kind;
            if overlaps(&player_box, &bounds) {
                self.store.powerups.remove_at(i);
                self.apply_powerup(kind);
            } else if exited_bottom(&bounds) {
                self.store.powerups.remove_at(i);
            }
        }
    }

    fn apply_powerup(&mut self, kind: PowerupKind) {
        match kind {
            PowerupKind::ScoreBonus => self.session.add_score(SCORE_BONUS_POINTS),
            PowerupKind::Heal => self.store.player.heal(HEAL_AMOUNT),
            PowerupKind::TripleShot => self.store.player.activate_triple_shot(TRIPLE_SHOT_DURATION),
        }
        self.session.show_powerup(kind);
        log::debug!("{kind:?} powerup collected");
        self.events.push(GameEvent::PowerupCollected { kind });
    }
}

/// Resolve every interaction for this tick
pub fn resolve(
    dt: f32,
    store: &mut EntityStore,
    session: &mut Session,
    rng: &mut dyn RandomSource,
    events: &mut Vec<GameEvent>,
) -> Resolution {
    Resolver {
        store,
        session,
        rng,
        events,
    }
    .run(dt)
}
