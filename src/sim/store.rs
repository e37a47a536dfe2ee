//! Entity ownership with removal-safe iteration
//!
//! Removal during a tick only marks an entity dead; slots keep their index
//! until [`EntityStore::compact`] runs once at the end of the tick. Indices
//! handed out during a resolution pass therefore never point at a reused slot,
//! and dead entities are skipped by every alive-only accessor.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{
    Asteroid, Boss, Bullet, Enemy, Entity, Explosion, ExplosionKind, Player, Powerup, PowerupKind,
    SpriteSizes,
};

/// Entity categories held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    Enemy,
    Boss,
    PlayerBullet,
    EnemyBullet,
    Asteroid,
    Powerup,
    Explosion,
}

/// Homogeneous collection of one entity category, in spawn order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool<T> {
    items: Vec<T>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Pool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new entity; returns its slot index for this tick
    pub fn add(&mut self, entity: T) -> usize {
        self.items.push(entity);
        self.items.len() - 1
    }

    /// Mark the entity at `index` dead. Returns false if it was already gone.
    pub fn remove_at(&mut self, index: usize) -> bool {
        match self.items.get_mut(index) {
            Some(e) if e.is_alive() => {
                e.kill();
                true
            }
            _ => false,
        }
    }

    /// Visit live entities in spawn order. Entities killed by `f` (or by an
    /// earlier visit) are not visited again.
    pub fn for_each_alive(&mut self, mut f: impl FnMut(usize, &mut T)) {
        for (i, e) in self.items.iter_mut().enumerate() {
            if e.is_alive() {
                f(i, e);
            }
        }
    }

    pub fn iter_alive(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|e| e.is_alive())
    }

    pub fn iter_alive_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut().filter(|e| e.is_alive())
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index).filter(|e| e.is_alive())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index).filter(|e| e.is_alive())
    }

    /// Number of slots including dead ones awaiting compaction
    pub fn slots(&self) -> usize {
        self.items.len()
    }

    pub fn alive_count(&self) -> usize {
        self.iter_alive().count()
    }

    pub fn is_empty(&self) -> bool {
        self.alive_count() == 0
    }

    /// Drop dead entities, preserving the order of the survivors
    pub fn compact(&mut self) {
        self.items.retain(|e| e.is_alive());
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Owns every entity of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    pub sizes: SpriteSizes,
    pub player: Player,
    /// At most one boss exists at any time
    pub boss: Option<Boss>,
    pub enemies: Pool<Enemy>,
    pub player_bullets: Pool<Bullet>,
    pub enemy_bullets: Pool<Bullet>,
    pub asteroids: Pool<Asteroid>,
    pub powerups: Pool<Powerup>,
    pub explosions: Pool<Explosion>,
}

impl EntityStore {
    pub fn new(sizes: SpriteSizes) -> Self {
        Self {
            sizes,
            player: Player::new(sizes.player),
            boss: None,
            enemies: Pool::new(),
            player_bullets: Pool::new(),
            enemy_bullets: Pool::new(),
            asteroids: Pool::new(),
            powerups: Pool::new(),
            explosions: Pool::new(),
        }
    }

    /// Clear every category and re-seed the player at the start position
    pub fn reset(&mut self) {
        self.clear();
        self.player = Player::new(self.sizes.player);
    }

    /// Drop all transient entities (the player is left untouched)
    pub fn clear(&mut self) {
        self.boss = None;
        self.enemies.clear();
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.asteroids.clear();
        self.powerups.clear();
        self.explosions.clear();
    }

    /// Place a boss in the empty slot. Returns false (and does nothing) if a
    /// boss is already active.
    pub fn spawn_boss(&mut self, boss: Boss) -> bool {
        if self.boss.is_some() {
            return false;
        }
        self.boss = Some(boss);
        true
    }

    pub fn has_boss(&self) -> bool {
        self.boss.is_some()
    }

    /// Mark an entity dead by category and slot. Player and boss are not
    /// index-addressed: the boss slot is cleared, the player cannot be removed.
    pub fn remove_at(&mut self, category: Category, index: usize) -> bool {
        match category {
            Category::Enemy => self.enemies.remove_at(index),
            Category::PlayerBullet => self.player_bullets.remove_at(index),
            Category::EnemyBullet => self.enemy_bullets.remove_at(index),
            Category::Asteroid => self.asteroids.remove_at(index),
            Category::Powerup => self.powerups.remove_at(index),
            Category::Explosion => self.explosions.remove_at(index),
            Category::Boss => self.boss.take().is_some(),
            Category::Player => false,
        }
    }

    /// Live entity count for a category
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Player => 1,
            Category::Boss => usize::from(self.boss.is_some()),
            Category::Enemy => self.enemies.alive_count(),
            Category::PlayerBullet => self.player_bullets.alive_count(),
            Category::EnemyBullet => self.enemy_bullets.alive_count(),
            Category::Asteroid => self.asteroids.alive_count(),
            Category::Powerup => self.powerups.alive_count(),
            Category::Explosion => self.explosions.alive_count(),
        }
    }

    /// Spawn helpers sized from the asset provider's boxes
    pub fn add_player_bullet(&mut self, pos: Vec2, dir: Vec2, speed: f32) -> usize {
        let size = self.sizes.player_bullet;
        self.player_bullets.add(Bullet::new(pos, size, dir, speed))
    }

    pub fn add_enemy_bullet(&mut self, pos: Vec2, dir: Vec2, speed: f32) -> usize {
        let size = self.sizes.enemy_bullet;
        self.enemy_bullets.add(Bullet::new(pos, size, dir, speed))
    }

    pub fn add_explosion(&mut self, pos: Vec2, kind: ExplosionKind) -> usize {
        let size = self.sizes.explosion;
        self.explosions.add(Explosion::new(pos, size, kind))
    }

    pub fn add_powerup(&mut self, pos: Vec2, kind: PowerupKind) -> usize {
        let size = self.sizes.powerup;
        self.powerups.add(Powerup::new(pos, size, kind))
    }

    /// Remove every dead slot; called once at the end of a tick
    pub fn compact(&mut self) {
        self.enemies.compact();
        self.player_bullets.compact();
        self.enemy_bullets.compact();
        self.asteroids.compact();
        self.powerups.compact();
        self.explosions.compact();
    }
}
