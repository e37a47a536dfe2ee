//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Randomness only through [`RandomSource`]
//! - Stable iteration order (spawn order)
//! - No rendering, audio backend or platform dependencies

pub mod aabb;
pub mod collision;
pub mod difficulty;
pub mod resolve;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod store;
pub mod tick;

pub use aabb::Aabb;
pub use difficulty::{BossStats, boss_stats, spawn_rate_multiplier};
pub use resolve::{Resolution, resolve};
pub use rng::{RandomSource, ScriptedRng, SimRng};
pub use spawn::{SpawnDirector, SpawnReport};
pub use state::{
    Asteroid, Boss, Bullet, Enemy, Entity, Explosion, ExplosionKind, GameEvent, GamePhase, Player,
    Powerup, PowerupKind, PowerupMessage, ScreenShake, Session, SpriteSizes,
};
pub use store::{Category, EntityStore, Pool};
pub use tick::{TickInput, World, tick};
