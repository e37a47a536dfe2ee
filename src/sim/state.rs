//! Entity types and per-session bookkeeping
//!
//! Positions are sprite centres in field space (origin top-left, y down).
//! Bounding boxes come from the centre plus the sprite size handed in by the
//! asset provider through [`SpriteSizes`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::audio::{MusicCue, SoundEffect};
use crate::consts::*;
use crate::{downward_dir, heading_to_dir, normalize_angle};

/// Top-level phase of the game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// One-time asset setup
    Loading,
    Menu,
    Options,
    /// Active gameplay (pause is a flag on the state machine)
    Playing,
    HighScore,
    GameOver,
}

/// Anything that occupies a box on the field and can be removed
pub trait Entity {
    fn bounds(&self) -> Aabb;
    fn is_alive(&self) -> bool;
    fn kill(&mut self);
}

/// Bounding-box sizes per category, supplied by the asset provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteSizes {
    pub player: Vec2,
    pub enemy: Vec2,
    pub boss: Vec2,
    pub player_bullet: Vec2,
    pub enemy_bullet: Vec2,
    pub asteroid: Vec2,
    pub powerup: Vec2,
    pub explosion: Vec2,
}

impl Default for SpriteSizes {
    fn default() -> Self {
        Self {
            player: Vec2::new(64.0, 64.0),
            enemy: Vec2::new(80.0, 80.0),
            boss: Vec2::new(200.0, 160.0),
            player_bullet: Vec2::new(10.0, 24.0),
            enemy_bullet: Vec2::new(10.0, 24.0),
            asteroid: Vec2::new(72.0, 72.0),
            powerup: Vec2::new(40.0, 40.0),
            explosion: Vec2::new(64.0, 64.0),
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Facing in radians, clockwise from straight up
    pub angle: f32,
    pub hearts: u8,
    pub max_hearts: u8,
    /// Time since the last volley, capped at the cooldown
    pub attack_timer: f32,
    /// Remaining triple-shot time (seconds)
    pub triple_shot_timer: f32,
}

impl Player {
    /// Fresh ship at the canonical start position, ready to fire
    pub fn new(size: Vec2) -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            size,
            angle: 0.0,
            hearts: MAX_HEARTS,
            max_hearts: MAX_HEARTS,
            attack_timer: PLAYER_ATTACK_COOLDOWN,
            triple_shot_timer: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hearts > 0
    }

    pub fn lose_hearts(&mut self, n: u8) {
        self.hearts = self.hearts.saturating_sub(n);
    }

    pub fn heal(&mut self, n: u8) {
        self.hearts = self.hearts.saturating_add(n).min(self.max_hearts);
    }

    pub fn can_attack(&self) -> bool {
        self.attack_timer >= PLAYER_ATTACK_COOLDOWN
    }

    pub fn reset_attack_timer(&mut self) {
        self.attack_timer = 0.0;
    }

    pub fn activate_triple_shot(&mut self, duration: f32) {
        self.triple_shot_timer = duration;
    }

    pub fn triple_shot_active(&self) -> bool {
        self.triple_shot_timer > 0.0
    }

    /// Advance timers, steer and clamp to the field.
    ///
    /// `movement` is a raw direction (normalized here); `turn` is -1..=1.
    pub fn update(&mut self, dt: f32, movement: Vec2, turn: f32) {
        if self.attack_timer < PLAYER_ATTACK_COOLDOWN {
            self.attack_timer += dt;
        }
        if self.triple_shot_timer > 0.0 {
            self.triple_shot_timer = (self.triple_shot_timer - dt).max(0.0);
        }

        let turn = turn.clamp(-1.0, 1.0);
        if turn != 0.0 {
            self.angle = normalize_angle(self.angle + (PLAYER_ROTATION_SPEED * turn * dt).to_radians());
        }

        let dir = movement.normalize_or_zero();
        self.pos += dir * PLAYER_SPEED * dt;

        let half = self.size * 0.5;
        self.pos.x = self.pos.x.clamp(half.x, FIELD_WIDTH - half.x);
        self.pos.y = self.pos.y.clamp(half.y, FIELD_HEIGHT - half.y);
    }

    /// Muzzle and direction of each bullet in the next volley.
    ///
    /// Side bullets of a triple shot leave from a slightly wider muzzle.
    pub fn volley(&self) -> Vec<(Vec2, Vec2)> {
        let mut shots = vec![(self.muzzle(PLAYER_MUZZLE_OFFSET), heading_to_dir(self.angle))];
        if self.triple_shot_active() {
            let spread = TRIPLE_SHOT_SPREAD_DEG.to_radians();
            let side = self.muzzle(PLAYER_SIDE_MUZZLE_OFFSET);
            shots.push((side, heading_to_dir(self.angle - spread)));
            shots.push((side, heading_to_dir(self.angle + spread)));
        }
        shots
    }

    fn muzzle(&self, offset: f32) -> Vec2 {
        Vec2::new(self.pos.x - offset, self.pos.y)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
}

/// A swaying enemy fighter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal baseline the sine sway is centred on
    pub start_x: f32,
    pub sine_timer: f32,
    pub hp: i32,
    pub shoot_cooldown: f32,
    pub shoot_timer: f32,
    /// Visual variant index
    pub variant: u32,
    pub alive: bool,
}

impl Enemy {
    pub fn new(pos: Vec2, size: Vec2, shoot_cooldown: f32, variant: u32) -> Self {
        Self {
            pos,
            size,
            start_x: pos.x,
            sine_timer: 0.0,
            hp: ENEMY_HP,
            shoot_cooldown,
            shoot_timer: 0.0,
            variant,
            alive: true,
        }
    }

    pub fn take_damage(&mut self, damage: i32) {
        self.hp = (self.hp - damage).max(0);
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Move one step; returns true when the enemy fires this step
    pub fn advance(&mut self, dt: f32) -> bool {
        self.sine_timer += dt;
        let half_w = self.size.x / 2.0;
        let x = self.start_x + (self.sine_timer * ENEMY_SWAY_FREQUENCY).sin() * ENEMY_SWAY_AMPLITUDE;
        self.pos.x = x.clamp(half_w, FIELD_WIDTH - half_w);
        self.pos.y += ENEMY_SPEED * dt;

        self.shoot_timer += dt;
        if self.shoot_timer >= self.shoot_cooldown {
            self.shoot_timer = 0.0;
            return true;
        }
        false
    }
}

impl Entity for Enemy {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
    fn is_alive(&self) -> bool {
        self.alive
    }
    fn kill(&mut self) {
        self.alive = false;
    }
}

/// The single boss slot occupant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Vec2,
    pub size: Vec2,
    pub hp: i32,
    pub max_hp: i32,
    pub moving_right: bool,
    pub attack_timer: f32,
    pub bullet_speed: f32,
}

impl Boss {
    pub fn new(pos: Vec2, size: Vec2, health: i32, bullet_speed: f32) -> Self {
        Self {
            pos,
            size,
            hp: health,
            max_hp: health,
            moving_right: true,
            attack_timer: 0.0,
            bullet_speed,
        }
    }

    pub fn take_damage(&mut self, damage: i32) {
        self.hp = (self.hp - damage).max(0);
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Remaining health for an external HP bar, in [0, 1]
    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        (self.hp as f32 / self.max_hp as f32).clamp(0.0, 1.0)
    }

    /// Patrol, descend to cruising height; returns true on an attack
    pub fn advance(&mut self, dt: f32) -> bool {
        let half_w = self.size.x / 2.0;
        if self.moving_right {
            self.pos.x += BOSS_SPEED * dt;
            if self.pos.x + half_w > FIELD_WIDTH {
                self.moving_right = false;
            }
        } else {
            self.pos.x -= BOSS_SPEED * dt;
            if self.pos.x - half_w < 0.0 {
                self.moving_right = true;
            }
        }
        if self.pos.y < BOSS_CRUISE_Y {
            self.pos.y += BOSS_DESCENT_SPEED * dt;
        }

        self.attack_timer += dt;
        if self.attack_timer >= BOSS_ATTACK_INTERVAL {
            self.attack_timer = 0.0;
            return true;
        }
        false
    }

    /// Bullets leave from the bottom edge of the hull
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y + self.size.y / 2.0)
    }

    /// Straight down plus one bullet fanned to each side
    pub fn volley_dirs(&self) -> [Vec2; 3] {
        let spread = BOSS_SPREAD_DEG.to_radians();
        [downward_dir(0.0), downward_dir(-spread), downward_dir(spread)]
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
}

/// A projectile, fired by the player or by enemies/boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub dir: Vec2,
    pub speed: f32,
    pub alive: bool,
}

impl Bullet {
    pub fn new(pos: Vec2, size: Vec2, dir: Vec2, speed: f32) -> Self {
        Self {
            pos,
            size,
            dir,
            speed,
            alive: true,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.dir * self.speed * dt;
    }

    /// Rotation for rendering, in degrees
    pub fn rotation_deg(&self) -> f32 {
        self.dir.y.atan2(self.dir.x).to_degrees() + 90.0
    }
}

impl Entity for Bullet {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
    fn is_alive(&self) -> bool {
        self.alive
    }
    fn kill(&mut self) {
        self.alive = false;
    }
}

/// A slow, tough rock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub size: Vec2,
    pub hp: i32,
    /// Degrees
    pub rotation: f32,
    pub alive: bool,
}

impl Asteroid {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            hp: ASTEROID_HP,
            rotation: 0.0,
            alive: true,
        }
    }

    pub fn take_damage(&mut self, damage: i32) {
        self.hp = (self.hp - damage).max(0);
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos.y += ASTEROID_SPEED * dt;
        self.rotation = (self.rotation + ASTEROID_SPIN * dt) % 360.0;
    }
}

impl Entity for Asteroid {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
    fn is_alive(&self) -> bool {
        self.alive
    }
    fn kill(&mut self) {
        self.alive = false;
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    ScoreBonus,
    Heal,
    TripleShot,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [PowerupKind::ScoreBonus, PowerupKind::Heal, PowerupKind::TripleShot];

    /// HUD message shown on pickup
    pub fn message(&self) -> &'static str {
        match self {
            PowerupKind::ScoreBonus => "+50 SCORE!",
            PowerupKind::Heal => "+3 HEALTH!",
            PowerupKind::TripleShot => "TRIPLE SHOT!",
        }
    }
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PowerupKind,
    pub alive: bool,
}

impl Powerup {
    pub fn new(pos: Vec2, size: Vec2, kind: PowerupKind) -> Self {
        Self {
            pos,
            size,
            kind,
            alive: true,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos.y += POWERUP_SPEED * dt;
    }
}

impl Entity for Powerup {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
    fn is_alive(&self) -> bool {
        self.alive
    }
    fn kill(&mut self) {
        self.alive = false;
    }
}

/// Which frame sequence an explosion plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionKind {
    Standard,
    /// Used when an enemy bullet hits the player
    Player,
}

/// A short frame-sequence effect; never collision tested
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ExplosionKind,
    pub frame: u32,
    pub frame_timer: f32,
    pub alive: bool,
}

impl Explosion {
    pub fn new(pos: Vec2, size: Vec2, kind: ExplosionKind) -> Self {
        Self {
            pos,
            size,
            kind,
            frame: 0,
            frame_timer: 0.0,
            alive: true,
        }
    }

    /// Step the animation; returns true once the last frame has played
    pub fn advance(&mut self, dt: f32) -> bool {
        self.frame_timer += dt;
        if self.frame_timer >= EXPLOSION_FRAME_DURATION {
            self.frame_timer = 0.0;
            self.frame += 1;
        }
        self.frame >= EXPLOSION_FRAMES
    }
}

impl Entity for Explosion {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
    fn is_alive(&self) -> bool {
        self.alive
    }
    fn kill(&mut self) {
        self.alive = false;
    }
}

/// Transient camera shake; the core tracks it, the renderer applies it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenShake {
    pub amount: f32,
    pub duration: f32,
    pub timer: f32,
}

impl ScreenShake {
    /// Restart the shake; a new trigger replaces the current one
    pub fn shake(&mut self, amount: f32, duration: f32) {
        self.amount = amount;
        self.duration = duration;
        self.timer = 0.0;
    }

    pub fn update(&mut self, dt: f32) {
        if self.timer < self.duration {
            self.timer += dt;
        }
    }

    pub fn is_active(&self) -> bool {
        self.timer < self.duration
    }

    pub fn offset(&self) -> Vec2 {
        if !self.is_active() || self.duration <= 0.0 {
            return Vec2::ZERO;
        }
        let intensity = (self.duration - self.timer) / self.duration;
        Vec2::new(
            (self.timer * 50.0).sin() * self.amount * intensity,
            (self.timer * 70.0).sin() * self.amount * intensity,
        )
    }
}

/// "Powerup acquired" banner with a linear fade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerupMessage {
    pub text: String,
    pub elapsed: f32,
}

impl PowerupMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            elapsed: 0.0,
        }
    }

    /// Opacity in [0, 1]
    pub fn alpha(&self) -> f32 {
        (1.0 - self.elapsed / POWERUP_MESSAGE_DURATION).clamp(0.0, 1.0)
    }

    pub fn expired(&self) -> bool {
        self.elapsed >= POWERUP_MESSAGE_DURATION
    }
}

/// Score and progression counters for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub score: u64,
    pub enemies_defeated: u32,
    /// Bosses defeated so far
    pub boss_count: u32,
    /// Score at which the next boss becomes eligible
    pub next_boss_score: u64,
    pub powerup_message: Option<PowerupMessage>,
    pub shake: ScreenShake,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            score: 0,
            enemies_defeated: 0,
            boss_count: 0,
            next_boss_score: FIRST_BOSS_SCORE,
            powerup_message: None,
            shake: ScreenShake::default(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The only way score changes during play
    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn add_enemy_defeated(&mut self) {
        self.enemies_defeated += 1;
    }

    /// Bookkeeping after a boss falls
    pub fn record_boss_defeat(&mut self) {
        self.boss_count += 1;
        self.next_boss_score += BOSS_SCORE_STEP;
    }

    pub fn show_powerup(&mut self, kind: PowerupKind) {
        self.powerup_message = Some(PowerupMessage::new(kind.message()));
    }

    /// Advance HUD timers (message fade, shake decay)
    pub fn update(&mut self, dt: f32) {
        self.shake.update(dt);
        if let Some(msg) = &mut self.powerup_message {
            msg.elapsed += dt;
            if msg.expired() {
                self.powerup_message = None;
            }
        }
    }
}

/// Fire-and-forget notifications for audio, camera and UI consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundEffect),
    Music(MusicCue),
    /// Music switched on or off from a menu
    MusicEnabled(bool),
    Shake { amount: f32, duration: f32 },
    PlayerHit { hearts: u8 },
    EnemyDestroyed { pos: Vec2 },
    AsteroidDestroyed { pos: Vec2 },
    BossSpawned { health: i32, bullet_speed: f32 },
    BossDefeated { boss_count: u32 },
    PowerupDropped { kind: PowerupKind, pos: Vec2 },
    PowerupCollected { kind: PowerupKind },
    PhaseChanged { from: GamePhase, to: GamePhase },
    Paused(bool),
    GameOver { score: u64, new_high_score: bool },
    ExitRequested,
}
