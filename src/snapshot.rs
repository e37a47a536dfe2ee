//! Read-only view of one tick for the renderer and HUD
//!
//! Everything here is plain data copied out of the game; nothing in a
//! snapshot can change the simulation.

use glam::Vec2;
use serde::Serialize;

use crate::consts::GAME_OVER_FRAME_DURATION;
use crate::game::Game;
use crate::sim::{Aabb, Category, Entity, ExplosionKind, GamePhase, PowerupKind};
use crate::ui::{MenuItem, Overlay};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    /// Facing in degrees, clockwise from up
    pub angle_deg: f32,
    pub bounds: Aabb,
    pub triple_shot_remaining: f32,
}

/// Anything drawable other than the player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub category: Category,
    pub pos: Vec2,
    pub bounds: Aabb,
    /// Degrees
    pub rotation: f32,
    /// Explosion frame or enemy variant
    pub frame: u32,
    pub powerup: Option<PowerupKind>,
    pub explosion: Option<ExplosionKind>,
}

impl EntityView {
    fn new(category: Category, pos: Vec2, bounds: Aabb) -> Self {
        Self {
            category,
            pos,
            bounds,
            rotation: 0.0,
            frame: 0,
            powerup: None,
            explosion: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageView {
    pub text: String,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuView {
    pub items: Vec<MenuItem>,
    pub cursor: usize,
    pub overlay: Option<Overlay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub paused: bool,
    pub score: u64,
    pub hearts: u8,
    pub max_hearts: u8,
    pub high_score: u64,
    pub enemies_defeated: u32,
    pub boss_count: u32,
    pub next_boss_score: u64,
    pub player: PlayerView,
    /// Back-to-front draw order
    pub entities: Vec<EntityView>,
    /// For the boss HP bar; `None` when no boss is on the field
    pub boss_hp: Option<f32>,
    pub powerup_message: Option<MessageView>,
    /// Camera offset; zero when shake is turned off in the settings
    pub shake_offset: Vec2,
    /// Frame of the game-over animation while in GAME_OVER
    pub game_over_frame: Option<u32>,
    pub menu: Option<MenuView>,
}

impl Snapshot {
    pub fn capture(game: &Game) -> Self {
        let world = game.world();
        let store = &world.store;
        let session = &world.session;
        let player = &store.player;

        let mut entities = Vec::new();
        for a in store.asteroids.iter_alive() {
            let mut view = EntityView::new(Category::Asteroid, a.pos, a.bounds());
            view.rotation = a.rotation;
            entities.push(view);
        }
        for e in store.enemies.iter_alive() {
            let mut view = EntityView::new(Category::Enemy, e.pos, e.bounds());
            view.frame = e.variant;
            entities.push(view);
        }
        if let Some(boss) = &store.boss {
            entities.push(EntityView::new(Category::Boss, boss.pos, boss.bounds()));
        }
        for p in store.powerups.iter_alive() {
            let mut view = EntityView::new(Category::Powerup, p.pos, p.bounds());
            view.powerup = Some(p.kind);
            entities.push(view);
        }
        for (category, pool) in [
            (Category::PlayerBullet, &store.player_bullets),
            (Category::EnemyBullet, &store.enemy_bullets),
        ] {
            for b in pool.iter_alive() {
                let mut view = EntityView::new(category, b.pos, b.bounds());
                view.rotation = b.rotation_deg();
                entities.push(view);
            }
        }
        for x in store.explosions.iter_alive() {
            let mut view = EntityView::new(Category::Explosion, x.pos, x.bounds());
            view.frame = x.frame;
            view.explosion = Some(x.kind);
            entities.push(view);
        }

        let shake_offset = if game.settings().effective_screen_shake() {
            session.shake.offset()
        } else {
            Vec2::ZERO
        };

        let game_over_frame = (game.phase() == GamePhase::GameOver)
            .then(|| (game.game_over_elapsed() / GAME_OVER_FRAME_DURATION) as u32);

        let menu = game
            .menus()
            .active(game.phase(), game.is_paused())
            .map(|m| MenuView {
                items: m.items().to_vec(),
                cursor: m.cursor(),
                overlay: m.overlay(),
            });

        Self {
            phase: game.phase(),
            paused: game.is_paused(),
            score: session.score,
            hearts: player.hearts,
            max_hearts: player.max_hearts,
            high_score: game.high_score(),
            enemies_defeated: session.enemies_defeated,
            boss_count: session.boss_count,
            next_boss_score: session.next_boss_score,
            player: PlayerView {
                pos: player.pos,
                angle_deg: player.angle.to_degrees(),
                bounds: player.bounds(),
                triple_shot_remaining: player.triple_shot_timer,
            },
            entities,
            boss_hp: store.boss.as_ref().map(|b| b.hp_fraction()),
            powerup_message: session.powerup_message.as_ref().map(|m| MessageView {
                text: m.text.clone(),
                alpha: m.alpha(),
            }),
            shake_offset,
            game_over_frame,
            menu,
        }
    }

    pub fn count(&self, category: Category) -> usize {
        self.entities.iter().filter(|e| e.category == category).count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Action;
    use crate::highscores::MemoryHighScores;
    use crate::settings::Settings;
    use crate::sim::{Boss, ScriptedRng, SpriteSizes, TickInput};

    fn playing(settings: Settings) -> Game {
        let mut game = Game::with_parts(
            SpriteSizes::default(),
            Box::new(ScriptedRng::constant(0.9)),
            Box::new(MemoryHighScores::with_score(77)),
            settings,
        );
        game.finish_loading();
        game.handle_action(Action::Start);
        game
    }

    #[test]
    fn test_menu_snapshot() {
        let mut game = Game::with_parts(
            SpriteSizes::default(),
            Box::new(ScriptedRng::constant(0.9)),
            Box::new(MemoryHighScores::new()),
            Settings::default(),
        );
        game.finish_loading();
        let snap = game.snapshot();
        assert_eq!(snap.phase, GamePhase::Menu);
        let menu = snap.menu.unwrap();
        assert_eq!(menu.items[0], MenuItem::Start);
        assert_eq!(menu.cursor, 0);
        assert!(snap.entities.is_empty());
    }

    #[test]
    fn test_playing_snapshot_lists_entities() {
        let mut game = playing(Settings::default());
        game.tick(0.01, &TickInput::default());
        let size = game.world().store.sizes.boss;
        let world = game.world_mut();
        world
            .store
            .spawn_boss(Boss::new(Vec2::new(300.0, 150.0), size, 200, 300.0));
        if let Some(boss) = world.store.boss.as_mut() {
            boss.take_damage(50);
        }

        let snap = game.snapshot();
        assert_eq!(snap.phase, GamePhase::Playing);
        assert!(snap.menu.is_none());
        assert_eq!(snap.high_score, 77);
        assert_eq!(snap.hearts, 10);
        assert_eq!(snap.count(Category::PlayerBullet), 1);
        assert_eq!(snap.count(Category::Boss), 1);
        assert_eq!(snap.boss_hp, Some(0.75));
        assert!(snap.to_json().unwrap().contains("\"score\":0"));
    }

    #[test]
    fn test_shake_hidden_when_disabled() {
        let settings = Settings {
            screen_shake: false,
            ..Settings::default()
        };
        let mut game = playing(settings);
        game.world_mut().session.shake.shake(10.0, 1.0);
        game.world_mut().session.shake.update(0.01);
        assert_eq!(game.snapshot().shake_offset, Vec2::ZERO);

        let mut game = playing(Settings::default());
        game.world_mut().session.shake.shake(10.0, 1.0);
        game.world_mut().session.shake.update(0.01);
        assert_ne!(game.snapshot().shake_offset, Vec2::ZERO);
    }

    #[test]
    fn test_powerup_message_fades() {
        let mut game = playing(Settings::default());
        game.world_mut().session.show_powerup(PowerupKind::TripleShot);
        let msg = game.snapshot().powerup_message.unwrap();
        assert_eq!(msg.text, "TRIPLE SHOT!");
        assert_eq!(msg.alpha, 1.0);
    }
}
