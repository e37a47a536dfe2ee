//! Top-level game state machine
//!
//! [`Game`] owns the simulation world and decides which parts of it run each
//! tick. Only `Playing` with the pause flag clear advances the simulation;
//! every other phase is inert. Actions that make no sense in the current
//! phase are ignored.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::audio::MusicCue;
use crate::consts::{GAME_OVER_FRAME_DURATION, GAME_OVER_FRAMES};
use crate::highscores::{HIGH_SCORE_FILE, HighScoreFile, HighScoreStore};
use crate::settings::{SETTINGS_FILE, Settings};
use crate::sim::{self, GameEvent, RandomSource, Resolution, SimRng, SpriteSizes, TickInput, World};
use crate::snapshot::Snapshot;
use crate::ui::{MenuSet, Nav};

pub use crate::sim::GamePhase;

/// Environment variable overriding the session seed
pub const SEED_ENV: &str = "STAR_SENTINEL_SEED";

/// Discrete, already-decoded player intents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Start,
    Options,
    HighScore,
    Exit,
    Back,
    PauseToggle,
    Resume,
    ToggleMusic,
    ExitToMenu,
    Retry,
}

/// How to build a [`Game`]
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub seed: u64,
    pub high_score_path: PathBuf,
    pub settings_path: PathBuf,
    pub sizes: SpriteSizes,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            high_score_path: PathBuf::from(HIGH_SCORE_FILE),
            settings_path: PathBuf::from(SETTINGS_FILE),
            sizes: SpriteSizes::default(),
        }
    }
}

impl GameConfig {
    /// Defaults, with the seed taken from the environment or the clock
    pub fn from_env() -> Self {
        let seed = std::env::var(SEED_ENV)
            .ok()
            .and_then(|s| match s.trim().parse::<u64>() {
                Ok(seed) => Some(seed),
                Err(e) => {
                    log::warn!("Ignoring {SEED_ENV}={s:?}: {e}");
                    None
                }
            })
            .unwrap_or_else(clock_seed);
        Self {
            seed,
            ..Self::default()
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// The game: state machine, world and persistence boundary
pub struct Game {
    phase: GamePhase,
    paused: bool,
    /// Phase to return to from OPTIONS / HIGHSCORE
    previous_phase: GamePhase,
    world: World,
    rng: Box<dyn RandomSource>,
    high_scores: Box<dyn HighScoreStore>,
    high_score: u64,
    settings: Settings,
    settings_path: Option<PathBuf>,
    menus: MenuSet,
    events: Vec<GameEvent>,
    /// Time spent on the game-over screen, capped at the animation length
    game_over_timer: f32,
    exit_requested: bool,
}

impl Game {
    /// File-backed game seeded from `config`
    pub fn new(config: &GameConfig) -> Self {
        let settings = Settings::load(&config.settings_path);
        let mut game = Self::with_parts(
            config.sizes,
            Box::new(SimRng::new(config.seed)),
            Box::new(HighScoreFile::new(config.high_score_path.clone())),
            settings,
        );
        game.settings_path = Some(config.settings_path.clone());
        log::info!("Game created with seed {}", config.seed);
        game
    }

    /// Game built from injected collaborators; settings are not persisted
    pub fn with_parts(
        sizes: SpriteSizes,
        rng: Box<dyn RandomSource>,
        high_scores: Box<dyn HighScoreStore>,
        settings: Settings,
    ) -> Self {
        let high_score = high_scores.load_high_score();
        Self {
            phase: GamePhase::Loading,
            paused: false,
            previous_phase: GamePhase::Menu,
            world: World::new(sizes),
            rng,
            high_scores,
            high_score,
            settings,
            settings_path: None,
            menus: MenuSet::new(),
            events: Vec::new(),
            game_over_timer: 0.0,
            exit_requested: false,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn menus(&self) -> &MenuSet {
        &self.menus
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Seconds of the game-over animation played so far
    pub fn game_over_elapsed(&self) -> f32 {
        self.game_over_timer
    }

    /// The game-over menu only accepts input once its animation has played
    pub fn game_over_ready(&self) -> bool {
        self.game_over_timer >= GAME_OVER_FRAMES as f32 * GAME_OVER_FRAME_DURATION
    }

    /// Take the events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    fn transition(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {from:?} -> {to:?}");
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
        if let Some(menu) = self.menus.active_mut(to, false) {
            menu.reset();
        }
    }

    /// One-time asset setup is done; show the main menu
    pub fn finish_loading(&mut self) {
        if self.phase != GamePhase::Loading {
            return;
        }
        self.transition(GamePhase::Menu);
        self.events.push(GameEvent::Music(MusicCue::Menu));
    }

    /// Clear all transient entities and counters and re-seed the player
    pub fn reset_game(&mut self) {
        self.world.reset();
        self.paused = false;
        self.game_over_timer = 0.0;
    }

    fn start_playing(&mut self) {
        self.reset_game();
        self.transition(GamePhase::Playing);
        self.events.push(GameEvent::Music(MusicCue::Game));
    }

    fn remember_and_switch(&mut self, to: GamePhase) {
        self.previous_phase = self.phase;
        self.transition(to);
    }

    fn request_exit(&mut self) {
        log::info!("Exit requested");
        self.exit_requested = true;
        self.events.push(GameEvent::ExitRequested);
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if paused {
            self.menus.pause.reset();
        }
        log::info!("{}", if paused { "Paused" } else { "Resumed" });
        self.events.push(GameEvent::Paused(paused));
    }

    fn toggle_music(&mut self) {
        let on = self.settings.toggle_music();
        if let Some(path) = &self.settings_path {
            self.settings.save(path);
        }
        self.events.push(GameEvent::MusicEnabled(on));
    }

    /// Apply an action. Returns false (and changes nothing) when the action is
    /// not valid in the current phase.
    pub fn handle_action(&mut self, action: Action) -> bool {
        let accepted = match (self.phase, action) {
            (GamePhase::Menu, Action::Start) => {
                self.start_playing();
                true
            }
            (GamePhase::Menu, Action::Options) => {
                self.remember_and_switch(GamePhase::Options);
                true
            }
            (GamePhase::Menu, Action::HighScore) => {
                self.remember_and_switch(GamePhase::HighScore);
                true
            }
            (GamePhase::Menu, Action::Exit) => {
                self.request_exit();
                true
            }

            (GamePhase::Options, Action::ToggleMusic) => {
                self.toggle_music();
                true
            }
            (GamePhase::Options | GamePhase::HighScore, Action::Back) => {
                let to = self.previous_phase;
                self.transition(to);
                true
            }

            (GamePhase::Playing, Action::PauseToggle) => {
                self.set_paused(!self.paused);
                true
            }
            (GamePhase::Playing, Action::Resume) if self.paused => {
                self.set_paused(false);
                true
            }
            (GamePhase::Playing, Action::ToggleMusic) if self.paused => {
                self.toggle_music();
                true
            }
            (GamePhase::Playing, Action::ExitToMenu) => {
                self.reset_game();
                self.transition(GamePhase::Menu);
                self.events.push(GameEvent::Music(MusicCue::Menu));
                true
            }

            (GamePhase::GameOver, _) if !self.game_over_ready() => false,
            (GamePhase::GameOver, Action::Retry) => {
                self.start_playing();
                true
            }
            (GamePhase::GameOver, Action::Options) => {
                self.remember_and_switch(GamePhase::Options);
                true
            }
            (GamePhase::GameOver, Action::HighScore) => {
                self.remember_and_switch(GamePhase::HighScore);
                true
            }
            (GamePhase::GameOver, Action::Exit) => {
                self.request_exit();
                true
            }

            _ => false,
        };
        if !accepted {
            log::debug!("Ignoring {action:?} in {:?} (paused={})", self.phase, self.paused);
        }
        accepted
    }

    /// Feed menu input to the active screen and apply what it produces
    pub fn navigate(&mut self, nav: Nav) -> Option<Action> {
        let action = self.menus.active_mut(self.phase, self.paused)?.navigate(nav)?;
        self.handle_action(action).then_some(action)
    }

    /// Advance one frame
    pub fn tick(&mut self, dt: f32, input: &TickInput) {
        match self.phase {
            GamePhase::Loading => self.finish_loading(),
            GamePhase::GameOver => {
                let total = GAME_OVER_FRAMES as f32 * GAME_OVER_FRAME_DURATION;
                self.game_over_timer = (self.game_over_timer + dt).min(total);
            }
            GamePhase::Playing if !self.paused => {
                let resolution = sim::tick(&mut self.world, input, dt, self.rng.as_mut(), &mut self.events);
                if resolution == Resolution::PlayerDown {
                    self.enter_game_over();
                }
            }
            _ => {}
        }
    }

    fn enter_game_over(&mut self) {
        let score = self.world.session.score;
        let new_high_score = score > self.high_score;
        if new_high_score {
            self.high_score = score;
            self.high_scores.save_high_score(score);
        }
        log::info!(
            "Game over: score {score}, {} enemies defeated{}",
            self.world.session.enemies_defeated,
            if new_high_score { " (new high score)" } else { "" }
        );
        self.game_over_timer = 0.0;
        self.transition(GamePhase::GameOver);
        self.events.push(GameEvent::GameOver { score, new_high_score });
        self.events.push(GameEvent::Music(MusicCue::Menu));
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::highscores::MemoryHighScores;
    use crate::sim::ScriptedRng;
    use glam::Vec2;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 64.0;

    fn game_with(store: MemoryHighScores) -> Game {
        let mut game = Game::with_parts(
            SpriteSizes::default(),
            Box::new(ScriptedRng::constant(0.9)),
            Box::new(store),
            Settings::default(),
        );
        game.tick(DT, &TickInput::default());
        game
    }

    fn playing_game(store: MemoryHighScores) -> Game {
        let mut game = game_with(store);
        assert!(game.handle_action(Action::Start));
        game.drain_events();
        game
    }

    fn enemy_bullet_on_player(game: &mut Game) {
        let store = &mut game.world_mut().store;
        let pos = store.player.pos;
        store.add_enemy_bullet(pos, Vec2::ZERO, 0.0);
    }

    fn finish_game_over_animation(game: &mut Game) {
        for _ in 0..70 {
            game.tick(DT, &TickInput::default());
        }
        assert!(game.game_over_ready());
    }

    #[test]
    fn test_loading_moves_to_menu() {
        let mut game = Game::with_parts(
            SpriteSizes::default(),
            Box::new(ScriptedRng::constant(0.5)),
            Box::new(MemoryHighScores::new()),
            Settings::default(),
        );
        assert_eq!(game.phase(), GamePhase::Loading);
        assert!(!game.handle_action(Action::Start));
        game.tick(DT, &TickInput::default());
        assert_eq!(game.phase(), GamePhase::Menu);
        assert!(game.drain_events().contains(&GameEvent::Music(MusicCue::Menu)));
    }

    #[test]
    fn test_options_and_high_score_return_to_previous() {
        let mut game = game_with(MemoryHighScores::new());
        assert!(game.handle_action(Action::Options));
        assert_eq!(game.phase(), GamePhase::Options);
        assert!(!game.handle_action(Action::Start));
        assert!(game.handle_action(Action::Back));
        assert_eq!(game.phase(), GamePhase::Menu);

        assert!(game.handle_action(Action::HighScore));
        assert_eq!(game.phase(), GamePhase::HighScore);
        assert!(game.handle_action(Action::Back));
        assert_eq!(game.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_pause_gates_simulation() {
        let mut game = playing_game(MemoryHighScores::new());
        game.tick(DT, &TickInput::default());
        assert!(game.handle_action(Action::PauseToggle));
        assert!(game.is_paused());

        let before = game.world().store.player.pos;
        let bullets = game.world().store.player_bullets.alive_count();
        for _ in 0..30 {
            game.tick(DT, &TickInput::new(Vec2::X, 1.0));
        }
        assert_eq!(game.world().store.player.pos, before);
        assert_eq!(game.world().store.player_bullets.alive_count(), bullets);

        // Only resume / music / exit-to-menu while paused
        assert!(!game.handle_action(Action::Retry));
        assert!(!game.handle_action(Action::Start));
        assert!(game.handle_action(Action::ToggleMusic));
        assert!(!game.settings().music_on);
        assert!(game.handle_action(Action::Resume));
        assert!(!game.is_paused());
        assert!(!game.handle_action(Action::Resume));

        game.tick(DT, &TickInput::new(Vec2::X, 0.0));
        assert!(game.world().store.player.pos.x > before.x);
    }

    #[test]
    fn test_exit_to_menu_resets() {
        let mut game = playing_game(MemoryHighScores::new());
        game.world_mut().session.score = 300;
        game.handle_action(Action::PauseToggle);
        assert!(game.handle_action(Action::ExitToMenu));
        assert_eq!(game.phase(), GamePhase::Menu);
        assert!(!game.is_paused());
        assert_eq!(game.world().session.score, 0);
    }

    #[test]
    fn test_fatal_hits_end_the_run_once() {
        let handle = MemoryHighScores::with_score(1000);
        let mut game = playing_game(handle.clone());
        for hit in 1..=50 {
            enemy_bullet_on_player(&mut game);
            game.tick(DT, &TickInput::default());
            if hit < 10 {
                assert_eq!(game.phase(), GamePhase::Playing);
            }
        }
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.world().store.player.hearts, 0);

        let events = game.drain_events();
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
        let hits = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
            .count();
        assert_eq!(hits, 10);
        // Score 0 does not beat 1000
        assert_eq!(handle.save_count(), 0);
        assert_eq!(game.high_score(), 1000);
    }

    #[test]
    fn test_high_score_saved_only_when_beaten() {
        let handle = MemoryHighScores::with_score(100);
        let mut game = playing_game(handle.clone());
        game.world_mut().session.score = 150;
        game.world_mut().store.player.hearts = 1;
        enemy_bullet_on_player(&mut game);
        game.tick(DT, &TickInput::default());

        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(handle.stored(), Some(150));
        assert_eq!(handle.save_count(), 1);
        assert_eq!(game.high_score(), 150);
        assert!(game.drain_events().contains(&GameEvent::GameOver {
            score: 150,
            new_high_score: true
        }));
    }

    #[test]
    fn test_equal_score_is_not_a_high_score() {
        let handle = MemoryHighScores::with_score(150);
        let mut game = playing_game(handle.clone());
        game.world_mut().session.score = 150;
        game.world_mut().store.player.hearts = 1;
        enemy_bullet_on_player(&mut game);
        game.tick(DT, &TickInput::default());
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(handle.save_count(), 0);
    }

    #[test]
    fn test_unreadable_store_defaults_to_zero() {
        let mut game = playing_game(MemoryHighScores::new());
        assert_eq!(game.high_score(), 0);
        game.world_mut().session.score = 10;
        game.world_mut().store.player.hearts = 1;
        enemy_bullet_on_player(&mut game);
        game.tick(DT, &TickInput::default());
        assert_eq!(game.high_score(), 10);
    }

    #[test]
    fn test_game_over_menu_waits_for_animation() {
        let mut game = playing_game(MemoryHighScores::new());
        game.world_mut().store.player.hearts = 1;
        enemy_bullet_on_player(&mut game);
        game.tick(DT, &TickInput::default());
        assert_eq!(game.phase(), GamePhase::GameOver);

        assert!(!game.handle_action(Action::Retry));
        finish_game_over_animation(&mut game);
        assert!(game.handle_action(Action::Options));
        assert!(game.handle_action(Action::Back));
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert!(game.handle_action(Action::Retry));
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_retry_resets_session() {
        let mut game = playing_game(MemoryHighScores::new());
        {
            let world = game.world_mut();
            world.session.score = 900;
            world.session.boss_count = 2;
            world.session.next_boss_score = 1700;
            world.store.player.hearts = 1;
            world.store.add_powerup(Vec2::new(100.0, 100.0), sim::PowerupKind::Heal);
        }
        enemy_bullet_on_player(&mut game);
        game.tick(DT, &TickInput::default());
        finish_game_over_animation(&mut game);
        assert!(game.handle_action(Action::Retry));

        let world = game.world();
        assert_eq!(world.store.player.hearts, MAX_HEARTS);
        assert_eq!(world.store.player.pos, Vec2::new(PLAYER_START_X, PLAYER_START_Y));
        assert_eq!(world.session.score, 0);
        assert_eq!(world.session.boss_count, 0);
        assert_eq!(world.session.next_boss_score, FIRST_BOSS_SCORE);
        for category in [
            sim::Category::Enemy,
            sim::Category::Boss,
            sim::Category::PlayerBullet,
            sim::Category::EnemyBullet,
            sim::Category::Asteroid,
            sim::Category::Powerup,
            sim::Category::Explosion,
        ] {
            assert_eq!(world.store.count(category), 0);
        }
    }

    #[test]
    fn test_navigation_drives_actions() {
        let mut game = game_with(MemoryHighScores::new());
        assert_eq!(game.navigate(Nav::Confirm), Some(Action::Start));
        assert_eq!(game.phase(), GamePhase::Playing);
        // No menu while playing unpaused
        assert_eq!(game.navigate(Nav::Confirm), None);
        game.handle_action(Action::PauseToggle);
        assert_eq!(game.navigate(Nav::Back), Some(Action::Resume));
        assert!(!game.is_paused());
    }

    #[test]
    fn test_exit_requested() {
        let mut game = game_with(MemoryHighScores::new());
        assert!(game.handle_action(Action::Exit));
        assert!(game.exit_requested());
        assert!(game.drain_events().contains(&GameEvent::ExitRequested));
    }

    fn action_strategy() -> impl Strategy<Value = Option<Action>> {
        prop_oneof![
            6 => Just(None),
            1 => Just(Some(Action::PauseToggle)),
            1 => Just(Some(Action::Resume)),
            1 => Just(Some(Action::ToggleMusic)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn hearts_bounded_and_score_monotonic(
            steps in prop::collection::vec(
                (action_strategy(), -1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0),
                1..400,
            ),
            seed in any::<u64>(),
        ) {
            let mut game = Game::with_parts(
                SpriteSizes::default(),
                Box::new(SimRng::new(seed)),
                Box::new(MemoryHighScores::new()),
                Settings::default(),
            );
            game.finish_loading();
            game.handle_action(Action::Start);
            {
                // Crowd the field so collisions actually happen
                let world = game.world_mut();
                world.session.next_boss_score = 0;
                world.director.spawn_timer_max = 0.2;
            }

            let mut last_score = 0;
            for (action, mx, my, turn) in steps {
                if let Some(action) = action {
                    game.handle_action(action);
                }
                game.tick(0.05, &TickInput::new(Vec2::new(mx, my), turn));

                let world = game.world();
                prop_assert!(world.store.player.hearts <= world.store.player.max_hearts);
                prop_assert!(world.session.score >= last_score);
                prop_assert!(world.store.count(sim::Category::Boss) <= 1);
                last_score = world.session.score;
            }
        }
    }
}
