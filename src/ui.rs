//! Menu cursors
//!
//! Widget layout and hit-testing belong to the host. These cursors only turn
//! navigate/confirm/back input into a discrete [`Action`] that the state
//! machine consumes once.

use serde::{Deserialize, Serialize};

use crate::game::Action;
use crate::sim::GamePhase;

/// Decoded menu input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nav {
    Up,
    Down,
    Confirm,
    Back,
}

/// One selectable menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuItem {
    Start,
    Continue,
    Retry,
    Options,
    HighScore,
    Music,
    Controls,
    Credits,
    ExitToMenu,
    Exit,
    Back,
}

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Start => "START",
            MenuItem::Continue => "CONTINUE",
            MenuItem::Retry => "RETRY",
            MenuItem::Options => "OPTIONS",
            MenuItem::HighScore => "HIGH SCORE",
            MenuItem::Music => "MUSIC",
            MenuItem::Controls => "CONTROLS",
            MenuItem::Credits => "CREDITS",
            MenuItem::ExitToMenu => "EXIT TO MENU",
            MenuItem::Exit => "EXIT",
            MenuItem::Back => "BACK",
        }
    }
}

/// Full-screen panel shown on top of the options menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlay {
    Controls,
    Credits,
}

const MAIN_ITEMS: &[MenuItem] = &[MenuItem::Start, MenuItem::Options, MenuItem::HighScore, MenuItem::Exit];
const PAUSE_ITEMS: &[MenuItem] = &[MenuItem::Continue, MenuItem::Music, MenuItem::ExitToMenu];
const OPTIONS_ITEMS: &[MenuItem] = &[MenuItem::Music, MenuItem::Controls, MenuItem::Credits, MenuItem::Back];
const GAME_OVER_ITEMS: &[MenuItem] = &[MenuItem::Retry, MenuItem::Options, MenuItem::HighScore, MenuItem::Exit];
const HIGH_SCORE_ITEMS: &[MenuItem] = &[MenuItem::Back];

/// A vertical list with a wrapping cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Menu {
    items: &'static [MenuItem],
    cursor: usize,
    overlay: Option<Overlay>,
    /// What the back input means when no overlay is open
    back: Option<Action>,
}

impl Menu {
    fn new(items: &'static [MenuItem], back: Option<Action>) -> Self {
        Self {
            items,
            cursor: 0,
            overlay: None,
            back,
        }
    }

    pub fn main() -> Self {
        Self::new(MAIN_ITEMS, None)
    }

    pub fn pause() -> Self {
        Self::new(PAUSE_ITEMS, Some(Action::Resume))
    }

    pub fn options() -> Self {
        Self::new(OPTIONS_ITEMS, Some(Action::Back))
    }

    pub fn game_over() -> Self {
        Self::new(GAME_OVER_ITEMS, None)
    }

    pub fn high_score() -> Self {
        Self::new(HIGH_SCORE_ITEMS, Some(Action::Back))
    }

    pub fn items(&self) -> &'static [MenuItem] {
        self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<MenuItem> {
        self.items.get(self.cursor).copied()
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.overlay = None;
    }

    /// Apply one input; returns the action it produced, if any
    pub fn navigate(&mut self, nav: Nav) -> Option<Action> {
        if self.overlay.is_some() {
            // Any confirm/back closes the overlay; arrows are swallowed
            if matches!(nav, Nav::Confirm | Nav::Back) {
                self.overlay = None;
            }
            return None;
        }

        let len = self.items.len();
        match nav {
            Nav::Up if len > 0 => {
                self.cursor = (self.cursor + len - 1) % len;
                None
            }
            Nav::Down if len > 0 => {
                self.cursor = (self.cursor + 1) % len;
                None
            }
            Nav::Up | Nav::Down => None,
            Nav::Back => self.back,
            Nav::Confirm => self.selected().and_then(|item| self.activate(item)),
        }
    }

    fn activate(&mut self, item: MenuItem) -> Option<Action> {
        match item {
            MenuItem::Start => Some(Action::Start),
            MenuItem::Continue => Some(Action::Resume),
            MenuItem::Retry => Some(Action::Retry),
            MenuItem::Options => Some(Action::Options),
            MenuItem::HighScore => Some(Action::HighScore),
            MenuItem::Music => Some(Action::ToggleMusic),
            MenuItem::ExitToMenu => Some(Action::ExitToMenu),
            MenuItem::Exit => Some(Action::Exit),
            MenuItem::Back => Some(Action::Back),
            MenuItem::Controls => {
                self.overlay = Some(Overlay::Controls);
                None
            }
            MenuItem::Credits => {
                self.overlay = Some(Overlay::Credits);
                None
            }
        }
    }
}

/// One cursor per screen, picked by the current phase
#[derive(Debug, Clone)]
pub struct MenuSet {
    pub main: Menu,
    pub pause: Menu,
    pub options: Menu,
    pub game_over: Menu,
    pub high_score: Menu,
}

impl Default for MenuSet {
    fn default() -> Self {
        Self {
            main: Menu::main(),
            pause: Menu::pause(),
            options: Menu::options(),
            game_over: Menu::game_over(),
            high_score: Menu::high_score(),
        }
    }
}

impl MenuSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Menu that receives input in `phase`; none while playing unpaused
    pub fn active(&self, phase: GamePhase, paused: bool) -> Option<&Menu> {
        match phase {
            GamePhase::Menu => Some(&self.main),
            GamePhase::Options => Some(&self.options),
            GamePhase::HighScore => Some(&self.high_score),
            GamePhase::GameOver => Some(&self.game_over),
            GamePhase::Playing if paused => Some(&self.pause),
            GamePhase::Playing | GamePhase::Loading => None,
        }
    }

    pub fn active_mut(&mut self, phase: GamePhase, paused: bool) -> Option<&mut Menu> {
        match phase {
            GamePhase::Menu => Some(&mut self.main),
            GamePhase::Options => Some(&mut self.options),
            GamePhase::HighScore => Some(&mut self.high_score),
            GamePhase::GameOver => Some(&mut self.game_over),
            GamePhase::Playing if paused => Some(&mut self.pause),
            GamePhase::Playing | GamePhase::Loading => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_menu_cursor_wraps() {
        let mut menu = Menu::main();
        assert_eq!(menu.selected(), Some(MenuItem::Start));
        assert_eq!(menu.navigate(Nav::Up), None);
        assert_eq!(menu.selected(), Some(MenuItem::Exit));
        assert_eq!(menu.navigate(Nav::Confirm), Some(Action::Exit));
        menu.navigate(Nav::Down);
        assert_eq!(menu.selected(), Some(MenuItem::Start));
        assert_eq!(menu.navigate(Nav::Confirm), Some(Action::Start));
        assert_eq!(menu.navigate(Nav::Back), None);
    }

    #[test]
    fn test_options_overlay_closes_before_back() {
        let mut menu = Menu::options();
        menu.navigate(Nav::Down);
        assert_eq!(menu.navigate(Nav::Confirm), None);
        assert_eq!(menu.overlay(), Some(Overlay::Controls));

        // Arrows do nothing while the overlay is up
        menu.navigate(Nav::Down);
        assert_eq!(menu.selected(), Some(MenuItem::Controls));

        assert_eq!(menu.navigate(Nav::Back), None);
        assert_eq!(menu.overlay(), None);
        assert_eq!(menu.navigate(Nav::Back), Some(Action::Back));
    }

    #[test]
    fn test_pause_menu_actions() {
        let mut menu = Menu::pause();
        assert_eq!(menu.navigate(Nav::Confirm), Some(Action::Resume));
        menu.navigate(Nav::Down);
        assert_eq!(menu.navigate(Nav::Confirm), Some(Action::ToggleMusic));
        menu.navigate(Nav::Down);
        assert_eq!(menu.navigate(Nav::Confirm), Some(Action::ExitToMenu));
        assert_eq!(menu.navigate(Nav::Back), Some(Action::Resume));
    }

    #[test]
    fn test_active_menu_per_phase() {
        let menus = MenuSet::new();
        assert!(menus.active(GamePhase::Playing, false).is_none());
        assert!(menus.active(GamePhase::Loading, false).is_none());
        assert_eq!(menus.active(GamePhase::Playing, true), Some(&menus.pause));
        assert_eq!(
            menus.active(GamePhase::GameOver, false).map(|m| m.items()[0]),
            Some(MenuItem::Retry)
        );
    }
}
