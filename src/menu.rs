//! Menu navigation
//!
//! Pure state machine over discrete key presses. The caller turns the
//! returned [`MenuEvent`]s into game transitions and sounds.

use serde::{Deserialize, Serialize};

use crate::sim::Difficulty;
use crate::sim::tick::Key;

/// Which menu page is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MenuScreen {
    #[default]
    Main,
    DifficultySelect,
    Credits,
    HighScores,
}

/// Entries on the main page, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MainOption {
    Play,
    Continue,
    Explore,
    Credits,
    Quit,
}

impl MainOption {
    pub const ALL: [MainOption; 5] = [
        MainOption::Play,
        MainOption::Continue,
        MainOption::Explore,
        MainOption::Credits,
        MainOption::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MainOption::Play => "PLAY",
            MainOption::Continue => "CONTINUE",
            MainOption::Explore => "EXPLORE",
            MainOption::Credits => "CREDITS",
            MainOption::Quit => "QUIT",
        }
    }
}

/// Something the game has to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    StartGame(Difficulty),
    Continue,
    Explore,
    Quit,
}

/// Result of a key press on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    /// Cursor moved
    Moved,
    /// Switched to another page
    Opened(MenuScreen),
    Action(MenuAction),
}

/// Menu state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    screen: MenuScreen,
    /// Cursor on the current page
    selected: usize,
    /// Cursor used when the difficulty page is opened
    default_difficulty: Difficulty,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl Menu {
    pub fn new(default_difficulty: Difficulty) -> Self {
        Self {
            screen: MenuScreen::Main,
            selected: 0,
            default_difficulty,
        }
    }

    #[inline]
    pub fn screen(&self) -> MenuScreen {
        self.screen
    }

    #[inline]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Number of selectable entries on the current page
    pub fn option_count(&self) -> usize {
        match self.screen {
            MenuScreen::Main => MainOption::ALL.len(),
            MenuScreen::DifficultySelect => Difficulty::ALL.len(),
            MenuScreen::Credits | MenuScreen::HighScores => 0,
        }
    }

    /// Highlighted difficulty (only meaningful on the difficulty page)
    pub fn selected_difficulty(&self) -> Difficulty {
        Difficulty::from_index(self.selected).unwrap_or(self.default_difficulty)
    }

    /// Back to the main page with the cursor on top
    pub fn reset(&mut self) {
        self.open(MenuScreen::Main);
    }

    fn open(&mut self, screen: MenuScreen) -> MenuEvent {
        self.screen = screen;
        self.selected = match screen {
            MenuScreen::DifficultySelect => self.default_difficulty.index(),
            _ => 0,
        };
        MenuEvent::Opened(screen)
    }

    fn move_cursor(&mut self, down: bool) -> Option<MenuEvent> {
        let count = self.option_count();
        if count == 0 {
            return None;
        }
        self.selected = if down {
            (self.selected + 1) % count
        } else {
            (self.selected + count - 1) % count
        };
        Some(MenuEvent::Moved)
    }

    /// Handle one key press
    pub fn handle_key(&mut self, key: Key) -> Option<MenuEvent> {
        match self.screen {
            MenuScreen::Main => match key {
                Key::Up => self.move_cursor(false),
                Key::Down => self.move_cursor(true),
                Key::Right => Some(self.open(MenuScreen::HighScores)),
                Key::Confirm | Key::Jump => self.confirm_main(),
                _ => None,
            },
            MenuScreen::DifficultySelect => match key {
                Key::Up => self.move_cursor(false),
                Key::Down => self.move_cursor(true),
                Key::Confirm | Key::Jump => {
                    let difficulty = self.selected_difficulty();
                    self.reset();
                    Some(MenuEvent::Action(MenuAction::StartGame(difficulty)))
                }
                Key::Escape => Some(self.open(MenuScreen::Main)),
                _ => None,
            },
            MenuScreen::Credits => match key {
                Key::Escape | Key::Confirm | Key::Jump => Some(self.open(MenuScreen::Main)),
                _ => None,
            },
            MenuScreen::HighScores => match key {
                Key::Escape | Key::Confirm | Key::Jump | Key::Left => {
                    Some(self.open(MenuScreen::Main))
                }
                _ => None,
            },
        }
    }

    fn confirm_main(&mut self) -> Option<MenuEvent> {
        let option = MainOption::ALL.get(self.selected).copied()?;
        let event = match option {
            MainOption::Play => self.open(MenuScreen::DifficultySelect),
            MainOption::Credits => self.open(MenuScreen::Credits),
            MainOption::Continue => MenuEvent::Action(MenuAction::Continue),
            MainOption::Explore => MenuEvent::Action(MenuAction::Explore),
            MainOption::Quit => MenuEvent::Action(MenuAction::Quit),
        };
        Some(event)
    }
}
