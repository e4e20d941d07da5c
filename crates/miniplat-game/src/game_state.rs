//! Top-level game state machine: Menu, Playing, Pause, GameOver, Victory.
//!
//! States are plain data. [`GameState::on_input`] is a pure function from
//! (state, input) to the [`Action`] the session should carry out, and
//! [`transition`] performs the exit/enter bookkeeping.

use serde::{Deserialize, Serialize};

use miniplat_core::events::{self, Entity};
use miniplat_core::input::TickInput;
use miniplat_core::time::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuOption {
    Start,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Menu { selected: MenuOption },
    Playing,
    Paused,
    GameOver { score: u32 },
    Victory { score: u32, elapsed_ms: Millis },
}

/// What the session should do in response to one tick of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Stay,
    /// Move the menu cursor.
    Select(MenuOption),
    StartGame,
    Enter(GameState),
    /// Hand the input to the player character.
    Control,
    Quit,
}

impl Default for GameState {
    fn default() -> Self {
        Self::menu()
    }
}

impl GameState {
    pub fn menu() -> Self {
        GameState::Menu {
            selected: MenuOption::Start,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameState::Menu { .. } => "MENU",
            GameState::Playing => "PLAYING",
            GameState::Paused => "PAUSE",
            GameState::GameOver { .. } => "GAME_OVER",
            GameState::Victory { .. } => "VICTORY",
        }
    }

    /// Only the Playing state advances the world.
    pub fn is_simulating(&self) -> bool {
        matches!(self, GameState::Playing)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, GameState::GameOver { .. } | GameState::Victory { .. })
    }

    pub fn on_input(&self, input: &TickInput) -> Action {
        match *self {
            GameState::Menu { selected } => {
                let mut choice = selected;
                if input.jump_pressed {
                    choice = MenuOption::Start;
                }
                if input.pause_pressed {
                    choice = MenuOption::Quit;
                }
                if input.attack_pressed {
                    match choice {
                        MenuOption::Start => Action::StartGame,
                        MenuOption::Quit => Action::Quit,
                    }
                } else if choice != selected {
                    Action::Select(choice)
                } else {
                    Action::Stay
                }
            },
            GameState::Playing => {
                if input.pause_pressed {
                    Action::Enter(GameState::Paused)
                } else {
                    Action::Control
                }
            },
            GameState::Paused => {
                if input.pause_pressed {
                    Action::Enter(GameState::Playing)
                } else {
                    Action::Stay
                }
            },
            GameState::GameOver { .. } | GameState::Victory { .. } => {
                if input.pause_pressed {
                    Action::Quit
                } else if input.attack_pressed {
                    Action::Enter(GameState::menu())
                } else {
                    Action::Stay
                }
            },
        }
    }

    fn exit(&self) {
        match self {
            GameState::Menu { .. } => events::gameplay("Exited Menu State"),
            GameState::GameOver { .. } => events::gameplay("Exited Game Over State"),
            GameState::Victory { .. } => events::gameplay("Exited Victory State"),
            GameState::Playing | GameState::Paused => {},
        }
    }

    fn enter(&self) {
        match self {
            GameState::Menu { .. } => events::gameplay("Entered Menu State"),
            GameState::GameOver { score } => {
                events::gameplay(&format!("Game Over! Final score: {score}"));
            },
            GameState::Victory { score, elapsed_ms } => {
                events::gameplay(&format!(
                    "Victory! Final score: {score}, Time: {}s",
                    elapsed_ms / 1000
                ));
            },
            GameState::Playing | GameState::Paused => {},
        }
    }
}

/// Replace `current` with `next`: exit the old state, log the change, enter
/// the new one.
pub fn transition(current: &mut GameState, next: GameState) {
    current.exit();
    events::state_changed(Entity::Game, current.name(), next.name());
    *current = next;
    current.enter();
}
