use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::GameMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Forward this key name to the engine
    Engine(&'static str),
    TogglePause,
    SelectMode(GameMode),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Engine("ArrowUp"),
            KeyCode::Down => KeyAction::Engine("ArrowDown"),
            KeyCode::Left => KeyAction::Engine("ArrowLeft"),
            KeyCode::Right => KeyAction::Engine("ArrowRight"),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Engine("w"),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Engine("a"),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Engine("s"),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Engine("d"),

            // Restart after game over
            KeyCode::Enter => KeyAction::Engine("Enter"),
            KeyCode::Char(' ') => KeyAction::Engine(" "),

            // Controls
            KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::TogglePause,
            KeyCode::Char('1') => KeyAction::SelectMode(GameMode::Classic),
            KeyCode::Char('2') => KeyAction::SelectMode(GameMode::Survival),
            KeyCode::Char('3') => KeyAction::SelectMode(GameMode::TimeAttack),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
