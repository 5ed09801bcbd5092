use serde::{Deserialize, Serialize};

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// A key name understood by the engine, already parsed.
///
/// Key names follow browser conventions: `ArrowUp`, `w`, `Enter`, and a literal
/// `" "` for the space bar. Letter keys are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Buffer a new heading for the next step
    Steer(Direction),
    /// Start over after a game over
    Restart,
}

impl Command {
    /// Parse a platform key name. Unrecognised keys yield `None`.
    pub fn from_key(key: &str) -> Option<Command> {
        if key == "Enter" || key == " " {
            return Some(Command::Restart);
        }

        let direction = match key.to_lowercase().as_str() {
            "arrowup" | "w" => Direction::Up,
            "arrowdown" | "s" => Direction::Down,
            "arrowleft" | "a" => Direction::Left,
            "arrowright" | "d" => Direction::Right,
            _ => return None,
        };

        Some(Command::Steer(direction))
    }
}
