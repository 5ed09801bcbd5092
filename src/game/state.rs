use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    pub fn manhattan(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// The player's snake
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction applied on the last step
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        // Add initial body segments behind the head
        let (back_dx, back_dy) = direction.opposite().delta();
        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn push_head(&mut self, head: Position) {
        self.body.insert(0, head);
    }

    pub fn pop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Named colours shared with the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Palette {
    Cyan,
    Pink,
    Purple,
    Blue,
    Yellow,
    Green,
}

/// A rival snake. Collidable, but it never moves, grows or eats.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub body: Vec<Position>,
    pub direction: Direction,
    pub color: Palette,
}

impl Enemy {
    /// Three segments hanging down from `top`, facing up
    pub fn new(top: Position) -> Self {
        Self {
            body: vec![top, top.moved_by(0, 1), top.moved_by(0, 2)],
            direction: Direction::Up,
            color: Palette::Pink,
        }
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Survive enemy contact
    Shield,
    /// Pull nearby food toward the head
    Magnet,
    /// Halve the step delay
    Dash,
    /// Stretch the step delay by half
    Slow,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Shield,
        PowerUpKind::Magnet,
        PowerUpKind::Dash,
        PowerUpKind::Slow,
    ];

    /// Ticks the effect lasts once collected
    pub fn duration(&self) -> u32 {
        match self {
            PowerUpKind::Shield | PowerUpKind::Magnet => 600,
            PowerUpKind::Dash | PowerUpKind::Slow => 300,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "SHIELD",
            PowerUpKind::Magnet => "MAGNET",
            PowerUpKind::Dash => "DASH",
            PowerUpKind::Slow => "SLOW",
        }
    }
}

/// A collectible lying on the board
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub id: u64,
    pub position: Position,
    pub kind: PowerUpKind,
    /// Ticks left before it vanishes uncollected
    pub life: u32,
    pub max_life: u32,
}

/// Cosmetic spark, simulated in screen units
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Starts at 1.0, removed once it reaches 0
    pub life: f64,
    pub decay: f64,
    pub color: Palette,
    pub size: f64,
}

impl Particle {
    /// Advance one tick. Returns false once the particle has burnt out.
    pub fn tick(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.life -= self.decay;
        self.size *= 0.95;
        self.life > 0.0
    }
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Freshly reset, no tick processed yet
    Ready,
    Running,
    Paused,
    GameOver,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake hit a rival without a shield
    Enemy,
}
