//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The [`Engine`] is driven by key names and clock readings, which keeps it usable
//! from the terminal frontend and from deterministic tests alike.

pub mod action;
pub mod config;
pub mod effects;
pub mod engine;
pub mod random;
pub mod spawn;
pub mod state;
pub mod timing;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::{ConfigError, GameConfig, GameMode};
pub use effects::{EffectTimer, Effects};
pub use engine::{Engine, StepInfo};
pub use random::{RandomSource, RngSource, SequenceSource};
pub use state::{
    CollisionType, Enemy, Palette, Particle, Position, PowerUp, PowerUpKind, SessionState, Snake,
};
