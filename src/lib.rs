//! Neon Snake - an arcade snake with power-ups and rival obstacles
//!
//! This library provides:
//! - Core game engine (game module), free of I/O
//! - Terminal input mapping (input module)
//! - TUI rendering (render module)
//! - Session metrics for the frontend (metrics module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
