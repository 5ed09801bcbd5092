use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Ruleset selected for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    #[default]
    Classic,
    /// Rival snakes sit on the board as obstacles
    Survival,
    TimeAttack,
}

impl GameMode {
    /// Starting step delay for this mode (smaller is faster)
    pub fn base_step_delay(&self) -> u32 {
        match self {
            GameMode::Classic => 120,
            GameMode::Survival => 100,
            GameMode::TimeAttack => 80,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Survival => "Survival",
            GameMode::TimeAttack => "Time Attack",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid must be at least {min}x{min}, got {width}x{height}")]
    GridTooSmall { width: usize, height: usize, min: usize },

    #[error("cell size must be positive")]
    ZeroCellSize,

    #[error("power-up spawn chance must lie in [0, 1], got {0}")]
    SpawnChance(f64),

    #[error("{0} must be at least 1")]
    ZeroAttempts(&'static str),

    #[error("failed to read config {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Screen units per cell; particles are simulated in screen units
    pub cell_size: f64,

    /// Score awarded per food
    pub food_score: u32,
    /// Floor for the step delay as food speeds the game up
    pub min_step_delay: u32,

    /// Per-tick probability of a new power-up appearing
    pub power_up_spawn_chance: f64,
    /// Ticks a power-up stays on the board uncollected
    pub power_up_lifetime: u32,

    /// Placement attempts for food and power-ups before settling
    pub spawn_attempts: u32,
    /// Placement attempts for enemies before settling
    pub enemy_spawn_attempts: u32,
    /// Enemies are rejected when closer than this on both axes
    pub enemy_min_distance: i32,
    /// Enemies placed at the start of a Survival session
    pub enemy_count: usize,

    /// Manhattan range within which the magnet pulls food
    pub magnet_range: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 30,
            cell_size: 20.0,
            food_score: 10,
            min_step_delay: 50,
            power_up_spawn_chance: 0.005,
            power_up_lifetime: 600,
            spawn_attempts: 100,
            enemy_spawn_attempts: 20,
            enemy_min_distance: 10,
            enemy_count: 2,
            magnet_range: 8,
        }
    }
}

impl GameConfig {
    pub const MIN_GRID: usize = 5;

    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Check that the engine can run with these values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < Self::MIN_GRID || self.grid_height < Self::MIN_GRID {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
                min: Self::MIN_GRID,
            });
        }
        if self.cell_size <= 0.0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if !(0.0..=1.0).contains(&self.power_up_spawn_chance) {
            return Err(ConfigError::SpawnChance(self.power_up_spawn_chance));
        }
        if self.spawn_attempts == 0 {
            return Err(ConfigError::ZeroAttempts("spawn_attempts"));
        }
        if self.enemy_spawn_attempts == 0 {
            return Err(ConfigError::ZeroAttempts("enemy_spawn_attempts"));
        }
        Ok(())
    }

    /// Load and validate a JSON config. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
