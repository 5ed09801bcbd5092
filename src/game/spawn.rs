//! Placement of food, power-ups and enemies, plus explosion bursts.
//!
//! Placement is best effort: after the attempt budget runs out the last
//! candidate is used even if it is blocked.

use log::warn;

use super::config::GameConfig;
use super::random::RandomSource;
use super::state::{Enemy, Palette, Particle, Position, PowerUp, PowerUpKind, Snake};

/// Read-only view of what occupies the grid
pub struct Board<'a> {
    pub config: &'a GameConfig,
    pub snake: &'a Snake,
    pub enemies: &'a [Enemy],
    pub shielded: bool,
}

impl<'a> Board<'a> {
    pub fn new(config: &'a GameConfig, snake: &'a Snake, enemies: &'a [Enemy], shielded: bool) -> Self {
        Self {
            config,
            snake,
            enemies,
            shielded,
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.config.grid_width as i32
            && pos.y >= 0
            && pos.y < self.config.grid_height as i32
    }

    /// Out of bounds, on the snake, or on an enemy while unshielded.
    /// `skip_head` ignores the snake's current head cell.
    pub fn is_blocked(&self, pos: Position, skip_head: bool) -> bool {
        if !self.in_bounds(pos) {
            return true;
        }

        let body = if skip_head {
            self.snake.body_segments()
        } else {
            &self.snake.body[..]
        };
        if body.contains(&pos) {
            return true;
        }

        self.enemy_at(pos) && !self.shielded
    }

    pub fn enemy_at(&self, pos: Position) -> bool {
        self.enemies.iter().any(|enemy| enemy.occupies(pos))
    }

    /// Random cell not blocked, or the last candidate once attempts run out
    pub fn free_cell(&self, random: &mut impl RandomSource, what: &str) -> Position {
        let attempts = self.config.spawn_attempts.max(1);
        let mut candidate = random_cell(self.config, random);
        for _ in 1..attempts {
            if !self.is_blocked(candidate, false) {
                return candidate;
            }
            candidate = random_cell(self.config, random);
        }
        if self.is_blocked(candidate, false) {
            warn!(
                "no free cell for {} after {} attempts, using ({}, {})",
                what, attempts, candidate.x, candidate.y
            );
        }
        candidate
    }
}

pub fn random_cell(config: &GameConfig, random: &mut impl RandomSource) -> Position {
    let x = random.below(config.grid_width) as i32;
    let y = random.below(config.grid_height) as i32;
    Position::new(x, y)
}

pub fn spawn_food(board: &Board<'_>, random: &mut impl RandomSource) -> Position {
    board.free_cell(random, "food")
}

/// Pick a kind first, then a cell
pub fn spawn_power_up(board: &Board<'_>, random: &mut impl RandomSource, id: u64) -> PowerUp {
    let kind = PowerUpKind::ALL[random.below(PowerUpKind::ALL.len())];
    let position = board.free_cell(random, kind.label());
    let lifetime = board.config.power_up_lifetime;

    PowerUp {
        id,
        position,
        kind,
        life: lifetime,
        max_life: lifetime,
    }
}

/// Place a rival away from `head`. A candidate is rejected while it is
/// within `enemy_min_distance` of the head on both axes at once.
pub fn spawn_enemy(config: &GameConfig, head: Position, random: &mut impl RandomSource) -> Enemy {
    let too_close = |pos: Position| {
        (pos.x - head.x).abs() < config.enemy_min_distance
            && (pos.y - head.y).abs() < config.enemy_min_distance
    };

    let attempts = config.enemy_spawn_attempts.max(1);
    let mut candidate = random_cell(config, random);
    let mut tries = 1;
    while too_close(candidate) && tries < attempts {
        candidate = random_cell(config, random);
        tries += 1;
    }
    if too_close(candidate) {
        warn!(
            "enemy placed near the snake at ({}, {}) after {} attempts",
            candidate.x, candidate.y, attempts
        );
    }

    Enemy::new(candidate)
}

/// Burst of `count` particles from the centre of `cell`
pub fn explosion(
    config: &GameConfig,
    cell: Position,
    color: Palette,
    count: usize,
    random: &mut impl RandomSource,
) -> Vec<Particle> {
    let half = config.cell_size / 2.0;
    let cx = f64::from(cell.x) * config.cell_size + half;
    let cy = f64::from(cell.y) * config.cell_size + half;

    (0..count)
        .map(|_| Particle {
            x: cx,
            y: cy,
            vx: random.in_span(-4.0, 8.0),
            vy: random.in_span(-4.0, 8.0),
            life: 1.0,
            decay: random.in_span(0.02, 0.03),
            color,
            size: random.in_span(2.0, 4.0),
        })
        .collect()
}
