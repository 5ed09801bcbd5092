use log::{debug, info};
use rand::rngs::StdRng;

use super::{
    action::{Command, Direction},
    config::{GameConfig, GameMode},
    effects::Effects,
    random::{RandomSource, RngSource},
    spawn::{self, Board},
    state::{
        CollisionType, Enemy, Palette, Particle, Position, PowerUp, PowerUpKind, SessionState,
        Snake,
    },
    timing,
};

const INITIAL_SNAKE_LENGTH: usize = 3;
const DEATH_BURST: usize = 15;
const FOOD_BURST: usize = 5;
const PICKUP_BURST: usize = 10;

/// What happened during a move step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Power-up collected this step
    pub power_up: Option<PowerUpKind>,
    /// Type of collision if one ended the game
    pub collision_type: Option<CollisionType>,
}

impl StepInfo {
    fn collision(collision_type: CollisionType) -> Self {
        Self {
            ate_food: false,
            power_up: None,
            collision_type: Some(collision_type),
        }
    }
}

/// The game engine. Owns every piece of session state; callers drive it
/// through [`reset`](Engine::reset), [`handle_input`](Engine::handle_input) and
/// [`update`](Engine::update) and observe it through the read-only accessors.
pub struct Engine<R: RandomSource = RngSource<StdRng>> {
    config: GameConfig,
    mode: GameMode,
    random: R,

    snake: Snake,
    next_direction: Direction,
    food: Option<Position>,
    power_ups: Vec<PowerUp>,
    particles: Vec<Particle>,
    enemies: Vec<Enemy>,
    effects: Effects,

    score: u32,
    session: SessionState,
    speed: u32,
    last_move_time: f64,
    game_time: f64,
    steps: u32,
    next_power_up_id: u64,
}

impl Engine {
    /// Create an engine backed by an entropy-seeded generator
    pub fn new(config: GameConfig, mode: GameMode) -> Self {
        Self::with_random(config, mode, RngSource::from_entropy())
    }

    pub fn seeded(config: GameConfig, mode: GameMode, seed: u64) -> Self {
        Self::with_random(config, mode, RngSource::seeded(seed))
    }
}

impl<R: RandomSource> Engine<R> {
    /// Create an engine drawing all randomness from `random`. The engine is
    /// fully reset before it is returned.
    pub fn with_random(config: GameConfig, mode: GameMode, random: R) -> Self {
        let head = Position::new(
            (config.grid_width / 2) as i32,
            (config.grid_height / 2) as i32,
        );

        let mut engine = Self {
            config,
            mode,
            random,
            snake: Snake::new(head, Direction::Up, INITIAL_SNAKE_LENGTH),
            next_direction: Direction::Up,
            food: None,
            power_ups: Vec::new(),
            particles: Vec::new(),
            enemies: Vec::new(),
            effects: Effects::default(),
            score: 0,
            session: SessionState::Ready,
            speed: mode.base_step_delay(),
            last_move_time: 0.0,
            game_time: 0.0,
            steps: 0,
            next_power_up_id: 0,
        };
        engine.reset();
        engine
    }

    /// Start a fresh session in the current mode
    pub fn reset(&mut self) {
        self.power_ups.clear();
        self.particles.clear();
        self.enemies.clear();
        self.score = 0;
        self.steps = 0;
        self.session = SessionState::Ready;

        self.effects = Effects::default();

        let center = Position::new(
            (self.config.grid_width / 2) as i32,
            (self.config.grid_height / 2) as i32,
        );
        self.snake = Snake::new(center, Direction::Up, INITIAL_SNAKE_LENGTH);
        self.next_direction = Direction::Up;

        // Enemies first: food placement avoids them
        if self.mode == GameMode::Survival {
            for _ in 0..self.config.enemy_count {
                let enemy = spawn::spawn_enemy(&self.config, center, &mut self.random);
                self.enemies.push(enemy);
            }
        }

        let board = Board::new(&self.config, &self.snake, &self.enemies, false);
        self.food = Some(spawn::spawn_food(&board, &mut self.random));

        self.speed = self.mode.base_step_delay();
        self.last_move_time = 0.0;
        self.game_time = 0.0;

        info!(
            "reset: mode={} speed={} enemies={}",
            self.mode.label(),
            self.speed,
            self.enemies.len()
        );
    }

    /// Switch ruleset. Always starts a fresh session.
    pub fn select_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.reset();
    }

    /// Feed a platform key name (`ArrowUp`, `w`, `Enter`, `" "`, ...).
    ///
    /// After a game over only `Enter` and space are honoured, and they restart.
    /// Otherwise steering keys buffer the next heading; a heading opposite to
    /// the direction applied on the last step is dropped.
    pub fn handle_input(&mut self, key: &str) {
        let Some(command) = Command::from_key(key) else {
            return;
        };

        if self.session == SessionState::GameOver {
            if command == Command::Restart {
                self.reset();
            }
            return;
        }

        if let Command::Steer(direction) = command {
            if !self.snake.direction.is_opposite(direction) {
                self.next_direction = direction;
            }
        }
    }

    /// Pause or resume. Has no effect once the game is over.
    pub fn toggle_pause(&mut self) {
        self.session = match self.session {
            SessionState::Ready | SessionState::Running => SessionState::Paused,
            SessionState::Paused => SessionState::Running,
            SessionState::GameOver => SessionState::GameOver,
        };
        debug!("session now {:?}", self.session);
    }

    /// Advance one tick.
    ///
    /// `time` is a monotonic clock in step-delay units; `delta_time` only feeds
    /// the elapsed-time counter. At most one move step runs per call, and its
    /// outcome is returned.
    pub fn update(&mut self, time: f64, delta_time: f64) -> Option<StepInfo> {
        match self.session {
            SessionState::GameOver | SessionState::Paused => return None,
            SessionState::Ready => self.session = SessionState::Running,
            SessionState::Running => {}
        }

        self.game_time += delta_time;

        self.power_ups.retain_mut(|power_up| {
            power_up.life = power_up.life.saturating_sub(1);
            power_up.life > 0
        });

        if self.random.chance(self.config.power_up_spawn_chance) {
            self.spawn_power_up();
        }

        self.effects.tick();

        let step = if timing::step_due(time, self.last_move_time, self.step_delay()) {
            self.last_move_time = time;
            Some(self.step())
        } else {
            None
        };

        self.particles.retain_mut(Particle::tick);

        step
    }

    /// Move the snake one cell and resolve everything it runs into
    fn step(&mut self) -> StepInfo {
        self.steps += 1;
        self.snake.direction = self.next_direction;
        let head = self.snake.head();
        let new_head = head.moved_in_direction(self.snake.direction);

        let board = Board::new(&self.config, &self.snake, &self.enemies, self.shield_active());
        if !board.in_bounds(new_head) {
            return self.end_game(CollisionType::Wall, head);
        }
        if board.is_blocked(new_head, true) {
            let cause = if self.snake.collides_with_body(new_head) {
                CollisionType::SelfCollision
            } else {
                CollisionType::Enemy
            };
            return self.end_game(cause, head);
        }

        self.snake.push_head(new_head);

        let ate_food = self.food == Some(new_head);
        if ate_food {
            self.score += self.config.food_score;
            self.burst(new_head, Palette::Yellow, FOOD_BURST);

            let board = Board::new(&self.config, &self.snake, &self.enemies, self.shield_active());
            self.food = Some(spawn::spawn_food(&board, &mut self.random));

            if self.speed > self.config.min_step_delay {
                self.speed -= 1;
            }
            debug!("food eaten: score={} speed={}", self.score, self.speed);
        } else if self.magnet_active() {
            self.pull_food(new_head);
        }

        let mut collected = None;
        if let Some(index) = self.power_ups.iter().position(|p| p.position == new_head) {
            let power_up = self.power_ups.remove(index);
            self.effects.activate(power_up.kind);
            self.burst(new_head, Palette::Pink, PICKUP_BURST);
            debug!("collected {} (id {})", power_up.kind.label(), power_up.id);
            collected = Some(power_up.kind);
        }

        if !ate_food {
            self.snake.pop_tail();
        }

        StepInfo {
            ate_food,
            power_up: collected,
            collision_type: None,
        }
    }

    fn end_game(&mut self, cause: CollisionType, head: Position) -> StepInfo {
        self.session = SessionState::GameOver;
        self.burst(head, Palette::Cyan, DEATH_BURST);
        debug!("game over: {:?} with score {}", cause, self.score);
        StepInfo::collision(cause)
    }

    /// Nudge food one cell toward `head`, x axis first
    fn pull_food(&mut self, head: Position) {
        let Some(food) = self.food.as_mut() else {
            return;
        };
        if food.manhattan(head) >= self.config.magnet_range {
            return;
        }

        if food.x < head.x {
            food.x += 1;
        } else if food.x > head.x {
            food.x -= 1;
        } else if food.y < head.y {
            food.y += 1;
        } else if food.y > head.y {
            food.y -= 1;
        }
    }

    fn spawn_power_up(&mut self) {
        let board = Board::new(&self.config, &self.snake, &self.enemies, self.shield_active());
        let power_up = spawn::spawn_power_up(&board, &mut self.random, self.next_power_up_id);
        self.next_power_up_id += 1;
        debug!(
            "spawned {} at ({}, {})",
            power_up.kind.label(),
            power_up.position.x,
            power_up.position.y
        );
        self.power_ups.push(power_up);
    }

    fn burst(&mut self, cell: Position, color: Palette, count: usize) {
        let particles = spawn::explosion(&self.config, cell, color, count, &mut self.random);
        self.particles.extend(particles);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    /// Snake segments, head first
    pub fn snake(&self) -> &[Position] {
        &self.snake.body
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    /// Direction applied on the last step
    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    /// Heading that the next step will commit
    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn is_game_over(&self) -> bool {
        self.session == SessionState::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.session == SessionState::Paused
    }

    pub fn shield_active(&self) -> bool {
        self.effects.is_active(PowerUpKind::Shield)
    }

    pub fn magnet_active(&self) -> bool {
        self.effects.is_active(PowerUpKind::Magnet)
    }

    pub fn dash_active(&self) -> bool {
        self.effects.is_active(PowerUpKind::Dash)
    }

    pub fn slow_active(&self) -> bool {
        self.effects.is_active(PowerUpKind::Slow)
    }

    /// Base step delay before power-up modifiers
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Step delay with dash and slow applied
    pub fn step_delay(&self) -> f64 {
        timing::effective_delay(self.speed, self.dash_active(), self.slow_active())
    }

    /// Sum of every `delta_time` seen since the last reset
    pub fn game_time(&self) -> f64 {
        self.game_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::random::SequenceSource;

    /// Never rolls a power-up; food lands in the bottom-right corner.
    fn quiet_engine(mode: GameMode) -> Engine<SequenceSource> {
        Engine::with_random(GameConfig::default(), mode, SequenceSource::constant(0.99))
    }

    fn place_power_up(engine: &mut Engine<SequenceSource>, kind: PowerUpKind, at: Position) {
        engine.power_ups.push(PowerUp {
            id: 99,
            position: at,
            kind,
            life: 600,
            max_life: 600,
        });
    }

    #[test]
    fn test_reset_layout() {
        let engine = quiet_engine(GameMode::Classic);

        assert_eq!(
            engine.snake(),
            &[Position::new(20, 15), Position::new(20, 16), Position::new(20, 17)]
        );
        assert_eq!(engine.direction(), Direction::Up);
        assert_eq!(engine.next_direction(), Direction::Up);
        assert_eq!(engine.food(), Some(Position::new(39, 29)));
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.session(), SessionState::Ready);
        assert!(engine.enemies().is_empty());
        assert!(engine.power_ups().is_empty());
        assert_eq!(engine.speed(), 120);
    }

    #[test]
    fn test_mode_speeds_and_enemies() {
        let survival = quiet_engine(GameMode::Survival);
        assert_eq!(survival.speed(), 100);
        assert_eq!(survival.enemies().len(), 2);

        let time_attack = quiet_engine(GameMode::TimeAttack);
        assert_eq!(time_attack.speed(), 80);
        assert!(time_attack.enemies().is_empty());
    }

    #[test]
    fn test_survival_enemies_keep_their_distance() {
        for seed in 0..20 {
            let engine = Engine::seeded(GameConfig::default(), GameMode::Survival, seed);
            assert_eq!(engine.enemies().len(), 2);
            for enemy in engine.enemies() {
                assert_eq!(enemy.body.len(), 3);
                assert_eq!(enemy.direction, Direction::Up);
            }
            assert!(engine.food().is_some());
        }
    }

    #[test]
    fn test_reset_clears_session() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.score = 70;
        engine.speed = 60;
        engine.effects.activate(PowerUpKind::Shield);
        engine.session = SessionState::GameOver;
        place_power_up(&mut engine, PowerUpKind::Dash, Position::new(1, 1));

        engine.reset();
        engine.reset();

        assert_eq!(engine.score(), 0);
        assert_eq!(engine.speed(), 120);
        assert!(!engine.shield_active());
        assert!(engine.power_ups().is_empty());
        assert_eq!(engine.session(), SessionState::Ready);
        assert_eq!(engine.snake().len(), 3);
    }

    #[test]
    fn test_select_mode_resets() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.score = 30;
        engine.select_mode(GameMode::Survival);

        assert_eq!(engine.mode(), GameMode::Survival);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.speed(), 100);
        assert_eq!(engine.enemies().len(), 2);
    }

    #[test]
    fn test_single_step_moves_up() {
        let mut engine = quiet_engine(GameMode::Classic);

        let step = engine.update(121.0, 16.6).expect("step should run");
        assert_eq!(step.collision_type, None);
        assert!(!step.ate_food);
        assert_eq!(engine.head(), Position::new(20, 14));

        let step = engine.update(242.0, 16.6);
        assert!(step.is_some());
        assert_eq!(engine.head(), Position::new(20, 13));
        assert_eq!(engine.snake().len(), 3);
        assert_eq!(engine.snake()[2], Position::new(20, 15));
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.session(), SessionState::Running);
    }

    #[test]
    fn test_no_step_before_delay() {
        let mut engine = quiet_engine(GameMode::Classic);
        assert!(engine.update(60.0, 16.6).is_none());
        assert!(engine.update(120.0, 16.6).is_none());
        assert_eq!(engine.head(), Position::new(20, 15));
        assert!((engine.game_time() - 33.2).abs() < 1e-9);
    }

    #[test]
    fn test_long_stall_runs_one_step() {
        let mut engine = quiet_engine(GameMode::Classic);
        assert!(engine.update(10_000.0, 16.6).is_some());
        assert_eq!(engine.head(), Position::new(20, 14));
        assert!(engine.update(10_050.0, 16.6).is_none());
    }

    #[test]
    fn test_eating_food() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.food = Some(Position::new(20, 14));

        let step = engine.update(121.0, 16.6).unwrap();

        assert!(step.ate_food);
        assert_eq!(engine.score(), 10);
        assert_eq!(engine.snake().len(), 4);
        assert_eq!(engine.snake()[3], Position::new(20, 17));
        assert_ne!(engine.food(), Some(Position::new(20, 14)));
        assert_eq!(engine.speed(), 119);
        assert!(!engine.particles().is_empty());
    }

    #[test]
    fn test_speed_floor() {
        let mut engine = quiet_engine(GameMode::Classic);
        let mut time = 0.0;
        let mut previous = engine.speed();

        for _ in 0..100 {
            engine.snake = Snake::new(Position::new(20, 15), Direction::Up, 3);
            engine.food = Some(Position::new(20, 14));
            time += 200.0;
            engine.update(time, 16.6);

            let speed = engine.speed();
            if previous > 50 {
                assert_eq!(speed, previous - 1);
            } else {
                assert_eq!(speed, 50);
            }
            previous = speed;
        }
        assert_eq!(engine.speed(), 50);
        assert_eq!(engine.score(), 1000);
    }

    #[test]
    fn test_wall_collision_freezes_state() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.snake = Snake::new(Position::new(0, 15), Direction::Left, 3);
        engine.next_direction = Direction::Left;
        let body = engine.snake().to_vec();

        let step = engine.update(121.0, 16.6).unwrap();
        assert_eq!(step.collision_type, Some(CollisionType::Wall));
        assert!(engine.is_game_over());
        assert_eq!(engine.snake(), body.as_slice());
        assert_eq!(engine.particles().len(), 15);

        assert!(engine.update(500.0, 16.6).is_none());
        assert!(engine.update(900.0, 16.6).is_none());
        assert_eq!(engine.snake(), body.as_slice());
    }

    #[test]
    fn test_right_wall() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.snake = Snake::new(Position::new(39, 5), Direction::Right, 3);
        engine.next_direction = Direction::Right;

        let step = engine.update(121.0, 16.6).unwrap();
        assert_eq!(step.collision_type, Some(CollisionType::Wall));
        assert!(engine.is_game_over());
    }

    #[test]
    fn test_self_collision_with_tail() {
        let mut engine = quiet_engine(GameMode::Classic);
        // Square loop: moving right from (5,5) lands on the tail at (6,5)
        engine.snake = Snake {
            body: vec![
                Position::new(5, 5),
                Position::new(5, 6),
                Position::new(6, 6),
                Position::new(6, 5),
            ],
            direction: Direction::Up,
        };
        engine.next_direction = Direction::Right;

        let step = engine.update(121.0, 16.6).unwrap();
        assert_eq!(step.collision_type, Some(CollisionType::SelfCollision));
        assert!(engine.is_game_over());
    }

    #[test]
    fn test_enemy_collision() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.enemies.push(Enemy::new(Position::new(20, 11)));

        engine.update(121.0, 16.6);
        assert!(!engine.is_game_over());
        let step = engine.update(242.0, 16.6).unwrap();
        // Head reached (20, 13), the enemy's tail segment
        assert_eq!(step.collision_type, Some(CollisionType::Enemy));
        assert!(engine.is_game_over());
    }

    #[test]
    fn test_shield_survives_enemy() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.enemies.push(Enemy::new(Position::new(20, 11)));
        engine.effects.activate(PowerUpKind::Shield);

        engine.update(121.0, 16.6);
        let step = engine.update(242.0, 16.6).unwrap();

        assert_eq!(step.collision_type, None);
        assert!(!engine.is_game_over());
        assert_eq!(engine.head(), Position::new(20, 13));
        assert_eq!(engine.enemies().len(), 1);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_shield_does_not_stop_walls() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.effects.activate(PowerUpKind::Shield);
        engine.snake = Snake::new(Position::new(3, 0), Direction::Up, 3);

        let step = engine.update(121.0, 16.6).unwrap();
        assert_eq!(step.collision_type, Some(CollisionType::Wall));
    }

    #[test]
    fn test_direction_reversal_rejected() {
        let mut engine = quiet_engine(GameMode::Classic);

        engine.handle_input("ArrowDown");
        assert_eq!(engine.next_direction(), Direction::Up);

        engine.handle_input("a");
        assert_eq!(engine.next_direction(), Direction::Left);

        // Checked against the applied heading, not the buffered one
        engine.handle_input("s");
        assert_eq!(engine.next_direction(), Direction::Left);
        engine.handle_input("d");
        assert_eq!(engine.next_direction(), Direction::Right);

        engine.update(121.0, 16.6);
        assert_eq!(engine.direction(), Direction::Right);
        engine.handle_input("ArrowLeft");
        assert_eq!(engine.next_direction(), Direction::Right);
    }

    #[test]
    fn test_reversal_never_buffered() {
        let keys = ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", "w", "a", "s", "d"];
        let mut engine = quiet_engine(GameMode::Classic);
        let mut time = 0.0;

        for (i, key) in keys.iter().cycle().take(64).enumerate() {
            engine.handle_input(key);
            assert!(!engine.direction().is_opposite(engine.next_direction()));
            if i % 3 == 0 {
                time += 121.0;
                engine.update(time, 16.6);
                if engine.is_game_over() {
                    engine.reset();
                }
            }
        }
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.handle_input("x");
        engine.handle_input("Enter");
        engine.handle_input("Escape");
        assert_eq!(engine.next_direction(), Direction::Up);
        assert_eq!(engine.session(), SessionState::Ready);
    }

    #[test]
    fn test_game_over_input() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.session = SessionState::GameOver;
        engine.score = 40;

        engine.handle_input("ArrowLeft");
        assert_eq!(engine.next_direction(), Direction::Up);
        assert!(engine.is_game_over());

        engine.handle_input(" ");
        assert!(!engine.is_game_over());
        assert_eq!(engine.score(), 0);

        engine.session = SessionState::GameOver;
        engine.handle_input("Enter");
        assert_eq!(engine.session(), SessionState::Ready);
    }

    #[test]
    fn test_pause() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.toggle_pause();
        assert!(engine.is_paused());

        assert!(engine.update(500.0, 16.6).is_none());
        assert_eq!(engine.head(), Position::new(20, 15));
        assert_eq!(engine.game_time(), 0.0);

        engine.toggle_pause();
        assert_eq!(engine.session(), SessionState::Running);
        assert!(engine.update(500.0, 16.6).is_some());

        engine.session = SessionState::GameOver;
        engine.toggle_pause();
        assert!(engine.is_game_over());
    }

    #[test]
    fn test_collect_shield_and_expire() {
        let mut engine = quiet_engine(GameMode::Classic);
        place_power_up(&mut engine, PowerUpKind::Shield, Position::new(20, 14));

        let step = engine.update(121.0, 16.6).unwrap();
        assert_eq!(step.power_up, Some(PowerUpKind::Shield));
        assert!(engine.shield_active());
        assert_eq!(engine.effects().get(PowerUpKind::Shield).remaining(), 600);
        assert!(engine.power_ups().is_empty());

        // Same clock reading: ticks without moves
        for _ in 0..599 {
            engine.update(121.0, 16.6);
        }
        assert!(engine.shield_active());
        engine.update(121.0, 16.6);
        assert!(!engine.shield_active());
    }

    #[test]
    fn test_recollect_resets_timer() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.effects.activate(PowerUpKind::Magnet);
        for _ in 0..100 {
            engine.update(0.0, 16.6);
        }
        assert_eq!(engine.effects().get(PowerUpKind::Magnet).remaining(), 500);

        place_power_up(&mut engine, PowerUpKind::Magnet, Position::new(20, 14));
        engine.update(121.0, 16.6);
        assert_eq!(engine.effects().get(PowerUpKind::Magnet).remaining(), 600);
    }

    #[test]
    fn test_dash_and_slow_change_cadence() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.effects.activate(PowerUpKind::Dash);
        assert_eq!(engine.step_delay(), 60.0);
        assert!(engine.update(61.0, 16.6).is_some());

        let mut engine = quiet_engine(GameMode::Classic);
        engine.effects.activate(PowerUpKind::Slow);
        assert_eq!(engine.step_delay(), 180.0);
        assert!(engine.update(150.0, 16.6).is_none());
        assert!(engine.update(181.0, 16.6).is_some());

        engine.effects.activate(PowerUpKind::Dash);
        assert_eq!(engine.step_delay(), 90.0);
    }

    #[test]
    fn test_magnet_pulls_along_x_first() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.effects.activate(PowerUpKind::Magnet);
        engine.food = Some(Position::new(24, 12));

        engine.update(121.0, 16.6);
        // Head at (20, 14), distance 6
        assert_eq!(engine.food(), Some(Position::new(23, 12)));
    }

    #[test]
    fn test_magnet_pulls_along_y() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.effects.activate(PowerUpKind::Magnet);
        engine.food = Some(Position::new(20, 10));

        engine.update(121.0, 16.6);
        assert_eq!(engine.food(), Some(Position::new(20, 11)));
    }

    #[test]
    fn test_magnet_ignores_distant_food() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.effects.activate(PowerUpKind::Magnet);
        engine.food = Some(Position::new(28, 14));

        engine.update(121.0, 16.6);
        assert_eq!(engine.food(), Some(Position::new(28, 14)));
    }

    #[test]
    fn test_power_up_expires_on_board() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.power_ups.push(PowerUp {
            id: 1,
            position: Position::new(2, 2),
            kind: PowerUpKind::Slow,
            life: 2,
            max_life: 600,
        });

        engine.update(0.0, 16.6);
        assert_eq!(engine.power_ups()[0].life, 1);
        engine.update(0.0, 16.6);
        assert!(engine.power_ups().is_empty());
    }

    #[test]
    fn test_power_up_spawn_roll() {
        let mut engine = quiet_engine(GameMode::Classic);
        // Roll under the chance, pick Shield, land on (4, 3)
        engine.random = SequenceSource::new(vec![0.001, 0.0, 0.1, 0.1, 0.99]);

        engine.update(0.0, 16.6);

        let power_ups = engine.power_ups();
        assert_eq!(power_ups.len(), 1);
        assert_eq!(power_ups[0].kind, PowerUpKind::Shield);
        assert_eq!(power_ups[0].position, Position::new(4, 3));
        assert_eq!(power_ups[0].life, 600);
    }

    #[test]
    fn test_power_up_ids_are_unique() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.random = SequenceSource::new(vec![0.001, 0.0, 0.1, 0.1]);
        for _ in 0..3 {
            engine.update(0.0, 16.6);
        }
        let mut ids: Vec<u64> = engine.power_ups().iter().map(|p| p.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_particles_fade_out() {
        let mut engine = quiet_engine(GameMode::Classic);
        engine.food = Some(Position::new(20, 14));
        engine.update(121.0, 16.6);
        assert_eq!(engine.particles().len(), 5);

        let mut previous: Vec<f64> = engine.particles().iter().map(|p| p.life).collect();
        for _ in 0..10 {
            engine.update(121.0, 16.6);
            let current: Vec<f64> = engine.particles().iter().map(|p| p.life).collect();
            for (now, before) in current.iter().zip(&previous) {
                assert!(now < before);
            }
            previous = current;
        }

        for _ in 0..30 {
            engine.update(121.0, 16.6);
        }
        assert!(engine.particles().is_empty());
    }

    #[test]
    fn test_seeded_engines_agree() {
        let mut a = Engine::seeded(GameConfig::default(), GameMode::Survival, 42);
        let mut b = Engine::seeded(GameConfig::default(), GameMode::Survival, 42);

        let mut time = 0.0;
        for _ in 0..200 {
            time += 16.6;
            a.update(time, 16.6);
            b.update(time, 16.6);
        }
        assert_eq!(a.snake(), b.snake());
        assert_eq!(a.food(), b.food());
        assert_eq!(a.power_ups(), b.power_ups());
        assert_eq!(a.is_game_over(), b.is_game_over());
    }
}
