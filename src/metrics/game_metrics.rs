use std::time::{Duration, Instant};

/// Frontend bookkeeping the engine deliberately leaves out: wall-clock time
/// of the current run, high score and number of finished games.
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    was_game_over: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            was_game_over: false,
        }
    }

    pub fn update(&mut self) {
        if !self.was_game_over {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.was_game_over = false;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        self.was_game_over = true;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    /// Feed the engine's game-over flag after every input or tick; edges
    /// trigger `on_game_over` and `on_game_start`.
    pub fn observe(&mut self, game_over: bool, score: u32) {
        match (self.was_game_over, game_over) {
            (false, true) => self.on_game_over(score),
            (true, false) => self.on_game_start(),
            _ => {}
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
