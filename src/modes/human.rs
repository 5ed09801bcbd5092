use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::info;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;

use crate::game::{Engine, GameConfig, GameMode, RandomSource, RngSource};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Nominal frame length handed to the engine as `delta_time`
const FRAME_MS: u64 = 16;
const RENDER_MS: u64 = 33;

pub struct HumanMode<R: RandomSource> {
    engine: Engine<R>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    clock: Instant,
    last_frame_ms: f64,
}

impl HumanMode<RngSource<StdRng>> {
    pub fn new(config: GameConfig, mode: GameMode, seed: Option<u64>) -> Self {
        let engine = match seed {
            Some(seed) => Engine::seeded(config, mode, seed),
            None => Engine::new(config, mode),
        };
        Self::with_engine(engine)
    }
}

impl<R: RandomSource> HumanMode<R> {
    pub fn with_engine(engine: Engine<R>) -> Self {
        Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            clock: Instant::now(),
            last_frame_ms: 0.0,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!("starting {} session", self.engine.mode().label());

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            "session closed: {} games, high score {}",
            self.metrics.games_played, self.metrics.high_score
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // The engine decides when a move is due; we only feed it frames
        let mut frame_timer = interval(Duration::from_millis(FRAME_MS));
        let mut render_timer = interval(Duration::from_millis(RENDER_MS));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = frame_timer.tick() => {
                    self.advance_frame();
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.engine, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Engine(name) => self.engine.handle_input(name),
                KeyAction::TogglePause => self.engine.toggle_pause(),
                KeyAction::SelectMode(mode) => {
                    self.engine.select_mode(mode);
                    self.metrics.on_game_start();
                }
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }

            self.metrics
                .observe(self.engine.is_game_over(), self.engine.score());
        }
    }

    fn advance_frame(&mut self) {
        let now = self.clock.elapsed().as_secs_f64() * 1000.0;
        let delta = now - self.last_frame_ms;
        self.last_frame_ms = now;

        self.tick_at(now, delta);
    }

    /// Drive the engine with an explicit clock reading in milliseconds
    fn tick_at(&mut self, now_ms: f64, delta_ms: f64) {
        self.engine.update(now_ms, delta_ms);
        self.metrics
            .observe(self.engine.is_game_over(), self.engine.score());
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
