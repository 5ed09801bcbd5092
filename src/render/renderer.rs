use std::collections::HashSet;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Engine, Palette, Position, PowerUpKind, RandomSource};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<R: RandomSource>(
        &self,
        frame: &mut Frame,
        engine: &Engine<R>,
        metrics: &GameMetrics,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(engine, metrics);
        frame.render_widget(stats, chunks[0]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(5),
                Constraint::Percentage(90),
                Constraint::Percentage(5),
            ])
            .split(chunks[1])[1];

        if engine.is_game_over() {
            let game_over = self.render_game_over(engine, metrics);
            frame.render_widget(game_over, game_area);
        } else {
            let grid = self.render_grid(game_area, engine);
            frame.render_widget(grid, game_area);
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid<R: RandomSource>(&self, _area: Rect, engine: &Engine<R>) -> Paragraph<'_> {
        let config = engine.config();
        let head = engine.head();
        let body: HashSet<Position> = engine.snake().iter().copied().collect();
        let enemies: HashSet<Position> = engine
            .enemies()
            .iter()
            .flat_map(|enemy| enemy.body.iter().copied())
            .collect();
        let sparks: HashSet<Position> = engine
            .particles()
            .iter()
            .map(|p| {
                Position::new(
                    (p.x / config.cell_size).floor() as i32,
                    (p.y / config.cell_size).floor() as i32,
                )
            })
            .collect();

        let body_color = if engine.shield_active() {
            palette_color(Palette::Blue)
        } else {
            palette_color(Palette::Cyan)
        };

        let mut lines = Vec::with_capacity(config.grid_height);
        for y in 0..config.grid_height {
            let mut spans = Vec::with_capacity(config.grid_width);

            for x in 0..config.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if body.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(body_color))
                } else if enemies.contains(&pos) {
                    Span::styled("▓ ", Style::default().fg(palette_color(Palette::Pink)))
                } else if engine.food() == Some(pos) {
                    Span::styled(
                        "● ",
                        Style::default()
                            .fg(palette_color(Palette::Yellow))
                            .add_modifier(Modifier::BOLD),
                    )
                } else if let Some(power_up) =
                    engine.power_ups().iter().find(|p| p.position == pos)
                {
                    Span::styled(
                        format!("{} ", power_up_symbol(power_up.kind)),
                        Style::default()
                            .fg(palette_color(Palette::Purple))
                            .add_modifier(Modifier::BOLD),
                    )
                } else if sparks.contains(&pos) {
                    Span::styled("· ", Style::default().fg(palette_color(Palette::Green)))
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let title = if engine.is_paused() {
            format!(" {} - PAUSED ", engine.mode().label())
        } else {
            format!(" {} ", engine.mode().label())
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(palette_color(Palette::Cyan)))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats<R: RandomSource>(
        &self,
        engine: &Engine<R>,
        metrics: &GameMetrics,
    ) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{:06}", engine.score()),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{:06}", metrics.high_score.max(engine.score())),
                Style::default().fg(palette_color(Palette::Pink)),
            ),
            Span::raw("    "),
            Span::styled("Steps: ", Style::default().fg(Color::Yellow)),
            Span::styled(engine.steps().to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ];

        for kind in engine.effects().active_kinds() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("[{}]", kind.label()),
                Style::default()
                    .fg(palette_color(Palette::Cyan))
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_game_over<R: RandomSource>(
        &self,
        engine: &Engine<R>,
        metrics: &GameMetrics,
    ) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    engine.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Games Played: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.games_played.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Space",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart, ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("P", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("1-3", Style::default().fg(Color::Cyan)),
            Span::raw(" mode | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn palette_color(palette: Palette) -> Color {
    match palette {
        Palette::Cyan => Color::Rgb(0x00, 0xFF, 0xFF),
        Palette::Pink => Color::Rgb(0xFF, 0x00, 0xFF),
        Palette::Purple => Color::Rgb(0x9D, 0x00, 0xFF),
        Palette::Blue => Color::Rgb(0x00, 0x80, 0xFF),
        Palette::Yellow => Color::Rgb(0xFF, 0xFF, 0x00),
        Palette::Green => Color::Rgb(0x00, 0xFF, 0x00),
    }
}

fn power_up_symbol(kind: PowerUpKind) -> char {
    match kind {
        PowerUpKind::Shield => 'S',
        PowerUpKind::Magnet => 'M',
        PowerUpKind::Dash => 'D',
        PowerUpKind::Slow => 'W',
    }
}
