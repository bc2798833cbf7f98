//! Play field rendering.
//!
//! Uses a cell buffer for per-character color control: clouds, ground,
//! obstacles and the runner are stamped into a 2D grid scaled from field
//! units to terminal cells, then emitted row-by-row as Paragraph widgets.

use super::game_common::render_status_bar;
use crate::app::App;
use crate::game::types::{
    Entity, Rect as FieldRect, FIELD_HEIGHT, FIELD_WIDTH, GROUND_DASH_LENGTH,
    GROUND_DASH_SPACING, GROUND_Y,
};
use crate::game::World;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const GROUND_LINE: char = '─';
const GROUND_DASH: char = '━';
const CLOUD_CHAR: char = '░';
const OBSTACLE_CHAR: char = '▓';
const RUNNER_CHAR: char = '█';

const INK: Color = Color::Rgb(83, 83, 83);
const RUNNER_COLOR: Color = Color::LightYellow;
const CLOUD_COLOR: Color = Color::Rgb(120, 120, 130);
const OBSTACLE_COLOR: Color = Color::Rgb(60, 140, 60);

/// Cell in the render buffer.
#[derive(Clone, Copy, PartialEq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

impl Cell {
    fn fg(ch: char, fg: Color) -> Self {
        Self {
            ch,
            fg,
            bg: Color::Reset,
        }
    }
}

/// Field-unit to terminal-cell mapping.
#[derive(Clone, Copy, Debug)]
struct Scale {
    x: f64,
    y: f64,
    cols: usize,
    rows: usize,
}

impl Scale {
    fn new(cols: u16, rows: u16) -> Self {
        Self {
            x: cols as f64 / FIELD_WIDTH,
            y: rows as f64 / FIELD_HEIGHT,
            cols: cols as usize,
            rows: rows as usize,
        }
    }

    /// Row holding the ground line.
    fn ground_row(&self) -> usize {
        ((GROUND_Y * self.y).floor() as usize).min(self.rows.saturating_sub(1))
    }

    /// Half-open cell ranges covered by a field rectangle (always at least one cell).
    fn cells(&self, rect: &FieldRect) -> (i64, i64, i64, i64) {
        let c0 = (rect.x * self.x).round() as i64;
        let c1 = ((rect.right() * self.x).round() as i64).max(c0 + 1);
        let r0 = (rect.y * self.y).round() as i64;
        let r1 = ((rect.bottom() * self.y).round() as i64).max(r0 + 1);
        (c0, c1, r0, r1)
    }
}

struct CellBuffer {
    cells: Vec<Vec<Cell>>,
    scale: Scale,
}

impl CellBuffer {
    fn new(scale: Scale) -> Self {
        Self {
            cells: vec![vec![Cell::default(); scale.cols]; scale.rows],
            scale,
        }
    }

    fn set(&mut self, col: i64, row: i64, cell: Cell) {
        if col < 0 || row < 0 {
            return;
        }
        if let Some(slot) = self
            .cells
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(col as usize))
        {
            *slot = cell;
        }
    }

    /// Fill an entity's box, stopping above the ground row.
    fn fill(&mut self, rect: &FieldRect, cell: Cell) {
        let (c0, c1, r0, r1) = self.scale.cells(rect);
        let r1 = r1.min(self.scale.ground_row() as i64);
        for row in r0..r1 {
            for col in c0..c1 {
                self.set(col, row, cell);
            }
        }
    }

    fn put_text(&mut self, col: usize, row: usize, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.set((col + i) as i64, row as i64, Cell::fg(ch, fg));
        }
    }

    #[cfg(test)]
    fn row_text(&self, row: usize) -> String {
        self.cells[row].iter().map(|c| c.ch).collect()
    }
}

/// Draw the world into `area`.
pub fn render_field(frame: &mut Frame, area: Rect, world: &World, high_score: i64) {
    if area.height < 3 || area.width < 10 {
        return;
    }
    let buffer = build_buffer(Scale::new(area.width, area.height), world, high_score);
    emit_buffer(frame, area, &buffer);
}

fn build_buffer(scale: Scale, world: &World, high_score: i64) -> CellBuffer {
    let mut buffer = CellBuffer::new(scale);

    // ── Clouds ────────────────────────────────────────────────────────
    for cloud in &world.clouds {
        buffer.fill(&cloud.bounds(), Cell::fg(CLOUD_CHAR, CLOUD_COLOR));
    }

    // ── Ground: solid line with dashes scrolling by frame count ──────
    let ground_row = scale.ground_row();
    for col in 0..scale.cols {
        buffer.set(col as i64, ground_row as i64, Cell::fg(GROUND_LINE, INK));
    }
    let phase = (world.frame_count % GROUND_DASH_SPACING) as f64;
    let mut x = 0.0;
    while x < FIELD_WIDTH {
        let dash = FieldRect::new(x + phase, GROUND_Y, GROUND_DASH_LENGTH, 1.0);
        let (c0, c1, _, _) = scale.cells(&dash);
        for col in c0..c1 {
            buffer.set(col, ground_row as i64, Cell::fg(GROUND_DASH, INK));
        }
        x += GROUND_DASH_SPACING as f64;
    }

    // ── Obstacles ─────────────────────────────────────────────────────
    for obstacle in &world.obstacles {
        buffer.fill(&obstacle.bounds(), Cell::fg(OBSTACLE_CHAR, OBSTACLE_COLOR));
    }

    // ── Runner with an eye near the front of the head ────────────────
    let runner = world.player.bounds();
    buffer.fill(&runner, Cell::fg(RUNNER_CHAR, RUNNER_COLOR));
    let eye = FieldRect::new(runner.x + 25.0, runner.y + 10.0, 8.0, 8.0);
    let (eye_col, _, eye_row, _) = scale.cells(&eye);
    if (eye_row as usize) < ground_row {
        buffer.set(
            eye_col,
            eye_row,
            Cell {
                ch: '•',
                fg: Color::Black,
                bg: RUNNER_COLOR,
            },
        );
    }

    // ── Score readout (top-right) ─────────────────────────────────────
    let readout = format!("HI {:05}  {:05}", high_score, world.score);
    let start = scale.cols.saturating_sub(readout.chars().count() + 1);
    buffer.put_text(start, 0, &readout, Color::White);

    buffer
}

fn emit_buffer(frame: &mut Frame, area: Rect, buffer: &CellBuffer) {
    for (row_idx, row_data) in buffer.cells.iter().enumerate() {
        let mut spans: Vec<Span> = Vec::new();
        let mut current_fg = Color::Reset;
        let mut current_bg = Color::Reset;
        let mut current_text = String::new();

        for &cell in row_data {
            if (cell.fg != current_fg || cell.bg != current_bg) && !current_text.is_empty() {
                spans.push(Span::styled(
                    std::mem::take(&mut current_text),
                    Style::default().fg(current_fg).bg(current_bg),
                ));
            }
            current_fg = cell.fg;
            current_bg = cell.bg;
            current_text.push(cell.ch);
        }
        if !current_text.is_empty() {
            spans.push(Span::styled(
                current_text,
                Style::default().fg(current_fg).bg(current_bg),
            ));
        }

        let row_area = Rect::new(area.x, area.y + row_idx as u16, area.width, 1);
        frame.render_widget(Paragraph::new(Line::from(spans)), row_area);
    }
}

/// Status line under the field: leaderboard messages plus control hints.
pub fn render_field_status(frame: &mut Frame, area: Rect, app: &App) {
    let status = app.leaderboard.status.as_str();
    if app.world.is_game_over() {
        let text = if status.is_empty() { "Game over" } else { status };
        render_status_bar(
            frame,
            area,
            text,
            Color::LightRed,
            &[("[R/Enter]", "Restart"), ("[Q/Esc]", "Quit")],
        );
    } else {
        let text = if status.is_empty() { "Run!" } else { status };
        render_status_bar(
            frame,
            area,
            text,
            Color::LightYellow,
            &[("[Space/Up/Click]", "Jump"), ("[Q/Esc]", "Quit")],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Obstacle;
    use crate::game::Tuning;

    fn settled_world() -> World {
        let mut world = World::with_seed(Tuning::default(), 4);
        world.tick();
        world
    }

    #[test]
    fn test_ground_row_near_bottom() {
        let scale = Scale::new(80, 20);
        assert_eq!(scale.ground_row(), 19);
        let scale = Scale::new(80, 40);
        assert_eq!(scale.ground_row(), 38);
    }

    #[test]
    fn test_runner_drawn_above_ground() {
        let scale = Scale::new(80, 20);
        let buffer = build_buffer(scale, &settled_world(), 0);

        let runner_col = (crate::game::types::PLAYER_X * scale.x).round() as usize;
        let ground = scale.ground_row();
        assert_eq!(buffer.cells[ground - 1][runner_col].ch, RUNNER_CHAR);
        assert!(buffer.row_text(ground).chars().all(|c| c == GROUND_LINE || c == GROUND_DASH));
    }

    #[test]
    fn test_ground_dashes_scroll_with_frames() {
        let scale = Scale::new(80, 20);
        let mut world = settled_world();
        let first = build_buffer(scale, &world, 0).row_text(scale.ground_row());
        for _ in 0..10 {
            world.tick();
        }
        let later = build_buffer(scale, &world, 0).row_text(scale.ground_row());
        assert_ne!(first, later);
    }

    #[test]
    fn test_offscreen_obstacle_not_drawn() {
        let scale = Scale::new(80, 20);
        let mut world = settled_world();
        let mut obs = Obstacle::with_height(50.0);
        obs.x = -100.0;
        world.obstacles.push(obs);

        let buffer = build_buffer(scale, &world, 0);
        assert!(buffer
            .cells
            .iter()
            .all(|row| row.iter().all(|c| c.ch != OBSTACLE_CHAR)));
    }

    #[test]
    fn test_score_readout() {
        let scale = Scale::new(80, 20);
        let mut world = settled_world();
        world.score = 12;
        let buffer = build_buffer(scale, &world, 345);
        assert!(buffer.row_text(0).contains("HI 00345  00012"));
    }
}
