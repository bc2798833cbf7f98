//! Right-hand column: score readouts and the leaderboard list.

use super::game_common::render_panel_frame;
use crate::app::App;
use crate::leaderboard::board::{LOADING_TEXT, LOAD_FAILED_TEXT, NO_SCORES_TEXT, OFFLINE_TEXT};
use crate::leaderboard::PanelState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render_side_panel(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(area);

    render_stats(frame, chunks[0], app);
    render_leaderboard(frame, chunks[1], &app.leaderboard.panel);
}

fn render_stats(frame: &mut Frame, area: Rect, app: &App) {
    let inner = render_panel_frame(frame, area, " Run ");
    let label = Style::default().fg(Color::DarkGray);

    let lines = vec![
        Line::from(vec![
            Span::styled("Score:      ", label),
            Span::styled(
                app.world.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("High Score: ", label),
            Span::styled(
                app.leaderboard.high_score.to_string(),
                Style::default().fg(Color::LightYellow),
            ),
        ]),
        Line::from(vec![
            Span::styled("Speed:      ", label),
            Span::styled(
                format!("{:.1}", app.world.speed),
                Style::default().fg(Color::White),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_leaderboard(frame: &mut Frame, area: Rect, panel: &PanelState) {
    let inner = render_panel_frame(frame, area, " Leaderboard ");
    let muted = Style::default().fg(Color::DarkGray);

    let lines: Vec<Line> = match panel {
        PanelState::Loading => vec![Line::from(Span::styled(LOADING_TEXT, muted))],
        PanelState::Offline => vec![Line::from(Span::styled(OFFLINE_TEXT, muted))],
        PanelState::Empty => vec![Line::from(Span::styled(NO_SCORES_TEXT, muted))],
        PanelState::Unavailable => vec![Line::from(Span::styled(
            LOAD_FAILED_TEXT,
            Style::default().fg(Color::Red),
        ))],
        PanelState::Rows(rows) => rows
            .iter()
            .take(inner.height as usize)
            .map(|row| {
                let label = row.label();
                let pad = (inner.width as usize).saturating_sub(label.len() + row.date.len());
                Line::from(vec![
                    Span::styled(label, Style::default().fg(Color::White)),
                    Span::raw(" ".repeat(pad)),
                    Span::styled(row.date.clone(), muted),
                ])
            })
            .collect(),
    };

    frame.render_widget(Paragraph::new(lines), inner);
}
