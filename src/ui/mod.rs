//! Terminal rendering: one frame of field, status bar and side panel.

pub mod field_scene;
pub mod game_common;
pub mod side_panel;

use crate::app::App;
use game_common::{create_game_layout, render_game_over_banner};
use ratatui::{layout::Rect, style::Color, Frame};

const SIDE_PANEL_WIDTH: u16 = 30;
const FIELD_MIN_HEIGHT: u16 = 8;

/// Draw one frame. Returns the play field area so mouse clicks can be hit-tested.
pub fn draw(frame: &mut Frame, app: &App) -> Rect {
    let layout = create_game_layout(
        frame,
        frame.size(),
        " Dino Runner ",
        Color::LightYellow,
        FIELD_MIN_HEIGHT,
        SIDE_PANEL_WIDTH,
    );

    field_scene::render_field(
        frame,
        layout.content,
        &app.world,
        app.leaderboard.high_score,
    );
    if app.world.is_game_over() {
        render_game_over_banner(
            frame,
            layout.content,
            "GAME OVER",
            &format!("Score: {}", app.world.score),
            &[("[R]", "Restart"), ("[Q]", "Quit")],
        );
    }
    field_scene::render_field_status(frame, layout.status_bar, app);
    side_panel::render_side_panel(frame, layout.side_panel, app);

    layout.content
}
