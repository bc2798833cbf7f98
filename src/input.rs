//! Terminal input mapping.
//!
//! Turns crossterm key and mouse events into UI-agnostic game actions.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

/// Actions the loop controller understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInput {
    Jump,    // Space, Up, or a click on the play field
    Restart, // R or Enter (only acts after game over)
    Quit,    // Q, Esc, Ctrl+C
    Other,
}

pub fn map_key(key: KeyEvent) -> GameInput {
    // Some platforms report key releases too; only presses count
    if key.kind == KeyEventKind::Release {
        return GameInput::Other;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => GameInput::Quit,
        KeyCode::Char(' ') | KeyCode::Up => GameInput::Jump,
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => GameInput::Restart,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => GameInput::Quit,
        _ => GameInput::Other,
    }
}

/// A left click inside `field` is a jump. Clicks elsewhere are ignored.
pub fn map_mouse(mouse: MouseEvent, field: Option<Rect>) -> GameInput {
    let Some(field) = field else {
        return GameInput::Other;
    };
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return GameInput::Other;
    }

    let inside = mouse.column >= field.x
        && mouse.column < field.x + field.width
        && mouse.row >= field.y
        && mouse.row < field.y + field.height;
    if inside {
        GameInput::Jump
    } else {
        GameInput::Other
    }
}
