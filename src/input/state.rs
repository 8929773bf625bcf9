use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

#[derive(Debug, Default)]
pub struct InputState {
    pub quit_requested: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleHud,
    ToggleGrid,
    ZoomIn,
    ZoomOut,
    Fit,
    Pan(i32, i32),
}

/// Framebuffer pixels moved per arrow key press.
pub const PAN_STEP: i32 = 4;

pub fn action_for_key(key_event: &KeyEvent) -> Option<Action> {
    if !matches!(key_event.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    let action = match key_event.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Tab => Action::ToggleHud,
        KeyCode::Up => Action::Pan(0, PAN_STEP),
        KeyCode::Down => Action::Pan(0, -PAN_STEP),
        KeyCode::Left => Action::Pan(PAN_STEP, 0),
        KeyCode::Right => Action::Pan(-PAN_STEP, 0),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Action::Quit,
            'g' => Action::ToggleGrid,
            'f' => Action::Fit,
            '+' | '=' => Action::ZoomIn,
            '-' | '_' => Action::ZoomOut,
            _ => return None,
        },
        _ => return None,
    };
    Some(action)
}
