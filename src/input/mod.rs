pub mod state;
pub mod thread;

use crossterm::event::Event;
use std::sync::mpsc::TryRecvError;

use crate::render::{AppResult, AppState, Zoom, MAX_ZOOM};
use state::{action_for_key, Action};
pub use thread::{spawn_input_thread, InputMessage, InputReceiver};

/// Applies every queued event. Returns `true` once quitting was requested.
pub fn drain_input_events(app_state: &mut AppState, input_rx: &InputReceiver) -> AppResult<bool> {
    loop {
        match input_rx.try_recv() {
            Ok(InputMessage::Event(event)) => {
                handle_input_event(app_state, event);
                if app_state.input_state.quit_requested {
                    return Ok(true);
                }
            }
            Ok(InputMessage::ReadError(err)) => {
                return Err(format!("Input thread read failed: {err}").into());
            }
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                return Err("Input channel disconnected".into());
            }
        }
    }

    Ok(app_state.input_state.quit_requested)
}

/// Whole-number scale currently on screen, the starting point for manual zoom.
fn current_scale(app_state: &AppState) -> u32 {
    match app_state.zoom {
        Zoom::Scale(s) => s,
        Zoom::Fit => (app_state.layout.scale.floor() as u32).max(1),
    }
}

pub fn apply_action(app_state: &mut AppState, action: Action) {
    match action {
        Action::Quit => app_state.input_state.quit_requested = true,
        Action::ToggleHud => app_state.show_hud = !app_state.show_hud,
        Action::ToggleGrid => app_state.show_grid = !app_state.show_grid,
        Action::ZoomIn => {
            let scale = current_scale(app_state);
            app_state.zoom = Zoom::Scale((scale + 1).min(MAX_ZOOM));
        }
        Action::ZoomOut => {
            let scale = current_scale(app_state);
            app_state.zoom = Zoom::Scale(scale.saturating_sub(1).max(1));
        }
        Action::Fit => {
            app_state.zoom = Zoom::Fit;
            app_state.pan = (0, 0);
        }
        Action::Pan(dx, dy) => {
            app_state.pan.0 += dx;
            app_state.pan.1 += dy;
        }
    }
    app_state.dirty = true;
}

pub fn handle_input_event(app_state: &mut AppState, event: Event) {
    match event {
        Event::Key(key_event) => {
            if let Some(action) = action_for_key(&key_event) {
                apply_action(app_state, action);
            }
        }
        Event::Resize(_, _) => app_state.dirty = true,
        _ => {}
    }
}
