use crossterm::{
    cursor, queue,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use std::io::{self, Write};
use std::time::Instant;

use crate::input::{drain_input_events, InputReceiver};

use super::{make_color, AppResult, AppState, FRAME_TARGET, HALF_BLOCK};

/// Rows taken by the HUD overlay, if shown.
pub fn is_hud_overlay_row(show_hud: bool, row: usize, term_rows: usize) -> bool {
    show_hud && (row == 0 || row == term_rows.saturating_sub(1))
}

/// Grid gap in framebuffer pixels; only drawn when blocks are big enough to
/// survive losing a row and column.
fn grid_gap(show_grid: bool, scale: f32) -> f32 {
    if show_grid && scale >= 3.0 {
        1.0
    } else {
        0.0
    }
}

/// Rasterizes the quads into the framebuffer and rebuilds the half-block cells.
pub fn prepare_frame(app_state: &mut AppState, term_cols: usize, term_rows: usize) {
    let fb_width = term_cols;
    let fb_height = term_rows * 2;

    super::pipeline::resize_render_state(&mut app_state.render_state, fb_width, fb_height);
    super::pipeline::clear_framebuffer(&mut app_state.render_state);

    app_state.layout = super::pipeline::compute_layout(
        app_state.quads.extent(),
        (fb_width, fb_height),
        app_state.zoom,
        app_state.pan,
    );
    if !app_state.quads.is_empty() {
        let gap = grid_gap(app_state.show_grid, app_state.layout.scale);
        super::rasterizer::rasterize_quads(
            app_state.quads.quads(),
            &app_state.layout,
            gap,
            &mut app_state.render_state,
        );
    }

    super::halfblock::build_halfblock_cells(
        &app_state.render_state.framebuffer,
        fb_width,
        fb_height,
        term_cols,
        term_rows,
        &mut app_state.halfblock_cells,
    );
}

pub fn render_frame(
    app_state: &mut AppState,
    terminal_size: (u16, u16),
    stdout: &mut impl Write,
) -> io::Result<()> {
    let cols = terminal_size.0.max(1);
    let rows = terminal_size.1.max(1);
    let term_cols = cols as usize;
    let term_rows = rows as usize;

    prepare_frame(app_state, term_cols, term_rows);

    let tc = app_state.use_truecolor;
    let cells = &app_state.halfblock_cells;
    let mut last_bg: Option<[u8; 3]> = None;
    let mut last_fg: Option<[u8; 3]> = None;

    for term_row in 0..term_rows {
        if is_hud_overlay_row(app_state.show_hud, term_row, term_rows) {
            last_bg = None;
            last_fg = None;
            continue;
        }

        queue!(stdout, cursor::MoveTo(0, term_row as u16))?;
        for x in 0..term_cols {
            let (top, bottom) = cells[term_row * term_cols + x];
            if last_bg != Some(top) {
                queue!(stdout, SetBackgroundColor(make_color(top, tc)))?;
                last_bg = Some(top);
            }
            if last_fg != Some(bottom) {
                queue!(stdout, SetForegroundColor(make_color(bottom, tc)))?;
                last_fg = Some(bottom);
            }
            queue!(stdout, Print(HALF_BLOCK))?;
        }
    }

    if app_state.show_hud {
        super::hud::draw_hud(app_state, cols, rows, stdout)?;
    }

    queue!(stdout, ResetColor)?;
    stdout.flush()
}

/// Smoothed loop rate, seeded with the first sample.
fn update_fps(app_state: &mut AppState, now: Instant) {
    let delta_time = now
        .duration_since(app_state.last_frame_time)
        .as_secs_f32()
        .max(1e-6);
    app_state.last_frame_time = now;
    let instant_fps = 1.0 / delta_time;
    app_state.fps = if app_state.fps <= 0.01 {
        instant_fps
    } else {
        0.90 * app_state.fps + 0.10 * instant_fps
    };
}

/// Redraws only when input or a terminal resize changed something, sleeping
/// out the rest of each frame slot.
pub fn run_app_loop(
    app_state: &mut AppState,
    input_rx: &InputReceiver,
    stdout: &mut impl Write,
) -> AppResult<()> {
    loop {
        let frame_start = Instant::now();

        if drain_input_events(app_state, input_rx)? {
            break;
        }
        update_fps(app_state, frame_start);

        let terminal_size = terminal::size()?;
        if terminal_size != app_state.last_terminal_size {
            app_state.last_terminal_size = terminal_size;
            app_state.dirty = true;
        }

        if app_state.dirty {
            render_frame(app_state, terminal_size, stdout)?;
            app_state.dirty = false;
            app_state.frame_count += 1;
        }

        let spent = frame_start.elapsed();
        if spent < FRAME_TARGET {
            std::thread::sleep(FRAME_TARGET - spent);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{test_state, Zoom};
    use std::time::Duration;

    #[test]
    fn hud_rows_are_first_and_last() {
        assert!(is_hud_overlay_row(true, 0, 10));
        assert!(is_hud_overlay_row(true, 9, 10));
        assert!(!is_hud_overlay_row(true, 5, 10));
        assert!(!is_hud_overlay_row(false, 0, 10));
    }

    #[test]
    fn prepared_frame_shows_image_pixels_at_fit_scale() {
        let mut app = test_state(4, 2);
        prepare_frame(&mut app, 20, 5);
        // 4x2 image in 20x10 framebuffer -> scale 5, offset (0, 0)
        assert_eq!(app.layout.scale, 5.0);
        assert_eq!(app.halfblock_cells.len(), 100);
        let first = app.image.pixel(0, 0).expect("pixel");
        let (top, bottom) = app.halfblock_cells[0];
        assert_eq!(&top[..], first);
        assert_eq!(&bottom[..], first);
    }

    #[test]
    fn fps_is_seeded_then_smoothed() {
        let mut app = test_state(2, 2);
        let start = app.last_frame_time;
        update_fps(&mut app, start + Duration::from_millis(20));
        assert!((app.fps - 50.0).abs() < 0.5);
        update_fps(&mut app, start + Duration::from_millis(30));
        // 0.9 * 50 + 0.1 * 100
        assert!((app.fps - 55.0).abs() < 0.5);
    }

    #[test]
    fn grid_gap_needs_large_blocks() {
        assert_eq!(grid_gap(true, 2.0), 0.0);
        assert_eq!(grid_gap(true, 3.0), 1.0);
        assert_eq!(grid_gap(false, 8.0), 0.0);
    }

    #[test]
    fn render_writes_ansi_output() {
        let mut app = test_state(3, 3);
        app.zoom = Zoom::Scale(2);
        let mut out: Vec<u8> = Vec::new();
        render_frame(&mut app, (12, 6), &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains(HALF_BLOCK));
        assert!(text.contains("test"));
    }
}
