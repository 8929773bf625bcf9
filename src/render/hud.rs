use crossterm::{
    cursor, queue,
    style::{Print, SetBackgroundColor, SetForegroundColor},
};
use std::fmt::Write as _;
use std::io::{self, Write};

use super::{make_color, AppState};

const CONTROLS: &str = "+/-:Zoom  Arrows:Pan  F:Fit  G:Grid  Tab:HUD  Q/Esc:Quit";

fn truncate_and_pad_in_place(text: &mut String, width: usize) {
    if width == 0 {
        text.clear();
        return;
    }

    let mut seen_chars = 0usize;
    let mut truncate_byte = None;
    for (idx, _) in text.char_indices() {
        if seen_chars == width {
            truncate_byte = Some(idx);
            break;
        }
        seen_chars += 1;
    }

    if let Some(idx) = truncate_byte {
        text.truncate(idx);
    } else {
        for _ in seen_chars..width {
            text.push(' ');
        }
    }
}

/// Status line: image name, source and reduced sizes, block size, view settings and frame rate.
pub fn format_status(app_state: &AppState, out: &mut String) -> std::fmt::Result {
    let info = &app_state.info;
    out.clear();
    write!(
        out,
        "{}  {}x{} -> {}x{}  Block:{}  Quads:{}  Zoom:{}  Grid:{}  FPS:{:>5.1}  Redraws:{}",
        info.name,
        info.source_width,
        info.source_height,
        app_state.image.width(),
        app_state.image.height(),
        info.block_size,
        app_state.quads.len(),
        app_state.zoom.label(),
        if app_state.show_grid { "on" } else { "off" },
        app_state.fps,
        app_state.frame_count,
    )
}

pub fn draw_hud(
    app_state: &mut AppState,
    cols: u16,
    rows: u16,
    stdout: &mut impl Write,
) -> io::Result<()> {
    let width = cols as usize;
    let mut hud = std::mem::take(&mut app_state.hud_string_buf);
    format_status(app_state, &mut hud).map_err(|_| io::Error::other("failed to format HUD"))?;
    truncate_and_pad_in_place(&mut hud, width);

    let tc = app_state.use_truecolor;
    queue!(
        stdout,
        cursor::MoveTo(0, 0),
        SetBackgroundColor(make_color([0, 0, 0], tc)),
        SetForegroundColor(make_color([245, 245, 245], tc)),
        Print(hud.as_str())
    )?;

    hud.clear();
    hud.push_str(CONTROLS);
    truncate_and_pad_in_place(&mut hud, width);

    queue!(
        stdout,
        cursor::MoveTo(0, rows.saturating_sub(1)),
        SetBackgroundColor(make_color([0, 0, 0], tc)),
        SetForegroundColor(make_color([220, 220, 220], tc)),
        Print(hud.as_str())
    )?;

    app_state.hud_string_buf = hud;
    Ok(())
}
