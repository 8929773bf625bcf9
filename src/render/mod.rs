pub mod frame;
mod halfblock;
pub mod hud;
pub mod pipeline;
pub mod rasterizer;

use crossterm::style::Color;
use pixelpoint::PixelBuffer;
use std::time::Instant;

use crate::input::state::InputState;
use crate::quad::QuadBatch;

pub fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        if r < 8 {
            return 16;
        }
        if r > 248 {
            return 231;
        }
        return 232 + ((r as f32 - 8.0) / 247.0 * 24.0) as u8;
    }
    let ri = (r as f32 / 255.0 * 5.0 + 0.5) as u8;
    let gi = (g as f32 / 255.0 * 5.0 + 0.5) as u8;
    let bi = (b as f32 / 255.0 * 5.0 + 0.5) as u8;
    16 + 36 * ri + 6 * gi + bi
}

pub fn make_color(rgb: [u8; 3], use_truecolor: bool) -> Color {
    if use_truecolor {
        Color::Rgb {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
        }
    } else {
        Color::AnsiValue(rgb_to_ansi256(rgb[0], rgb[1], rgb[2]))
    }
}

pub type AppResult<T> = Result<T, Box<dyn std::error::Error>>;
pub type HalfblockCell = ([u8; 3], [u8; 3]);

pub const HALF_BLOCK: char = '\u{2584}';
pub const FRAME_TARGET: std::time::Duration = std::time::Duration::from_millis(16);
pub const BACKGROUND: [u8; 3] = [18, 18, 22];
pub const MAX_ZOOM: u32 = 64;

#[derive(Debug, Default)]
pub struct RenderState {
    pub framebuffer: Vec<[u8; 3]>,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zoom {
    /// Largest scale that shows the whole image.
    Fit,
    /// Framebuffer pixels per image pixel.
    Scale(u32),
}

impl Zoom {
    pub fn label(&self) -> String {
        match self {
            Self::Fit => "fit".to_string(),
            Self::Scale(s) => format!("{s}x"),
        }
    }
}

/// Where the image lands in the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// What the HUD reports about the loaded image.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub name: String,
    pub source_width: usize,
    pub source_height: usize,
    pub block_size: usize,
}

#[derive(Debug)]
pub struct AppState {
    pub info: ImageInfo,
    pub image: PixelBuffer,
    pub quads: QuadBatch,
    pub render_state: RenderState,
    pub layout: Layout,
    pub halfblock_cells: Vec<HalfblockCell>,
    pub hud_string_buf: String,
    pub input_state: InputState,
    pub show_hud: bool,
    pub show_grid: bool,
    pub zoom: Zoom,
    pub pan: (i32, i32),
    pub dirty: bool,
    pub last_terminal_size: (u16, u16),
    pub frame_count: u64,
    pub fps: f32,
    pub last_frame_time: Instant,
    pub use_truecolor: bool,
}

impl AppState {
    /// Takes ownership of the reduced image and builds its quads.
    pub fn new(image: PixelBuffer, info: ImageInfo, use_truecolor: bool) -> Self {
        let mut quads = QuadBatch::default();
        quads.rebuild(&image);
        Self {
            info,
            image,
            quads,
            render_state: RenderState::default(),
            layout: Layout::default(),
            halfblock_cells: Vec::new(),
            hud_string_buf: String::with_capacity(256),
            input_state: InputState::default(),
            show_hud: true,
            show_grid: false,
            zoom: Zoom::Fit,
            pan: (0, 0),
            dirty: true,
            last_terminal_size: (0, 0),
            frame_count: 0,
            fps: 0.0,
            last_frame_time: Instant::now(),
            use_truecolor,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_state(width: usize, height: usize) -> AppState {
    let data = (0..width * height * 3).map(|v| (v * 7 % 256) as u8).collect();
    let image = PixelBuffer::from_vec(width, height, 3, data).expect("valid buffer");
    AppState::new(
        image,
        ImageInfo {
            name: "test".to_string(),
            source_width: width * 4,
            source_height: height * 4,
            block_size: 4,
        },
        true,
    )
}
