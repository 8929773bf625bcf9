use rand::Rng;
use std::f32::consts::TAU;

use pixelpoint::{PixelBuffer, PixelResult};

pub const DEMO_WIDTH: usize = 320;
pub const DEMO_HEIGHT: usize = 240;

fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn hsv_to_rgb(hue: f32, sat: f32, val: f32) -> [u8; 3] {
    let h = (hue.rem_euclid(360.0)) / 60.0;
    let c = val * sat;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = val - c;
    [
        clamp_u8((r + m) * 255.0),
        clamp_u8((g + m) * 255.0),
        clamp_u8((b + m) * 255.0),
    ]
}

fn mix(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    [
        clamp_u8(a[0] as f32 + (b[0] as f32 - a[0] as f32) * t),
        clamp_u8(a[1] as f32 + (b[1] as f32 - a[1] as f32) * t),
        clamp_u8(a[2] as f32 + (b[2] as f32 - a[2] as f32) * t),
    ]
}

// --- Demo scene: sky gradient, anti-aliased sun, two hill layers, speckles ---

fn scene_pixel(x: usize, y: usize, width: usize, height: usize) -> [u8; 3] {
    let fx = x as f32 + 0.5;
    let fy = y as f32 + 0.5;
    let w = width as f32;
    let h = height as f32;

    let sky_t = fy / h;
    let mut color = mix(hsv_to_rgb(215.0, 0.65, 0.55), hsv_to_rgb(30.0, 0.55, 1.0), sky_t * 1.4);

    let (sun_x, sun_y, sun_r) = (w * 0.68, h * 0.38, h * 0.16);
    let dist = ((fx - sun_x).powi(2) + (fy - sun_y).powi(2)).sqrt();
    let coverage = (sun_r + 0.5 - dist).clamp(0.0, 1.0);
    color = mix(color, [255, 214, 96], coverage);

    let far_hill = h * 0.66 + (fx / w * TAU * 1.5).sin() * h * 0.06;
    color = mix(color, hsv_to_rgb(150.0, 0.45, 0.45), fy - far_hill + 0.5);

    let near_hill = h * 0.78 + (fx / w * TAU * 0.8 + 1.3).sin() * h * 0.08;
    mix(color, hsv_to_rgb(110.0, 0.70, 0.35), fy - near_hill + 0.5)
}

pub fn paint_demo_scene(width: usize, height: usize, rng: &mut impl Rng) -> PixelResult<PixelBuffer> {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let mut px = scene_pixel(x, y, width, height);
            // sparse flowers on the near hill
            if y > height * 4 / 5 && rng.random_bool(0.01) {
                px = hsv_to_rgb(rng.random_range(0.0_f32..360.0_f32), 0.6, 1.0);
            }
            data.extend_from_slice(&px);
        }
    }
    PixelBuffer::from_vec(width, height, 3, data)
}

pub fn generate_demo_image() -> PixelResult<PixelBuffer> {
    let mut rng = rand::rng();
    paint_demo_scene(DEMO_WIDTH, DEMO_HEIGHT, &mut rng)
}
