use super::{Layout, RenderState, Zoom, BACKGROUND};

// --- Framebuffer ---

pub fn resize_render_state(render_state: &mut RenderState, width: usize, height: usize) {
    if render_state.width == width && render_state.height == height {
        return;
    }

    render_state.width = width;
    render_state.height = height;
    render_state
        .framebuffer
        .resize(width.saturating_mul(height), BACKGROUND);
}

pub fn clear_framebuffer(render_state: &mut RenderState) {
    render_state.framebuffer.fill(BACKGROUND);
}

// --- Layout ---

/// Largest scale at which an `image_w x image_h` image fits the framebuffer.
/// Whole-number scales are preferred so every block covers the same number
/// of framebuffer pixels; images larger than the framebuffer get a fraction.
pub fn fit_scale(image_w: usize, image_h: usize, fb_w: usize, fb_h: usize) -> f32 {
    if image_w == 0 || image_h == 0 || fb_w == 0 || fb_h == 0 {
        return 1.0;
    }
    let scale = (fb_w as f32 / image_w as f32).min(fb_h as f32 / image_h as f32);
    if scale >= 1.0 {
        scale.floor()
    } else {
        scale
    }
}

pub fn compute_layout(
    image_size: (usize, usize),
    fb_size: (usize, usize),
    zoom: Zoom,
    pan: (i32, i32),
) -> Layout {
    let (image_w, image_h) = image_size;
    let (fb_w, fb_h) = fb_size;
    let scale = match zoom {
        Zoom::Fit => fit_scale(image_w, image_h, fb_w, fb_h),
        Zoom::Scale(s) => s.max(1) as f32,
    };
    let offset_x = ((fb_w as f32 - image_w as f32 * scale) * 0.5).floor() + pan.0 as f32;
    let offset_y = ((fb_h as f32 - image_h as f32 * scale) * 0.5).floor() + pan.1 as f32;
    Layout {
        scale,
        offset_x,
        offset_y,
    }
}
