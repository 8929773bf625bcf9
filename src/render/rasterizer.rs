use crate::quad::Quad;
use rayon::prelude::*;

use super::{Layout, RenderState};

// --- Rasterizer ---

/// Framebuffer pixels whose centers fall in `[lo, hi)`, clamped to `[0, limit)`.
fn covered_span(lo: f32, hi: f32, limit: usize) -> (usize, usize) {
    let start = (lo - 0.5).ceil().max(0.0);
    let end = (hi - 0.5).ceil().max(0.0);
    let start = (start as usize).min(limit);
    let end = (end as usize).min(limit);
    (start, end.max(start))
}

/// Screen rectangle for `quad`. `gap` trims the right and bottom edges so
/// neighbouring quads are separated by background.
fn screen_rect(quad: &Quad, layout: &Layout, gap: f32) -> (f32, f32, f32, f32) {
    let x0 = layout.offset_x + quad.x0 * layout.scale;
    let y0 = layout.offset_y + quad.y0 * layout.scale;
    let x1 = layout.offset_x + quad.x1 * layout.scale - gap;
    let y1 = layout.offset_y + quad.y1 * layout.scale - gap;
    (x0, y0, x1, y1)
}

pub fn rasterize_quads(quads: &[Quad], layout: &Layout, gap: f32, render_state: &mut RenderState) {
    let width = render_state.width;
    let height = render_state.height;
    if width == 0 || height == 0 || quads.is_empty() {
        return;
    }

    let num_bands = rayon::current_num_threads();
    let band_height = height.div_ceil(num_bands);
    let actual_bands = height.div_ceil(band_height);

    // Phase 1: bin quads into every band their rows overlap.
    let mut bins: Vec<Vec<usize>> = vec![Vec::new(); actual_bands];
    for (qi, quad) in quads.iter().enumerate() {
        let (_, y0, _, y1) = screen_rect(quad, layout, gap);
        let (row_start, row_end) = covered_span(y0, y1, height);
        if row_start == row_end {
            continue;
        }
        let band_start = row_start / band_height;
        let band_end = ((row_end - 1) / band_height).min(actual_bands - 1);
        for bin in &mut bins[band_start..=band_end] {
            bin.push(qi);
        }
    }

    // Phase 2: each band fills only its own rows.
    render_state
        .framebuffer
        .par_chunks_mut(band_height * width)
        .zip(bins.par_iter())
        .enumerate()
        .for_each(|(band_idx, (band, bin))| {
            let band_y0 = band_idx * band_height;
            let band_rows = band.len() / width;
            for &qi in bin {
                let quad = &quads[qi];
                let (x0, y0, x1, y1) = screen_rect(quad, layout, gap);
                let (col_start, col_end) = covered_span(x0, x1, width);
                let (row_start, row_end) = covered_span(y0, y1, height);
                let row_start = row_start.max(band_y0);
                let row_end = row_end.min(band_y0 + band_rows);
                for y in row_start..row_end {
                    let row = (y - band_y0) * width;
                    band[row + col_start..row + col_end].fill(quad.color);
                }
            }
        });
}
