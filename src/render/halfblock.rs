use super::{HalfblockCell, BACKGROUND};

/// Packs framebuffer row pairs into terminal cells: the top pixel becomes the
/// cell background, the bottom pixel the `▄` foreground.
pub fn build_halfblock_cells(
    fb: &[[u8; 3]],
    fb_width: usize,
    fb_height: usize,
    term_cols: usize,
    term_rows: usize,
    out: &mut Vec<HalfblockCell>,
) {
    out.clear();
    out.resize(term_cols * term_rows, (BACKGROUND, BACKGROUND));
    let cols = term_cols.min(fb_width);
    for term_row in 0..term_rows {
        let top_y = term_row * 2;
        let bot_y = top_y + 1;
        if top_y >= fb_height {
            break;
        }
        for x in 0..cols {
            let top = fb[top_y * fb_width + x];
            let bot = if bot_y < fb_height {
                fb[bot_y * fb_width + x]
            } else {
                BACKGROUND
            };
            out[term_row * term_cols + x] = (top, bot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_rows_into_cells() {
        let fb = vec![[1, 1, 1], [2, 2, 2], [3, 3, 3], [4, 4, 4], [5, 5, 5], [6, 6, 6]];
        let mut cells = Vec::new();
        build_halfblock_cells(&fb, 2, 3, 2, 2, &mut cells);
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0], ([1, 1, 1], [3, 3, 3]));
        assert_eq!(cells[1], ([2, 2, 2], [4, 4, 4]));
        // odd framebuffer height: last cell's bottom half is background
        assert_eq!(cells[2], ([5, 5, 5], BACKGROUND));
    }
}
