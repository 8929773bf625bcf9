use pixelpoint::PixelBuffer;

/// Flat-colored axis-aligned rectangle in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub color: [u8; 3],
}

/// Quads for the image currently on screen. Owned by the view state and
/// cleared explicitly before every rebuild.
#[derive(Debug, Default)]
pub struct QuadBatch {
    quads: Vec<Quad>,
    width: usize,
    height: usize,
}

impl QuadBatch {
    pub fn reset(&mut self) {
        self.quads.clear();
        self.width = 0;
        self.height = 0;
    }

    /// One unit quad per pixel of `image`, row-major, top to bottom.
    pub fn rebuild(&mut self, image: &PixelBuffer) {
        self.reset();
        self.width = image.width();
        self.height = image.height();
        self.quads.reserve(self.width * self.height);

        let view = image.view();
        let ch = image.channels() as usize;
        for y in 0..self.height {
            for (x, px) in view.row(y).chunks_exact(ch).enumerate() {
                self.quads.push(Quad {
                    x0: x as f32,
                    y0: y as f32,
                    x1: x as f32 + 1.0,
                    y1: y as f32 + 1.0,
                    color: [px[0], px[1], px[2]],
                });
            }
        }
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Extent of the batch in image pixels.
    pub fn extent(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuild_emits_one_quad_per_pixel_in_row_order() {
        let image = PixelBuffer::from_vec(2, 2, 4, vec![
            1, 2, 3, 255, 4, 5, 6, 255, //
            7, 8, 9, 255, 10, 11, 12, 255,
        ])
        .expect("valid");
        let mut batch = QuadBatch::default();
        batch.rebuild(&image);

        assert_eq!(batch.len(), 4);
        assert_eq!(batch.extent(), (2, 2));
        let q = batch.quads()[3];
        assert_eq!((q.x0, q.y0, q.x1, q.y1), (1.0, 1.0, 2.0, 2.0));
        assert_eq!(q.color, [10, 11, 12]);
    }

    #[test]
    fn rebuild_replaces_previous_contents() {
        let mut batch = QuadBatch::default();
        let big = PixelBuffer::from_vec(3, 3, 3, vec![0; 27]).expect("valid");
        let small = PixelBuffer::from_vec(1, 1, 3, vec![9, 9, 9]).expect("valid");
        batch.rebuild(&big);
        batch.rebuild(&small);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.quads()[0].color, [9, 9, 9]);

        batch.reset();
        assert!(batch.is_empty());
        assert_eq!(batch.extent(), (0, 0));
    }
}
