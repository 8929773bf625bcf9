//! Root-mean-square color aggregation.
//!
//! Block colors are averaged as `round(sqrt(sum(s²) / n))` per channel. The
//! squared mean leans toward the brighter samples, which keeps anti-aliased
//! edges from turning muddy when a block is collapsed into one pixel.

pub type Rgb = [u8; 3];

/// Converts an accumulated sum of squares over `count` samples into one sample.
#[inline]
fn rms_from_parts(sum_sq: u64, count: u64) -> u8 {
    if count == 0 {
        return 0;
    }
    let mean = sum_sq as f64 / count as f64;
    mean.sqrt().round().min(255.0) as u8
}

/// RMS average of a set of same-channel samples. Empty input yields 0.
pub fn rms_average(samples: &[u8]) -> u8 {
    let mut acc = RmsAccumulator::default();
    for &s in samples {
        acc.push(s);
    }
    acc.finish()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RmsAccumulator {
    sum_sq: u64,
    count: u64,
}

impl RmsAccumulator {
    #[inline]
    pub fn push(&mut self, sample: u8) {
        let s = sample as u64;
        self.sum_sq += s * s;
        self.count += 1;
    }

    #[inline]
    pub fn finish(&self) -> u8 {
        rms_from_parts(self.sum_sq, self.count)
    }
}

/// Three channel accumulators fed from packed pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RgbAccumulator {
    red: RmsAccumulator,
    green: RmsAccumulator,
    blue: RmsAccumulator,
}

impl RgbAccumulator {
    /// Reads the first three bytes of `pixel`; anything past them is ignored.
    #[inline]
    pub fn push_pixel(&mut self, pixel: &[u8]) {
        self.red.push(pixel[0]);
        self.green.push(pixel[1]);
        self.blue.push(pixel[2]);
    }

    #[inline]
    pub fn finish(&self) -> Rgb {
        [self.red.finish(), self.green.finish(), self.blue.finish()]
    }
}
