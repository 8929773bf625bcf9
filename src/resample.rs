//! Block-average resampling down to a pixel-art sized grid.
//!
//! The source is halved until one more halving would push the long side below
//! `large_threshold` or the short side below `small_threshold`. Every
//! `block_size x block_size` block of the source then collapses into one RMS
//! averaged pixel. In [`OutputMode::Expand`] that pixel is stamped back over the
//! whole block, giving a full-size image with hard block edges.
//!
//! Columns and rows past the last whole block are dropped, so expanded output
//! can be slightly smaller than the source.

use log::debug;
use rayon::prelude::*;

use crate::color::RgbAccumulator;
use crate::error::{PixelError, PixelResult};
use crate::pixels::{PixelBuffer, PixelView};

pub const LARGE_THRESHOLD: usize = 28;
pub const SMALL_THRESHOLD: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One output pixel per block.
    #[default]
    Shrink,
    /// Each averaged pixel fills its whole block.
    Expand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResampleConfig {
    /// Minimum long side after reduction.
    pub large_threshold: usize,
    /// Minimum short side after reduction.
    pub small_threshold: usize,
    /// 3 for RGB, 4 to append an opaque alpha byte.
    pub out_channels: u8,
    pub mode: OutputMode,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            large_threshold: LARGE_THRESHOLD,
            small_threshold: SMALL_THRESHOLD,
            out_channels: 3,
            mode: OutputMode::Shrink,
        }
    }
}

#[derive(Debug)]
pub struct Resampled {
    pub buffer: PixelBuffer,
    pub block_size: usize,
}

/// Number of halvings that keep the long side >= `large` and the short side >= `small`.
/// Halving stops once the short side would drop below one pixel, whatever the thresholds.
pub fn block_divisions(width: usize, height: usize, large: usize, small: usize) -> u32 {
    let (mut w, mut h) = (width, height);
    let mut divisions = 0;
    while w.min(h) >= 2 && w.max(h) / 2 >= large && w.min(h) / 2 >= small {
        w /= 2;
        h /= 2;
        divisions += 1;
    }
    divisions
}

pub fn block_size(width: usize, height: usize, config: &ResampleConfig) -> usize {
    1usize << block_divisions(width, height, config.large_threshold, config.small_threshold)
}

pub fn resample(src: &PixelView<'_>, config: &ResampleConfig) -> PixelResult<Resampled> {
    let block_size = block_size(src.width(), src.height(), config);
    let buffer = resample_with_block_size(src, block_size, config.out_channels, config.mode)?;
    Ok(Resampled { buffer, block_size })
}

/// Reduces `src` with a caller-chosen block size.
pub fn resample_with_block_size(
    src: &PixelView<'_>,
    block_size: usize,
    out_channels: u8,
    mode: OutputMode,
) -> PixelResult<PixelBuffer> {
    if block_size == 0 {
        return Err(PixelError::invalid("block size must be at least 1"));
    }
    if src.channels() < 3 {
        return Err(PixelError::invalid(format!(
            "source needs at least 3 channels, got {}",
            src.channels()
        )));
    }
    if !matches!(out_channels, 3 | 4) {
        return Err(PixelError::invalid(format!(
            "output channel count must be 3 or 4, got {out_channels}"
        )));
    }

    let reduced_w = src.width() / block_size;
    let reduced_h = src.height() / block_size;
    let (out_w, out_h) = match mode {
        OutputMode::Shrink => (reduced_w, reduced_h),
        OutputMode::Expand => (reduced_w * block_size, reduced_h * block_size),
    };

    let mut out = PixelBuffer::try_alloc(out_w, out_h, out_channels)?;
    debug!(
        "resample {}x{} -> {}x{} (block {}, {:?}, {} channels)",
        src.width(),
        src.height(),
        out_w,
        out_h,
        block_size,
        mode,
        out_channels
    );
    if out.is_empty() {
        return Ok(out);
    }

    // One chunk per row of blocks: a single output row when shrinking,
    // `block_size` rows when expanding.
    let out_stride = out.stride();
    let rows_per_block = match mode {
        OutputMode::Shrink => 1,
        OutputMode::Expand => block_size,
    };
    let out_ch = out_channels as usize;

    out.as_bytes_mut()
        .par_chunks_mut(out_stride * rows_per_block)
        .enumerate()
        .for_each(|(j, band)| {
            for i in 0..reduced_w {
                let rgb = average_block(src, i, j, block_size);
                let mut pixel = [255u8; 4];
                pixel[..3].copy_from_slice(&rgb);
                let pixel = &pixel[..out_ch];

                match mode {
                    OutputMode::Shrink => {
                        band[i * out_ch..(i + 1) * out_ch].copy_from_slice(pixel);
                    }
                    OutputMode::Expand => {
                        for row in band.chunks_exact_mut(out_stride) {
                            let start = i * block_size * out_ch;
                            for dst in row[start..start + block_size * out_ch].chunks_exact_mut(out_ch) {
                                dst.copy_from_slice(pixel);
                            }
                        }
                    }
                }
            }
        });

    Ok(out)
}

fn average_block(src: &PixelView<'_>, i: usize, j: usize, block_size: usize) -> [u8; 3] {
    let ch = src.channels() as usize;
    let x0 = i * block_size * ch;
    let mut acc = RgbAccumulator::default();
    for y in 0..block_size {
        let row = src.row(j * block_size + y);
        for px in row[x0..x0 + block_size * ch].chunks_exact(ch) {
            acc.push_pixel(px);
        }
    }
    acc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn uniform(width: usize, height: usize, rgb: [u8; 3]) -> PixelBuffer {
        let data = rgb.repeat(width * height);
        PixelBuffer::from_vec(width, height, 3, data).expect("valid buffer")
    }

    fn random(width: usize, height: usize, seed: u64) -> PixelBuffer {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let data = (0..width * height * 3).map(|_| rng.random()).collect();
        PixelBuffer::from_vec(width, height, 3, data).expect("valid buffer")
    }

    fn expand(out_channels: u8) -> ResampleConfig {
        ResampleConfig {
            out_channels,
            mode: OutputMode::Expand,
            ..ResampleConfig::default()
        }
    }

    #[test]
    fn block_search_stops_before_either_bound() {
        assert_eq!(block_divisions(64, 64, 28, 22), 1);
        assert_eq!(block_divisions(5, 5, 28, 22), 0);
        assert_eq!(block_divisions(0, 0, 28, 22), 0);
        assert_eq!(block_divisions(0, 4096, 28, 22), 0);
        // 1024x768 -> 512x384 -> ... -> 32x24; next would be 16x12
        assert_eq!(block_divisions(1024, 768, 28, 22), 5);
        // short side is the binding constraint: 4000x50 -> 2000x25
        assert_eq!(block_divisions(4000, 50, 28, 22), 1);
    }

    #[test]
    fn zero_thresholds_still_terminate() {
        assert_eq!(block_divisions(64, 64, 0, 0), 6);
        assert_eq!(block_divisions(64, 5, 0, 0), 2);
        assert_eq!(block_divisions(0, 0, 0, 0), 0);
        let cfg = ResampleConfig {
            large_threshold: 0,
            small_threshold: 0,
            ..ResampleConfig::default()
        };
        assert_eq!(block_size(64, 64, &cfg), 64);
        let out = resample(&uniform(64, 64, [9, 8, 7]).view(), &cfg).expect("resample");
        assert_eq!((out.buffer.width(), out.buffer.height()), (1, 1));
        assert_eq!(out.buffer.pixel(0, 0), Some(&[9u8, 8, 7][..]));
    }

    #[test]
    fn block_size_keeps_reduced_grid_above_thresholds() {
        let cfg = ResampleConfig::default();
        for (w, h) in [(64, 64), (100, 100), (1920, 1080), (57, 45), (300, 47), (4032, 3024)] {
            let bs = block_size(w, h, &cfg);
            let (rw, rh) = (w / bs, h / bs);
            if bs > 1 {
                assert!(rw.max(rh) >= LARGE_THRESHOLD, "{w}x{h} bs {bs}");
                assert!(rw.min(rh) >= SMALL_THRESHOLD, "{w}x{h} bs {bs}");
            }
            // one more halving would break a bound
            let (nw, nh) = (w / (bs * 2), h / (bs * 2));
            assert!(nw.max(nh) < LARGE_THRESHOLD || nw.min(nh) < SMALL_THRESHOLD, "{w}x{h}");
        }
    }

    #[test]
    fn uniform_64_square_halves_once() {
        let src = uniform(64, 64, [200, 100, 50]);
        let out = resample(&src.view(), &ResampleConfig::default()).expect("resample");
        assert_eq!(out.block_size, 2);
        assert_eq!((out.buffer.width(), out.buffer.height()), (32, 32));
        assert_eq!(out.buffer.channels(), 3);
        for px in out.buffer.as_bytes().chunks_exact(3) {
            assert_eq!(px, &[200, 100, 50]);
        }
    }

    #[test]
    fn small_source_is_copied_unchanged() {
        let src = random(5, 5, 11);
        let out = resample(&src.view(), &ResampleConfig::default()).expect("resample");
        assert_eq!(out.block_size, 1);
        assert_eq!(out.buffer.as_bytes(), src.as_bytes());
    }

    #[test]
    fn small_source_repacked_with_alpha() {
        let src = random(6, 4, 12);
        let cfg = ResampleConfig {
            out_channels: 4,
            ..ResampleConfig::default()
        };
        let out = resample(&src.view(), &cfg).expect("resample").buffer;
        assert_eq!(out.channels(), 4);
        for (dst, srcpx) in out.as_bytes().chunks_exact(4).zip(src.as_bytes().chunks_exact(3)) {
            assert_eq!(&dst[..3], srcpx);
            assert_eq!(dst[3], 255);
        }
    }

    #[test]
    fn forced_block_of_two_takes_rms() {
        let mut data = vec![0u8; 100 * 100 * 3];
        // cell (3, 5) covers source pixels x 6..8, y 10..12
        for (x, y, v) in [(6, 10, 50u8), (7, 10, 50), (6, 11, 150), (7, 11, 150)] {
            let off = (y * 100 + x) * 3;
            data[off..off + 3].copy_from_slice(&[v, v, v]);
        }
        let src = PixelBuffer::from_vec(100, 100, 3, data).expect("valid");
        let out = resample_with_block_size(&src.view(), 2, 3, OutputMode::Shrink).expect("resample");
        assert_eq!((out.width(), out.height()), (50, 50));
        assert_eq!(out.pixel(3, 5), Some(&[112u8, 112, 112][..]));
        assert_eq!(out.pixel(4, 5), Some(&[0u8, 0, 0][..]));
    }

    #[test]
    fn expand_output_truncates_to_whole_blocks() {
        let src = random(71, 50, 3);
        let cfg = expand(3);
        let out = resample(&src.view(), &cfg).expect("resample");
        let bs = out.block_size;
        assert_eq!(bs, 2);
        assert_eq!(out.buffer.width(), (71 / bs) * bs);
        assert_eq!(out.buffer.height(), (50 / bs) * bs);
    }

    #[test]
    fn expand_blocks_are_uniform_and_match_shrink() {
        let src = random(130, 97, 4);
        let shrunk = resample(&src.view(), &ResampleConfig::default()).expect("shrink");
        let expanded = resample(&src.view(), &expand(4)).expect("expand");
        let bs = shrunk.block_size;
        assert_eq!(bs, expanded.block_size);
        assert_eq!(bs, 4);

        for j in 0..shrunk.buffer.height() {
            for i in 0..shrunk.buffer.width() {
                let cell = shrunk.buffer.pixel(i, j).expect("cell");
                for y in 0..bs {
                    for x in 0..bs {
                        let px = expanded.buffer.pixel(i * bs + x, j * bs + y).expect("px");
                        assert_eq!(&px[..3], cell);
                        assert_eq!(px[3], 255);
                    }
                }
            }
        }
    }

    #[test]
    fn every_fourth_byte_is_opaque() {
        let src = random(90, 60, 5);
        for mode in [OutputMode::Shrink, OutputMode::Expand] {
            let cfg = ResampleConfig {
                out_channels: 4,
                mode,
                ..ResampleConfig::default()
            };
            let out = resample(&src.view(), &cfg).expect("resample").buffer;
            assert!(out.as_bytes().chunks_exact(4).all(|px| px[3] == 255));
        }
    }

    #[test]
    fn fourth_source_channel_is_never_read() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        let mut rng = rand::rngs::StdRng::seed_from_u64(6);
        for _ in 0..60 * 60 {
            let rgb: [u8; 3] = rng.random();
            a.extend_from_slice(&rgb);
            a.push(0);
            b.extend_from_slice(&rgb);
            b.push(rng.random());
        }
        let a = PixelBuffer::from_vec(60, 60, 4, a).expect("valid");
        let b = PixelBuffer::from_vec(60, 60, 4, b).expect("valid");
        let cfg = ResampleConfig::default();
        let ra = resample(&a.view(), &cfg).expect("a").buffer;
        let rb = resample(&b.view(), &cfg).expect("b").buffer;
        assert_eq!(ra, rb);
    }

    #[test]
    fn identical_inputs_give_identical_bytes() {
        let src = random(257, 199, 8);
        let cfg = expand(4);
        let first = resample(&src.view(), &cfg).expect("first").buffer;
        let second = resample(&src.view(), &cfg).expect("second").buffer;
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn sub_region_uses_parent_stride() {
        let big = random(120, 80, 9);
        let region = big.view().subview(10, 6, 64, 64).expect("region");
        let out = resample(&region, &ResampleConfig::default()).expect("resample").buffer;

        let mut packed = Vec::new();
        for y in 0..64 {
            packed.extend_from_slice(region.row(y));
        }
        let copy = PixelBuffer::from_vec(64, 64, 3, packed).expect("valid");
        let expected = resample(&copy.view(), &ResampleConfig::default()).expect("resample").buffer;
        assert_eq!(out, expected);
    }

    #[test]
    fn empty_source_gives_empty_output() {
        let src = PixelBuffer::from_vec(0, 10, 3, Vec::new()).expect("valid");
        let out = resample(&src.view(), &expand(4)).expect("resample");
        assert_eq!(out.block_size, 1);
        assert!(out.buffer.is_empty());
        assert!(out.buffer.as_bytes().is_empty());
    }

    #[test]
    fn rejects_bad_parameters() {
        let src = uniform(8, 8, [1, 2, 3]);
        assert!(matches!(
            resample_with_block_size(&src.view(), 0, 3, OutputMode::Shrink),
            Err(PixelError::InvalidInput(_))
        ));
        assert!(matches!(
            resample_with_block_size(&src.view(), 2, 5, OutputMode::Shrink),
            Err(PixelError::InvalidInput(_))
        ));
        let gray = [0u8; 16];
        let view = PixelView::from_slice(4, 4, 1, 4, &gray).expect("view");
        assert!(matches!(
            resample(&view, &ResampleConfig::default()),
            Err(PixelError::InvalidInput(_))
        ));
    }
}
