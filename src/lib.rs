//! Pixel-art resampling core.
//!
//! Shrinks an image by power-of-two block averaging until it just fits a
//! small envelope (long side >= 28, short side >= 22 by default), averaging
//! each block by root-mean-square, and optionally stamps every averaged pixel
//! back over its block for a crisp pixelated full-size image.

pub mod codec;
pub mod color;
pub mod error;
pub mod pixels;
pub mod resample;

pub use color::{rms_average, RgbAccumulator, Rgb, RmsAccumulator};
pub use error::{PixelError, PixelResult};
pub use pixels::{PixelBuffer, PixelView};
pub use resample::{
    block_divisions, block_size, resample, resample_with_block_size, OutputMode, ResampleConfig,
    Resampled, LARGE_THRESHOLD, SMALL_THRESHOLD,
};
