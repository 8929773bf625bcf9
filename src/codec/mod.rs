//! File boundary: decode images into [`PixelBuffer`]s and write them back out.
//!
//! [`PixelBuffer`]: crate::pixels::PixelBuffer

pub mod decode;
pub mod encode;

pub use decode::load_image;
pub use encode::{channels_for_path, save_image};
