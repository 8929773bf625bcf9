use std::path::Path;

use image::DynamicImage;
use log::info;

use crate::error::{PixelError, PixelResult};
use crate::pixels::PixelBuffer;

/// Decodes any supported format into packed RGB8. Alpha, if any, is dropped.
pub fn load_image(path: impl AsRef<Path>) -> PixelResult<PixelBuffer> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| PixelError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let buffer = rgb_buffer_from_dynamic(img)?;
    info!(
        "loaded {} ({}x{})",
        path.display(),
        buffer.width(),
        buffer.height()
    );
    Ok(buffer)
}

fn rgb_buffer_from_dynamic(img: DynamicImage) -> PixelResult<PixelBuffer> {
    let rgb = img.into_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(PixelError::NoImage);
    }
    PixelBuffer::from_vec(width as usize, height as usize, 3, rgb.into_raw())
}
