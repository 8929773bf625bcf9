use std::path::Path;

use image::{ExtendedColorType, ImageFormat};
use log::info;

use crate::error::{PixelError, PixelResult};
use crate::pixels::PixelBuffer;

/// Output channel count for a destination path: 3 where the format has no
/// alpha channel, 4 (opaque alpha) otherwise.
pub fn channels_for_path(path: &Path) -> u8 {
    match ImageFormat::from_path(path) {
        Ok(ImageFormat::Jpeg) => 3,
        _ => 4,
    }
}

pub fn save_image(buffer: &PixelBuffer, path: impl AsRef<Path>) -> PixelResult<()> {
    let path = path.as_ref();
    if buffer.is_empty() {
        return Err(PixelError::NoImage);
    }
    let color = match buffer.channels() {
        3 => ExtendedColorType::Rgb8,
        4 => ExtendedColorType::Rgba8,
        other => {
            return Err(PixelError::invalid(format!(
                "cannot encode {other}-channel buffer"
            )))
        }
    };
    let width = u32::try_from(buffer.width())
        .map_err(|_| PixelError::invalid("image too wide to encode"))?;
    let height = u32::try_from(buffer.height())
        .map_err(|_| PixelError::invalid("image too tall to encode"))?;

    image::save_buffer(path, &buffer.packed_bytes(), width, height, color).map_err(|source| {
        PixelError::Encode {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!("saved {} ({}x{})", path.display(), width, height);
    Ok(())
}
