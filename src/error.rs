use std::path::PathBuf;

use thiserror::Error;

pub type PixelResult<T> = Result<T, PixelError>;

#[derive(Error, Debug)]
pub enum PixelError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to allocate {bytes} bytes for pixel buffer")]
    AllocationFailure { bytes: usize },

    #[error("no image available")]
    NoImage,

    #[error("failed to decode '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode '{}': {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl PixelError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
