//! Owned and borrowed pixel storage.
//!
//! [`PixelBuffer`] is the single owner of an image's bytes, whatever produced
//! them (decoder, demo generator or resampler). It has no `Clone`; moving it
//! hands the allocation on, dropping it frees it. [`PixelView`] borrows rows
//! through an explicit stride so sub-regions of a larger buffer can be read in
//! place.

use std::borrow::Cow;

use crate::error::{PixelError, PixelResult};

fn validate_channels(channels: u8) -> PixelResult<()> {
    if matches!(channels, 3 | 4) {
        Ok(())
    } else {
        Err(PixelError::invalid(format!(
            "channel count must be 3 or 4, got {channels}"
        )))
    }
}

/// Bytes needed to hold `height` rows of `row_bytes` laid out `stride` apart.
/// The last row does not need trailing padding.
fn min_required_len(row_bytes: usize, height: usize, stride: usize) -> Option<usize> {
    if height == 0 || row_bytes == 0 {
        return Some(0);
    }
    (height - 1).checked_mul(stride)?.checked_add(row_bytes)
}

fn row_bytes(width: usize, channels: u8) -> PixelResult<usize> {
    width
        .checked_mul(channels as usize)
        .ok_or_else(|| PixelError::invalid(format!("row of {width} pixels overflows")))
}

#[derive(Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: u8,
    stride: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps tightly packed rows (`stride == width * channels`).
    pub fn from_vec(width: usize, height: usize, channels: u8, data: Vec<u8>) -> PixelResult<Self> {
        let stride = row_bytes(width, channels)?;
        Self::from_vec_with_stride(width, height, channels, stride, data)
    }

    pub fn from_vec_with_stride(
        width: usize,
        height: usize,
        channels: u8,
        stride: usize,
        data: Vec<u8>,
    ) -> PixelResult<Self> {
        validate_channels(channels)?;
        let row = row_bytes(width, channels)?;
        if stride < row {
            return Err(PixelError::invalid(format!(
                "stride {stride} is smaller than a row of {row} bytes"
            )));
        }
        let expected = stride
            .checked_mul(height)
            .ok_or_else(|| PixelError::invalid("image size overflows"))?;
        if data.len() < expected {
            return Err(PixelError::invalid(format!(
                "pixel data holds {} bytes, expected at least {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            stride,
            data,
        })
    }

    /// Allocates a zeroed, tightly packed buffer. Exhaustion is reported
    /// instead of aborting so the caller never sees a partial image.
    pub fn try_alloc(width: usize, height: usize, channels: u8) -> PixelResult<Self> {
        validate_channels(channels)?;
        let stride = width
            .checked_mul(channels as usize)
            .ok_or(PixelError::AllocationFailure { bytes: usize::MAX })?;
        let len = stride
            .checked_mul(height)
            .ok_or(PixelError::AllocationFailure { bytes: usize::MAX })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| PixelError::AllocationFailure { bytes: len })?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            channels,
            stride,
            data,
        })
    }

    /// Explicit deep copy.
    pub fn try_clone(&self) -> PixelResult<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(self.data.len())
            .map_err(|_| PixelError::AllocationFailure {
                bytes: self.data.len(),
            })?;
        data.extend_from_slice(&self.data);
        Ok(Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// True when there is nothing to render or save.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.stride * self.height]
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        let len = self.stride * self.height;
        &mut self.data[..len]
    }

    pub fn view(&self) -> PixelView<'_> {
        PixelView {
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.stride,
            data: self.as_bytes(),
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        self.view().pixel(x, y)
    }

    /// Rows without stride padding, borrowed when the buffer is already packed.
    pub fn packed_bytes(&self) -> Cow<'_, [u8]> {
        let row = self.width * self.channels as usize;
        if self.stride == row {
            return Cow::Borrowed(self.as_bytes());
        }
        let view = self.view();
        let mut out = Vec::with_capacity(row * self.height);
        for y in 0..self.height {
            out.extend_from_slice(view.row(y));
        }
        Cow::Owned(out)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PixelView<'a> {
    width: usize,
    height: usize,
    channels: u8,
    stride: usize,
    data: &'a [u8],
}

impl<'a> PixelView<'a> {
    pub fn from_slice(
        width: usize,
        height: usize,
        channels: u8,
        stride: usize,
        data: &'a [u8],
    ) -> PixelResult<Self> {
        if channels == 0 {
            return Err(PixelError::invalid("channel count must be non-zero"));
        }
        let row = row_bytes(width, channels)?;
        if stride < row {
            return Err(PixelError::invalid(format!(
                "stride {stride} is smaller than a row of {row} bytes"
            )));
        }
        let min_len = min_required_len(row, height, stride)
            .ok_or_else(|| PixelError::invalid("image size overflows"))?;
        if data.len() < min_len {
            return Err(PixelError::invalid(format!(
                "pixel data holds {} bytes, expected at least {min_len}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Row `y` without padding.
    pub fn row(&self, y: usize) -> &'a [u8] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.width * self.channels as usize]
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<&'a [u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let ch = self.channels as usize;
        let start = y * self.stride + x * ch;
        self.data.get(start..start + ch)
    }

    pub fn subview(&self, x: usize, y: usize, width: usize, height: usize) -> PixelResult<Self> {
        if x > self.width
            || y > self.height
            || width > self.width - x
            || height > self.height - y
        {
            return Err(PixelError::invalid(format!(
                "region {width}x{height}+{x}+{y} exceeds {}x{} image",
                self.width, self.height
            )));
        }
        if width == 0 || height == 0 {
            return Ok(Self {
                width,
                height,
                channels: self.channels,
                stride: self.stride,
                data: &[],
            });
        }
        let start = y * self.stride + x * self.channels as usize;
        Self::from_slice(width, height, self.channels, self.stride, &self.data[start..])
    }
}
