//! Owned BGRA8888 pixel buffers and 4-channel colors
//!
//! Every buffer stores `width * height` pixels as consecutive 4-byte groups
//! in Blue, Green, Red, Alpha order. The compositor addresses channels by
//! these fixed offsets, so the layout must never change.

use crate::io::configuration::CHANNEL_STRIDE;
use crate::io::error::{MosaicError, Result, invalid_parameter};

/// Offset of the blue channel within a pixel group
pub const BLUE: usize = 0;
/// Offset of the green channel within a pixel group
pub const GREEN: usize = 1;
/// Offset of the red channel within a pixel group
pub const RED: usize = 2;
/// Offset of the alpha channel within a pixel group
pub const ALPHA: usize = 3;

/// A color with four independent 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Alpha channel
    pub a: u8,
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::from_argb(255, 255, 255, 255);
    /// Opaque black
    pub const BLACK: Self = Self::from_argb(255, 0, 0, 0);

    /// Build a color from alpha, red, green and blue channels
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Channels in buffer order (B, G, R, A)
    pub const fn to_bgra(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }

    /// Read a color from a 4-byte group in buffer order
    pub const fn from_bgra(group: [u8; 4]) -> Self {
        Self::from_argb(group[ALPHA], group[RED], group[GREEN], group[BLUE])
    }
}

/// Owned raster with a fixed width, height and BGRA8888 layout
///
/// The byte length is always `width * height * 4` and both dimensions are
/// non-zero, so every buffer holds at least one pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw BGRA bytes
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or if `data` is not
    /// exactly `width * height * 4` bytes long
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = required_len(width, height)?;
        if data.len() != expected {
            return Err(MosaicError::BufferShape {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a buffer where every pixel has the same color
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero
    pub fn filled(width: usize, height: usize, color: Color) -> Result<Self> {
        let len = required_len(width, height)?;
        let data = color
            .to_bgra()
            .iter()
            .copied()
            .cycle()
            .take(len)
            .collect();

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels (`width * height`)
    pub const fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Raw BGRA bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw BGRA bytes
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Color of the pixel at column `x`, row `y`
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * CHANNEL_STRIDE;
        read_group(&self.data, start).map(Color::from_bgra)
    }

    /// Copy the top-left `width` x `height` corner into a new buffer
    ///
    /// # Errors
    ///
    /// Returns an error if the requested size is zero or exceeds this buffer
    pub fn crop_top_left(&self, width: usize, height: usize) -> Result<Self> {
        if width > self.width || height > self.height {
            return Err(invalid_parameter(
                "crop",
                &format!("{width}x{height}"),
                &format!("exceeds buffer size {}x{}", self.width, self.height),
            ));
        }
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }

        let row_bytes = width * CHANNEL_STRIDE;
        let mut data = Vec::with_capacity(required_len(width, height)?);
        for row in self.data.chunks_exact(self.width * CHANNEL_STRIDE).take(height) {
            data.extend_from_slice(row.get(..row_bytes).unwrap_or_default());
        }

        Self::new(width, height, data)
    }
}

/// Read the 4-byte pixel group starting at `start`
pub(crate) fn read_group(data: &[u8], start: usize) -> Option<[u8; 4]> {
    data.get(start..start + CHANNEL_STRIDE)
        .and_then(|group| group.try_into().ok())
}

fn required_len(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(invalid_parameter(
            "dimensions",
            &format!("{width}x{height}"),
            &"image must have a non-zero area",
        ));
    }

    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(CHANNEL_STRIDE))
        .ok_or_else(|| {
            invalid_parameter(
                "dimensions",
                &format!("{width}x{height}"),
                &"pixel count overflows",
            )
        })
}
