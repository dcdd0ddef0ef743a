//! Pixel reads and writes at byte offsets
//!
//! All region arguments are [`ByteOffsets`], the output of scaling a
//! [`PixelIndices`](crate::spatial::regions::PixelIndices) list by the
//! channel stride. Each offset addresses the first byte of a 4-byte group.

use crate::io::configuration::{CHANNEL_STRIDE, LUMINANCE_THRESHOLD};
use crate::io::error::{MosaicError, Result};
use crate::raster::buffer::{ALPHA, BLUE, Color, GREEN, PixelBuffer, RED, read_group};
use crate::spatial::regions::ByteOffsets;

/// Unweighted mean of each channel, truncated toward zero
///
/// Averages the pixel groups at `offsets`, or the whole buffer when
/// `offsets` is `None`.
///
/// # Errors
///
/// Returns an error if the region is empty or an offset is out of bounds
pub fn average_color(buffer: &PixelBuffer, offsets: Option<&ByteOffsets>) -> Result<Color> {
    let bytes = buffer.as_bytes();
    let mut totals = [0_u64; 4];

    let count = match offsets {
        Some(offsets) => {
            for &offset in offsets.as_slice() {
                let group = read_group(bytes, offset).ok_or(MosaicError::OffsetOutOfBounds {
                    offset,
                    buffer_len: bytes.len(),
                })?;
                accumulate(&mut totals, group);
            }
            offsets.len()
        }
        None => {
            for group in bytes.chunks_exact(CHANNEL_STRIDE) {
                if let Ok(group) = group.try_into() {
                    accumulate(&mut totals, group);
                }
            }
            buffer.pixel_count()
        }
    };

    if count == 0 {
        return Err(MosaicError::EmptyRegion);
    }

    let mean = |channel: usize| (totals.get(channel).copied().unwrap_or(0) / count as u64) as u8;
    Ok(Color::from_argb(
        mean(ALPHA),
        mean(RED),
        mean(GREEN),
        mean(BLUE),
    ))
}

fn accumulate(totals: &mut [u64; 4], group: [u8; 4]) {
    for (total, value) in totals.iter_mut().zip(group) {
        *total += u64::from(value);
    }
}

/// Write `color` at every offset
///
/// # Errors
///
/// Returns an error if an offset is out of bounds; offsets before it have
/// already been written
pub fn fill_color(buffer: &mut PixelBuffer, offsets: &ByteOffsets, color: Color) -> Result<()> {
    let bgra = color.to_bgra();
    let bytes = buffer.as_bytes_mut();
    let buffer_len = bytes.len();

    for &offset in offsets.as_slice() {
        let group = bytes
            .get_mut(offset..offset + CHANNEL_STRIDE)
            .ok_or(MosaicError::OffsetOutOfBounds { offset, buffer_len })?;
        group.copy_from_slice(&bgra);
    }

    Ok(())
}

/// Replace a region with its own average color
///
/// Returns the color that was written.
///
/// # Errors
///
/// Returns an error if the region is empty or an offset is out of bounds
pub fn fill_average(buffer: &mut PixelBuffer, offsets: &ByteOffsets) -> Result<Color> {
    let average = average_color(buffer, Some(offsets))?;
    fill_color(buffer, offsets, average)?;
    Ok(average)
}

/// Copy `source` pixels in row-major order onto `target` at `offsets`
///
/// Pixel `n` of the source lands on `offsets[n]`.
///
/// # Errors
///
/// Returns an error if the source pixel count differs from the number of
/// offsets, or if an offset is out of bounds
pub fn blit_block(target: &mut PixelBuffer, source: &[u8], offsets: &ByteOffsets) -> Result<()> {
    let source_pixels = source.len() / CHANNEL_STRIDE;
    if source.len() % CHANNEL_STRIDE != 0 || source_pixels != offsets.len() {
        return Err(MosaicError::BlitMismatch {
            tile: None,
            expected: offsets.len(),
            actual: source_pixels,
        });
    }

    let bytes = target.as_bytes_mut();
    let buffer_len = bytes.len();
    for (&offset, pixel) in offsets
        .as_slice()
        .iter()
        .zip(source.chunks_exact(CHANNEL_STRIDE))
    {
        let group = bytes
            .get_mut(offset..offset + CHANNEL_STRIDE)
            .ok_or(MosaicError::OffsetOutOfBounds { offset, buffer_len })?;
        group.copy_from_slice(pixel);
    }

    Ok(())
}

/// Whole-buffer black and white filter
///
/// Luminance is the integer mean of red, green and blue. Pixels below
/// [`LUMINANCE_THRESHOLD`] become black, the rest white. Alpha is untouched,
/// so applying the filter twice yields the same buffer.
pub fn threshold(buffer: &mut PixelBuffer) {
    for group in buffer.as_bytes_mut().chunks_exact_mut(CHANNEL_STRIDE) {
        if let [b, g, r, _alpha] = group {
            let luminance = (u32::from(*r) + u32::from(*g) + u32::from(*b)) / 3;
            let level = if luminance < LUMINANCE_THRESHOLD { 0 } else { 255 };
            *b = level;
            *g = level;
            *r = level;
        }
    }
}
