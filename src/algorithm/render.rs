//! Parallel render stage for picture mosaics
//!
//! Runs after selection has fixed one image per tile. Each distinct image is
//! resized once, tiles are cut from the resized blocks concurrently, and the
//! results are blitted onto the canvas once every task has joined.

use std::borrow::Cow;
use std::collections::HashMap;

use rayon::prelude::*;
use tracing::debug;

use crate::io::error::{MosaicError, Result, WithContext};
use crate::palette::{ImageId, Palette};
use crate::raster::PixelBuffer;
use crate::raster::compositor::blit_block;
use crate::spatial::{ByteOffsets, TileDescriptor};

/// Image resize collaborator
///
/// Implementations must return a `width` x `height` BGRA8888 buffer.
pub trait Resampler: Sync {
    /// Resample `pixels` to exactly `width` x `height`
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be resampled
    fn resize(&self, pixels: &PixelBuffer, width: usize, height: usize) -> Result<PixelBuffer>;
}

/// The image chosen for one tile, with the canvas region it paints
#[derive(Debug, Clone)]
pub struct TilePlan {
    /// Row-major tile number
    pub sequence: usize,
    /// Tile geometry
    pub tile: TileDescriptor,
    /// Canvas byte offsets covered by the tile
    pub offsets: ByteOffsets,
    /// Selected palette image
    pub image: ImageId,
}

/// Resize selected images and paint every planned tile onto `canvas`
///
/// # Errors
///
/// Returns an error if a planned image is missing from the palette, the
/// resampler fails, or a resized block does not match its tile
pub fn render_plans<S: Resampler>(
    canvas: &mut PixelBuffer,
    plans: &[TilePlan],
    palette: &Palette,
    resampler: &S,
    block_size: usize,
) -> Result<()> {
    let mut distinct: Vec<ImageId> = plans.iter().map(|plan| plan.image).collect();
    distinct.sort_unstable();
    distinct.dedup();

    debug!(
        tiles = plans.len(),
        images = distinct.len(),
        block_size,
        "resizing selected images"
    );

    let resized: HashMap<ImageId, PixelBuffer> = distinct
        .par_iter()
        .map(|&id| {
            let image = palette.get(id).ok_or(MosaicError::UnknownImage { id })?;
            let block = resampler.resize(image.pixels(), block_size, block_size)?;
            Ok((id, block))
        })
        .collect::<Result<_>>()?;

    let blocks: Vec<Cow<'_, PixelBuffer>> = plans
        .par_iter()
        .map(|plan| {
            let block = resized
                .get(&plan.image)
                .ok_or(MosaicError::UnknownImage { id: plan.image })?;
            fit_to_tile(block, &plan.tile, block_size).with_tile(plan.sequence)
        })
        .collect::<Result<_>>()?;

    for (plan, block) in plans.iter().zip(&blocks) {
        blit_block(canvas, block.as_bytes(), &plan.offsets).with_tile(plan.sequence)?;
    }

    Ok(())
}

// Edge tiles take the top-left corner of the resized block. A block of the
// wrong size is passed through untouched so the blit rejects it.
fn fit_to_tile<'a>(
    block: &'a PixelBuffer,
    tile: &TileDescriptor,
    block_size: usize,
) -> Result<Cow<'a, PixelBuffer>> {
    let is_full_block = block.width() == block_size && block.height() == block_size;
    if !is_full_block || (tile.width == block_size && tile.height == block_size) {
        return Ok(Cow::Borrowed(block));
    }
    block.crop_top_left(tile.width, tile.height).map(Cow::Owned)
}
