//! Row-major tile walking over an image
//!
//! Tiles advance `block_size` columns at a time and `block_size` rows per
//! tile row. The last row and column are emitted even when the image size is
//! not a multiple of the block size; those tiles report their clipped size.

use crate::io::error::{Result, invalid_parameter};

/// One tile of the mosaic grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileDescriptor {
    /// Pixel index of the tile's top-left corner (`y * width + x`)
    pub origin: usize,
    /// Tile row in the mosaic grid
    pub row: usize,
    /// Tile column in the mosaic grid
    pub column: usize,
    /// Tile width after clipping to the image
    pub width: usize,
    /// Tile height after clipping to the image
    pub height: usize,
}

impl TileDescriptor {
    /// Number of pixels covered by the tile
    pub const fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

/// Restartable iterator over tile origins
#[derive(Debug, Clone)]
pub struct TileIterator {
    image_width: usize,
    image_height: usize,
    block_size: usize,
    columns: usize,
    rows: usize,
    next: usize,
}

impl TileIterator {
    /// Create an iterator for an image of the given size
    ///
    /// # Errors
    ///
    /// Returns an error if `block_size` is zero or the image has no area
    pub fn new(image_width: usize, image_height: usize, block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(invalid_parameter(
                "block_size",
                &block_size,
                &"must be greater than zero",
            ));
        }
        if image_width == 0 || image_height == 0 {
            return Err(invalid_parameter(
                "dimensions",
                &format!("{image_width}x{image_height}"),
                &"image must have a non-zero area",
            ));
        }

        Ok(Self {
            image_width,
            image_height,
            block_size,
            columns: image_width.div_ceil(block_size),
            rows: image_height.div_ceil(block_size),
            next: 0,
        })
    }

    /// Number of tiles per row
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of tile rows
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of tiles
    pub const fn tile_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Nominal tile edge length
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// Rewind to the first tile
    pub const fn restart(&mut self) {
        self.next = 0;
    }

    fn descriptor(&self, sequence: usize) -> TileDescriptor {
        let row = sequence / self.columns;
        let column = sequence % self.columns;
        let x = column * self.block_size;
        let y = row * self.block_size;

        TileDescriptor {
            // Row pitch is block_size * image_width pixels
            origin: row * self.block_size * self.image_width + x,
            row,
            column,
            width: self.block_size.min(self.image_width - x),
            height: self.block_size.min(self.image_height - y),
        }
    }
}

impl Iterator for TileIterator {
    type Item = TileDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.tile_count() {
            return None;
        }
        let tile = self.descriptor(self.next);
        self.next += 1;
        Some(tile)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.tile_count().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileIterator {}
