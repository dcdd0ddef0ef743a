//! Tile shape requests mapped to pixel index lists
//!
//! Every mapper clips against the image edges, so no returned index falls
//! outside `max_width * max_height`. Indices are in pixels; the compositor
//! needs byte offsets, which only [`PixelIndices::into_byte_offsets`]
//! produces.

use crate::io::configuration::CHANNEL_STRIDE;

/// Pixel indices (`y * width + x`) in row-major order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelIndices(Vec<usize>);

impl PixelIndices {
    /// Scale every index by the channel stride
    pub fn into_byte_offsets(self) -> ByteOffsets {
        ByteOffsets(
            self.0
                .into_iter()
                .map(|index| index * CHANNEL_STRIDE)
                .collect(),
        )
    }

    /// Indices as a slice
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of indices
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<usize>> for PixelIndices {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

/// Byte offsets of 4-byte pixel groups, ready for the compositor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteOffsets(Vec<usize>);

impl ByteOffsets {
    /// Offsets as a slice
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of offsets (one per pixel)
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The two halves of a tile split along its main diagonal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriangleHalves<T> {
    /// Cells with relative column <= relative row
    pub left: T,
    /// Cells with relative column > relative row
    pub right: T,
}

impl TriangleHalves<PixelIndices> {
    /// Scale both halves by the channel stride
    pub fn into_byte_offsets(self) -> TriangleHalves<ByteOffsets> {
        TriangleHalves {
            left: self.left.into_byte_offsets(),
            right: self.right.into_byte_offsets(),
        }
    }
}

// Clipped geometry of a box anchored at `origin`
struct Bounds {
    origin: usize,
    max_width: usize,
    width: usize,
    height: usize,
}

impl Bounds {
    fn new(origin: usize, size: usize, max_width: usize, max_height: usize) -> Option<Self> {
        if size == 0 || max_width == 0 {
            return None;
        }
        let start_row = origin / max_width;
        let start_col = origin % max_width;
        if start_row >= max_height {
            return None;
        }

        Some(Self {
            origin,
            max_width,
            width: size.min(max_width - start_col),
            height: size.min(max_height - start_row),
        })
    }

    const fn index(&self, row: usize, col: usize) -> usize {
        self.origin + row * self.max_width + col
    }

    fn collect(&self, mut keep: impl FnMut(usize, usize) -> bool) -> PixelIndices {
        let mut indices = Vec::new();
        for row in 0..self.height {
            for col in 0..self.width {
                if keep(row, col) {
                    indices.push(self.index(row, col));
                }
            }
        }
        PixelIndices(indices)
    }
}

/// Indices of a `size` x `size` box, clipped at the image edges
pub fn box_region(origin: usize, size: usize, max_width: usize, max_height: usize) -> PixelIndices {
    Bounds::new(origin, size, max_width, max_height)
        .map(|bounds| bounds.collect(|_, _| true))
        .unwrap_or_default()
}

/// Perimeter of the clipped box, plus its diagonal when requested
///
/// The diagonal runs from the top-left corner toward the bottom-right, one
/// index per row.
pub fn grid_outline(
    origin: usize,
    size: usize,
    max_width: usize,
    max_height: usize,
    include_diagonal: bool,
) -> PixelIndices {
    Bounds::new(origin, size, max_width, max_height)
        .map(|bounds| {
            let last_row = bounds.height - 1;
            let last_col = bounds.width - 1;
            bounds.collect(|row, col| {
                row == 0
                    || col == 0
                    || row == last_row
                    || col == last_col
                    || (include_diagonal && row == col)
            })
        })
        .unwrap_or_default()
}

/// Split the clipped box into two disjoint halves along the main diagonal
///
/// The union of both halves equals [`box_region`] for the same arguments.
pub fn triangle_split(
    origin: usize,
    size: usize,
    max_width: usize,
    max_height: usize,
) -> TriangleHalves<PixelIndices> {
    Bounds::new(origin, size, max_width, max_height)
        .map(|bounds| TriangleHalves {
            left: bounds.collect(|row, col| col <= row),
            right: bounds.collect(|row, col| col > row),
        })
        .unwrap_or_default()
}
