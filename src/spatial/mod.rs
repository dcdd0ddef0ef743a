//! Tile layout and region mapping
//!
//! This module contains spatial functionality including:
//! - Row-major tile iteration with clipped edge tiles
//! - Box, outline and diagonal-split index mapping

/// Region shape mapping to pixel indices and byte offsets
pub mod regions;
/// Tile origin iteration
pub mod tiles;

pub use regions::{ByteOffsets, PixelIndices, TriangleHalves};
pub use tiles::{TileDescriptor, TileIterator};
