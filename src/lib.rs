//! Photo-mosaic engine over BGRA pixel buffers
//!
//! A source image is partitioned into square tiles which are repainted as
//! solid averages, diagonal halves, grid outlines, or the nearest-colored
//! image from a palette of candidates.

#![forbid(unsafe_code)]

/// Mosaic jobs, palette selection and parallel rendering
pub mod algorithm;
/// Input/output operations, configuration and error handling
pub mod io;
/// Color distance utilities
pub mod math;
/// Candidate image pool indexed by average color
pub mod palette;
/// Pixel buffers and region compositing
pub mod raster;
/// Tile iteration and region index mapping
pub mod spatial;

pub use io::error::{MosaicError, Result};
