//! Candidate images held by a palette

use std::fmt;

use crate::io::error::Result;
use crate::raster::compositor::average_color;
use crate::raster::{Color, PixelBuffer};

/// Stable identifier of a palette image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u64);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A decoded candidate image with its cached whole-image average color
///
/// The per-run resized copy is not stored here; each job keeps its own
/// resize cache keyed by [`ImageId`] so the catalog stays immutable while
/// jobs read it.
#[derive(Debug, Clone)]
pub struct CatalogImage {
    id: ImageId,
    name: String,
    pixels: PixelBuffer,
    average: Color,
}

impl CatalogImage {
    /// Wrap decoded pixels and compute their average color
    ///
    /// # Errors
    ///
    /// Returns an error if the average color cannot be computed
    pub fn new(id: ImageId, name: impl Into<String>, pixels: PixelBuffer) -> Result<Self> {
        let average = average_color(&pixels, None)?;
        Ok(Self {
            id,
            name: name.into(),
            pixels,
            average,
        })
    }

    /// Identifier of the image
    pub const fn id(&self) -> ImageId {
        self.id
    }

    /// Display name, usually the source file name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Original decoded pixels
    pub const fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Whole-image average color
    pub const fn average(&self) -> Color {
        self.average
    }
}
