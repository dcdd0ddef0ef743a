//! Candidate image pool for picture mosaics
//!
//! Images are indexed by their average color and queried by weighted
//! color distance with optional exclusions.

/// Catalog entries and identifiers
pub mod catalog;
/// Color-bucketed palette index and nearest-color queries
pub mod index;

pub use catalog::{CatalogImage, ImageId};
pub use index::Palette;
