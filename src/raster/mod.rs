//! Pixel storage and compositing
//!
//! This module contains raster-level functionality including:
//! - BGRA8888 pixel buffers and colors
//! - Averaging, filling and blitting at byte offsets
//! - The whole-image black and white filter

/// Pixel buffer and color types
pub mod buffer;
/// Region reads and writes over pixel buffers
pub mod compositor;

pub use buffer::{Color, PixelBuffer};
