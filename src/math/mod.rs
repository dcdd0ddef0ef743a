//! Mathematical utilities for color matching

/// Perceptually weighted color distance
pub mod distance;
