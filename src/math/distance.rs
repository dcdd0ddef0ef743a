//! Perceptual color distance used to rank palette colors

use crate::raster::Color;

/// Red channel weight
pub const RED_WEIGHT: f64 = 0.3;
/// Green channel weight
pub const GREEN_WEIGHT: f64 = 0.59;
/// Blue channel weight
pub const BLUE_WEIGHT: f64 = 0.11;

/// Weighted squared distance between two colors
///
/// Computes `(0.3 * dR)^2 + (0.59 * dG)^2 + (0.11 * dB)^2`. Alpha is ignored.
pub fn weighted_distance(a: Color, b: Color) -> f64 {
    let term = |x: u8, y: u8, weight: f64| {
        let delta = (f64::from(x) - f64::from(y)) * weight;
        delta * delta
    };

    term(a.r, b.r, RED_WEIGHT) + term(a.g, b.g, GREEN_WEIGHT) + term(a.b, b.b, BLUE_WEIGHT)
}
