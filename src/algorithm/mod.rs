//! Mosaic conversion: tile selection, rendering and job orchestration

/// Engine front end, job lifecycle and rendering modes
pub mod engine;
/// Resize seam and parallel tile rendering
pub mod render;
/// Sequential palette selection with anti-repetition heuristics
pub mod selection;
