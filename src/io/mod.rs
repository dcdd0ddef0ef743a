//! File, terminal and configuration plumbing around the mosaic engine

/// Command-line front end
pub mod cli;
/// Constants and defaults
pub mod configuration;
/// Error types and context helpers
pub mod error;
/// Image decoding, encoding and resizing
pub mod image;
/// Tracing subscriber setup
pub mod logging;
/// Terminal progress display
pub mod progress;
