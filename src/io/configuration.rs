//! Engine constants and runtime configuration defaults

// Pixel layout
/// Bytes per pixel in the BGRA8888 layout
pub const CHANNEL_STRIDE: usize = 4;

/// Luminance below this value becomes black, otherwise white
pub const LUMINANCE_THRESHOLD: u32 = 127;

// Picture mosaic selection heuristics
/// Number of nearest images drawn from when juxtaposition avoidance is on
pub const JUXTAPOSITION_CANDIDATES: usize = 8;

/// Capacity of the recent-use window
pub const RECENT_USE_WINDOW: usize = 6;

/// Smallest palette that can honour juxtaposition and cycling together
pub const MIN_PALETTE_FOR_JUXTAPOSED_CYCLE: usize = 2;

// Default values for configurable parameters
/// Block size used when none is given
pub const DEFAULT_BLOCK_SIZE: usize = 25;

/// Fixed seed for reproducible candidate picks
pub const DEFAULT_SEED: u64 = 42;

// Input and output settings
/// File extensions accepted when loading a palette folder
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff"];

/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_mosaic";

/// Suffix added to preview filenames
pub const PREVIEW_SUFFIX: &str = "_grid";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
