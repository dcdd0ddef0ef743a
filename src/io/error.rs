//! Error types and context management for mosaic operations

use std::fmt;
use std::path::PathBuf;

use crate::palette::ImageId;

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// Failed to load an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Pixel buffer length does not match `width * height * 4`
    BufferShape {
        /// Length implied by the declared dimensions
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },

    /// Averaging was requested over an empty region
    EmptyRegion,

    /// A byte offset points past the end of the buffer
    OffsetOutOfBounds {
        /// Offending byte offset (start of a 4-byte pixel group)
        offset: usize,
        /// Length of the buffer being addressed
        buffer_len: usize,
    },

    /// Picture mosaic requested with no candidate images
    EmptyPalette,

    /// Palette too small for the requested selection heuristics
    InsufficientPalette {
        /// Minimum palette size the heuristics need
        required: usize,
        /// Number of images actually available
        available: usize,
    },

    /// Every bucket was walked without finding an eligible image
    NoCandidates {
        /// Number of images that were excluded from the search
        excluded: usize,
    },

    /// Resized pixels do not cover the tile being painted
    BlitMismatch {
        /// Row-major tile index, when known
        tile: Option<usize>,
        /// Pixel count of the destination region
        expected: usize,
        /// Pixel count supplied by the source block
        actual: usize,
    },

    /// An image with this id already belongs to the palette
    DuplicateImage {
        /// The conflicting id
        id: ImageId,
    },

    /// No image with this id belongs to the palette
    UnknownImage {
        /// The missing id
        id: ImageId,
    },

    /// The resize collaborator failed
    Resample {
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::BufferShape { expected, actual } => {
                write!(
                    f,
                    "Pixel buffer has {actual} bytes but its dimensions require {expected}"
                )
            }
            Self::EmptyRegion => write!(f, "Cannot average an empty region"),
            Self::OffsetOutOfBounds { offset, buffer_len } => {
                write!(
                    f,
                    "Byte offset {offset} is out of bounds for a buffer of {buffer_len} bytes"
                )
            }
            Self::EmptyPalette => write!(f, "Picture mosaic requires a non-empty palette"),
            Self::InsufficientPalette {
                required,
                available,
            } => {
                write!(
                    f,
                    "Palette has {available} images but at least {required} are required"
                )
            }
            Self::NoCandidates { excluded } => {
                write!(
                    f,
                    "No candidate image remains after excluding {excluded} images"
                )
            }
            Self::BlitMismatch {
                tile,
                expected,
                actual,
            } => match tile {
                Some(tile) => write!(
                    f,
                    "Tile {tile} covers {expected} pixels but the source block has {actual}"
                ),
                None => write!(
                    f,
                    "Region covers {expected} pixels but the source block has {actual}"
                ),
            },
            Self::DuplicateImage { id } => {
                write!(f, "Image {id} is already in the palette")
            }
            Self::UnknownImage { id } => write!(f, "Image {id} is not in the palette"),
            Self::Resample { reason } => write!(f, "Resampling failed: {reason}"),
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Row-major index of the tile being processed
    pub tile: Option<usize>,
}

/// Enriches error messages with job state information
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Add just the tile context
    ///
    /// # Errors
    ///
    /// Propagates the original error with the tile index applied
    fn with_tile(self, tile: usize) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<MosaicError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only blit failures carry a tile slot
            if let MosaicError::BlitMismatch { tile, .. } = &mut error {
                if context.tile.is_some() {
                    *tile = context.tile;
                }
            }
            error
        })
    }

    fn with_tile(self, tile: usize) -> Result<T> {
        self.with_context(ErrorContext { tile: Some(tile) })
    }
}

impl From<std::io::Error> for MosaicError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a resampler error
pub fn resample_error(reason: &impl ToString) -> MosaicError {
    MosaicError::Resample {
        reason: reason.to_string(),
    }
}
