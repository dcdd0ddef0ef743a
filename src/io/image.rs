//! Image decoding, encoding and resizing through the `image` crate
//!
//! Pixel buffers are BGRA in memory while the `image` crate works in RGBA,
//! so every crossing swaps the red and blue channels.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::algorithm::render::Resampler;
use crate::io::configuration::{CHANNEL_STRIDE, SUPPORTED_EXTENSIONS};
use crate::io::error::{MosaicError, Result, invalid_parameter, resample_error};
use crate::palette::{CatalogImage, ImageId, Palette};
use crate::raster::PixelBuffer;

/// [`Resampler`] backed by `image::imageops::resize`
#[derive(Debug, Clone, Copy)]
pub struct ImageResampler {
    filter: FilterType,
}

impl ImageResampler {
    /// Resampler using `filter`
    pub const fn new(filter: FilterType) -> Self {
        Self { filter }
    }

    /// Sampling filter in use
    pub const fn filter(&self) -> FilterType {
        self.filter
    }
}

impl Default for ImageResampler {
    fn default() -> Self {
        Self::new(FilterType::Triangle)
    }
}

impl Resampler for ImageResampler {
    fn resize(&self, pixels: &PixelBuffer, width: usize, height: usize) -> Result<PixelBuffer> {
        if width == 0 || height == 0 {
            return Err(resample_error(&format!(
                "target size {width}x{height} has no pixels"
            )));
        }
        let rgba = to_rgba_image(pixels)?;
        let resized = imageops::resize(&rgba, dimension(width)?, dimension(height)?, self.filter);
        from_rgba_image(resized)
    }
}

/// Decode an image file into a BGRA buffer
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded
pub fn load_bgra(path: &Path) -> Result<PixelBuffer> {
    let decoded = image::open(path).map_err(|source| MosaicError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    from_rgba_image(decoded.into_rgba8())
}

/// Encode a BGRA buffer to `path`, format chosen by extension
///
/// Missing parent directories are created. Formats without an alpha channel
/// receive the color channels only.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the image
/// cannot be encoded
pub fn save_bgra(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| MosaicError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source,
        })?;
    }

    let image = DynamicImage::ImageRgba8(to_rgba_image(buffer)?);
    let image = if supports_alpha(path) {
        image
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    };

    image.save(path).map_err(|source| MosaicError::ImageExport {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "saved image");
    Ok(())
}

/// Supported image files directly inside `dir`, sorted by file name
///
/// # Errors
///
/// Returns an error if the directory cannot be read
pub fn palette_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_error = |source| MosaicError::FileSystem {
        path: dir.to_path_buf(),
        operation: "read palette folder",
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file() && is_supported(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Decode `files` into a palette
///
/// Files are decoded in parallel; `on_loaded` is called once per file as it
/// finishes. Ids follow the order of `files`. Files that fail to decode are
/// skipped with a warning.
///
/// # Errors
///
/// Returns an error if a decoded image cannot be added to the palette
pub fn load_palette(files: &[PathBuf], on_loaded: impl Fn(&Path) + Sync) -> Result<Palette> {
    let decoded: Vec<Option<CatalogImage>> = files
        .par_iter()
        .enumerate()
        .map(|(index, path)| {
            let image = decode_candidate(index, path);
            on_loaded(path);
            image
        })
        .collect();

    let mut palette = Palette::new();
    for image in decoded.into_iter().flatten() {
        palette.add(image)?;
    }
    debug!(
        files = files.len(),
        images = palette.len(),
        "palette loaded"
    );
    Ok(palette)
}

/// Load every supported image in `dir` into a palette
///
/// # Errors
///
/// Returns an error if the directory cannot be read
pub fn load_palette_folder(dir: &Path) -> Result<Palette> {
    load_palette(&palette_files(dir)?, |_| {})
}

fn decode_candidate(index: usize, path: &Path) -> Option<CatalogImage> {
    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    let loaded =
        load_bgra(path).and_then(|pixels| CatalogImage::new(ImageId(index as u64), name, pixels));
    match loaded {
        Ok(image) => Some(image),
        Err(error) => {
            warn!(path = %path.display(), %error, "skipping palette image");
            None
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

fn is_supported(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

fn supports_alpha(path: &Path) -> bool {
    !matches!(extension_of(path).as_deref(), Some("jpg" | "jpeg"))
}

fn dimension(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|error| invalid_parameter("dimension", &value, &error))
}

fn swap_red_blue(bytes: &mut [u8]) {
    for pixel in bytes.chunks_exact_mut(CHANNEL_STRIDE) {
        pixel.swap(0, 2);
    }
}

fn to_rgba_image(buffer: &PixelBuffer) -> Result<RgbaImage> {
    let mut bytes = buffer.as_bytes().to_vec();
    swap_red_blue(&mut bytes);
    RgbaImage::from_raw(dimension(buffer.width())?, dimension(buffer.height())?, bytes)
        .ok_or_else(|| resample_error(&"pixel data does not match its dimensions"))
}

fn from_rgba_image(image: RgbaImage) -> Result<PixelBuffer> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let mut bytes = image.into_raw();
    swap_red_blue(&mut bytes);
    PixelBuffer::new(width, height, bytes)
}
