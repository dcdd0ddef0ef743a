//! Command-line interface for building mosaics from image files

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::algorithm::engine::{
    MosaicConfig, MosaicEngine, MosaicMode, PreviewConfig, apply_black_and_white,
};
use crate::io::configuration::{DEFAULT_BLOCK_SIZE, DEFAULT_SEED, OUTPUT_SUFFIX, PREVIEW_SUFFIX};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::{ImageResampler, load_bgra, load_palette, palette_files, save_bgra};
use crate::io::progress::ProgressManager;
use crate::palette::{ImageId, Palette};
use crate::raster::PixelBuffer;

/// Rendering style selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Average color per tile
    Solid,
    /// Average color per tile half, split on the diagonal
    Triangle,
    /// White tile outlines
    Grid,
    /// Nearest palette image per tile
    Picture,
}

impl From<ModeArg> for MosaicMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Solid => Self::SolidBlock,
            ModeArg::Triangle => Self::Triangle,
            ModeArg::Grid => Self::Grid,
            ModeArg::Picture => Self::Picture,
        }
    }
}

#[derive(Parser)]
#[command(name = "photomosaic")]
#[command(
    author,
    version,
    about = "Build photo mosaics from a source image and a folder of palette images"
)]
/// Command-line arguments for the mosaic tool
// Each heuristic and output option is an independent switch
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Source image to convert
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Folder of candidate images for picture mosaics
    #[arg(short, long, value_name = "DIR")]
    pub palette: Option<PathBuf>,

    /// Rendering style
    #[arg(short, long, value_enum, default_value_t = ModeArg::Solid)]
    pub mode: ModeArg,

    /// Tile edge length in pixels
    #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
    pub block_size: usize,

    /// Draw tile diagonals in grid mode and previews
    #[arg(short, long)]
    pub diagonal: bool,

    /// Avoid placing an image next to a recent copy of itself
    #[arg(short, long)]
    pub juxtaposition: bool,

    /// Use every palette image once before repeating any
    #[arg(short, long)]
    pub cycle: bool,

    /// Threshold the result to black and white
    #[arg(long)]
    pub black_and_white: bool,

    /// Only use these palette files (by file name, repeatable)
    #[arg(long = "select", value_name = "FILE")]
    pub selected: Vec<String>,

    /// Random seed for candidate picks
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Output path (defaults to a suffixed copy of the source name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log job summaries
    #[arg(short, long)]
    pub verbose: bool,

    /// Write the grid preview instead of a mosaic
    #[arg(long)]
    pub preview: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Conversion parameters from the flags
    pub fn mosaic_config(&self) -> MosaicConfig {
        MosaicConfig {
            include_diagonal: self.diagonal,
            juxtaposition: self.juxtaposition,
            cycle: self.cycle,
            ..MosaicConfig::new(self.mode.into(), self.block_size)
        }
    }

    /// Preview parameters from the flags
    pub fn preview_config(&self) -> PreviewConfig {
        PreviewConfig {
            mode: self.mode.into(),
            block_size: self.block_size,
            include_diagonal: self.diagonal,
        }
    }

    /// Where the result is written
    pub fn output_path(&self) -> PathBuf {
        if let Some(ref output) = self.output {
            return output.clone();
        }
        let suffix = if self.preview {
            PREVIEW_SUFFIX
        } else {
            OUTPUT_SUFFIX
        };
        suffixed_path(&self.source, suffix)
    }
}

/// Runs one conversion described by the command line
pub struct MosaicRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl MosaicRunner {
    /// Create a runner for the given arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Load inputs, build the mosaic or preview, and save it
    ///
    /// # Errors
    ///
    /// Returns an error if an input cannot be loaded, the parameters are
    /// invalid, rendering fails, or the output cannot be written
    pub fn process(&mut self) -> Result<()> {
        let started = Instant::now();
        let source = load_bgra(&self.cli.source)?;
        let engine = MosaicEngine::new(source, ImageResampler::default());

        let result = if self.cli.preview {
            engine.build_preview(&self.cli.preview_config())?
        } else {
            self.render(&engine)?
        };
        let result = if self.cli.black_and_white {
            apply_black_and_white(result)
        } else {
            result
        };

        let output_path = self.cli.output_path();
        save_bgra(&result, &output_path)?;

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }
        info!(
            output = %output_path.display(),
            elapsed_ms = started.elapsed().as_millis(),
            "mosaic written"
        );
        Ok(())
    }

    fn render(&mut self, engine: &MosaicEngine<ImageResampler>) -> Result<PixelBuffer> {
        let config = self.cli.mosaic_config();
        let palette = if config.mode == MosaicMode::Picture {
            self.prepare_palette()?
        } else {
            Palette::new()
        };

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_job(config.mode, config.block_size);
        }
        let started = Instant::now();
        let mut rng = StdRng::seed_from_u64(self.cli.seed);
        let canvas = engine.run_mosaic(&config, &palette, &mut rng)?;
        if let Some(ref pm) = self.progress_manager {
            pm.finish_job(started.elapsed());
        }
        Ok(canvas)
    }

    fn prepare_palette(&mut self) -> Result<Palette> {
        let dir = self.cli.palette.clone().ok_or_else(|| {
            invalid_parameter("palette", &"<none>", &"picture mode needs a palette folder")
        })?;
        let files = palette_files(&dir)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_palette(files.len());
        }
        let progress = self.progress_manager.as_ref();
        let palette = load_palette(&files, |path| {
            if let Some(pm) = progress {
                pm.palette_loaded(path);
            }
        })?;
        if let Some(pm) = progress {
            pm.finish_palette(palette.len());
        }

        select_by_name(&palette, &self.cli.selected)
    }
}

/// Restrict `palette` to the images named in `names`
///
/// An empty selection keeps the whole palette.
///
/// # Errors
///
/// Returns an error if a name matches no palette image
pub fn select_by_name(palette: &Palette, names: &[String]) -> Result<Palette> {
    if names.is_empty() {
        return Ok(palette.clone());
    }
    let ids = names
        .iter()
        .map(|name| {
            palette
                .images()
                .find(|image| image.name() == name)
                .map(|image| image.id())
                .ok_or_else(|| invalid_parameter("select", name, &"not found in the palette"))
        })
        .collect::<Result<Vec<ImageId>>>()?;
    palette.subset(&ids)
}

fn suffixed_path(input_path: &Path, suffix: &str) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let extension = input_path.extension().unwrap_or(OsStr::new("png"));
    let output_name = format!(
        "{}{suffix}.{}",
        stem.to_string_lossy(),
        extension.to_string_lossy()
    );

    if let Some(parent) = input_path.parent() {
        parent.join(output_name)
    } else {
        PathBuf::from(output_name)
    }
}
