//! Mosaic orchestration over a decoded source image
//!
//! A [`MosaicEngine`] owns the read-only source pixels and the resize
//! collaborator. Every conversion runs as a fresh [`MosaicJob`] over a
//! private clone of the source, so repeated runs never compound edits.

use std::fmt;
use std::time::Instant;

use rand::Rng;
use tracing::{debug, info};

use crate::algorithm::render::{Resampler, TilePlan, render_plans};
use crate::algorithm::selection::{SelectionPolicy, SelectionState};
use crate::io::configuration::MIN_PALETTE_FOR_JUXTAPOSED_CYCLE;
use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::palette::Palette;
use crate::raster::compositor::{average_color, fill_average, fill_color, threshold};
use crate::raster::{Color, PixelBuffer};
use crate::spatial::regions::{box_region, grid_outline, triangle_split};
use crate::spatial::{PixelIndices, TileDescriptor, TileIterator};

/// Rendering style for a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MosaicMode {
    /// Each tile filled with its average color
    SolidBlock,
    /// Each tile split along its diagonal, each half filled with its average
    Triangle,
    /// White tile outlines over the source
    Grid,
    /// Each tile replaced by the nearest palette image
    Picture,
}

impl fmt::Display for MosaicMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SolidBlock => "solid",
            Self::Triangle => "triangle",
            Self::Grid => "grid",
            Self::Picture => "picture",
        };
        f.write_str(name)
    }
}

/// Parameters for one mosaic conversion
#[derive(Clone, Copy, Debug)]
pub struct MosaicConfig {
    /// Rendering style
    pub mode: MosaicMode,
    /// Nominal tile edge length in pixels
    pub block_size: usize,
    /// Draw tile diagonals in grid mode
    pub include_diagonal: bool,
    /// Avoid repeating images next to each other (picture mode)
    pub juxtaposition: bool,
    /// Use every palette image before repeating any (picture mode)
    pub cycle: bool,
}

impl MosaicConfig {
    /// Configuration for `mode` with every heuristic off
    pub const fn new(mode: MosaicMode, block_size: usize) -> Self {
        Self {
            mode,
            block_size,
            include_diagonal: false,
            juxtaposition: false,
            cycle: false,
        }
    }

    const fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            juxtaposition: self.juxtaposition,
            cycle: self.cycle,
        }
    }
}

/// Parameters for a grid preview
#[derive(Clone, Copy, Debug)]
pub struct PreviewConfig {
    /// Mode the preview is shown for
    pub mode: MosaicMode,
    /// Nominal tile edge length in pixels
    pub block_size: usize,
    /// Draw tile diagonals
    pub include_diagonal: bool,
}

impl PreviewConfig {
    // Triangle previews always show the split line
    const fn draws_diagonal(&self) -> bool {
        self.include_diagonal || matches!(self.mode, MosaicMode::Triangle)
    }
}

/// Lifecycle of a single conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Created, not yet started
    Idle,
    /// Tiles are being selected or rendered
    Running,
    /// Canvas is complete
    Done,
    /// The run was aborted; no canvas is available
    Failed,
}

/// One conversion over a private canvas
pub struct MosaicJob<'a> {
    source: &'a PixelBuffer,
    canvas: PixelBuffer,
    config: MosaicConfig,
    state: JobState,
}

impl<'a> MosaicJob<'a> {
    /// Prepare a job; the canvas starts as a copy of `source`
    pub fn new(source: &'a PixelBuffer, config: MosaicConfig) -> Self {
        Self {
            source,
            canvas: source.clone(),
            config,
            state: JobState::Idle,
        }
    }

    /// Current lifecycle state
    pub const fn state(&self) -> JobState {
        self.state
    }

    /// Job parameters
    pub const fn config(&self) -> &MosaicConfig {
        &self.config
    }

    /// Finished canvas, available only once the job is done
    pub fn into_canvas(self) -> Option<PixelBuffer> {
        (self.state == JobState::Done).then_some(self.canvas)
    }

    /// Execute the conversion
    ///
    /// `palette` is only read in picture mode and stays borrowed for the
    /// whole run. `rng` drives the random pick among juxtaposition
    /// candidates.
    ///
    /// # Errors
    ///
    /// Returns an error if the job already ran, the parameters are invalid,
    /// or any tile fails; the job is then marked failed
    pub fn run<S: Resampler, R: Rng + ?Sized>(
        &mut self,
        palette: &Palette,
        resampler: &S,
        rng: &mut R,
    ) -> Result<()> {
        if self.state != JobState::Idle {
            return Err(invalid_parameter(
                "state",
                &format!("{:?}", self.state),
                &"a job can only run once",
            ));
        }

        self.state = JobState::Running;
        let started = Instant::now();
        debug!(mode = %self.config.mode, block_size = self.config.block_size, "mosaic job started");

        match self.execute(palette, resampler, rng) {
            Ok(tiles) => {
                self.state = JobState::Done;
                info!(
                    mode = %self.config.mode,
                    tiles,
                    elapsed_ms = started.elapsed().as_millis(),
                    "mosaic job finished"
                );
                Ok(())
            }
            Err(error) => {
                self.state = JobState::Failed;
                debug!(%error, "mosaic job failed");
                Err(error)
            }
        }
    }

    fn execute<S: Resampler, R: Rng + ?Sized>(
        &mut self,
        palette: &Palette,
        resampler: &S,
        rng: &mut R,
    ) -> Result<usize> {
        let tiles = TileIterator::new(
            self.source.width(),
            self.source.height(),
            self.config.block_size,
        )?;
        let tile_count = tiles.tile_count();

        match self.config.mode {
            MosaicMode::SolidBlock => self.paint_solid(tiles)?,
            MosaicMode::Triangle => self.paint_triangles(tiles)?,
            MosaicMode::Grid => draw_grid(&mut self.canvas, tiles, self.config.include_diagonal)?,
            MosaicMode::Picture => self.paint_pictures(tiles, palette, resampler, rng)?,
        }

        Ok(tile_count)
    }

    fn paint_solid(&mut self, tiles: TileIterator) -> Result<()> {
        let block_size = tiles.block_size();
        for tile in tiles {
            let offsets = self.tile_box(&tile, block_size).into_byte_offsets();
            fill_average(&mut self.canvas, &offsets)?;
        }
        Ok(())
    }

    fn paint_triangles(&mut self, tiles: TileIterator) -> Result<()> {
        let block_size = tiles.block_size();
        let (width, height) = (self.canvas.width(), self.canvas.height());
        for tile in tiles {
            let halves = triangle_split(tile.origin, block_size, width, height).into_byte_offsets();
            // Single-column tiles have no right half
            for half in [&halves.left, &halves.right] {
                if !half.is_empty() {
                    fill_average(&mut self.canvas, half)?;
                }
            }
        }
        Ok(())
    }

    fn paint_pictures<S: Resampler, R: Rng + ?Sized>(
        &mut self,
        tiles: TileIterator,
        palette: &Palette,
        resampler: &S,
        rng: &mut R,
    ) -> Result<()> {
        check_palette(palette, &self.config)?;

        let block_size = tiles.block_size();
        let mut state =
            SelectionState::new(self.config.selection_policy(), tiles.columns(), palette.len());
        let mut plans = Vec::with_capacity(tiles.tile_count());

        for (sequence, tile) in tiles.enumerate() {
            let offsets = self.tile_box(&tile, block_size).into_byte_offsets();
            // Averages come from the untouched source, never the canvas
            let average = average_color(self.source, Some(&offsets))?;
            let image = state.select(palette, &tile, average, rng)?;
            plans.push(TilePlan {
                sequence,
                tile,
                offsets,
                image,
            });
        }

        render_plans(&mut self.canvas, &plans, palette, resampler, block_size)
    }

    fn tile_box(&self, tile: &TileDescriptor, block_size: usize) -> PixelIndices {
        box_region(
            tile.origin,
            block_size,
            self.canvas.width(),
            self.canvas.height(),
        )
    }
}

fn check_palette(palette: &Palette, config: &MosaicConfig) -> Result<()> {
    if palette.is_empty() {
        return Err(MosaicError::EmptyPalette);
    }
    if config.juxtaposition && config.cycle && palette.len() < MIN_PALETTE_FOR_JUXTAPOSED_CYCLE {
        return Err(MosaicError::InsufficientPalette {
            required: MIN_PALETTE_FOR_JUXTAPOSED_CYCLE,
            available: palette.len(),
        });
    }
    Ok(())
}

fn draw_grid(canvas: &mut PixelBuffer, tiles: TileIterator, include_diagonal: bool) -> Result<()> {
    let block_size = tiles.block_size();
    let (width, height) = (canvas.width(), canvas.height());
    for tile in tiles {
        let offsets =
            grid_outline(tile.origin, block_size, width, height, include_diagonal).into_byte_offsets();
        fill_color(canvas, &offsets, Color::WHITE)?;
    }
    Ok(())
}

/// Mosaic front end over one decoded source image
pub struct MosaicEngine<S> {
    source: PixelBuffer,
    resampler: S,
}

impl<S: Resampler> MosaicEngine<S> {
    /// Create an engine for `source` using `resampler` for picture tiles
    pub const fn new(source: PixelBuffer, resampler: S) -> Self {
        Self { source, resampler }
    }

    /// Read-only source pixels
    pub const fn source(&self) -> &PixelBuffer {
        &self.source
    }

    /// Grid overlay on a copy of the source
    ///
    /// The diagonal is drawn when requested or when previewing the triangle
    /// mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the block size is zero
    pub fn build_preview(&self, config: &PreviewConfig) -> Result<PixelBuffer> {
        let tiles = TileIterator::new(self.source.width(), self.source.height(), config.block_size)?;
        let mut canvas = self.source.clone();
        draw_grid(&mut canvas, tiles, config.draws_diagonal())?;
        Ok(canvas)
    }

    /// Run a full conversion and return the finished canvas
    ///
    /// Blocks until every render task has completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid, the palette cannot
    /// serve a picture mosaic, or any tile fails to render
    pub fn run_mosaic<R: Rng + ?Sized>(
        &self,
        config: &MosaicConfig,
        palette: &Palette,
        rng: &mut R,
    ) -> Result<PixelBuffer> {
        let mut job = MosaicJob::new(&self.source, *config);
        job.run(palette, &self.resampler, rng)?;
        job.into_canvas().ok_or_else(|| {
            invalid_parameter("state", &"incomplete", &"job finished without a canvas")
        })
    }
}

/// Threshold `buffer` to black and white
///
/// Independent of the mosaic mode; callers decide whether to apply it more
/// than once.
pub fn apply_black_and_white(mut buffer: PixelBuffer) -> PixelBuffer {
    threshold(&mut buffer);
    buffer
}
