//! Terminal progress for palette loading and mosaic rendering

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::algorithm::engine::MosaicMode;
use crate::io::configuration::PROGRESS_BAR_WIDTH;

static PALETTE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Palette: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static JOB_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

/// Coordinates the palette bar and the mosaic spinner
pub struct ProgressManager {
    multi_progress: MultiProgress,
    palette_bar: Option<ProgressBar>,
    job_spinner: Option<ProgressBar>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Progress drawn to stderr
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// Progress that tracks state without drawing
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi_progress: MultiProgress::with_draw_target(target),
            palette_bar: None,
            job_spinner: None,
        }
    }

    /// Show a bar for `file_count` palette files
    pub fn start_palette(&mut self, file_count: usize) {
        let bar = ProgressBar::new(file_count as u64);
        bar.set_style(PALETTE_STYLE.clone());
        self.palette_bar = Some(self.multi_progress.add(bar));
    }

    /// Count one palette file as decoded
    pub fn palette_loaded(&self, path: &Path) {
        if let Some(ref bar) = self.palette_bar {
            bar.set_message(path.file_name().unwrap_or_default().to_string_lossy().into_owned());
            bar.inc(1);
        }
    }

    /// Close the palette bar, reporting how many images were usable
    pub fn finish_palette(&self, loaded: usize) {
        if let Some(ref bar) = self.palette_bar {
            bar.finish_with_message(format!("{loaded} images"));
        }
    }

    /// Palette files counted so far
    pub fn palette_position(&self) -> Option<u64> {
        self.palette_bar.as_ref().map(ProgressBar::position)
    }

    /// Spin while a conversion runs
    pub fn start_job(&mut self, mode: MosaicMode, block_size: usize) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(JOB_STYLE.clone());
        spinner.set_message(format!("Rendering {mode} mosaic (block {block_size})"));
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.job_spinner = Some(self.multi_progress.add(spinner));
    }

    /// Stop the spinner
    pub fn finish_job(&self, elapsed: Duration) {
        if let Some(ref spinner) = self.job_spinner {
            spinner.finish_with_message(format!("Done in {:.2}s", elapsed.as_secs_f64()));
        }
    }

    /// Whether the mosaic spinner has been started and finished
    pub fn job_finished(&self) -> bool {
        self.job_spinner.as_ref().is_some_and(ProgressBar::is_finished)
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        let _ = self.multi_progress.clear();
    }
}
