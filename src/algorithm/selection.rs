//! Sequential candidate selection with anti-repetition heuristics
//!
//! Picture mosaics choose one palette image per tile in row-major order.
//! Later choices depend on earlier ones through three pieces of state: a
//! bounded recent-use window, the image chosen for each column in the
//! previous tile row, and the newest picks still barred by cycling. [`SelectionState`] owns all three and is only ever driven from a
//! single thread; rendering starts after every tile has been selected.

use std::collections::VecDeque;

use rand::Rng;
use tracing::trace;

use crate::io::configuration::{JUXTAPOSITION_CANDIDATES, RECENT_USE_WINDOW};
use crate::io::error::{MosaicError, Result};
use crate::palette::{ImageId, Palette};
use crate::raster::Color;
use crate::spatial::TileDescriptor;

/// Which anti-repetition heuristics are active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Avoid recently used images and the image directly above
    pub juxtaposition: bool,
    /// Use every palette image once before any repeats
    pub cycle: bool,
}

/// Mutable bookkeeping threaded through the selection loop
#[derive(Debug, Clone)]
pub struct SelectionState {
    policy: SelectionPolicy,
    palette_len: usize,
    recent: VecDeque<ImageId>,
    above: Vec<Option<ImageId>>,
    cycle_used: Vec<ImageId>,
}

impl SelectionState {
    /// Fresh state for a grid `columns` tiles wide over a palette of
    /// `palette_len` images
    pub fn new(policy: SelectionPolicy, columns: usize, palette_len: usize) -> Self {
        Self {
            policy,
            palette_len,
            recent: VecDeque::with_capacity(RECENT_USE_WINDOW),
            above: vec![None; columns],
            cycle_used: Vec::with_capacity(palette_len),
        }
    }

    /// Active heuristics
    pub const fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Recent-use window, oldest first
    pub fn recent(&self) -> impl Iterator<Item = ImageId> + '_ {
        self.recent.iter().copied()
    }

    /// Picks still barred by cycling, oldest first
    ///
    /// Holds at most `palette_len - 1` ids, so the next pick is forced to
    /// the one image not seen among the last `palette_len - 1` picks.
    pub fn cycle_used(&self) -> &[ImageId] {
        &self.cycle_used
    }

    /// Image chosen for `column` in the previous tile row
    pub fn above(&self, column: usize) -> Option<ImageId> {
        self.above.get(column).copied().flatten()
    }

    /// Exclusion list for a tile in `column`, oldest entry first
    ///
    /// Cycle entries come first, then the recent-use window, then the image
    /// above. An id appearing in several sources keeps its newest position,
    /// so trimming drops cycle history before adjacency constraints.
    pub fn exclusion_for(&self, column: usize) -> Vec<ImageId> {
        let mut exclusion: Vec<ImageId> = Vec::new();
        let mut push = |id: ImageId| {
            exclusion.retain(|&existing| existing != id);
            exclusion.push(id);
        };

        if self.policy.cycle {
            self.cycle_used.iter().copied().for_each(&mut push);
        }
        if self.policy.juxtaposition {
            self.recent.iter().copied().for_each(&mut push);
            if let Some(id) = self.above(column) {
                push(id);
            }
        }
        exclusion
    }

    /// Choose the image for `tile`, whose source average color is `average`
    ///
    /// # Errors
    ///
    /// Returns an error if the palette query yields no candidate
    pub fn select<R: Rng + ?Sized>(
        &mut self,
        palette: &Palette,
        tile: &TileDescriptor,
        average: Color,
        rng: &mut R,
    ) -> Result<ImageId> {
        let chosen = if self.policy.juxtaposition {
            let exclusion = self.exclusion_for(tile.column);
            let candidates =
                palette.nearest_unexcluded(average, JUXTAPOSITION_CANDIDATES, &exclusion)?;
            let chosen = pick_uniform(&candidates, rng)?;
            self.remember_recent(chosen);
            if let Some(slot) = self.above.get_mut(tile.column) {
                *slot = Some(chosen);
            }
            chosen
        } else if self.policy.cycle {
            let candidates = palette.nearest_unexcluded(average, 1, &self.cycle_used)?;
            pick_uniform(&candidates, rng)?
        } else {
            let candidates = palette.nearest_unexcluded(average, 1, &[])?;
            pick_uniform(&candidates, rng)?
        };

        if self.policy.cycle {
            self.advance_cycle(chosen);
        }

        trace!(
            row = tile.row,
            column = tile.column,
            image = %chosen,
            "selected palette image"
        );
        Ok(chosen)
    }

    fn remember_recent(&mut self, id: ImageId) {
        if self.recent.len() >= RECENT_USE_WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back(id);
    }

    // Sliding window over the last palette_len - 1 picks. Every window of
    // palette_len consecutive picks is then free of repeats, across cycle
    // boundaries too.
    fn advance_cycle(&mut self, id: ImageId) {
        self.cycle_used.retain(|&used| used != id);
        self.cycle_used.push(id);
        let capacity = self.palette_len.saturating_sub(1);
        if self.cycle_used.len() > capacity {
            let stale = self.cycle_used.len() - capacity;
            self.cycle_used.drain(..stale);
            trace!(palette = self.palette_len, "cycle window advanced");
        }
    }
}

/// Uniformly random element of `candidates`; the sole element needs no draw
///
/// # Errors
///
/// Returns an error if `candidates` is empty
pub fn pick_uniform<R: Rng + ?Sized>(candidates: &[ImageId], rng: &mut R) -> Result<ImageId> {
    let index = match candidates.len() {
        0 => return Err(MosaicError::NoCandidates { excluded: 0 }),
        1 => 0,
        len => rng.random_range(0..len),
    };
    candidates
        .get(index)
        .copied()
        .ok_or(MosaicError::NoCandidates { excluded: 0 })
}
