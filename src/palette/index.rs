//! Candidate images indexed by exact average color
//!
//! Images sharing an average color are bucketed together. Buckets keep
//! their insertion order, which breaks distance ties during ranking.
//! Removing an image leaves its bucket in place even when it becomes empty;
//! an empty bucket simply contributes no candidates.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::math::distance::weighted_distance;
use crate::palette::catalog::{CatalogImage, ImageId};
use crate::raster::Color;

#[derive(Debug, Clone)]
struct ColorBucket {
    color: Color,
    members: Vec<ImageId>,
}

/// Pool of candidate images for picture mosaics
#[derive(Debug, Clone, Default)]
pub struct Palette {
    images: Vec<CatalogImage>,
    buckets: Vec<ColorBucket>,
    bucket_lookup: HashMap<Color, usize>,
}

impl Palette {
    /// Create an empty palette
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an image into the bucket of its average color
    ///
    /// # Errors
    ///
    /// Returns an error if an image with the same id is already present
    pub fn add(&mut self, image: CatalogImage) -> Result<()> {
        let id = image.id();
        if self.contains(id) {
            return Err(MosaicError::DuplicateImage { id });
        }

        let color = image.average();
        let bucket_index = match self.bucket_lookup.get(&color) {
            Some(&index) => index,
            None => {
                self.buckets.push(ColorBucket {
                    color,
                    members: Vec::new(),
                });
                let index = self.buckets.len() - 1;
                self.bucket_lookup.insert(color, index);
                index
            }
        };
        if let Some(bucket) = self.buckets.get_mut(bucket_index) {
            bucket.members.push(id);
        }

        debug!(%id, ?color, bucket = bucket_index, "added palette image");
        self.images.push(image);
        Ok(())
    }

    /// Remove an image, leaving its bucket behind
    ///
    /// # Errors
    ///
    /// Returns an error if no image with this id is present
    pub fn remove(&mut self, id: ImageId) -> Result<CatalogImage> {
        let position = self
            .images
            .iter()
            .position(|image| image.id() == id)
            .ok_or(MosaicError::UnknownImage { id })?;
        let image = self.images.remove(position);

        if let Some(bucket) = self
            .bucket_lookup
            .get(&image.average())
            .and_then(|&index| self.buckets.get_mut(index))
        {
            bucket.members.retain(|&member| member != id);
        }

        debug!(%id, "removed palette image");
        Ok(image)
    }

    /// Drop every image and bucket
    pub fn clear(&mut self) {
        self.images.clear();
        self.buckets.clear();
        self.bucket_lookup.clear();
    }

    /// Build a new palette from a selection of this palette's images
    ///
    /// Images are added in the order given; repeated ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if any id is not in this palette
    pub fn subset(&self, ids: &[ImageId]) -> Result<Self> {
        let mut selected = Self::new();
        for &id in ids {
            if selected.contains(id) {
                continue;
            }
            let image = self.get(id).ok_or(MosaicError::UnknownImage { id })?;
            selected.add(image.clone())?;
        }
        Ok(selected)
    }

    /// Look up an image by id
    pub fn get(&self, id: ImageId) -> Option<&CatalogImage> {
        self.images.iter().find(|image| image.id() == id)
    }

    /// Whether an image with this id is present
    pub fn contains(&self, id: ImageId) -> bool {
        self.get(id).is_some()
    }

    /// Images in insertion order
    pub fn images(&self) -> impl Iterator<Item = &CatalogImage> {
        self.images.iter()
    }

    /// Number of images
    pub const fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the palette holds no images
    pub const fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Number of color buckets, including emptied ones
    pub const fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Distinct bucket colors, nearest to `target` first
    ///
    /// Equal distances keep bucket insertion order.
    pub fn rank_colors_by_distance_to(&self, target: Color) -> Vec<Color> {
        self.ranked_buckets(target)
            .into_iter()
            .map(|bucket| bucket.color)
            .collect()
    }

    /// Up to `count` nearest images that are not excluded
    ///
    /// `excluded` is ordered oldest first. When it holds at least as many
    /// entries as the palette has images, only the newest `len - 1` entries
    /// are honoured, so a non-empty palette always yields a candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if the palette is empty, `count` is zero, or no
    /// candidate remains after exclusion
    pub fn nearest_unexcluded(
        &self,
        target: Color,
        count: usize,
        excluded: &[ImageId],
    ) -> Result<Vec<ImageId>> {
        if self.is_empty() {
            return Err(MosaicError::EmptyPalette);
        }
        if count == 0 {
            return Err(invalid_parameter("count", &count, &"must be at least one"));
        }

        let excluded = if excluded.len() >= self.len() {
            let keep = self.len() - 1;
            debug!(
                excluded = excluded.len(),
                kept = keep,
                "exclusion list trimmed to palette size"
            );
            excluded
                .get(excluded.len() - keep..)
                .unwrap_or_default()
        } else {
            excluded
        };
        let excluded: HashSet<ImageId> = excluded.iter().copied().collect();

        let mut chosen = Vec::with_capacity(count);
        'buckets: for bucket in self.ranked_buckets(target) {
            for &id in &bucket.members {
                if excluded.contains(&id) || chosen.contains(&id) {
                    continue;
                }
                chosen.push(id);
                if chosen.len() == count {
                    break 'buckets;
                }
            }
        }

        if chosen.is_empty() {
            return Err(MosaicError::NoCandidates {
                excluded: excluded.len(),
            });
        }
        Ok(chosen)
    }

    fn ranked_buckets(&self, target: Color) -> Vec<&ColorBucket> {
        let mut ranked: Vec<(f64, &ColorBucket)> = self
            .buckets
            .iter()
            .map(|bucket| (weighted_distance(bucket.color, target), bucket))
            .collect();
        // Stable sort keeps insertion order for ties
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.into_iter().map(|(_, bucket)| bucket).collect()
    }
}
