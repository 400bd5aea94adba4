//! Count convective cells on each level of a patch.
//!
//! A grid cell is convective when its radar reflectivity is above a threshold, 20 dBZ by default.
//! The per level counts bound the cloud vertically and spread the flash rate over the active
//! cells of a level.
use crate::{
    config::CellCountMethod,
    error::{LightningError, Result},
    grid::{Field3, IndexRange, PatchBounds},
    reduce::Reducer,
};

/// The number of convective cells on each level, bottom to top.
#[derive(Debug, Clone, PartialEq)]
pub struct CellCountProfile {
    levels: IndexRange,
    counts: Vec<f64>,
}

impl CellCountProfile {
    /// Create a profile from counts covering `levels`.
    ///
    /// Counts are floating point because domain wide counts come back from a sum reduction.
    pub fn new(levels: IndexRange, counts: Vec<f64>) -> Result<Self> {
        if counts.len() != levels.len() {
            return Err(LightningError::LengthMismatch);
        }

        if counts.iter().any(|c| !c.is_finite() || *c < 0.0) {
            return Err(LightningError::InvalidInput);
        }

        Ok(CellCountProfile { levels, counts })
    }

    /// The vertical levels covered by this profile.
    #[inline]
    pub fn levels(&self) -> IndexRange {
        self.levels
    }

    /// The count at level `k`, zero outside the profile.
    #[inline]
    pub fn count(&self, k: usize) -> f64 {
        if self.levels.contains(k) {
            self.counts[k - self.levels.start()]
        } else {
            0.0
        }
    }

    /// The counts, bottom to top.
    #[inline]
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// True if no level has a convective cell.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c <= 0.0)
    }

    /// The highest level with a nonzero count.
    pub fn top_active_level(&self) -> Option<usize> {
        self.counts
            .iter()
            .rposition(|&c| c > 0.0)
            .map(|i| i + self.levels.start())
    }

    /// The lowest level with a nonzero count.
    pub fn bottom_active_level(&self) -> Option<usize> {
        self.counts
            .iter()
            .position(|&c| c > 0.0)
            .map(|i| i + self.levels.start())
    }

    /// The largest count on any level.
    pub fn max_count(&self) -> f64 {
        self.counts.iter().cloned().fold(0.0, f64::max)
    }
}

/// Counts the convective cells of a patch.
pub trait CellCounter {
    /// Count the cells on each level of `bounds.k` with reflectivity above `threshold` (dBZ).
    ///
    /// With `CellCountMethod::Domain` the counts must cover the whole domain, so every patch
    /// makes the same calls on `reducer`.
    fn count(
        &self,
        reflectivity: &Field3,
        bounds: &PatchBounds,
        threshold: f64,
        method: CellCountMethod,
        reducer: &dyn Reducer,
    ) -> Result<CellCountProfile>;
}

/// Counts cells by comparing each grid cell to the reflectivity threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdCellCounter;

impl CellCounter for ThresholdCellCounter {
    fn count(
        &self,
        reflectivity: &Field3,
        bounds: &PatchBounds,
        threshold: f64,
        method: CellCountMethod,
        reducer: &dyn Reducer,
    ) -> Result<CellCountProfile> {
        reflectivity.check_covers(bounds)?;

        let counts = bounds
            .k
            .iter()
            .map(|k| {
                reflectivity
                    .level_values(bounds, k)
                    .filter(|&dbz| dbz > threshold)
                    .count() as f64
            })
            .map(|local| {
                if method.is_distributed() {
                    reducer.sum(local)
                } else {
                    local
                }
            })
            .collect();

        CellCountProfile::new(bounds.k, counts)
    }
}
