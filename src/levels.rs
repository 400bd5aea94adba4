//! This module finds the vertical levels that bound the lightning NOx distribution: the top and
//! bottom of the cloud, from the convective cell counts, and the two isotherm levels that mark
//! the lower (warm) and upper (cold) NOx production modes.
//!
//! The isotherm search assumes temperature falls with height above the first crossing. With an
//! inversion aloft the first level at or below the target temperature is still the one reported,
//! even if a warmer layer sits above it.
use crate::{
    cells::CellCountProfile,
    config::DecariaConfig,
    error::{LightningError, Result},
    profile::ColumnProfile,
    reduce::Reducer,
};
use metfor::{Kelvin, Quantity};

/// Vertical level indexes bounding the NOx distribution of a patch.
///
/// When a cloud exists `cloud_bottom <= lower_isotherm <= upper_isotherm <= cloud_top` is the
/// expected arrangement, but nothing forces the cloud to reach the isotherms. The guards in
/// [`VerticalBoundaries::has_coherent_cloud`] decide whether the levels are usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalBoundaries {
    /// Highest level with a convective cell.
    pub cloud_top: usize,
    /// Lowest level with a convective cell.
    pub cloud_bottom: usize,
    /// First level at or colder than the upper isotherm.
    pub upper_isotherm: usize,
    /// First level at or colder than the lower isotherm.
    pub lower_isotherm: usize,
}

impl VerticalBoundaries {
    /// Does the cloud straddle the lower isotherm? Without that there is nothing to distribute.
    #[inline]
    pub fn has_coherent_cloud(&self) -> bool {
        self.cloud_top > self.lower_isotherm && self.cloud_bottom < self.lower_isotherm
    }

    /// Does the cloud reach above the upper isotherm, so intra-cloud NOx has two modes?
    #[inline]
    pub fn is_dual_mode(&self) -> bool {
        self.cloud_top > self.upper_isotherm
    }

    /// Reconcile the levels across all patches: the lowest cloud bottom, and the highest of the
    /// other three levels.
    pub fn reconcile(&self, reducer: &dyn Reducer) -> Self {
        let max_level = |k: usize| to_level(reducer.max(k as f64));

        VerticalBoundaries {
            cloud_top: max_level(self.cloud_top),
            cloud_bottom: to_level(reducer.min(self.cloud_bottom as f64)),
            upper_isotherm: max_level(self.upper_isotherm),
            lower_isotherm: max_level(self.lower_isotherm),
        }
    }
}

#[inline]
fn to_level(val: f64) -> usize {
    val.round().max(0.0) as usize
}

/// Find the cloud and isotherm levels for a patch.
///
/// * The cloud top is the highest level with a nonzero cell count, or the bottom level if there
///   are no cells at all.
/// * The cloud bottom is the lowest level with a nonzero cell count at or below the cloud top.
/// * The lower isotherm is the first level, scanning up from the bottom, at or below
///   `config.lower_isotherm`. The scan for the upper isotherm picks up where that one stopped.
///   Neither scan goes past the top level.
///
/// When `config.cell_count_method` is distributed the levels are reconciled over all patches.
pub fn find_boundaries(
    cells: &CellCountProfile,
    column: &ColumnProfile,
    config: &DecariaConfig,
    reducer: &dyn Reducer,
) -> Result<VerticalBoundaries> {
    let levels = column.levels();
    if cells.levels() != levels {
        return Err(LightningError::LengthMismatch);
    }

    let bottom = levels.start();

    let cloud_top = cells.top_active_level().unwrap_or(bottom);
    let cloud_bottom = (bottom..=cloud_top)
        .find(|&k| cells.count(k) > 0.0)
        .unwrap_or(cloud_top);

    let lower_isotherm =
        first_level_at_or_below(column, bottom, Kelvin::from(config.lower_isotherm));
    let upper_isotherm =
        first_level_at_or_below(column, lower_isotherm, Kelvin::from(config.upper_isotherm));

    let local = VerticalBoundaries {
        cloud_top,
        cloud_bottom,
        upper_isotherm,
        lower_isotherm,
    };

    if config.cell_count_method.is_distributed() {
        Ok(local.reconcile(reducer))
    } else {
        Ok(local)
    }
}

// Scan upward from `from`, stopping at the top level.
fn first_level_at_or_below(column: &ColumnProfile, from: usize, target: Kelvin) -> usize {
    let top = column.levels().end();
    let target = target.unpack();

    (from..top).find(|&k| column.t(k) <= target).unwrap_or(top)
}
