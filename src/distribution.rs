//! The vertical distribution of lightning NOx in a column.
//!
//! Following DeCaria et al. (2000, 2005), NOx from a flash is spread vertically as a Gaussian in
//! height, centered on a mode level and truncated at three standard deviations. The standard
//! deviation is chosen so the truncated curve fits inside the requested level range on the side
//! closest to the mode.
use crate::{
    error::{LightningError, Result},
    grid::IndexRange,
    profile::ColumnProfile,
    utility::gaussian,
};
use itertools::izip;

/// Number of standard deviations kept on either side of the mode.
const TRUNCATION: f64 = 3.0;

/// Weights of a vertical distribution, one per level of the column.
///
/// The weights are per meter: summed over the column after multiplying by each level's layer
/// thickness they give 1. Levels outside `active_levels()` have zero weight.
#[derive(Debug, Clone, PartialEq)]
pub struct VerticalDistribution {
    levels: IndexRange,
    active: IndexRange,
    weights: Vec<f64>,
}

impl VerticalDistribution {
    /// All the levels of the column this distribution belongs to.
    #[inline]
    pub fn levels(&self) -> IndexRange {
        self.levels
    }

    /// The levels that may carry a nonzero weight.
    #[inline]
    pub fn active_levels(&self) -> IndexRange {
        self.active
    }

    /// Weight of level `k`, zero for levels outside the active range or the column.
    #[inline]
    pub fn weight(&self, k: usize) -> f64 {
        if self.active.contains(k) {
            self.weights[k - self.levels.start()]
        } else {
            0.0
        }
    }

    /// The weights for every level of the column, bottom to top.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Average this distribution with another one, level by level.
    ///
    /// Both must belong to the same column. The active range of the result covers both.
    pub fn blend(&self, other: &VerticalDistribution) -> Result<VerticalDistribution> {
        if self.levels != other.levels {
            return Err(LightningError::LengthMismatch);
        }

        let start = self.active.start().min(other.active.start());
        let end = self.active.end().max(other.active.end());

        let weights = izip!(&self.weights, &other.weights)
            .map(|(a, b)| 0.5 * (a + b))
            .collect();

        Ok(VerticalDistribution {
            levels: self.levels,
            active: IndexRange::new(start, end)?,
            weights,
        })
    }

    /// Sum of weight times layer thickness over the active levels. This is 1 for a distribution
    /// built on `column`.
    pub fn thickness_weighted_sum(&self, column: &ColumnProfile) -> f64 {
        self.active
            .iter()
            .map(|k| self.weight(k) * column.dz(k))
            .sum()
    }

    /// Sum of weight times pressure (Pa) over the active levels, the normalization used when
    /// converting moles of NOx into a mixing ratio tendency.
    pub fn pressure_weighted_sum(&self, column: &ColumnProfile) -> f64 {
        self.active
            .iter()
            .map(|k| self.weight(k) * column.p(k))
            .sum()
    }
}

/// Build a truncated Gaussian distribution over levels `k_min` to `k_max` with its mode at `k_mu`.
///
/// The standard deviation is a third of the smaller of the distances (in height) from the mode to
/// either end of the range, so nothing within three standard deviations lies outside the range.
/// Each level's weight is the Gaussian density at its height times its layer thickness, scaled so
/// the thickness weighted sum over the range is 1.
///
/// If the mode sits on an end of the range the standard deviation is zero and all the weight goes
/// to the mode level.
pub fn bellcurve(
    k_min: usize,
    k_mu: usize,
    k_max: usize,
    column: &ColumnProfile,
) -> Result<VerticalDistribution> {
    let levels = column.levels();
    if !(k_min <= k_mu && k_mu <= k_max && levels.contains(k_min) && levels.contains(k_max)) {
        return Err(LightningError::InvalidInput);
    }

    let active = IndexRange::new(k_min, k_max)?;
    let mu = column.z(k_mu);
    let sigma = (column.z(k_max) - mu).min(mu - column.z(k_min)) / TRUNCATION;

    let mut weights = vec![0.0; levels.len()];
    let offset = levels.start();

    if sigma > 0.0 && sigma.is_finite() {
        for k in active.iter() {
            let z = column.z(k);
            if ((z - mu) / sigma).abs() <= TRUNCATION * (1.0 + 1.0e-9) {
                weights[k - offset] = gaussian(z, mu, sigma) * column.dz(k);
            }
        }
    } else {
        weights[k_mu - offset] = 1.0;
    }

    let norm: f64 = active
        .iter()
        .map(|k| weights[k - offset] * column.dz(k))
        .sum();

    if !(norm > 0.0 && norm.is_finite()) {
        // Only possible if heights do not increase with level.
        return Err(LightningError::InvalidInput);
    }

    weights.iter_mut().for_each(|w| *w /= norm);

    Ok(VerticalDistribution {
        levels,
        active,
        weights,
    })
}
