//! Diagnostic reporting for operators.
//!
//! The scheme reports what it found each time it runs: flash totals, the cell count profile, the
//! vertical boundaries, and the distributions it built. Reports never change the result and never
//! stop the computation.
use crate::{
    cells::CellCountProfile, config::FlashCategory, distribution::VerticalDistribution,
    levels::VerticalBoundaries, profile::ColumnProfile,
};
use tracing::{debug, trace, warn};

/// Why a flash category produced no NOx this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The total flash rate was not positive.
    NoFlashes,
    /// The cloud does not straddle the lower isotherm.
    NoCoherentCloud,
    /// The pressure weighted normalization was zero, negative, or not finite.
    DegenerateNormalization,
}

/// An event reported by the scheme.
#[derive(Debug, Clone, Copy)]
pub enum Diagnostic<'a> {
    /// Total flash rates (flashes s⁻¹) after any global reduction.
    FlashTotals {
        /// Intra-cloud flash rate.
        ic: f64,
        /// Cloud-to-ground flash rate.
        cg: f64,
    },
    /// The convective cell counts.
    CellCounts(&'a CellCountProfile),
    /// The averaged column profile.
    Column(&'a ColumnProfile),
    /// The vertical boundaries after any reconciliation.
    Boundaries(&'a VerticalBoundaries),
    /// A distribution was built for a flash category.
    Distribution {
        /// Which flashes it distributes.
        category: FlashCategory,
        /// The distribution.
        distribution: &'a VerticalDistribution,
        /// Sum of weight times pressure, the denominator of the tendency.
        pressure_weighted_sum: f64,
    },
    /// A flash category produced no tendency.
    Skipped {
        /// Which flashes were skipped.
        category: FlashCategory,
        /// Why.
        reason: SkipReason,
    },
}

/// Receives diagnostics from the scheme.
pub trait Diagnostics {
    /// Handle one event.
    fn record(&self, event: Diagnostic<'_>);
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    #[inline]
    fn record(&self, event: Diagnostic<'_>) {
        (**self).record(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    #[inline]
    fn record(&self, _event: Diagnostic<'_>) {}
}

/// Forwards events to `tracing`. Summaries go out at debug level, per level profiles at trace
/// level, and a degenerate normalization is a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn record(&self, event: Diagnostic<'_>) {
        match event {
            Diagnostic::FlashTotals { ic, cg } => {
                debug!(ic, cg, "lightning flash rate totals");
            }
            Diagnostic::CellCounts(cells) => {
                debug!(
                    bottom = ?cells.bottom_active_level(),
                    top = ?cells.top_active_level(),
                    max_count = cells.max_count(),
                    "convective cell counts"
                );
                for (k, count) in cells.levels().iter().zip(cells.counts()) {
                    trace!(k = k as u64, count = *count, "cell count");
                }
            }
            Diagnostic::Column(column) => {
                for k in column.levels().iter() {
                    trace!(
                        k = k as u64,
                        z = column.z(k),
                        t = column.t(k),
                        p = column.p(k),
                        dz = column.dz(k),
                        "column profile"
                    );
                }
            }
            Diagnostic::Boundaries(b) => {
                debug!(
                    cloud_top = b.cloud_top as u64,
                    cloud_bottom = b.cloud_bottom as u64,
                    upper_isotherm = b.upper_isotherm as u64,
                    lower_isotherm = b.lower_isotherm as u64,
                    "lightning NOx vertical boundaries"
                );
            }
            Diagnostic::Distribution {
                category,
                distribution,
                pressure_weighted_sum,
            } => {
                let active = distribution.active_levels();
                debug!(
                    category = %category,
                    k_min = active.start() as u64,
                    k_max = active.end() as u64,
                    pressure_weighted_sum,
                    "lightning NOx distribution"
                );
                for k in active.iter() {
                    trace!(k = k as u64, weight = distribution.weight(k), "distribution weight");
                }
            }
            Diagnostic::Skipped {
                category,
                reason: SkipReason::DegenerateNormalization,
            } => {
                warn!(category = %category, "degenerate lightning NOx normalization, no tendency");
            }
            Diagnostic::Skipped { category, reason } => {
                debug!(category = %category, reason = ?reason, "no lightning NOx tendency");
            }
        }
    }
}
