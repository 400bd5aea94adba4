//! Lightning NOx tendencies following the DeCaria vertical distribution.
//!
//! The total flash rate of a patch is turned into moles of NOx per second, spread vertically by a
//! truncated Gaussian around the lower isotherm (and, for intra-cloud flashes reaching above it,
//! the upper isotherm too), and converted into a mixing ratio tendency in ppmv s⁻¹. Only grid cells
//! with reflectivity above the convective threshold receive NOx.
//!
//! The driver owns the time step; multiply the returned tendencies by it to get a concentration
//! change.
use crate::{
    cells::{CellCountProfile, CellCounter, ThresholdCellCounter},
    config::{DecariaConfig, FlashCategory},
    diagnostics::{Diagnostic, Diagnostics, SkipReason, TracingDiagnostics},
    distribution::{bellcurve, VerticalDistribution},
    error::{LightningError, Result},
    grid::{Field2, Field3, PatchBounds},
    levels::{find_boundaries, VerticalBoundaries},
    profile::ColumnProfile,
    reduce::Reducer,
};

/// Converts a mole fraction into parts per million by volume.
const PPMV: f64 = 1.0e6;

/// Everything the scheme reads from the host model for one patch.
///
/// 3-D fields are (x, vertical, y) and 2-D fields are (x, y). Every field must cover `bounds`.
#[derive(Debug, Clone, Copy)]
pub struct LightningInputs<'a> {
    /// The patch to compute.
    pub bounds: PatchBounds,
    /// Grid spacing in x (m).
    pub dx: f64,
    /// Grid spacing in y (m).
    pub dy: f64,
    /// Land mask. Not used by this scheme.
    pub land_mask: &'a Field2,
    /// Terrain height (m). Not used by this scheme.
    pub terrain_height: &'a Field2,
    /// Temperature (K).
    pub temperature: &'a Field3,
    /// Air density (kg m⁻³).
    pub density: &'a Field3,
    /// Height of each level (m).
    pub height: &'a Field3,
    /// Pressure (Pa).
    pub pressure: &'a Field3,
    /// Intra-cloud flash rate (flashes s⁻¹) per column.
    pub ic_flash_rate: &'a Field2,
    /// Cloud-to-ground flash rate (flashes s⁻¹) per column.
    pub cg_flash_rate: &'a Field2,
    /// Radar reflectivity (dBZ).
    pub reflectivity: &'a Field3,
}

impl<'a> LightningInputs<'a> {
    /// Check that every field covers the patch and the grid spacing is usable.
    pub fn validate(&self) -> Result<()> {
        let bounds = &self.bounds;

        for fld in &[
            self.temperature,
            self.density,
            self.height,
            self.pressure,
            self.reflectivity,
        ] {
            fld.check_covers(bounds)?;
        }

        for fld in &[
            self.land_mask,
            self.terrain_height,
            self.ic_flash_rate,
            self.cg_flash_rate,
        ] {
            fld.check_covers(bounds)?;
        }

        if self.dx > 0.0 && self.dx.is_finite() && self.dy > 0.0 && self.dy.is_finite() {
            Ok(())
        } else {
            Err(LightningError::InvalidInput)
        }
    }
}

/// NOx tendencies (ppmv s⁻¹) from intra-cloud and cloud-to-ground flashes, over the patch.
#[derive(Debug, Clone, PartialEq)]
pub struct NoxTendency {
    /// Tendency from intra-cloud flashes.
    pub ic: Field3,
    /// Tendency from cloud-to-ground flashes.
    pub cg: Field3,
}

impl NoxTendency {
    fn zeros(bounds: &PatchBounds) -> Self {
        NoxTendency {
            ic: Field3::zeros(bounds),
            cg: Field3::zeros(bounds),
        }
    }

    /// The tendency for one flash category.
    #[inline]
    pub fn get(&self, category: FlashCategory) -> &Field3 {
        match category {
            FlashCategory::IntraCloud => &self.ic,
            FlashCategory::CloudToGround => &self.cg,
        }
    }

    /// Moles of NOx per second added to the patch by one flash category, found by undoing the
    /// mixing ratio conversion over every grid cell of the patch.
    ///
    /// Flashes whose NOx fell on levels without convective cells are not counted, so this is at
    /// most the flash rate times the moles per flash.
    pub fn column_integral(
        &self,
        category: FlashCategory,
        inputs: &LightningInputs<'_>,
    ) -> Result<f64> {
        inputs.validate()?;

        let bounds = &inputs.bounds;
        let fld = self.get(category);
        fld.check_covers(bounds)?;

        let column = ColumnProfile::from_fields(
            bounds,
            inputs.height,
            inputs.temperature,
            inputs.pressure,
            inputs.density,
        )?;

        let moles = bounds
            .k
            .iter()
            .map(|k| {
                let scale =
                    column.dz(k) * column.p(k) / (column.conv(k, inputs.dx, inputs.dy) * PPMV);
                fld.level_values(bounds, k).sum::<f64>() * scale
            })
            .sum();

        Ok(moles)
    }

    #[inline]
    fn get_mut(&mut self, category: FlashCategory) -> &mut Field3 {
        match category {
            FlashCategory::IntraCloud => &mut self.ic,
            FlashCategory::CloudToGround => &mut self.cg,
        }
    }
}

/// Computes lightning NOx tendencies for a patch.
///
/// The reducer, diagnostics, and cell counter are supplied by the host. By default diagnostics go
/// to `tracing` and cells are counted by thresholding reflectivity.
#[derive(Debug, Clone)]
pub struct DecariaComputer<R, D = TracingDiagnostics, C = ThresholdCellCounter> {
    config: DecariaConfig,
    reducer: R,
    diagnostics: D,
    cell_counter: C,
}

impl<R: Reducer> DecariaComputer<R> {
    /// Create a computer with the default diagnostics and cell counter.
    pub fn new(config: DecariaConfig, reducer: R) -> Result<Self> {
        config.validate()?;

        Ok(DecariaComputer {
            config,
            reducer,
            diagnostics: TracingDiagnostics,
            cell_counter: ThresholdCellCounter,
        })
    }
}

impl<R, D, C> DecariaComputer<R, D, C>
where
    R: Reducer,
    D: Diagnostics,
    C: CellCounter,
{
    /// Replace the diagnostics sink.
    pub fn with_diagnostics<D2: Diagnostics>(self, diagnostics: D2) -> DecariaComputer<R, D2, C> {
        DecariaComputer {
            config: self.config,
            reducer: self.reducer,
            diagnostics,
            cell_counter: self.cell_counter,
        }
    }

    /// Replace the convective cell counter.
    pub fn with_cell_counter<C2: CellCounter>(self, cell_counter: C2) -> DecariaComputer<R, D, C2> {
        DecariaComputer {
            config: self.config,
            reducer: self.reducer,
            diagnostics: self.diagnostics,
            cell_counter,
        }
    }

    /// The configuration in use.
    #[inline]
    pub fn config(&self) -> &DecariaConfig {
        &self.config
    }

    /// Compute the intra-cloud and cloud-to-ground NOx tendencies for one patch.
    ///
    /// In distributed mode every patch must call this together, since the cell counts, flash
    /// totals, and vertical boundaries are reduced across patches. The patches first agree on
    /// whether all of their inputs are valid. If any patch has bad inputs, that patch gets its
    /// own validation error and every other patch gets `LightningError::PeerFailure`.
    ///
    /// A patch without a usable cloud or without flashes gets all zero tendencies; that is a
    /// normal outcome, not an error.
    pub fn compute(&self, inputs: &LightningInputs<'_>) -> Result<NoxTendency> {
        let method = self.config.cell_count_method;

        let validated = inputs.validate();
        if method.is_distributed() {
            let local_ok = if validated.is_ok() { 1.0 } else { 0.0 };
            if self.reducer.min(local_ok) < 1.0 {
                validated?;
                return Err(LightningError::PeerFailure);
            }
        }
        validated?;

        let bounds = &inputs.bounds;

        let mut tendency = NoxTendency::zeros(bounds);

        let cells = self.cell_counter.count(
            inputs.reflectivity,
            bounds,
            self.config.reflectivity_threshold,
            method,
            &self.reducer,
        )?;
        if cells.levels() != bounds.k {
            return Err(LightningError::LengthMismatch);
        }
        self.diagnostics.record(Diagnostic::CellCounts(&cells));

        let mut ic_total = inputs.ic_flash_rate.patch_sum(bounds)?;
        let mut cg_total = inputs.cg_flash_rate.patch_sum(bounds)?;
        if method.is_distributed() {
            ic_total = self.reducer.sum(ic_total);
            cg_total = self.reducer.sum(cg_total);
        }
        self.diagnostics.record(Diagnostic::FlashTotals {
            ic: ic_total,
            cg: cg_total,
        });

        let column = ColumnProfile::from_fields(
            bounds,
            inputs.height,
            inputs.temperature,
            inputs.pressure,
            inputs.density,
        )?;
        self.diagnostics.record(Diagnostic::Column(&column));

        let boundaries = find_boundaries(&cells, &column, &self.config, &self.reducer)?;
        self.diagnostics.record(Diagnostic::Boundaries(&boundaries));

        let patch = Patch {
            inputs,
            cells: &cells,
            column: &column,
            boundaries: &boundaries,
        };

        self.distribute(FlashCategory::IntraCloud, ic_total, &patch, &mut tendency)?;
        self.distribute(FlashCategory::CloudToGround, cg_total, &patch, &mut tendency)?;

        Ok(tendency)
    }

    fn distribution(
        &self,
        category: FlashCategory,
        patch: &Patch<'_, '_>,
    ) -> Result<VerticalDistribution> {
        let b = patch.boundaries;

        match category {
            FlashCategory::IntraCloud => {
                let lower = bellcurve(b.cloud_bottom, b.lower_isotherm, b.cloud_top, patch.column)?;
                if b.is_dual_mode() {
                    let upper =
                        bellcurve(b.cloud_bottom, b.upper_isotherm, b.cloud_top, patch.column)?;
                    lower.blend(&upper)
                } else {
                    Ok(lower)
                }
            }
            FlashCategory::CloudToGround => bellcurve(
                patch.inputs.bounds.k.start(),
                b.lower_isotherm,
                b.cloud_top,
                patch.column,
            ),
        }
    }

    fn distribute(
        &self,
        category: FlashCategory,
        total_flash_rate: f64,
        patch: &Patch<'_, '_>,
        tendency: &mut NoxTendency,
    ) -> Result<()> {
        let skip = |reason: SkipReason| -> Result<()> {
            self.diagnostics
                .record(Diagnostic::Skipped { category, reason });
            Ok(())
        };

        if !(total_flash_rate > 0.0) {
            return skip(SkipReason::NoFlashes);
        }

        let b = patch.boundaries;
        if !b.has_coherent_cloud() {
            return skip(SkipReason::NoCoherentCloud);
        }

        let dist = self.distribution(category, patch)?;
        let b_denom = dist.pressure_weighted_sum(patch.column);
        self.diagnostics.record(Diagnostic::Distribution {
            category,
            distribution: &dist,
            pressure_weighted_sum: b_denom,
        });

        if !(b_denom > 0.0 && b_denom.is_finite()) {
            return skip(SkipReason::DegenerateNormalization);
        }

        let bounds = &patch.inputs.bounds;
        let moles_per_flash = self.config.moles_per_flash(category);
        let (dx, dy) = (patch.inputs.dx, patch.inputs.dy);

        // Intra-cloud levels are filled bottom up, cloud-to-ground levels top down.
        let levels: Vec<usize> = match category {
            FlashCategory::IntraCloud => (b.cloud_bottom..=b.cloud_top).collect(),
            FlashCategory::CloudToGround => (bounds.k.start()..=b.cloud_top).rev().collect(),
        };

        let out = tendency.get_mut(category);
        for k in levels {
            let count = patch.cells.count(k);
            if count <= 0.0 {
                continue;
            }

            let conv = patch.column.conv(k, dx, dy);
            let value = total_flash_rate * moles_per_flash / count * dist.weight(k) / b_denom
                * conv
                / patch.column.dz(k)
                * PPMV;

            self.fill_convective_cells(out, patch, k, value)?;
        }

        Ok(())
    }

    fn fill_convective_cells(
        &self,
        out: &mut Field3,
        patch: &Patch<'_, '_>,
        k: usize,
        value: f64,
    ) -> Result<()> {
        let bounds = &patch.inputs.bounds;
        let refl = patch.inputs.reflectivity;
        let threshold = self.config.reflectivity_threshold;

        for j in bounds.j.iter() {
            for i in bounds.i.iter() {
                if refl.get(i, k, j).map_or(false, |dbz| dbz > threshold) {
                    out.set(i, k, j, value)?;
                }
            }
        }

        Ok(())
    }
}

// What a flash category needs to know about the patch.
struct Patch<'i, 'a> {
    inputs: &'i LightningInputs<'a>,
    cells: &'i CellCountProfile,
    column: &'i ColumnProfile,
    boundaries: &'i VerticalBoundaries,
}
