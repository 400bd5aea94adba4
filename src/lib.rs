#![warn(missing_docs)]
//! Vertical distribution of lightning-produced nitrogen oxides (NOx).
//!
//! Given the intra-cloud (IC) and cloud-to-ground (CG) flash rates of a patch of a 3-D model grid,
//! this crate computes how fast each flash category adds NOx to each grid cell, in ppmv s⁻¹,
//! following the vertical distribution of DeCaria et al. (2000, 2005):
//!
//!  1. Convective cells are counted level by level from radar reflectivity.
//!  2. The patch is reduced to a single representative column by horizontal averaging.
//!  3. The cloud top and bottom and two isotherm levels are located in that column
//!     ([`find_boundaries`]).
//!  4. A truncated Gaussian distribution is centered on the isotherm levels ([`bellcurve`]).
//!  5. Moles of NOx per flash are spread through the convective cells of the cloud.
//!
//! When the grid is split across threads or processes, the host supplies a [`Reducer`] and the
//! cell counts, flash totals, and cloud boundaries are computed over the whole domain.
//!
//! ```rust
//! use lightning_nox::{
//!     DecariaComputer, DecariaConfig, Field2, Field3, LightningInputs, LocalReducer, PatchBounds,
//! };
//!
//! let bounds = PatchBounds::new((0, 1), (0, 9), (0, 1)).unwrap();
//! let (i, k, j) = (bounds.i, bounds.k, bounds.j);
//!
//! let height = Field3::from_fn(i, k, j, |_, k, _| 1000.0 * k as f64);
//! let temperature = Field3::from_fn(i, k, j, |_, k, _| 300.0 - 8.0 * k as f64);
//! let pressure = Field3::from_fn(i, k, j, |_, k, _| 100_000.0 * (-(k as f64) / 7.5).exp());
//! let density = Field3::filled(i, k, j, 1.0);
//! let reflectivity = Field3::from_fn(i, k, j, |_, k, _| if k >= 1 && k <= 8 { 45.0 } else { 0.0 });
//! let ic_flash_rate = Field2::filled(i, j, 0.5);
//! let cg_flash_rate = Field2::filled(i, j, 0.1);
//! let land_mask = Field2::filled(i, j, 1.0);
//! let terrain_height = Field2::filled(i, j, 0.0);
//!
//! let inputs = LightningInputs {
//!     bounds,
//!     dx: 3000.0,
//!     dy: 3000.0,
//!     land_mask: &land_mask,
//!     terrain_height: &terrain_height,
//!     temperature: &temperature,
//!     density: &density,
//!     height: &height,
//!     pressure: &pressure,
//!     ic_flash_rate: &ic_flash_rate,
//!     cg_flash_rate: &cg_flash_rate,
//!     reflectivity: &reflectivity,
//! };
//!
//! let computer = DecariaComputer::new(DecariaConfig::default(), LocalReducer).unwrap();
//! let tendency = computer.compute(&inputs).unwrap();
//!
//! assert!(tendency.ic.get(0, 5, 0).unwrap() > 0.0);
//! assert_eq!(tendency.ic.get(0, 9, 0), Some(0.0));
//! ```

//
// API
//
pub use crate::{
    cells::{CellCountProfile, CellCounter, ThresholdCellCounter},
    config::{
        CellCountMethod, DecariaConfig, FlashCategory, DEFAULT_MOLES_PER_FLASH,
        DEFAULT_REFLECTIVITY_THRESHOLD,
    },
    decaria::{DecariaComputer, LightningInputs, NoxTendency},
    diagnostics::{Diagnostic, Diagnostics, NullDiagnostics, SkipReason, TracingDiagnostics},
    distribution::{bellcurve, VerticalDistribution},
    error::{LightningError, Result},
    grid::{Field2, Field3, IndexRange, PatchBounds},
    levels::{find_boundaries, VerticalBoundaries},
    profile::{horizontal_average, ColumnProfile, R_GAS},
    reduce::{BarrierReducer, LocalReducer, Reducer},
};

//
// Internal use only
//

// Modules
mod cells;
mod config;
mod decaria;
mod diagnostics;
mod distribution;
mod error;
mod grid;
mod levels;
mod profile;
mod reduce;
mod utility;

#[cfg(test)]
mod test_data;
