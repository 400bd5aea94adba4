//! Constants and options for the DeCaria lightning NOx scheme.
//!
//! Values arrive already parsed from the host model's namelist layer. `CellCountMethod` can also
//! be parsed from text, either by name or by its namelist code.
use crate::error::{LightningError, Result};
use metfor::{Celsius, Quantity};
use strum_macros::{Display, EnumIter, EnumString};

/// Default moles of NOx produced per flash, for both intra-cloud and cloud-to-ground flashes.
pub const DEFAULT_MOLES_PER_FLASH: f64 = 500.0;

/// Default reflectivity (dBZ) above which a grid cell counts as part of a convective cell.
pub const DEFAULT_REFLECTIVITY_THRESHOLD: f64 = 20.0;

/// How far the scheme looks when counting cells and totalling flash rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
pub enum CellCountMethod {
    /// Only the local patch, no global reductions.
    #[strum(to_string = "patch", serialize = "1")]
    Patch,
    /// The whole domain, cell counts, flash rates, and vertical boundaries are reduced across
    /// all patches.
    #[strum(to_string = "domain", serialize = "2")]
    Domain,
}

impl CellCountMethod {
    /// Does this method require global reductions?
    #[inline]
    pub fn is_distributed(self) -> bool {
        self == CellCountMethod::Domain
    }
}

/// The two categories of lightning flash, each with its own NOx yield and distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum FlashCategory {
    /// Intra-cloud flashes.
    #[strum(to_string = "IC")]
    IntraCloud,
    /// Cloud-to-ground flashes.
    #[strum(to_string = "CG")]
    CloudToGround,
}

/// Configuration for the scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecariaConfig {
    /// Moles of NOx per intra-cloud flash.
    pub n_ic: f64,
    /// Moles of NOx per cloud-to-ground flash.
    pub n_cg: f64,
    /// The warm isotherm marking the lower (convective) production mode.
    pub lower_isotherm: Celsius,
    /// The cold isotherm marking the upper (stratiform) production mode.
    pub upper_isotherm: Celsius,
    /// Reflectivity (dBZ) that a cell must exceed to count as convective.
    pub reflectivity_threshold: f64,
    /// Patch only or domain wide computation.
    pub cell_count_method: CellCountMethod,
}

impl Default for DecariaConfig {
    fn default() -> Self {
        DecariaConfig {
            n_ic: DEFAULT_MOLES_PER_FLASH,
            n_cg: DEFAULT_MOLES_PER_FLASH,
            lower_isotherm: Celsius(-15.0),
            upper_isotherm: Celsius(-45.0),
            reflectivity_threshold: DEFAULT_REFLECTIVITY_THRESHOLD,
            cell_count_method: CellCountMethod::Patch,
        }
    }
}

impl DecariaConfig {
    /// Moles of NOx per flash of the given category.
    #[inline]
    pub fn moles_per_flash(&self, category: FlashCategory) -> f64 {
        match category {
            FlashCategory::IntraCloud => self.n_ic,
            FlashCategory::CloudToGround => self.n_cg,
        }
    }

    /// Check the configuration makes physical sense.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lightning_nox::DecariaConfig;
    /// use metfor::Celsius;
    ///
    /// assert!(DecariaConfig::default().validate().is_ok());
    ///
    /// let backwards = DecariaConfig {
    ///     lower_isotherm: Celsius(-45.0),
    ///     upper_isotherm: Celsius(-15.0),
    ///     ..DecariaConfig::default()
    /// };
    /// assert!(backwards.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        let yields_ok = [self.n_ic, self.n_cg]
            .iter()
            .all(|n| n.is_finite() && *n >= 0.0);

        let lower = self.lower_isotherm.unpack();
        let upper = self.upper_isotherm.unpack();
        let isotherms_ok = lower.is_finite() && upper.is_finite() && upper <= lower;

        if yields_ok && isotherms_ok && self.reflectivity_threshold.is_finite() {
            Ok(())
        } else {
            Err(LightningError::InvalidInput)
        }
    }
}
