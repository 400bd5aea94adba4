//! Create the representative column profile of a patch.
//!
//! The lightning scheme works on a single column per patch. The height, temperature, pressure,
//! and density of that column are the horizontal averages of the 3-D fields over the patch, one
//! value per vertical level. Only the local patch is averaged; nothing here talks to other
//! patches.
use crate::{
    error::{LightningError, Result},
    grid::{Field3, IndexRange, PatchBounds},
};
use itertools::izip;
use metfor::{Kelvin, Meters, Quantity};

/// Universal gas constant in J mol⁻¹ K⁻¹.
pub const R_GAS: f64 = 8.314;

/// Average a 3-D field over the columns of a patch, giving one value per level of `bounds.k`.
///
/// Values are accumulated y outer and x inner, left to right, so results are reproducible.
pub fn horizontal_average(field: &Field3, bounds: &PatchBounds) -> Result<Vec<f64>> {
    field.check_covers(bounds)?;

    let n = bounds.num_columns() as f64;
    let avg = bounds
        .k
        .iter()
        .map(|k| field.level_values(bounds, k).sum::<f64>() / n)
        .collect();

    Ok(avg)
}

/// The thermodynamic profile of the representative column of a patch.
///
/// Profiles are stored bottom to top and indexed by model level, so `height(k)` is the height of
/// level `k` for any `k` in `levels()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    levels: IndexRange,
    height: Vec<Meters>,
    temperature: Vec<Kelvin>,
    pressure: Vec<f64>,
    density: Vec<f64>,
    thickness: Vec<f64>,
}

impl ColumnProfile {
    /// Create a profile from parallel vectors covering `levels`.
    ///
    /// Pressure is in Pa and density in kg m⁻³. At least two levels are required so that every
    /// level has a layer thickness.
    pub fn new(
        levels: IndexRange,
        height: Vec<Meters>,
        temperature: Vec<Kelvin>,
        pressure: Vec<f64>,
        density: Vec<f64>,
    ) -> Result<Self> {
        let n = levels.len();
        if height.len() != n || temperature.len() != n || pressure.len() != n || density.len() != n
        {
            return Err(LightningError::LengthMismatch);
        }

        if n < 2 {
            return Err(LightningError::NotEnoughLevels);
        }

        let thickness = layer_thicknesses(&height);

        Ok(ColumnProfile {
            levels,
            height,
            temperature,
            pressure,
            density,
            thickness,
        })
    }

    /// Build the profile by averaging the height (m), temperature (K), pressure (Pa), and density
    /// (kg m⁻³) fields over the patch.
    pub fn from_fields(
        bounds: &PatchBounds,
        height: &Field3,
        temperature: &Field3,
        pressure: &Field3,
        density: &Field3,
    ) -> Result<Self> {
        let height = horizontal_average(height, bounds)?
            .into_iter()
            .map(Meters)
            .collect();
        let temperature = horizontal_average(temperature, bounds)?
            .into_iter()
            .map(Kelvin)
            .collect();
        let pressure = horizontal_average(pressure, bounds)?;
        let density = horizontal_average(density, bounds)?;

        Self::new(bounds.k, height, temperature, pressure, density)
    }

    /// The vertical levels covered by this profile.
    #[inline]
    pub fn levels(&self) -> IndexRange {
        self.levels
    }

    #[inline]
    fn idx(&self, k: usize) -> Option<usize> {
        if self.levels.contains(k) {
            Some(k - self.levels.start())
        } else {
            None
        }
    }

    /// Height of level `k`.
    pub fn height(&self, k: usize) -> Option<Meters> {
        self.idx(k).map(|i| self.height[i])
    }

    /// Temperature of level `k`.
    pub fn temperature(&self, k: usize) -> Option<Kelvin> {
        self.idx(k).map(|i| self.temperature[i])
    }

    /// Pressure (Pa) of level `k`.
    pub fn pressure(&self, k: usize) -> Option<f64> {
        self.idx(k).map(|i| self.pressure[i])
    }

    /// Density (kg m⁻³) of level `k`.
    pub fn density(&self, k: usize) -> Option<f64> {
        self.idx(k).map(|i| self.density[i])
    }

    /// Layer thickness (m) of level `k`.
    pub fn layer_thickness(&self, k: usize) -> Option<f64> {
        self.idx(k).map(|i| self.thickness[i])
    }

    /// The temperature profile, bottom to top.
    #[inline]
    pub fn temperature_profile(&self) -> &[Kelvin] {
        &self.temperature
    }

    /// The height profile, bottom to top.
    #[inline]
    pub fn height_profile(&self) -> &[Meters] {
        &self.height
    }

    /// Factor converting a column amount in moles into a tendency term at level `k`,
    /// `R T(k) / (dx dy)`, with the grid spacings in meters.
    pub fn conversion_coefficient(&self, k: usize, dx: f64, dy: f64) -> Option<f64> {
        self.idx(k).map(|_| self.conv(k, dx, dy))
    }

    // Crate internal accessors for levels already known to be in the column.
    #[inline]
    pub(crate) fn z(&self, k: usize) -> f64 {
        self.height[k - self.levels.start()].unpack()
    }

    #[inline]
    pub(crate) fn dz(&self, k: usize) -> f64 {
        self.thickness[k - self.levels.start()]
    }

    #[inline]
    pub(crate) fn p(&self, k: usize) -> f64 {
        self.pressure[k - self.levels.start()]
    }

    #[inline]
    pub(crate) fn t(&self, k: usize) -> f64 {
        self.temperature[k - self.levels.start()].unpack()
    }

    #[inline]
    pub(crate) fn conv(&self, k: usize, dx: f64, dy: f64) -> f64 {
        R_GAS * self.t(k) / (dx * dy)
    }
}

// Centered differences in the interior, one sided at the ends. Needs at least two levels.
fn layer_thicknesses(height: &[Meters]) -> Vec<f64> {
    let z: Vec<f64> = height.iter().map(|h| h.unpack()).collect();
    let n = z.len();
    debug_assert!(n >= 2);

    let interior = izip!(&z[..n - 2], &z[2..]).map(|(below, above)| (above - below) / 2.0);

    std::iter::once(z[1] - z[0])
        .chain(interior)
        .chain(std::iter::once(z[n - 1] - z[n - 2]))
        .collect()
}
