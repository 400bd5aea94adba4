//! Synthetic columns and patches used in tests.
use crate::{
    config::FlashCategory,
    decaria::LightningInputs,
    grid::{Field2, Field3, IndexRange, PatchBounds},
    profile::ColumnProfile,
};
use metfor::{Kelvin, Meters};

const LAPSE_RATE: f64 = 6.5; // K/km
const SFC_TEMPERATURE: f64 = 300.0;
const SFC_PRESSURE: f64 = 100_000.0;
const SCALE_HEIGHT: f64 = 7_500.0;
const R_DRY: f64 = 287.04;

fn standard_t(z: f64) -> f64 {
    SFC_TEMPERATURE - LAPSE_RATE * z / 1000.0
}

fn standard_p(z: f64) -> f64 {
    SFC_PRESSURE * (-z / SCALE_HEIGHT).exp()
}

fn build_column(start: usize, heights: &[f64], temps: &[f64]) -> ColumnProfile {
    let levels = IndexRange::new(start, start + heights.len() - 1).unwrap();
    let pressure: Vec<f64> = heights.iter().map(|&z| standard_p(z)).collect();
    let density = pressure
        .iter()
        .zip(temps)
        .map(|(p, t)| p / (R_DRY * t))
        .collect();

    ColumnProfile::new(
        levels,
        heights.iter().cloned().map(Meters).collect(),
        temps.iter().cloned().map(Kelvin).collect(),
        pressure,
        density,
    )
    .unwrap()
}

/// `n` levels starting at `start`, 1 km apart, with a standard lapse rate.
pub(crate) fn linear_column(start: usize, n: usize) -> ColumnProfile {
    let heights: Vec<f64> = (0..n).map(|i| 1000.0 * i as f64).collect();
    let temps: Vec<f64> = heights.iter().map(|&z| standard_t(z)).collect();
    build_column(start, &heights, &temps)
}

/// Levels 1 km apart with the given temperatures (K).
pub(crate) fn column_with_temperatures(start: usize, temps: &[f64]) -> ColumnProfile {
    let heights: Vec<f64> = (0..temps.len()).map(|i| 1000.0 * i as f64).collect();
    build_column(start, &heights, temps)
}

/// Levels at the given heights (m) with a standard lapse rate.
pub(crate) fn column_with_heights(start: usize, heights: &[f64]) -> ColumnProfile {
    let temps: Vec<f64> = heights.iter().map(|&z| standard_t(z)).collect();
    build_column(start, heights, &temps)
}

/// The fields of a synthetic thunderstorm patch.
///
/// Levels are 1 km apart with a standard lapse rate, so the -15C level is level 7 and the -45C
/// level is level 12. Every other column is convective (40 dBZ) from level 1 up to three levels
/// below the top, the rest are 10 dBZ everywhere.
pub(crate) struct PatchData {
    pub bounds: PatchBounds,
    pub dx: f64,
    pub dy: f64,
    pub land_mask: Field2,
    pub terrain_height: Field2,
    pub temperature: Field3,
    pub density: Field3,
    pub height: Field3,
    pub pressure: Field3,
    pub ic_flash_rate: Field2,
    pub cg_flash_rate: Field2,
    pub reflectivity: Field3,
}

impl PatchData {
    pub fn storm(nx: usize, ny: usize, nz: usize) -> Self {
        let bounds = PatchBounds::new((0, nx - 1), (0, nz - 1), (0, ny - 1)).unwrap();
        let (i, k, j) = (bounds.i, bounds.k, bounds.j);

        // Small horizontal variations that average out to the standard column.
        let wiggle = |ii: usize, jj: usize| if (ii + jj) % 2 == 0 { 1.0 } else { -1.0 };

        let height = Field3::from_fn(i, k, j, |_, kk, _| 1000.0 * kk as f64);
        let temperature = Field3::from_fn(i, k, j, |_, kk, _| standard_t(1000.0 * kk as f64));
        let pressure = Field3::from_fn(i, k, j, |ii, kk, jj| {
            standard_p(1000.0 * kk as f64) + if nx * ny % 2 == 0 { wiggle(ii, jj) } else { 0.0 }
        });
        let density = Field3::from_fn(i, k, j, |_, kk, _| {
            let z = 1000.0 * kk as f64;
            standard_p(z) / (R_DRY * standard_t(z))
        });

        let top_convective = nz - 3;
        let reflectivity = Field3::from_fn(i, k, j, |ii, kk, jj| {
            if (ii + jj) % 2 == 0 && kk >= 1 && kk <= top_convective {
                40.0
            } else {
                10.0
            }
        });

        PatchData {
            bounds,
            dx: 3000.0,
            dy: 3000.0,
            land_mask: Field2::filled(i, j, 1.0),
            terrain_height: Field2::filled(i, j, 0.0),
            temperature,
            density,
            height,
            pressure,
            ic_flash_rate: Field2::filled(i, j, 0.1),
            cg_flash_rate: Field2::filled(i, j, 0.03),
            reflectivity,
        }
    }

    pub fn set_reflectivity<F: FnMut(usize, usize, usize) -> f64>(&mut self, func: F) {
        let b = self.bounds;
        self.reflectivity = Field3::from_fn(b.i, b.k, b.j, func);
    }

    pub fn set_flash_rates(&mut self, ic: f64, cg: f64) {
        let b = self.bounds;
        self.ic_flash_rate = Field2::filled(b.i, b.j, ic);
        self.cg_flash_rate = Field2::filled(b.i, b.j, cg);
    }

    pub fn total_flash_rate(&self, category: FlashCategory) -> f64 {
        let fld = match category {
            FlashCategory::IntraCloud => &self.ic_flash_rate,
            FlashCategory::CloudToGround => &self.cg_flash_rate,
        };
        fld.patch_sum(&self.bounds).unwrap()
    }

    pub fn column(&self) -> ColumnProfile {
        ColumnProfile::from_fields(
            &self.bounds,
            &self.height,
            &self.temperature,
            &self.pressure,
            &self.density,
        )
        .unwrap()
    }

    pub fn inputs(&self) -> LightningInputs<'_> {
        LightningInputs {
            bounds: self.bounds,
            dx: self.dx,
            dy: self.dy,
            land_mask: &self.land_mask,
            terrain_height: &self.terrain_height,
            temperature: &self.temperature,
            density: &self.density,
            height: &self.height,
            pressure: &self.pressure,
            ic_flash_rate: &self.ic_flash_rate,
            cg_flash_rate: &self.cg_flash_rate,
            reflectivity: &self.reflectivity,
        }
    }
}
