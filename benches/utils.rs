#![allow(dead_code)]

use lightning_nox::{ColumnProfile, Field2, Field3, IndexRange, LightningInputs, PatchBounds};
use metfor::{Kelvin, Meters};

/// A column of `n` levels 1 km apart in a standard atmosphere.
pub fn standard_column(n: usize) -> ColumnProfile {
    let levels = IndexRange::new(0, n - 1).expect("bad levels");
    let height = (0..n).map(|k| Meters(1000.0 * k as f64)).collect();
    let temperature = (0..n).map(|k| Kelvin(300.0 - 6.5 * k as f64)).collect();
    let pressure = (0..n)
        .map(|k| 100_000.0 * (-(k as f64) / 7.5).exp())
        .collect();

    ColumnProfile::new(levels, height, temperature, pressure, vec![1.0; n]).expect("bad column")
}

/// Host model fields for a patch with a checkerboard of convective columns.
pub struct Storm {
    pub bounds: PatchBounds,
    land_mask: Field2,
    terrain_height: Field2,
    temperature: Field3,
    density: Field3,
    height: Field3,
    pressure: Field3,
    ic_flash_rate: Field2,
    cg_flash_rate: Field2,
    reflectivity: Field3,
}

impl Storm {
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        let bounds = PatchBounds::new((0, nx - 1), (0, nz - 1), (0, ny - 1)).expect("bad bounds");
        let (i, k, j) = (bounds.i, bounds.k, bounds.j);

        Storm {
            bounds,
            land_mask: Field2::filled(i, j, 1.0),
            terrain_height: Field2::filled(i, j, 0.0),
            temperature: Field3::from_fn(i, k, j, |_, kk, _| 300.0 - 6.5 * kk as f64),
            density: Field3::filled(i, k, j, 1.0),
            height: Field3::from_fn(i, k, j, |_, kk, _| 1000.0 * kk as f64),
            pressure: Field3::from_fn(i, k, j, |_, kk, _| {
                100_000.0 * (-(kk as f64) / 7.5).exp()
            }),
            ic_flash_rate: Field2::filled(i, j, 0.1),
            cg_flash_rate: Field2::filled(i, j, 0.03),
            reflectivity: Field3::from_fn(i, k, j, |ii, kk, jj| {
                if (ii + jj) % 2 == 0 && kk >= 1 && kk + 3 <= nz {
                    40.0
                } else {
                    10.0
                }
            }),
        }
    }

    pub fn inputs(&self) -> LightningInputs<'_> {
        LightningInputs {
            bounds: self.bounds,
            dx: 3000.0,
            dy: 3000.0,
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
