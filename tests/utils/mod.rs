#![allow(dead_code)]

use lightning_nox::{
    ColumnProfile, Field2, Field3, LightningInputs, NoxTendency, PatchBounds,
};

pub const DX: f64 = 3000.0;
pub const DY: f64 = 3000.0;

/// Logs go to the test harness, filtered with `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn approx_equal(left: f64, right: f64, tol: f64) -> bool {
    assert!(tol > 0.0);
    (left - right).abs() <= tol
}

pub fn relative_equal(left: f64, right: f64, tol: f64) -> bool {
    assert!(tol > 0.0);
    (left - right).abs() <= tol * left.abs().max(right.abs())
}

/// Pressure (Pa) of an exponential atmosphere at 1 km spaced levels.
pub fn exponential_pressure(n: usize) -> Vec<f64> {
    (0..n)
        .map(|k| 100_000.0 * (-(k as f64) / 7.5).exp())
        .collect()
}

/// Temperature (K) falling by `lapse` K per 1 km level from `sfc`.
pub fn lapse_rate_temperature(n: usize, sfc: f64, lapse: f64) -> Vec<f64> {
    (0..n).map(|k| sfc - lapse * k as f64).collect()
}

/// Host model fields over a domain. Thermodynamic fields are the same in every column, levels are
/// 1 km apart, and there is no convection or lightning until it is added.
pub struct DomainFields {
    pub domain: PatchBounds,
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

impl DomainFields {
    pub fn new(domain: PatchBounds, temperature: &[f64], pressure: &[f64]) -> Self {
        let (i, k, j) = (domain.i, domain.k, domain.j);
        assert_eq!(temperature.len(), k.len());
        assert_eq!(pressure.len(), k.len());

        let k0 = k.start();
        let level = |kk: usize| kk - k0;

        DomainFields {
            domain,
            land_mask: Field2::filled(i, j, 1.0),
            terrain_height: Field2::filled(i, j, 0.0),
            temperature: Field3::from_fn(i, k, j, |_, kk, _| temperature[level(kk)]),
            density: Field3::from_fn(i, k, j, |_, kk, _| {
                pressure[level(kk)] / (287.04 * temperature[level(kk)])
            }),
            height: Field3::from_fn(i, k, j, |_, kk, _| 1000.0 * level(kk) as f64),
            pressure: Field3::from_fn(i, k, j, |_, kk, _| pressure[level(kk)]),
            ic_flash_rate: Field2::filled(i, j, 0.0),
            cg_flash_rate: Field2::filled(i, j, 0.0),
            reflectivity: Field3::filled(i, k, j, 0.0),
        }
    }

    pub fn with_reflectivity<F>(mut self, func: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> f64,
    {
        let d = self.domain;
        self.reflectivity = Field3::from_fn(d.i, d.k, d.j, func);
        self
    }

    /// Flash rates (flashes s⁻¹) for each column.
    pub fn with_flash_rates<F, G>(mut self, ic: F, cg: G) -> Self
    where
        F: FnMut(usize, usize) -> f64,
        G: FnMut(usize, usize) -> f64,
    {
        let d = self.domain;
        self.ic_flash_rate = Field2::from_fn(d.i, d.j, ic);
        self.cg_flash_rate = Field2::from_fn(d.i, d.j, cg);
        self
    }

    pub fn inputs(&self) -> LightningInputs<'_> {
        self.inputs_for(self.domain)
    }

    pub fn inputs_for(&self, bounds: PatchBounds) -> LightningInputs<'_> {
        LightningInputs {
            bounds,
            dx: DX,
            dy: DY,
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

    pub fn column(&self) -> ColumnProfile {
        ColumnProfile::from_fields(
            &self.domain,
            &self.height,
            &self.temperature,
            &self.pressure,
            &self.density,
        )
        .unwrap()
    }
}

/// Convert a tendency field back into moles of NOx per second over the patch.
pub fn total_moles(tendency: &Field3, bounds: &PatchBounds, column: &ColumnProfile) -> f64 {
    let mut total = 0.0;
    for k in bounds.k.iter() {
        let dz = column.layer_thickness(k).unwrap();
        let p = column.pressure(k).unwrap();
        let conv = column.conversion_coefficient(k, DX, DY).unwrap();

        for j in bounds.j.iter() {
            for i in bounds.i.iter() {
                total += tendency.get(i, k, j).unwrap() * dz * p / (conv * 1.0e6);
            }
        }
    }
    total
}

pub fn assert_tendencies_match(left: &NoxTendency, right: &NoxTendency, bounds: &PatchBounds) {
    for j in bounds.j.iter() {
        for k in bounds.k.iter() {
            for i in bounds.i.iter() {
                for (fld_l, fld_r) in &[(&left.ic, &right.ic), (&left.cg, &right.cg)] {
                    let l = fld_l.get(i, k, j).unwrap();
                    let r = fld_r.get(i, k, j).unwrap();
                    assert!(
                        l == r || relative_equal(l, r, 1.0e-10),
                        "({}, {}, {}): {} != {}",
                        i,
                        k,
                        j,
                        l,
                        r
                    );
                }
            }
        }
    }
}
