//! Small numerical helpers.

/// Square root of 2π.
const SQRT_2PI: f64 = 2.506_628_274_631_000_5;

/// Probability density of a normal distribution with mean `mu` and standard deviation `sigma`.
#[inline]
pub(crate) fn gaussian(x: f64, mu: f64, sigma: f64) -> f64 {
    debug_assert!(sigma > 0.0);

    let z = (x - mu) / sigma;
    (-0.5 * z * z).exp() / (sigma * SQRT_2PI)
}
