//! Index ranges and the dense arrays that hold model fields on a patch of the grid.
//!
//! Three dimensional fields are laid out the way the host model stores them: x fastest, then the
//! vertical, then y. All ranges are inclusive, so a patch spanning levels 1 through 40 is
//! `IndexRange::new(1, 40)`.
use crate::error::{LightningError, Result};
use std::ops::RangeInclusive;

/// An inclusive range of grid indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    start: usize,
    end: usize,
}

impl IndexRange {
    /// Create a new range, `start` must not be after `end`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lightning_nox::IndexRange;
    ///
    /// let rng = IndexRange::new(1, 40).unwrap();
    /// assert_eq!(rng.len(), 40);
    /// assert!(IndexRange::new(5, 4).is_err());
    /// ```
    #[inline]
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start > end {
            Err(LightningError::InvalidRange)
        } else {
            Ok(IndexRange { start, end })
        }
    }

    /// First index in the range.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last index in the range.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of indexes in the range. Never zero.
    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Is `idx` inside this range?
    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        idx >= self.start && idx <= self.end
    }

    /// Does this range completely cover `other`?
    #[inline]
    pub fn covers(&self, other: &IndexRange) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// Iterate over the indexes from bottom to top.
    #[inline]
    pub fn iter(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// The index ranges of the local patch (subdomain) in x, the vertical, and y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchBounds {
    /// Range in the x direction.
    pub i: IndexRange,
    /// Range in the vertical, increasing index is increasing altitude.
    pub k: IndexRange,
    /// Range in the y direction.
    pub j: IndexRange,
}

impl PatchBounds {
    /// Build bounds from `(start, end)` pairs.
    pub fn new(i: (usize, usize), k: (usize, usize), j: (usize, usize)) -> Result<Self> {
        Ok(PatchBounds {
            i: IndexRange::new(i.0, i.1)?,
            k: IndexRange::new(k.0, k.1)?,
            j: IndexRange::new(j.0, j.1)?,
        })
    }

    /// Number of columns in the patch.
    #[inline]
    pub fn num_columns(&self) -> usize {
        self.i.len() * self.j.len()
    }
}

/// A dense three dimensional field over (x, vertical, y) memory ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct Field3 {
    i: IndexRange,
    k: IndexRange,
    j: IndexRange,
    data: Vec<f64>,
}

impl Field3 {
    /// Create a field filled with a single value.
    pub fn filled(i: IndexRange, k: IndexRange, j: IndexRange, value: f64) -> Self {
        let data = vec![value; i.len() * k.len() * j.len()];
        Field3 { i, k, j, data }
    }

    /// Create a field of zeros with the same memory ranges as `bounds`.
    pub fn zeros(bounds: &PatchBounds) -> Self {
        Self::filled(bounds.i, bounds.k, bounds.j, 0.0)
    }

    /// Create a field by evaluating `func(i, k, j)` at every point.
    pub fn from_fn<F>(i: IndexRange, k: IndexRange, j: IndexRange, mut func: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(i.len() * k.len() * j.len());
        for jj in j.iter() {
            for kk in k.iter() {
                for ii in i.iter() {
                    data.push(func(ii, kk, jj));
                }
            }
        }

        Field3 { i, k, j, data }
    }

    /// Wrap existing data, which must be ordered x fastest, then vertical, then y.
    pub fn from_vec(i: IndexRange, k: IndexRange, j: IndexRange, data: Vec<f64>) -> Result<Self> {
        if data.len() != i.len() * k.len() * j.len() {
            return Err(LightningError::LengthMismatch);
        }

        Ok(Field3 { i, k, j, data })
    }

    /// The memory range in x.
    #[inline]
    pub fn i_range(&self) -> IndexRange {
        self.i
    }

    /// The memory range in the vertical.
    #[inline]
    pub fn k_range(&self) -> IndexRange {
        self.k
    }

    /// The memory range in y.
    #[inline]
    pub fn j_range(&self) -> IndexRange {
        self.j
    }

    /// Does this field hold every point inside `bounds`?
    #[inline]
    pub fn covers(&self, bounds: &PatchBounds) -> bool {
        self.i.covers(&bounds.i) && self.k.covers(&bounds.k) && self.j.covers(&bounds.j)
    }

    /// Error unless this field covers `bounds`.
    #[inline]
    pub fn check_covers(&self, bounds: &PatchBounds) -> Result<()> {
        if self.covers(bounds) {
            Ok(())
        } else {
            Err(LightningError::OutOfBounds)
        }
    }

    #[inline]
    fn offset(&self, i: usize, k: usize, j: usize) -> Option<usize> {
        if !(self.i.contains(i) && self.k.contains(k) && self.j.contains(j)) {
            return None;
        }

        let ni = self.i.len();
        let nk = self.k.len();
        Some((i - self.i.start) + ni * ((k - self.k.start) + nk * (j - self.j.start)))
    }

    /// Get the value at a point, `None` if it is outside the field.
    #[inline]
    pub fn get(&self, i: usize, k: usize, j: usize) -> Option<f64> {
        self.offset(i, k, j).map(|idx| self.data[idx])
    }

    /// Set the value at a point.
    #[inline]
    pub fn set(&mut self, i: usize, k: usize, j: usize, value: f64) -> Result<()> {
        let idx = self.offset(i, k, j).ok_or(LightningError::OutOfBounds)?;
        self.data[idx] = value;
        Ok(())
    }

    /// Get the value at a point already known to be inside the field.
    #[inline]
    pub(crate) fn at(&self, i: usize, k: usize, j: usize) -> f64 {
        debug_assert!(self.offset(i, k, j).is_some());
        let ni = self.i.len();
        let nk = self.k.len();
        self.data[(i - self.i.start) + ni * ((k - self.k.start) + nk * (j - self.j.start))]
    }

    /// Iterate over the values at level `k` inside `bounds`, y outer and x inner.
    ///
    /// The caller must have checked that the field covers `bounds`.
    pub(crate) fn level_values<'a>(
        &'a self,
        bounds: &'a PatchBounds,
        k: usize,
    ) -> impl Iterator<Item = f64> + 'a {
        bounds
            .j
            .iter()
            .flat_map(move |j| bounds.i.iter().map(move |i| self.at(i, k, j)))
    }

    /// Borrow the raw data.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Are all the values zero?
    pub fn is_all_zero(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }
}

/// A dense two dimensional field over (x, y) memory ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct Field2 {
    i: IndexRange,
    j: IndexRange,
    data: Vec<f64>,
}

impl Field2 {
    /// Create a field filled with a single value.
    pub fn filled(i: IndexRange, j: IndexRange, value: f64) -> Self {
        Field2 {
            i,
            j,
            data: vec![value; i.len() * j.len()],
        }
    }

    /// Create a field by evaluating `func(i, j)` at every point.
    pub fn from_fn<F>(i: IndexRange, j: IndexRange, mut func: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let data = j
            .iter()
            .flat_map(|jj| i.iter().map(move |ii| (ii, jj)))
            .map(|(ii, jj)| func(ii, jj))
            .collect();

        Field2 { i, j, data }
    }

    /// Does this field hold every column inside `bounds`?
    #[inline]
    pub fn covers(&self, bounds: &PatchBounds) -> bool {
        self.i.covers(&bounds.i) && self.j.covers(&bounds.j)
    }

    /// Error unless this field covers `bounds`.
    #[inline]
    pub fn check_covers(&self, bounds: &PatchBounds) -> Result<()> {
        if self.covers(bounds) {
            Ok(())
        } else {
            Err(LightningError::OutOfBounds)
        }
    }

    /// Get the value at a point, `None` if it is outside the field.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if self.i.contains(i) && self.j.contains(j) {
            Some(self.data[(i - self.i.start) + self.i.len() * (j - self.j.start)])
        } else {
            None
        }
    }

    /// Sum of the values over the columns in `bounds`, accumulated y outer and x inner.
    pub fn patch_sum(&self, bounds: &PatchBounds) -> Result<f64> {
        self.check_covers(bounds)?;

        let ni = self.i.len();
        let sum = bounds
            .j
            .iter()
            .flat_map(|j| bounds.i.iter().map(move |i| (i, j)))
            .map(|(i, j)| self.data[(i - self.i.start) + ni * (j - self.j.start)])
            .sum();

        Ok(sum)
    }
}
