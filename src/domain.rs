//! Swept interval `[start, end]` split into equal slices, and checked
//! evaluation of caller-supplied scale functions over it.

use crate::error::{DomainError, EvaluationError, Result};

/// An interval `[start, end]` divided into `slices` equal steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceDomain {
    start: f64,
    end: f64,
    slices: usize,
}

impl SliceDomain {
    /// Creates a validated domain.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] if a bound is not finite, `start >= end`, or
    /// `slices` is zero.
    pub fn new(start: f64, end: f64, slices: usize) -> Result<Self> {
        for bound in [start, end] {
            if !bound.is_finite() {
                return Err(DomainError::NonFiniteBound(bound).into());
            }
        }
        if start >= end {
            return Err(DomainError::EmptyInterval { start, end }.into());
        }
        if slices == 0 {
            return Err(DomainError::NoSlices.into());
        }
        Ok(Self { start, end, slices })
    }

    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> f64 {
        self.end
    }

    #[must_use]
    pub fn slices(&self) -> usize {
        self.slices
    }

    /// Width of one slice.
    #[must_use]
    pub fn step(&self) -> f64 {
        (self.end - self.start) / self.slices as f64
    }

    /// Parameter value of station `i` (`0..=slices`).
    ///
    /// Computed from `i` directly so that the right station of slice `i`
    /// and the left station of slice `i + 1` are the same float.
    #[must_use]
    pub fn station(&self, i: usize) -> f64 {
        if i == self.slices {
            self.end
        } else {
            self.start + self.step() * i as f64
        }
    }

    /// Midpoint of slice `i`.
    #[must_use]
    pub fn midpoint(&self, i: usize) -> f64 {
        self.start + self.step() * (i as f64 + 0.5)
    }

    /// Iterator over every station, both ends included.
    pub fn stations(&self) -> impl Iterator<Item = f64> + '_ {
        (0..=self.slices).map(|i| self.station(i))
    }

    /// Iterator over every slice midpoint.
    pub fn midpoints(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.slices).map(|i| self.midpoint(i))
    }
}

/// Evaluates `f(parameter)`, rejecting NaN and infinite results.
///
/// # Errors
///
/// Returns [`EvaluationError::NonFinite`] naming the function and parameter.
pub fn sample<F>(function: &'static str, f: &F, parameter: f64) -> Result<f64>
where
    F: Fn(f64) -> f64 + ?Sized,
{
    let value = f(parameter);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvaluationError::NonFinite {
            function,
            parameter,
            value,
        }
        .into())
    }
}

/// Samples `f` at every parameter in `parameters`, failing on the first bad value.
///
/// # Errors
///
/// Returns [`EvaluationError::NonFinite`] for the first non-finite sample.
pub fn sample_all<F, I>(function: &'static str, f: &F, parameters: I) -> Result<Vec<f64>>
where
    F: Fn(f64) -> f64 + ?Sized,
    I: IntoIterator<Item = f64>,
{
    parameters
        .into_iter()
        .map(|x| sample(function, f, x))
        .collect()
}
