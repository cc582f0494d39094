//! Numeric types and coordinate helpers shared by the generator, the fit and the plots.
//!
//! This module defines the [`Value`] trait, which abstracts the floating point
//! types the crate can work with, ensuring compatibility with nalgebra,
//! `num_traits` casting, and formatting.
//!
//! # Traits
//!
//! - [`Value`]: Extends `FloatCore`, `Scalar`, and `RealField` to provide:
//!   - A canonical `two()` constant.
//!   - `try_cast` for safe type conversion with error handling.
//!   - Unambiguous `abs`, `powi`, `floor` and `is_finite`.
//! - [`CoordExt`]: Accessors for the `x` and `y` halves of a `[(T, T)]` sample.
//!
//! # Example
//!
//! ```rust
//! use linviz::value::{CoordExt, Value};
//!
//! let data = vec![(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)];
//! assert_eq!(data.y(), vec![1.0, 3.0, 5.0]);
//! assert_eq!(data.x_range(), Some(0.0..2.0));
//!
//! let two = f64::two();
//! assert_eq!(Value::powi(two, 3), 8.0);
//! ```
use std::ops::Range;

use crate::error::Error;

/// Numeric type for samples
pub trait Value:
    nalgebra::Scalar
    + nalgebra::ComplexField<RealField = Self>
    + nalgebra::RealField
    + num_traits::float::FloatCore
    + std::fmt::LowerExp
{
    /// Returns the value 2.0
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Tries to cast a value to the target type
    ///
    /// # Errors
    /// Returns an error if the cast fails
    fn try_cast<U: num_traits::NumCast>(n: U) -> Result<Self, Error> {
        num_traits::cast(n).ok_or(Error::CastFailed)
    }

    /// Converts the value to `usize`
    fn as_usize(&self) -> Option<usize> {
        num_traits::cast(*self)
    }

    /// Converts the value to `f64`
    fn as_f64(&self) -> Option<f64> {
        num_traits::cast(*self)
    }

    /// Raises the value to the power of an integer
    #[must_use]
    fn powi(self, n: i32) -> Self {
        nalgebra::ComplexField::powi(self, n)
    }

    /// Get the absolute value for a numeric type
    #[must_use]
    fn abs(self) -> Self {
        nalgebra::ComplexField::abs(self)
    }

    /// Largest integer less than or equal to the value
    #[must_use]
    fn floor(self) -> Self {
        nalgebra::ComplexField::floor(self)
    }

    /// True if the value is neither infinite nor NaN
    fn is_finite(&self) -> bool {
        num_traits::float::FloatCore::is_finite(*self)
    }

    /// Converts a `usize` to the target numeric type.
    ///
    /// Results in `infinity` if the value is out of range.
    #[must_use]
    fn from_positive_int(n: usize) -> Self {
        Self::try_cast(n).unwrap_or(Self::infinity())
    }
}

impl<T> Value for T where
    T: nalgebra::Scalar
        + nalgebra::ComplexField<RealField = Self>
        + nalgebra::RealField
        + num_traits::float::FloatCore
        + std::fmt::LowerExp
{
}

/// Extension trait for accessing the `x` and `y` coordinates of a sample.
///
/// Implemented for `Vec<(T, T)>`, `[(T, T)]` and `&[(T, T)]`, which is how every sample
/// in this crate is stored.
///
/// # Examples
///
/// ```
/// # use linviz::value::CoordExt;
/// let data = vec![(1.5, -2.0), (2.0, 3.0), (0.0, 1.0)];
/// assert_eq!(data.y_range(), Some(-2.0..3.0));
/// ```
pub trait CoordExt<T: Value> {
    /// Returns an iterator over the x-coordinates of this value.
    fn x_iter(&self) -> impl Iterator<Item = T>;

    /// Returns an iterator over the y-coordinates of this value.
    fn y_iter(&self) -> impl Iterator<Item = T>;

    /// Returns the x-coordinates of this value.
    fn x(&self) -> Vec<T> {
        self.x_iter().collect()
    }

    /// Returns the y-coordinates of this value.
    fn y(&self) -> Vec<T> {
        self.y_iter().collect()
    }

    /// Returns the range of x-coordinates of this value.
    ///
    /// `None` if there are no coordinates.
    fn x_range(&self) -> Option<Range<T>> {
        min_max(self.x_iter()).map(|(start, end)| start..end)
    }

    /// Returns the range of y-coordinates of this value.
    ///
    /// `None` if there are no coordinates.
    fn y_range(&self) -> Option<Range<T>> {
        min_max(self.y_iter()).map(|(start, end)| start..end)
    }

    /// Converts the coordinates of this value to `f64`.
    ///
    /// # Errors
    /// Returns an error if any of the coordinates cannot be converted to `f64`.
    fn as_f64(&self) -> crate::error::Result<Vec<(f64, f64)>> {
        self.x_iter()
            .zip(self.y_iter())
            .map(|(x, y)| {
                let x_f64 = f64::try_cast(x)?;
                let y_f64 = f64::try_cast(y)?;
                Ok((x_f64, y_f64))
            })
            .collect()
    }
}
impl<T: Value> CoordExt<T> for Vec<(T, T)> {
    fn x_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(_, y)| *y)
    }
}
impl<T: Value> CoordExt<T> for [(T, T)] {
    fn x_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(_, y)| *y)
    }
}
impl<T: Value> CoordExt<T> for &[(T, T)] {
    fn x_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(_, y)| *y)
    }
}

/// Smallest and largest value of a sequence, `None` if it is empty.
///
/// A NaN anywhere in the sequence makes both bounds NaN.
pub fn min_max<T: Value>(values: impl Iterator<Item = T>) -> Option<(T, T)> {
    values.fold(None, |acc: Option<(T, T)>, v| {
        Some(match acc {
            Some((min, max)) if min.is_nan() => (min, max),
            Some(_) | None if v.is_nan() => (v, v),
            Some((min, max)) => (
                nalgebra::RealField::min(min, v),
                nalgebra::RealField::max(max, v),
            ),
            None => (v, v),
        })
    })
}
