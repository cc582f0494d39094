//! Descriptive statistics, outlier fences, and regression error metrics
//!
//! This module provides the numbers printed under the diagnostic figure, and the
//! binning used to draw its histogram.
//!
//! # Descriptive Statistics
//! - [`mean`]: Arithmetic mean of a dataset.
//! - [`stddev_and_mean`]: Population standard deviation and mean of a dataset.
//! - [`median`]: Middle value of a dataset.
//! - [`percentile`]: Linearly interpolated percentile of a dataset.
//! - [`min_max`]: Smallest and largest value of a dataset.
//! - [`Summary`]: Count, mean, median, standard deviation, minimum and maximum in one pass.
//!
//! # Outlier Detection
//! - [`IqrFences`]: Tukey fences `Q1 - 1.5·IQR` and `Q3 + 1.5·IQR`.
//!   Any value strictly outside the fences is an outlier.
//!
//! # Model Fit / Regression Diagnostics
//! - [`r_squared`]: Proportion of variance explained by the model. Higher is better (0 to 1).
//! - [`residual_variance`]: Unbiased estimate of variance of errors after fitting.
//! - [`mean_squared_error`] / [`root_mean_squared_error`]: Average squared error. Lower is better.
//!
//! # Binning
//! - [`Histogram`]: Equal-width bins over the range of a dataset.
//!
//! # Examples
//!
//! ```rust
//! use linviz::statistics::{IqrFences, Summary};
//!
//! let y = vec![1.0, 2.0, 3.0, 4.0, 100.0];
//!
//! let summary = Summary::new(&y).unwrap();
//! assert_eq!(summary.median, 3.0);
//!
//! let fences = IqrFences::new(&y).unwrap();
//! assert_eq!(fences.outliers(&y), vec![100.0]);
//! ```
use std::cmp::Ordering;

use serde::Serialize;

use crate::{
    error::{Error, Result},
    value::{self, Value},
};

pub use crate::value::min_max;

/// Tukey's multiplier for the interquartile range.
pub const TUKEY_MULTIPLIER: f64 = 1.5;

/// Computes the residual variance of a model's predictions.
///
/// Residual variance is the unbiased estimate of the variance of the
/// errors (σ²) after fitting a model.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// σ² = Σ (y_i - y_fit_i)² / (n - k)
/// where
///   y_i = observed values, y_fit_i = predicted values,
///   n = number of observations, k = number of model parameters
/// ```
/// </div>
///
/// Returns zero when `n == k`.
///
/// # Example
/// ```rust
/// # use linviz::statistics::residual_variance;
/// let y = vec![1.0, 2.0, 3.0];
/// let y_fit = vec![0.9, 2.1, 2.95];
/// let variance = residual_variance(y.into_iter(), y_fit.into_iter(), 2.0);
/// ```
pub fn residual_variance<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
    k: T,
) -> T {
    let mut ss_total = T::zero();
    let mut n = T::zero();
    for (y, y_fit) in y.zip(y_fit) {
        ss_total += Value::powi(y - y_fit, 2);
        n += T::one();
    }

    if n == k {
        return T::zero();
    }
    ss_total / (n - k)
}

/// Calculate the R-squared value for a set of data.
///
/// R-squared is a number between 0 and 1 that tells you how well the model explains the data:
/// - `0` means the model explains none of the variation.
/// - `1` means the model explains all the variation.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// R² = 1 - (SS_res / SS_tot)
/// where
///   SS_res = Σ (y_i - y_fit_i)²
///   SS_tot = Σ (y_i - y_mean)²
/// ```
/// </div>
///
/// Constant `y` gives `SS_tot = 0`, and the result is NaN (or -inf).
pub fn r_squared<T: Value>(y: impl Iterator<Item = T>, y_fit: impl Iterator<Item = T>) -> T {
    let y: Vec<T> = y.collect();
    let y_mean = mean(y.iter().copied());

    let mut ss_total = T::zero();
    let mut ss_residual = T::zero();
    for (y, y_fit) in y.into_iter().zip(y_fit) {
        ss_total += Value::powi(y - y_mean, 2);
        ss_residual += Value::powi(y - y_fit, 2);
    }

    T::one() - (ss_residual / ss_total)
}

/// Computes the mean squared error (MSE) between two sets of values.
///
/// ```math
/// MSE = (Σ (y_i - y_fit_i)²) / N
/// ```
pub fn mean_squared_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    let mut total = T::zero();
    let mut n = T::zero();
    for (y, y_fit) in y.zip(y_fit) {
        total += Value::powi(y - y_fit, 2);
        n += T::one();
    }
    total / n
}

/// Square root of [`mean_squared_error`], in the same units as `y`.
pub fn root_mean_squared_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    mean_squared_error(y, y_fit).sqrt()
}

/// Computes the arithmetic mean of a sequence of values.
///
/// ```math
/// Mean = (Σ x_i) / N
/// ```
///
/// Returns NaN if the iterator yields no elements.
///
/// # Examples
/// ```rust
/// let values = vec![1.0, 2.0, 3.0];
/// let m = linviz::statistics::mean(values.into_iter());
/// assert_eq!(m, 2.0);
/// ```
pub fn mean<T: Value>(data: impl Iterator<Item = T>) -> T {
    let mut sum = T::zero();
    let mut count = T::zero();
    for value in data {
        sum += value;
        count += T::one();
    }
    sum / count
}

/// Computes the standard deviation of a sequence of values.
/// - Uses the population formula (divides by `N`) rather than `N-1`.
///
/// Also returns the mean, since it is computed along the way.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// σ = sqrt( (Σ (x_i - Mean)²) / N )
/// ```
/// </div>
///
/// # Examples
/// ```rust
/// let values = vec![1.0, 2.0, 3.0];
/// let (s, _) = linviz::statistics::stddev_and_mean(values.into_iter());
/// assert_eq!(s, 0.816496580927726); // sqrt(2/3)
/// ```
pub fn stddev_and_mean<T: Value>(data: impl Iterator<Item = T>) -> (T, T) {
    let data: Vec<_> = data.collect();
    let mean = mean(data.iter().copied());
    let mut sum_sq_diff = T::zero();
    let mut count = T::zero();
    for value in data {
        sum_sq_diff += Value::powi(value - mean, 2);
        count += T::one();
    }
    let dev = (sum_sq_diff / count).sqrt();

    (dev, mean)
}

/// Returns a sorted copy of the data, with NaN values last.
fn sorted<T: Value>(data: impl Iterator<Item = T>) -> Vec<T> {
    let mut data: Vec<T> = data.collect();
    data.sort_by(|a, b| match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    });
    data
}

/// Percentile of already sorted data; `p` in `0..=100`.
///
/// NaN if the data contains NaN.
fn sorted_percentile<T: Value>(sorted: &[T], p: T) -> Option<T> {
    let last = sorted.len().checked_sub(1)?;
    if sorted[last].is_nan() {
        return Some(sorted[last]);
    }

    let hundred = T::try_cast(100).ok()?;
    let p = nalgebra::RealField::clamp(p, T::zero(), hundred);

    let rank = p / hundred * T::from_positive_int(last);
    let lower = Value::floor(rank);
    let lo = lower.as_usize()?.min(last);
    let hi = (lo + 1).min(last);

    let fraction = rank - lower;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * fraction)
}

/// Computes the `p`-th percentile of a dataset.
///
/// Uses linear interpolation between the two closest ranks:
///
/// ```math
/// rank = p / 100 * (N - 1)
/// P = x[floor(rank)] + (x[floor(rank) + 1] - x[floor(rank)]) * frac(rank)
/// where
///   x = the data sorted ascending
/// ```
///
/// `p` is clamped to `0..=100`. A NaN anywhere in the data gives NaN.
///
/// # Errors
/// Returns [`Error::NoData`] if the dataset is empty.
///
/// # Examples
/// ```rust
/// # use linviz::statistics::percentile;
/// let data = vec![4.0, 1.0, 3.0, 2.0];
/// assert_eq!(percentile(data.into_iter(), 25.0).unwrap(), 1.75);
/// ```
pub fn percentile<T: Value>(data: impl Iterator<Item = T>, p: T) -> Result<T> {
    let sorted = sorted(data);
    sorted_percentile(&sorted, p).ok_or(Error::NoData)
}

/// Computes the median of a dataset.
///
/// For an even count this is the mean of the two middle values.
///
/// # Errors
/// Returns [`Error::NoData`] if the dataset is empty.
pub fn median<T: Value>(data: impl Iterator<Item = T>) -> Result<T> {
    percentile(data, T::try_cast(50)?)
}

/// Descriptive statistics of a single sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary<T: Value> {
    /// Number of values
    pub count: usize,

    /// Arithmetic mean
    pub mean: T,

    /// 50th percentile
    pub median: T,

    /// Population standard deviation
    pub std_dev: T,

    /// Smallest value
    pub min: T,

    /// Largest value
    pub max: T,
}
impl<T: Value> Summary<T> {
    /// Summarize a dataset.
    ///
    /// # Errors
    /// Returns [`Error::NoData`] if the dataset is empty.
    pub fn new(data: &[T]) -> Result<Self> {
        let (min, max) = value::min_max(data.iter().copied()).ok_or(Error::NoData)?;
        let (std_dev, mean) = stddev_and_mean(data.iter().copied());
        let median = median(data.iter().copied())?;

        Ok(Self {
            count: data.len(),
            mean,
            median,
            std_dev,
            min,
            max,
        })
    }

    /// Difference between the largest and smallest value
    pub fn spread(&self) -> T {
        self.max - self.min
    }
}

/// Tukey fences for outlier detection.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// IQR = Q3 - Q1
/// lower = Q1 - k * IQR
/// upper = Q3 + k * IQR
/// where
///   Q1, Q3 = 25th and 75th percentiles, k = 1.5 by default
/// ```
/// </div>
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IqrFences<T: Value> {
    /// 25th percentile
    pub q1: T,

    /// 75th percentile
    pub q3: T,

    /// Interquartile range, `q3 - q1`
    pub iqr: T,

    /// Values below this are outliers
    pub lower: T,

    /// Values above this are outliers
    pub upper: T,
}
impl<T: Value> IqrFences<T> {
    /// Compute the fences with Tukey's multiplier of `1.5`.
    ///
    /// # Errors
    /// Returns [`Error::NoData`] if the dataset is empty.
    pub fn new(data: &[T]) -> Result<Self> {
        Self::with_multiplier(data, T::try_cast(TUKEY_MULTIPLIER)?)
    }

    /// Compute the fences with a custom IQR multiplier.
    ///
    /// `3.0` is the usual choice for "far out" values.
    ///
    /// # Errors
    /// Returns [`Error::NoData`] if the dataset is empty.
    pub fn with_multiplier(data: &[T], k: T) -> Result<Self> {
        let sorted = sorted(data.iter().copied());
        let q1 = sorted_percentile(&sorted, T::try_cast(25)?).ok_or(Error::NoData)?;
        let q3 = sorted_percentile(&sorted, T::try_cast(75)?).ok_or(Error::NoData)?;
        let iqr = q3 - q1;

        Ok(Self {
            q1,
            q3,
            iqr,
            lower: q1 - k * iqr,
            upper: q3 + k * iqr,
        })
    }

    /// True if `value` lies on or between the fences
    pub fn contains(&self, value: T) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// True if `value` lies strictly outside the fences
    pub fn is_outlier(&self, value: T) -> bool {
        value < self.lower || value > self.upper
    }

    /// Values strictly outside the fences, in input order
    pub fn outliers(&self, data: &[T]) -> Vec<T> {
        data.iter().copied().filter(|v| self.is_outlier(*v)).collect()
    }

    /// Most extreme values still inside the fences, `(low, high)`.
    ///
    /// These are where boxplot whiskers end. `None` if no value is inside.
    pub fn whiskers(&self, data: &[T]) -> Option<(T, T)> {
        value::min_max(data.iter().copied().filter(|v| self.contains(*v)))
    }
}

/// Equal-width histogram of a dataset.
///
/// Every bin is half-open `[start, end)` except the last, which also includes
/// its right edge so the maximum is counted. NaN values are not counted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram<T: Value> {
    start: T,
    width: T,
    counts: Vec<usize>,
}
impl<T: Value> Histogram<T> {
    /// Bin a dataset into `bins` equal-width bins spanning its range.
    ///
    /// If every value is the same, the bins span `value - 0.5..value + 0.5`.
    ///
    /// # Errors
    /// - [`Error::Config`] if `bins` is zero.
    /// - [`Error::NoData`] if the dataset is empty or only contains NaN.
    pub fn new(data: &[T], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(Error::Config("histogram needs at least one bin".into()));
        }

        let (mut start, mut end) =
            value::min_max(data.iter().copied().filter(|v| !v.is_nan())).ok_or(Error::NoData)?;
        if start == end {
            let half = T::one() / T::two();
            start -= half;
            end += half;
        }

        let width = (end - start) / T::from_positive_int(bins);
        let mut counts = vec![0; bins];
        for v in data {
            let Some(index) = ((*v - start) / width).as_usize() else {
                continue;
            };
            counts[index.min(bins - 1)] += 1;
        }

        Ok(Self {
            start,
            width,
            counts,
        })
    }

    /// Number of values in each bin
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Width shared by every bin
    pub fn bin_width(&self) -> T {
        self.width
    }

    /// Largest bin count
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Total number of binned values
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(start, end, count)` for every bin, left to right
    pub fn bins(&self) -> impl Iterator<Item = (T, T, usize)> + '_ {
        self.counts.iter().enumerate().map(|(i, count)| {
            let start = self.start + self.width * T::from_positive_int(i);
            (start, start + self.width, *count)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_all_close, assert_close};

    #[test]
    fn residual_variance_simple_case() {
        // errors: [1, 2], squared = [1, 4], sum = 5
        // n=2, n-k=1, variance = 5
        let y = vec![1.0, 2.0];
        let y_fit = vec![0.0, 0.0];
        let var = residual_variance::<f64>(y.into_iter(), y_fit.into_iter(), 1.0);
        assert_eq!(var, 5.0);
    }

    #[test]
    fn residual_variance_invalid_degrees_of_freedom() {
        let y = vec![1.0, 2.0];
        let y_fit = vec![1.0, 2.0];
        let var = residual_variance::<f64>(y.into_iter(), y_fit.into_iter(), 2.0);
        assert_eq!(var, 0.0);
    }

    #[test]
    fn r_squared_perfect_and_bad_fit() {
        let y = vec![1.0, 2.0, 3.0];
        let r2 = r_squared::<f64>(y.clone().into_iter(), y.clone().into_iter());
        assert_eq!(r2, 1.0);

        // SST = SSE = 2 → R² = 0
        let y_fit = vec![2.0, 2.0, 2.0];
        let r2 = r_squared::<f64>(y.into_iter(), y_fit.into_iter());
        assert_eq!(r2, 0.0);
    }

    #[test]
    fn mse_and_rmse() {
        let y = vec![1.0, 2.0, 3.0];
        let y_fit = vec![0.0, 0.0, 0.0];
        let mse = mean_squared_error::<f64>(y.clone().into_iter(), y_fit.clone().into_iter());
        assert_close!(mse, 14.0 / 3.0);
        let rmse = root_mean_squared_error::<f64>(y.into_iter(), y_fit.into_iter());
        assert_close!(rmse, (14.0f64 / 3.0).sqrt());
    }

    #[test]
    fn stddev_is_population() {
        let (s, m) = stddev_and_mean(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter());
        assert_eq!(m, 5.0);
        assert_eq!(s, 2.0);
    }

    #[test]
    fn percentile_interpolates() {
        let data = vec![10.0, 20.0, 30.0, 40.0];
        // rank = 0.25 * 3 = 0.75 → 10 + 10 * 0.75
        assert_close!(percentile(data.iter().copied(), 25.0).unwrap(), 17.5);
        // rank = 0.75 * 3 = 2.25 → 30 + 10 * 0.25
        assert_close!(percentile(data.iter().copied(), 75.0).unwrap(), 32.5);
        assert_eq!(percentile(data.iter().copied(), 0.0).unwrap(), 10.0);
        assert_eq!(percentile(data.iter().copied(), 100.0).unwrap(), 40.0);
        assert_eq!(percentile(data.iter().copied(), 250.0).unwrap(), 40.0);
    }

    #[test]
    fn percentile_single_value() {
        assert_eq!(percentile(std::iter::once(3.5), 75.0).unwrap(), 3.5);
    }

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(vec![3.0, 1.0, 2.0].into_iter()).unwrap(), 2.0);
        assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0].into_iter()).unwrap(), 2.5);
    }

    #[test]
    fn empty_data_is_an_error() {
        let empty: Vec<f64> = vec![];
        assert!(matches!(median(empty.iter().copied()), Err(Error::NoData)));
        assert!(matches!(Summary::new(&empty), Err(Error::NoData)));
        assert!(matches!(IqrFences::new(&empty), Err(Error::NoData)));
        assert!(matches!(Histogram::new(&empty, 10), Err(Error::NoData)));
    }

    #[test]
    fn summary_matches_direct_computation() {
        let data = vec![3.0, -1.0, 7.5, 2.0, 0.5];
        let summary = Summary::new(&data).unwrap();

        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let std = (data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();

        assert_eq!(summary.count, 5);
        assert_close!(summary.mean, mean);
        assert_close!(summary.std_dev, std);
        assert_eq!(summary.median, 2.0);
        assert_eq!(summary.min, -1.0);
        assert_eq!(summary.max, 7.5);
        assert_eq!(summary.spread(), 8.5);
    }

    #[test]
    fn summary_propagates_nan() {
        let summary = Summary::new(&[1.0, f64::NAN, 3.0]).unwrap();
        assert_eq!(summary.count, 3);
        assert!(summary.mean.is_nan());
        assert!(summary.std_dev.is_nan());
        assert!(summary.median.is_nan());
        assert!(summary.min.is_nan());
        assert!(summary.max.is_nan());

        // Every 7th value is NaN
        let data: Vec<f64> = (0..60)
            .map(|i| if i % 7 == 0 { f64::NAN } else { f64::from(i) })
            .collect();
        let summary = Summary::new(&data).unwrap();
        assert!(summary.median.is_nan());
    }

    #[test]
    fn percentiles_of_nan_laced_data_are_nan() {
        for offset in 0..200 {
            let data: Vec<f64> = (0..64)
                .map(|i| {
                    if (i + offset) % 11 == 0 {
                        f64::NAN
                    } else {
                        f64::from((i * 37 + offset) % 64)
                    }
                })
                .collect();
            assert!(median(data.iter().copied()).unwrap().is_nan());
            assert!(percentile(data.iter().copied(), 25.0).unwrap().is_nan());
        }
    }

    #[test]
    fn nan_values_are_sorted_last() {
        let data = sorted([3.0, f64::NAN, -1.0, 2.0].into_iter());
        assert_eq!(&data[..3], &[-1.0, 2.0, 3.0]);
        assert!(data[3].is_nan());
    }

    #[test]
    fn fences_with_nan_report_no_outliers() {
        let data = [1.0, 2.0, f64::NAN, 100.0];
        let fences = IqrFences::new(&data).unwrap();
        assert!(fences.q1.is_nan() && fences.upper.is_nan());
        assert!(fences.outliers(&data).is_empty());
        assert_eq!(fences.whiskers(&data), None);
    }

    #[test]
    fn histogram_skips_nan() {
        let hist = Histogram::new(&[0.0, f64::NAN, 1.0], 2).unwrap();
        assert_eq!(hist.counts(), &[1, 1]);
        assert!(matches!(
            Histogram::new(&[f64::NAN, f64::NAN], 2),
            Err(Error::NoData)
        ));
    }

    #[test]
    fn fences_follow_tukey() {
        let data: Vec<f64> = (1..=9).map(f64::from).collect();
        let fences = IqrFences::new(&data).unwrap();

        // rank(25) = 2 → 3, rank(75) = 6 → 7
        assert_eq!(fences.q1, 3.0);
        assert_eq!(fences.q3, 7.0);
        assert_eq!(fences.iqr, 4.0);
        assert_eq!(fences.lower, 3.0 - 1.5 * 4.0);
        assert_eq!(fences.upper, 7.0 + 1.5 * 4.0);
        assert!(fences.outliers(&data).is_empty());
    }

    #[test]
    fn fences_find_outliers_in_order() {
        let data = vec![-50.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 80.0];
        let fences = IqrFences::new(&data).unwrap();
        assert_eq!(fences.outliers(&data), vec![-50.0, 80.0]);
        assert_eq!(fences.whiskers(&data), Some((1.0, 7.0)));
        assert!(fences.contains(fences.upper));
        assert!(!fences.is_outlier(fences.lower));
    }

    #[test]
    fn fences_with_custom_multiplier() {
        let data: Vec<f64> = (1..=9).map(f64::from).collect();
        let fences = IqrFences::with_multiplier(&data, 3.0).unwrap();
        assert_all_close!([fences.lower, fences.upper], [-9.0, 19.0]);
    }

    #[test]
    fn histogram_counts_everything() {
        let data = vec![0.0, 0.1, 0.5, 0.9, 1.0, 1.0];
        let hist = Histogram::new(&data, 2).unwrap();
        assert_eq!(hist.counts(), &[2, 4]);
        assert_eq!(hist.total(), data.len());
        assert_eq!(hist.max_count(), 4);
        assert_close!(hist.bin_width(), 0.5);

        let edges: Vec<_> = hist.bins().map(|(s, e, _)| (s, e)).collect();
        assert_eq!(edges, vec![(0.0, 0.5), (0.5, 1.0)]);
    }

    #[test]
    fn histogram_constant_data() {
        let data = vec![4.0; 10];
        let hist = Histogram::new(&data, 3).unwrap();
        assert_eq!(hist.counts(), &[0, 10, 0]);
        let (start, _, _) = hist.bins().next().unwrap();
        assert_eq!(start, 3.5);
    }

    #[test]
    fn histogram_rejects_zero_bins() {
        assert!(matches!(Histogram::new(&[1.0, 2.0], 0), Err(Error::Config(_))));
    }
}
