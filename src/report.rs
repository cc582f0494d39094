//! Console report of the target distribution
//!
//! [`Report`] collects everything printed under the diagnostic figure: descriptive
//! statistics of `y`, the IQR outlier fences and outliers, and the fitted line.
//!
//! ```rust
//! use linviz::{data::LinearSample, report::Report, LinearFit};
//!
//! let data = LinearSample::<f64>::default().generate().unwrap();
//! let fit = LinearFit::new(&data).unwrap();
//! let report = Report::new(&fit).unwrap();
//!
//! println!("{report}");
//! ```
use std::fmt;

use serde::Serialize;

use crate::{
    error::Result,
    statistics::{IqrFences, Summary},
    value::{CoordExt, Value},
    LinearFit,
};

/// Descriptive statistics, outliers and model quality for one sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report<T: Value = f64> {
    /// Statistics of the target sequence
    pub summary: Summary<T>,

    /// Tukey fences of the target sequence
    pub fences: IqrFences<T>,

    /// Target values outside the fences, in sample order
    pub outliers: Vec<T>,

    /// Slope of the fitted line
    pub slope: T,

    /// Intercept of the fitted line
    pub intercept: T,

    /// Coefficient of determination of the fitted line
    pub r_squared: T,

    /// Root mean squared error of the fitted line
    pub rmse: T,
}
impl<T: Value> Report<T> {
    /// Build the report for the data a line was fitted to.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::NoData`] if the fit has no data.
    pub fn new(fit: &LinearFit<'_, T>) -> Result<Self> {
        let y = fit.data().y();
        let summary = Summary::new(&y)?;
        let fences = IqrFences::new(&y)?;
        let outliers = fences.outliers(&y);

        tracing::info!(
            samples = summary.count,
            outliers = outliers.len(),
            "Computed diagnostics"
        );

        Ok(Self {
            summary,
            fences,
            outliers,
            slope: fit.slope(),
            intercept: fit.intercept(),
            r_squared: fit.r_squared(),
            rmse: fit.root_mean_squared_error(),
        })
    }

    /// Number of target values outside the fences
    pub fn outlier_count(&self) -> usize {
        self.outliers.len()
    }

    /// Render the report as pretty-printed JSON
    ///
    /// # Errors
    /// Returns an error if a value cannot be serialized.
    pub fn to_json(&self) -> Result<String>
    where
        T: Serialize,
    {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<T: Value> fmt::Display for Report<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Summary {
            mean,
            median,
            std_dev,
            min,
            max,
            ..
        } = self.summary;

        writeln!(f)?;
        writeln!(f, "Descriptive statistics of y:")?;
        writeln!(f, "Mean: {mean:.2}")?;
        writeln!(f, "Median: {median:.2}")?;
        writeln!(f, "Standard deviation: {std_dev:.2}")?;
        writeln!(f, "Minimum: {min:.2}")?;
        writeln!(f, "Maximum: {max:.2}")?;
        writeln!(f)?;
        writeln!(f, "Number of outliers: {}", self.outlier_count())?;
        writeln!(f, "Lower fence: {:.2}", self.fences.lower)?;
        writeln!(f, "Upper fence: {:.2}", self.fences.upper)?;
        writeln!(f)?;

        let sign = if self.intercept < T::zero() { '-' } else { '+' };
        write!(
            f,
            "Fitted model: y = {:.2}x {sign} {:.2} (R² = {:.3}, RMSE = {:.2})",
            self.slope,
            Value::abs(self.intercept),
            self.r_squared,
            self.rmse
        )
    }
}
