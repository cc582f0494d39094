//! Ordinary least squares fit of a straight line
//!
//! [`LinearFit`] models `y = intercept + slope * x` and exposes the predictions and
//! residuals used by the residual plot.
use std::borrow::Cow;

use nalgebra::{DMatrix, DVector, SVD};

use crate::{
    error::{Error, Result},
    statistics,
    value::{CoordExt, Value},
};

/// Number of model parameters (intercept and slope)
const K: usize = 2;

/// A straight line fitted to a set of `(x, y)` points by least squares.
///
/// The predictor is centred on its mean before solving, which keeps the normal
/// equations well conditioned for data far from the origin. The system is solved
/// with an SVD, so a constant predictor gives the minimum-norm solution:
/// a flat line through the mean of `y`.
///
/// # Example
/// ```rust
/// use linviz::LinearFit;
///
/// let data = vec![(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)];
/// let fit = LinearFit::new(&data).unwrap();
///
/// linviz::assert_close!(fit.slope(), 2.0);
/// linviz::assert_close!(fit.intercept(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit<'data, T: Value = f64> {
    data: Cow<'data, [(T, T)]>,
    intercept: T,
    slope: T,
}
impl<'data, T: Value> LinearFit<'data, T> {
    /// Fit a line to the given data.
    ///
    /// # Errors
    /// - [`Error::NoData`] if `data` is empty.
    /// - [`Error::Algebra`] if the system cannot be solved, or the solution contains NaN.
    pub fn new(data: impl Into<Cow<'data, [(T, T)]>>) -> Result<Self> {
        let data = data.into();
        if data.is_empty() {
            return Err(Error::NoData);
        }

        let x_mean = statistics::mean(data.x_iter());
        let (xtx, xtb) = Self::create_matrix(&data, x_mean);
        let coefs = Self::solve_matrix(xtx, &xtb)?;

        //
        // Undo the centring: y = b0 + b1 (x - x̄)
        let slope = coefs[1];
        let intercept = coefs[0] - slope * x_mean;

        tracing::debug!(
            n = data.len(),
            slope = %slope,
            intercept = %intercept,
            "Fitted linear model"
        );

        Ok(Self {
            data,
            intercept,
            slope,
        })
    }

    /// Builds `XᵀX` and `Xᵀy` for the design matrix `[1, x - x̄]`.
    fn create_matrix(data: &[(T, T)], x_mean: T) -> (DMatrix<T>, DVector<T>) {
        let n = data.len();
        let mut matrix = DMatrix::zeros(n, K);
        let mut b = DVector::zeros(n);
        for (row, (x, y)) in data.iter().enumerate() {
            matrix[(row, 0)] = T::one();
            matrix[(row, 1)] = *x - x_mean;
            b[row] = *y;
        }

        let xtx = matrix.transpose() * &matrix;
        let xtb = matrix.transpose() * b;
        (xtx, xtb)
    }

    /// Solves the linear system using SVD.
    fn solve_matrix(xtx: DMatrix<T>, xtb: &DVector<T>) -> Result<Vec<T>> {
        let size = xtx.shape();

        // Calculate the singular value decomposition of the matrix
        let decomp = SVD::new_unordered(xtx, true, true);

        // Calculate epsilon value
        // ~= machine_epsilon * max(size) * max_singular
        let machine_epsilon = T::epsilon();
        let max_size = size.0.max(size.1);
        let sigma_max = decomp.singular_values.max();
        let epsilon = machine_epsilon * T::try_cast(max_size)? * sigma_max;

        // Solve for X in `SVD * X = b`
        let big_x = decomp.solve(xtb, epsilon).map_err(Error::Algebra)?;
        let coefficients: Vec<_> = big_x.data.into();

        // Make sure the coefficients are valid
        if coefficients.iter().any(|c| c.is_nan()) {
            return Err(Error::Algebra("NaN in coefficients"));
        }

        Ok(coefficients)
    }

    /// Converts the fit to one that owns its data.
    #[must_use]
    pub fn to_owned(&self) -> LinearFit<'static, T> {
        LinearFit {
            data: Cow::Owned(self.data.to_vec()),
            intercept: self.intercept,
            slope: self.slope,
        }
    }

    /// Slope of the fitted line
    pub fn slope(&self) -> T {
        self.slope
    }

    /// Intercept of the fitted line
    pub fn intercept(&self) -> T {
        self.intercept
    }

    /// `[intercept, slope]`
    pub fn coefficients(&self) -> [T; 2] {
        [self.intercept, self.slope]
    }

    /// The data the line was fitted to
    pub fn data(&self) -> &[(T, T)] {
        &self.data
    }

    /// Predicted `y` at `x`
    pub fn predict(&self, x: T) -> T {
        self.intercept + self.slope * x
    }

    /// Predicted `y` for every sample, in sample order
    pub fn predictions(&self) -> Vec<T> {
        self.data.x_iter().map(|x| self.predict(x)).collect()
    }

    /// Computes the residuals of the fit, paired with the predictions they belong to.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// ```math
    /// residual_i = y_i - f(x_i)
    /// where
    ///   y_i = observed value, f(x_i) = predicted value at x_i
    /// ```
    /// </div>
    ///
    /// # Returns
    /// `(f(x_i), residual_i)` for every sample, in sample order.
    pub fn residuals(&self) -> Vec<(T, T)> {
        self.data
            .iter()
            .map(|(x, y)| {
                let prediction = self.predict(*x);
                (prediction, *y - prediction)
            })
            .collect()
    }

    /// Coefficient of determination against the fitted data.
    ///
    /// See [`statistics::r_squared`].
    pub fn r_squared(&self) -> T {
        statistics::r_squared(self.data.y_iter(), self.predictions().into_iter())
    }

    /// Unbiased residual variance, `SS_res / (n - 2)`.
    ///
    /// See [`statistics::residual_variance`].
    pub fn residual_variance(&self) -> T {
        let k = T::from_positive_int(K);
        statistics::residual_variance(self.data.y_iter(), self.predictions().into_iter(), k)
    }

    /// Root mean squared error of the predictions.
    pub fn root_mean_squared_error(&self) -> T {
        statistics::root_mean_squared_error(self.data.y_iter(), self.predictions().into_iter())
    }

    /// Human readable equation, e.g. `y = 2.01x - 0.12`
    pub fn equation(&self) -> String {
        let sign = if self.intercept < T::zero() { '-' } else { '+' };
        let intercept = Value::abs(self.intercept);
        format!("y = {:.2}x {sign} {intercept:.2}", self.slope)
    }
}

impl<T: Value> std::fmt::Display for LinearFit<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.equation())
    }
}
