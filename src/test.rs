//! Assertions for floating point results.
//!
//! ### [`crate::assert_close`]
//! Asserts that two floating-point values are approximately equal.
//! - The tolerance is a few machine epsilons, scaled by the magnitude of the values.
//! - `assert_eq!` equivalent for floats.
//!
//! ### [`crate::assert_all_close`]
//! Element-wise [`crate::assert_close`] for two equal-length sequences.
//!
//! ### [`crate::assert_fences`]
//! Asserts that a set of [`crate::statistics::IqrFences`] sits `1.5·IQR` outside its quartiles,
//! and that the outliers it reports are exactly the values outside of it.

/// Asserts that two floating-point values are approximately equal within a small tolerance.
///
/// This is useful for comparing computed values where exact equality is not expected due to rounding errors.
/// - The tolerance is `8 * epsilon * max(|a|, |b|, 1)` for the type `T`.
///
/// # Panics
/// Panics if the absolute difference `|a - b|` exceeds the tolerance.
///
/// # Examples
/// ```
/// # use linviz::assert_close;
/// assert_close!(0.1 + 0.2, 0.3, "Nearly equal");
/// ```
#[macro_export]
macro_rules! assert_close {
    ($a:expr, $b:expr $(, $msg:literal $(, $($args:tt),*)?)?) => { #[allow(clippy::float_cmp)] {
        fn tolerance<T: $crate::value::Value>(a: T, b: T) -> T {
            let scale = $crate::nalgebra::RealField::max(
                $crate::nalgebra::RealField::max($crate::value::Value::abs(a), $crate::value::Value::abs(b)),
                T::one(),
            );
            T::epsilon() * T::from_positive_int(8) * scale
        }

        #[allow(unused_mut, unused_assignments)] let mut msg = "Values not close".to_string();
        $( msg = format!($msg, $($($args)?)?); )?

        let (a, b) = ($a, $b);
        assert!(
            a == b || $crate::value::Value::abs(a - b) <= tolerance(a, b),
            "{msg}: {a} != {b}"
        );
    }};
}

/// Asserts that two sequences of floating-point values are approximately equal element-wise.
///
/// - Element-wise [`crate::assert_close`].
///
/// # Panics
/// - If the lengths differ.
/// - If any pair of elements is not close.
///
/// # Examples
/// ```
/// # use linviz::assert_all_close;
/// let a = vec![1.0, 2.0, 3.0];
/// let b = vec![1.0 + 1e-16, 2.0, 3.0];
///
/// assert_all_close!(a, b);
/// assert_all_close!(a, b, "Vectors must match");
/// ```
#[macro_export]
macro_rules! assert_all_close {
    ($src:expr, $dst:expr $(, $msg:literal $(, $($args:tt),*)?)?) => {{
        #[allow(unused_assignments, unused_mut)]
        let mut msg = format!("{} elements", $src.len());
        $(
            msg = format!($msg, $($($args)?)?);
        )?

        assert_eq!($src.len(), $dst.len(), "{msg} - length mismatch");

        for (i, (s, d)) in $src.iter().zip($dst.iter()).enumerate() {
            $crate::assert_close!(*s, *d, "{msg} - src[{i}]");
        }
    }};
}

/// Asserts that outlier fences were derived from the quartiles of `data` with Tukey's rule,
/// and that every value outside of them, and only those, is reported as an outlier.
///
/// # Panics
/// Panics if a fence does not match `Q1 - 1.5·IQR` / `Q3 + 1.5·IQR`,
/// or if the outlier list disagrees with the fences.
///
/// # Examples
/// ```
/// # use linviz::{assert_fences, statistics::IqrFences};
/// let data = vec![1.0, 2.0, 3.0, 4.0, 40.0];
/// let fences = IqrFences::new(&data).unwrap();
/// assert_fences!(fences, data);
/// ```
#[macro_export]
macro_rules! assert_fences {
    ($fences:expr, $data:expr) => {{
        let fences = &$fences;
        let data = &$data;

        let q1 = $crate::statistics::percentile(data.iter().copied(), 25.0).expect("No data");
        let q3 = $crate::statistics::percentile(data.iter().copied(), 75.0).expect("No data");
        let iqr = q3 - q1;

        $crate::assert_close!(fences.q1, q1, "Q1");
        $crate::assert_close!(fences.q3, q3, "Q3");
        $crate::assert_close!(fences.lower, q1 - 1.5 * iqr, "Lower fence");
        $crate::assert_close!(fences.upper, q3 + 1.5 * iqr, "Upper fence");

        let expected: Vec<_> = data
            .iter()
            .copied()
            .filter(|v| *v < fences.lower || *v > fences.upper)
            .collect();
        assert_eq!(fences.outliers(data), expected, "Outliers disagree with fences");
    }};
}

#[cfg(test)]
mod tests {
    use crate::statistics::IqrFences;

    #[test]
    fn test_assert_close_macro() {
        assert_close!(1.0 + 1e-16, 1.0, "Values should be close");
        assert_close!(1.0e6 + 1.0e-10, 1.0e6);
    }

    #[test]
    #[should_panic(expected = "Values not close")]
    fn test_assert_close_macro_fails() {
        assert_close!(1.0, 1.001);
    }

    #[test]
    fn test_assert_all_close_macro() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0 + 1e-16, 2.0, 3.0];
        assert_all_close!(a, b, "Vectors must match");
    }

    #[test]
    fn test_assert_fences_macro() {
        let data = vec![-30.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 30.0];
        let fences = IqrFences::new(&data).unwrap();
        assert_fences!(fences, data);
    }
}
