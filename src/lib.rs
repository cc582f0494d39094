//! # Linviz
//! ## Regression diagnostics for synthetic linear data
//!
//! Generate a noisy straight line, fit it, and find out what the noise looks like.
//!
//! This crate builds a reproducible dataset of the form `y = slope * x + intercept + noise`,
//! fits an ordinary least squares line to it, and summarizes the result:
//! - Descriptive statistics of `y`: mean, median, standard deviation, minimum and maximum
//! - Tukey fences (`Q1 - 1.5 IQR`, `Q3 + 1.5 IQR`) and the values outside them
//! - A four panel figure: scatter plot, boxplot, histogram and residual plot (`plotting` feature)
//!
//! The simplest use-case is the default dataset, 100 points seeded with 42:
//! ```rust
//! use linviz::{data::LinearSample, report::Report, LinearFit};
//!
//! let data = LinearSample::<f64>::default().generate().unwrap();
//! let fit = LinearFit::new(&data).unwrap();
//! let report = Report::new(&fit).unwrap();
//!
//! assert_eq!(report.summary.count, 100);
//! println!("{report}");
//! ```
//!
//! # Core Concepts
//! - A [`data::LinearSample`] describes a dataset: how many points, the `x` range, the line and the noise.
//!     - With a seed, [`data::LinearSample::generate`] is reproducible bit for bit.
//! - A [`LinearFit`] is the least squares line through a dataset.
//!     - Its residuals, `y - prediction`, are what the residual plot shows.
//! - A [`report::Report`] holds everything printed to the console, and serializes to JSON.
//! - [`plotting::render_to_file`] draws the diagnostic figure to PNG or SVG.
//!
//! # Testing utilities
//!
//! Floating point assertions live in [`test`].
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)] // Counts become axis coordinates
#![allow(clippy::similar_names)] //       Clippy does not get to decide what names are similar
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod test;

#[cfg(feature = "plotting")]
#[cfg_attr(docsrs, doc(cfg(feature = "plotting")))]
pub mod plotting;

pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod statistics;
pub mod value;

mod fit;

pub use fit::*;

pub use nalgebra;
