//! Error types for data generation, fitting and rendering
//!
//! This module defines the common errors encountered while building a
//! diagnostic report, along with a convenient `Result` alias.
use std::path::PathBuf;

/// Errors that can occur while generating, summarizing or plotting a sample.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Cannot compute statistics or fit a model because there is no data.
    #[error("No data available")]
    NoData,

    /// The predictor range is empty, reversed or not finite.
    #[error("Invalid predictor range {0}..{1}; start must be finite and below end")]
    InvalidSampleRange(String, String),

    /// The noise distribution could not be built from its parameters.
    #[error("Invalid noise parameters: {0}")]
    InvalidNoise(String),

    /// Failed to solve the algebraic system during fitting.
    ///
    /// Contains a static string describing the solver error.
    #[error("Failed to solve: {0}")]
    Algebra(&'static str),

    /// A numeric value could not be cast to the target type.
    #[error("Failed to cast value to target type")]
    CastFailed,

    /// No usable TrueType font was found for plot labels.
    ///
    /// Set `font` in the plot options or the `LINVIZ_FONT` environment variable.
    #[error("No usable font found (searched: {0:?}); set LINVIZ_FONT to a .ttf file")]
    FontUnavailable(Vec<PathBuf>),

    /// Drawing the figure failed.
    #[error("Error drawing plot: {0}")]
    Plot(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Reading or writing a file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Parsing a configuration file failed.
    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Serializing a report or sample failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for this crate
pub type Result<T> = std::result::Result<T, Error>;
