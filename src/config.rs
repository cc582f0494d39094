//! Run configuration loaded from TOML files.
//!
//! Every key is optional; missing keys keep the defaults, which reproduce the
//! standard 100 sample dataset. Unknown keys are rejected so typos surface early.
//!
//! ```toml
//! [data]
//! samples = 250
//! seed = 7
//! noise = "uniform"
//! noise_level = 1.5
//!
//! [plot]
//! output = "out/diagnostics.svg"
//! bins = 20
//! ```
use std::{fmt, path::Path, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    data::{LinearSample, Noise},
    error::{Error, Result},
};

/// Default location of the diagnostic figure
pub const DEFAULT_OUTPUT: &str = "target/plot_output/diagnostics.png";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Dataset generation
    pub data: DataConfig,

    /// Diagnostic figure
    pub plot: PlotConfig,
}

/// Shape of the noise added to the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    /// Normal noise; the level is the standard deviation
    #[default]
    Gaussian,

    /// Uniform noise; the level is the half-width
    Uniform,

    /// No noise
    None,
}
impl FromStr for NoiseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gaussian" | "normal" => Ok(Self::Gaussian),
            "uniform" => Ok(Self::Uniform),
            "none" => Ok(Self::None),
            other => Err(Error::Config(format!(
                "unknown noise kind `{other}`, expected gaussian, uniform or none"
            ))),
        }
    }
}
impl fmt::Display for NoiseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gaussian => "gaussian",
            Self::Uniform => "uniform",
            Self::None => "none",
        })
    }
}

/// Dataset generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Number of `(x, y)` pairs
    pub samples: usize,

    /// RNG seed
    pub seed: u64,

    /// Slope of the generating line
    pub slope: f64,

    /// Intercept of the generating line
    pub intercept: f64,

    /// Lower bound of `x`, inclusive
    pub x_min: f64,

    /// Upper bound of `x`, exclusive
    pub x_max: f64,

    /// Noise distribution
    pub noise: NoiseKind,

    /// Standard deviation for gaussian noise, half-width for uniform noise
    pub noise_level: f64,
}
impl Default for DataConfig {
    fn default() -> Self {
        Self {
            samples: 100,
            seed: 42,
            slope: 2.0,
            intercept: 0.0,
            x_min: 0.0,
            x_max: 10.0,
            noise: NoiseKind::Gaussian,
            noise_level: 2.0,
        }
    }
}
impl DataConfig {
    /// Noise distribution described by `noise` and `noise_level`
    pub fn noise(&self) -> Noise<f64> {
        match self.noise {
            NoiseKind::Gaussian => Noise::Gaussian {
                std_dev: self.noise_level,
            },
            NoiseKind::Uniform => Noise::Uniform {
                strength: self.noise_level,
            },
            NoiseKind::None => Noise::None,
        }
    }
}

/// Diagnostic figure settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    /// Output image; `.svg` selects the SVG backend
    pub output: PathBuf,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Histogram bins
    pub bins: usize,

    /// TrueType font for labels
    pub font: Option<PathBuf>,

    /// Caption above the panels
    pub title: String,
}
impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            width: 1200,
            height: 1000,
            bins: 30,
            font: None,
            title: String::new(),
        }
    }
}

impl Config {
    /// Load a config file.
    ///
    /// # Errors
    /// - [`Error::Io`] if the file cannot be read.
    /// - [`Error::Toml`] if it is not valid TOML, has unknown keys or mistyped values.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Dataset description for the generator
    pub fn to_sample(&self) -> LinearSample<f64> {
        let data = &self.data;
        LinearSample::default()
            .with_samples(data.samples)
            .with_x_range(data.x_min..data.x_max)
            .with_line(data.slope, data.intercept)
            .with_noise(data.noise())
            .with_seed(data.seed)
    }

    /// Options for the diagnostic figure
    #[cfg(feature = "plotting")]
    pub fn plot_options(&self) -> crate::plotting::PlotOptions {
        let plot = &self.plot;
        let options = crate::plotting::PlotOptions::default()
            .with_title(plot.title.clone())
            .with_size(plot.width, plot.height)
            .with_bins(plot.bins);
        match &plot.font {
            Some(font) => options.with_font(font),
            None => options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.samples, 100);
        assert_eq!(config.data.seed, 42);
        assert_eq!(config.data.noise, NoiseKind::Gaussian);
        assert_eq!(config.plot.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.to_sample(), LinearSample::default());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[data]
samples = 250
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data.samples, 250);
        // Other fields should be defaults
        assert_eq!(config.data.slope, 2.0);
        assert_eq!(config.plot.bins, 30);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[data]
samples = 20
seed = 7
slope = -1.5
intercept = 3.0
x_min = -5.0
x_max = 5.0
noise = "uniform"
noise_level = 0.25

[plot]
output = "out/figure.svg"
width = 800
height = 600
bins = 12
font = "/tmp/font.ttf"
title = "Run 7"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data.noise(), Noise::Uniform { strength: 0.25 });

        let sample = config.to_sample();
        assert_eq!(sample.samples, 20);
        assert_eq!(sample.x_range, -5.0..5.0);
        assert_eq!(sample.line(), (-1.5, 3.0));
        assert_eq!(sample.seed, Some(7));

        assert_eq!(config.plot.output, PathBuf::from("out/figure.svg"));
        assert_eq!(config.plot.font, Some(PathBuf::from("/tmp/font.ttf")));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(toml::from_str::<Config>("[data]\nsample = 5\n").is_err());
        assert!(toml::from_str::<Config>("[render]\nwidth = 5\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linviz.toml");
        std::fs::write(&path, "[data]\nnoise = \"none\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data.noise(), Noise::None);

        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(Error::Io(_))));

        std::fs::write(&path, "[data]\nsamples = \"many\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Toml(_))));
    }

    #[test]
    fn test_noise_kind_from_str() {
        assert_eq!("Gaussian".parse::<NoiseKind>().unwrap(), NoiseKind::Gaussian);
        assert_eq!("uniform".parse::<NoiseKind>().unwrap(), NoiseKind::Uniform);
        assert_eq!("none".parse::<NoiseKind>().unwrap(), NoiseKind::None);
        assert!(matches!(
            "poisson".parse::<NoiseKind>(),
            Err(Error::Config(_))
        ));
        assert_eq!(NoiseKind::Uniform.to_string(), "uniform");
    }

    #[cfg(feature = "plotting")]
    #[test]
    fn test_plot_options() {
        let mut config = Config::default();
        config.plot.bins = 15;
        config.plot.font = Some(PathBuf::from("/tmp/font.ttf"));

        let options = config.plot_options();
        assert_eq!(options.bins, 15);
        assert_eq!(options.size, (1200, 1000));
        assert_eq!(options.font, Some(PathBuf::from("/tmp/font.ttf")));
    }
}
