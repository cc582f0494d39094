use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use linviz::{
    config::{Config, NoiseKind},
    report::Report,
    LinearFit,
};

#[derive(Parser)]
#[command(
    name = "linviz",
    version,
    about = "Generate noisy linear data, summarize it and plot regression diagnostics"
)]
struct Cli {
    /// TOML config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of points to generate
    #[arg(short = 'n', long)]
    samples: Option<usize>,

    /// RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Slope of the generating line
    #[arg(long, allow_hyphen_values = true)]
    slope: Option<f64>,

    /// Intercept of the generating line
    #[arg(long, allow_hyphen_values = true)]
    intercept: Option<f64>,

    /// Noise distribution
    #[arg(long)]
    noise: Option<CliNoise>,

    /// Standard deviation (gaussian) or half-width (uniform) of the noise
    #[arg(long)]
    noise_level: Option<f64>,

    /// Histogram bins
    #[arg(short, long)]
    bins: Option<usize>,

    /// Figure path; `.svg` writes an SVG, anything else a PNG
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TrueType font for plot labels
    #[arg(long)]
    font: Option<PathBuf>,

    /// Skip the figure
    #[arg(long)]
    no_plot: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Write the generated (x, y) pairs to this file as JSON
    #[arg(long)]
    dump_data: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum CliNoise {
    Gaussian,
    Uniform,
    None,
}

impl From<CliNoise> for NoiseKind {
    fn from(val: CliNoise) -> Self {
        match val {
            CliNoise::Gaussian => NoiseKind::Gaussian,
            CliNoise::Uniform => NoiseKind::Uniform,
            CliNoise::None => NoiseKind::None,
        }
    }
}

#[derive(Serialize)]
struct Point {
    x: f64,
    y: f64,
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => Config::default(),
    };

    let data = &mut config.data;
    if let Some(samples) = cli.samples {
        data.samples = samples;
    }
    if let Some(seed) = cli.seed {
        data.seed = seed;
    }
    if let Some(slope) = cli.slope {
        data.slope = slope;
    }
    if let Some(intercept) = cli.intercept {
        data.intercept = intercept;
    }
    if let Some(noise) = cli.noise.clone() {
        data.noise = noise.into();
    }
    if let Some(level) = cli.noise_level {
        data.noise_level = level;
    }

    let plot = &mut config.plot;
    if let Some(bins) = cli.bins {
        plot.bins = bins;
    }
    if let Some(output) = &cli.output {
        plot.output.clone_from(output);
    }
    if let Some(font) = &cli.font {
        plot.font = Some(font.clone());
    }

    Ok(config)
}

fn dump_data(path: &Path, data: &[(f64, f64)]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }

    let file = File::create(path).with_context(|| format!("cannot write {}", path.display()))?;
    let points: Vec<Point> = data.iter().map(|&(x, y)| Point { x, y }).collect();
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &points)
        .with_context(|| format!("cannot write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("cannot write {}", path.display()))?;

    tracing::info!(path = %path.display(), points = points.len(), "Wrote data dump");
    Ok(())
}

#[cfg(feature = "plotting")]
fn write_figure(config: &Config, fit: &LinearFit<'_>, report: &Report) -> Result<()> {
    let path = &config.plot.output;
    linviz::plotting::render_to_file(path, fit, report, &config.plot_options())
        .with_context(|| format!("cannot render {}", path.display()))?;
    eprintln!("Figure written to {}", path.display());
    Ok(())
}

#[cfg(not(feature = "plotting"))]
fn write_figure(_: &Config, _: &LinearFit<'_>, _: &Report) -> Result<()> {
    tracing::warn!("Built without the `plotting` feature; skipping figure");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let data = config
        .to_sample()
        .generate()
        .context("failed to generate data")?;
    if let Some(path) = &cli.dump_data {
        dump_data(path, &data)?;
    }

    let fit = LinearFit::new(&data).context("failed to fit a line")?;
    let report = Report::new(&fit).context("failed to summarize data")?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{report}");
    }

    if !cli.no_plot {
        write_figure(&config, &fit, &report)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linviz.toml");
        std::fs::write(&path, "[data]\nsamples = 10\nslope = 4.0\n\n[plot]\nbins = 8\n").unwrap();

        let cli = Cli::parse_from([
            "linviz",
            "--config",
            path.to_str().unwrap(),
            "--samples",
            "25",
            "--intercept",
            "-3",
            "--noise",
            "uniform",
        ]);
        let config = resolve_config(&cli).unwrap();

        assert_eq!(config.data.samples, 25);
        assert_eq!(config.data.slope, 4.0);
        assert_eq!(config.data.intercept, -3.0);
        assert_eq!(config.data.noise, NoiseKind::Uniform);
        assert_eq!(config.plot.bins, 8);
    }

    #[test]
    fn test_defaults_without_config() {
        let cli = Cli::parse_from(["linviz"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config, Config::default());
        assert!(!cli.no_plot && !cli.json);
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let cli = Cli::parse_from(["linviz", "--config", "/nonexistent/linviz.toml"]);
        assert!(resolve_config(&cli).is_err());
    }

    #[test]
    fn test_dump_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("data.json");
        dump_data(&path, &[(1.0, 2.5), (3.0, -1.0)]).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json[0]["x"], 1.0);
        assert_eq!(json[1]["y"], -1.0);
    }
}
