//! Four panel diagnostic figure
//!
//! Mainly used through [`render_to_file`], which writes a PNG (or an SVG, if the
//! path ends in `.svg`) containing:
//!
//! | | |
//! |-|-|
//! | Scatter plot of `(x, y)` | Boxplot of `y` |
//! | Histogram of `y` | Residuals against predictions |
//!
//! [`render`] draws onto any plotters drawing area, for embedding the figure
//! elsewhere. The [`plotters`] crate is re-exported for that purpose.
//!
//! Labels need a TrueType font; see [`register_font`].
use std::{ops::Range, path::Path};

use plotters::{
    coord::Shift,
    prelude::{
        BitMapBackend, DrawingArea, DrawingAreaErrorKind, DrawingBackend, IntoDrawingArea,
        SVGBackend, WHITE,
    },
    style::IntoFont,
};

use crate::{
    error::{Error, Result},
    report::Report,
    statistics::Histogram,
    value::{CoordExt, Value},
    LinearFit,
};

pub use plotters;

mod font;
pub use font::{font_candidates, register_font, FONT_ENV, FONT_FAMILY};

mod panels;

/// Options for the diagnostic figure
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// Caption above the four panels. Empty for none.
    pub title: String,

    /// Size of the output image in pixels
    pub size: (u32, u32),

    /// Number of histogram bins
    pub bins: usize,

    /// Opacity of scatter points, `0.0..=1.0`
    pub point_alpha: f64,

    /// TrueType font for labels. Falls back to [`FONT_ENV`] and system fonts.
    pub font: Option<std::path::PathBuf>,
}
impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            size: (1200, 1000),
            bins: 30,
            point_alpha: 0.5,
            font: None,
        }
    }
}
impl PlotOptions {
    /// Set the caption
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the image size
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Set the number of histogram bins
    #[must_use]
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    /// Set the font file
    #[must_use]
    pub fn with_font(mut self, font: impl Into<std::path::PathBuf>) -> Self {
        self.font = Some(font.into());
        self
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for Error
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Error::Plot(e.to_string())
    }
}

/// Everything the panels draw, coerced to `f64`
struct Figure {
    points: Vec<(f64, f64)>,
    residuals: Vec<(f64, f64)>,
    q1: f64,
    median: f64,
    q3: f64,
    whiskers: (f64, f64),
    outliers: Vec<f64>,
    histogram: Histogram<f64>,
}
impl Figure {
    fn new<T: Value>(fit: &LinearFit<'_, T>, report: &Report<T>, bins: usize) -> Result<Self> {
        let cast = |v: T| v.as_f64().ok_or(Error::CastFailed);

        let points = fit.data().as_f64()?;
        let residuals = fit.residuals().as_f64()?;
        let y = points.y();

        let whiskers = report
            .fences
            .whiskers(&fit.data().y())
            .unwrap_or((report.fences.q1, report.fences.q3));
        let outliers = report
            .outliers
            .iter()
            .map(|v| cast(*v))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            histogram: Histogram::new(&y, bins)?,
            points,
            residuals,
            q1: cast(report.fences.q1)?,
            median: cast(report.summary.median)?,
            q3: cast(report.fences.q3)?,
            whiskers: (cast(whiskers.0)?, cast(whiskers.1)?),
            outliers,
        })
    }
}

/// Draw the four diagnostic panels onto `root`.
///
/// # Errors
/// - [`Error::FontUnavailable`] if no font can be registered for labels.
/// - [`Error::Config`] if `options.bins` is zero.
/// - [`Error::Plot`] if the backend fails to draw.
pub fn render<DB: DrawingBackend, T: Value>(
    root: &DrawingArea<DB, Shift>,
    fit: &LinearFit<'_, T>,
    report: &Report<T>,
    options: &PlotOptions,
) -> Result<()> {
    register_font(options.font.as_deref())?;
    let figure = Figure::new(fit, report, options.bins)?;

    root.fill(&WHITE)?;
    let area = if options.title.is_empty() {
        root.clone()
    } else {
        root.titled(&options.title, (FONT_FAMILY, 28).into_font())?
    };

    let panels = area.split_evenly((2, 2));
    panels::scatter(&panels[0], &figure.points, options.point_alpha)?;
    panels::boxplot(&panels[1], &figure)?;
    panels::histogram(&panels[2], &figure.histogram)?;
    panels::residuals(&panels[3], &figure.residuals, options.point_alpha)?;

    root.present()?;
    Ok(())
}

/// Render the figure to an image file, creating parent directories as needed.
///
/// Paths ending in `.svg` produce an SVG; anything else is encoded as a bitmap
/// in the format matching the extension (PNG by default).
///
/// # Errors
/// See [`render`]. Also fails if the parent directory cannot be created.
pub fn render_to_file<T: Value>(
    path: &Path,
    fit: &LinearFit<'_, T>,
    report: &Report<T>,
    options: &PlotOptions,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        let root = SVGBackend::new(path, options.size).into_drawing_area();
        render(&root, fit, report, options)?;
    } else {
        let root = BitMapBackend::new(path, options.size).into_drawing_area();
        render(&root, fit, report, options)?;
    }

    tracing::info!(path = %path.display(), "Wrote diagnostic figure");
    Ok(())
}

/// Render the figure to an in-memory SVG document.
///
/// # Errors
/// See [`render`].
pub fn render_to_svg_string<T: Value>(
    fit: &LinearFit<'_, T>,
    report: &Report<T>,
    options: &PlotOptions,
) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, options.size).into_drawing_area();
        render(&root, fit, report, options)?;
    }
    Ok(svg)
}

/// Axis range covering `range` with 5% padding on each side.
///
/// An empty or degenerate range is widened to a unit span around its value.
fn padded(range: Option<Range<f64>>) -> Range<f64> {
    let Some(Range { start, end }) = range else {
        return 0.0..1.0;
    };

    let span = end - start;
    if span.abs() < f64::EPSILON * start.abs().max(1.0) {
        return start - 0.5..end + 0.5;
    }

    let pad = span * 0.05;
    start - pad..end + pad
}
