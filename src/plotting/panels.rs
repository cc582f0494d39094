//! The four panels of the diagnostic figure
//!
//! Everything here works in `f64`; see [`super::Figure`].
use std::ops::Range;

use plotters::{
    coord::{types::RangedCoordf64, Shift},
    prelude::*,
};

use super::{padded, Figure, FONT_FAMILY};
use crate::{error::Result, statistics::Histogram, value::CoordExt};

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const POINT_SIZE: i32 = 3;
const ORANGE: RGBColor = RGBColor(255, 165, 0);

/// Horizontal extent of the box, in the unit-wide boxplot coordinate space
const BOX: Range<f64> = 0.3..0.7;
const CAP: Range<f64> = 0.4..0.6;
const CENTER: f64 = 0.5;

fn chart<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    caption: &str,
    x_range: Range<f64>,
    y_range: Range<f64>,
) -> Result<Chart<'a, DB>> {
    let chart = ChartBuilder::on(area)
        .caption(caption, (FONT_FAMILY, 18).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range, y_range)?;
    Ok(chart)
}

fn draw_mesh<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    x_desc: &str,
    y_desc: &str,
) -> Result<()> {
    chart
        .configure_mesh()
        .label_style((FONT_FAMILY, 12))
        .axis_desc_style((FONT_FAMILY, 14))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;
    Ok(())
}

/// `y` against `x`
pub(super) fn scatter<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    points: &[(f64, f64)],
    alpha: f64,
) -> Result<()> {
    let mut chart = chart(
        area,
        "Scatter plot",
        padded(points.x_range()),
        padded(points.y_range()),
    )?;
    draw_mesh(&mut chart, "X", "y")?;

    let style = BLUE.mix(alpha).filled();
    chart.draw_series(points.iter().map(|p| Circle::new(*p, POINT_SIZE, style)))?;
    Ok(())
}

/// Box from Q1 to Q3 with the median marked, whiskers to the furthest values
/// inside the fences, and hollow markers for the outliers.
pub(super) fn boxplot<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> Result<()> {
    let mut chart = chart(area, "Boxplot of y", 0.0..1.0, padded(figure.points.y_range()))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_x_axis()
        .label_style((FONT_FAMILY, 12))
        .axis_desc_style((FONT_FAMILY, 14))
        .y_desc("Values")
        .draw()?;

    let (q1, q3) = (figure.q1, figure.q3);
    let (low, high) = figure.whiskers;

    chart.draw_series([
        Rectangle::new([(BOX.start, q1), (BOX.end, q3)], BLUE.mix(0.3).filled()),
        Rectangle::new([(BOX.start, q1), (BOX.end, q3)], BLUE.stroke_width(2)),
    ])?;

    let whisker = BLACK.stroke_width(1);
    chart.draw_series([
        PathElement::new(vec![(CENTER, q1), (CENTER, low)], whisker),
        PathElement::new(vec![(CENTER, q3), (CENTER, high)], whisker),
        PathElement::new(vec![(CAP.start, low), (CAP.end, low)], whisker),
        PathElement::new(vec![(CAP.start, high), (CAP.end, high)], whisker),
        PathElement::new(
            vec![(BOX.start, figure.median), (BOX.end, figure.median)],
            ORANGE.stroke_width(2),
        ),
    ])?;

    chart.draw_series(
        figure
            .outliers
            .iter()
            .map(|v| Circle::new((CENTER, *v), 4, BLACK.stroke_width(1))),
    )?;
    Ok(())
}

/// Bar per histogram bin
pub(super) fn histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    histogram: &Histogram<f64>,
) -> Result<()> {
    let x_range = histogram
        .bins()
        .next()
        .zip(histogram.bins().last())
        .map(|((start, _, _), (_, end, _))| start..end);
    let y_max = (histogram.max_count() as f64 * 1.1).max(1.0);

    let mut chart = chart(area, "Histogram of y", padded(x_range), 0.0..y_max)?;
    draw_mesh(&mut chart, "Values", "Frequency")?;

    chart.draw_series(histogram.bins().map(|(start, end, count)| {
        Rectangle::new([(start, 0.0), (end, count as f64)], BLUE.mix(0.7).filled())
    }))?;
    chart.draw_series(histogram.bins().map(|(start, end, count)| {
        Rectangle::new([(start, 0.0), (end, count as f64)], BLACK.stroke_width(1))
    }))?;
    Ok(())
}

/// Residuals against predictions, with a dashed reference line at zero
pub(super) fn residuals<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    residuals: &[(f64, f64)],
    alpha: f64,
) -> Result<()> {
    let x_range = padded(residuals.x_range());

    // Symmetric about zero so the reference line sits in the middle
    let bound = residuals
        .y_iter()
        .map(f64::abs)
        .fold(0.0, f64::max);
    let y_range = padded(Some(-bound..bound));

    let mut chart = chart(area, "Residual plot", x_range.clone(), y_range)?;
    draw_mesh(&mut chart, "Predicted values", "Residuals")?;

    let style = BLUE.mix(alpha).filled();
    chart.draw_series(residuals.iter().map(|p| Circle::new(*p, POINT_SIZE, style)))?;
    chart.draw_series(DashedLineSeries::new(
        vec![(x_range.start, 0.0), (x_range.end, 0.0)],
        6,
        4,
        RED.stroke_width(2),
    ))?;
    Ok(())
}
