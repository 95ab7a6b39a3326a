//! SVG comparison charts.

use std::path::Path;

use plotters::prelude::*;
use sc_core::Trajectory;
use tracing::debug;

use crate::{CompareError, CompareResult};

const PANEL_WIDTH: u32 = 1000;
const PANEL_HEIGHT: u32 = 420;

/// One stacked panel: a reference curve and the recorded curve it is checked against.
#[derive(Debug, Clone, Copy)]
pub struct ChartPanel<'a> {
    pub title: &'a str,
    pub reference: &'a Trajectory,
    pub recorded: &'a Trajectory,
}

fn chart_err<E: std::fmt::Display>(e: E) -> CompareError {
    CompareError::Chart(e.to_string())
}

/// Render `panels` stacked vertically into an SVG file at `path`.
///
/// The reference is drawn dashed black, the recorded output solid red.
pub fn render_chart(path: &Path, panels: &[ChartPanel<'_>]) -> CompareResult<()> {
    if panels.is_empty() {
        return Err(CompareError::Chart("no panels to draw".to_string()));
    }

    let height = PANEL_HEIGHT * panels.len() as u32;
    let root = SVGBackend::new(path, (PANEL_WIDTH, height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let areas = root.split_evenly((panels.len(), 1));
    for (area, panel) in areas.iter().zip(panels) {
        draw_panel(area, panel)?;
    }

    root.present().map_err(chart_err)?;
    debug!(path = %path.display(), panels = panels.len(), "rendered comparison chart");
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    panel: &ChartPanel<'_>,
) -> CompareResult<()> {
    let (x_range, y_range) = bounds(panel.reference, panel.recorded);

    let mut chart = ChartBuilder::on(area)
        .margin(15)
        .caption(panel.title, ("sans-serif", 24))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("time (s)")
        .y_desc("output")
        .bold_line_style(RGBColor(200, 200, 200))
        .light_line_style(RGBColor(235, 235, 235))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(DashedLineSeries::new(
            panel.reference.samples().collect::<Vec<_>>(),
            8,
            5,
            BLACK.stroke_width(2),
        ))
        .map_err(chart_err)?
        .label("Reference")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));

    chart
        .draw_series(LineSeries::new(
            panel.recorded.samples(),
            RED.stroke_width(2),
        ))
        .map_err(chart_err)?
        .label("Output")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_err)?;

    Ok(())
}

/// Axis ranges covering both curves with a small vertical margin.
fn bounds(a: &Trajectory, b: &Trajectory) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let x_min = a.start_time().min(b.start_time());
    let mut x_max = a.end_time().max(b.end_time());
    if x_max <= x_min {
        x_max = x_min + 1.0;
    }

    let (y_min, y_max) = a
        .values()
        .iter()
        .chain(b.values())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let pad = 0.05 * (y_max - y_min).abs().max(1e-9);
    (x_min..x_max, (y_min - pad)..(y_max + pad))
}
