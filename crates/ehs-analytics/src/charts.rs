//! Chart rendering for the dashboard image assets.
//!
//! The [`ChartTheme`] is the process-wide renderer configuration: it is
//! constructed once before any chart is produced and passed to every
//! render call. There is no teardown; the process is short-lived.
//!
//! Each render function writes exactly one PNG at the given path and
//! returns whether an image was actually produced, so the caller never
//! registers a phantom asset for an empty series.

use crate::error::{AnalyticsError, Result};
use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

/// Process-wide chart rendering configuration.
#[derive(Debug, Clone)]
pub struct ChartTheme {
    /// Pixel dimensions of bar charts (10x5 in at 160 DPI).
    pub bar_dimensions: (u32, u32),
    /// Pixel dimensions of line charts (10x4 in at 160 DPI).
    pub line_dimensions: (u32, u32),
    pub caption_font: (&'static str, u32),
    pub series_color: RGBColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            bar_dimensions: (1600, 800),
            line_dimensions: (1600, 640),
            caption_font: ("sans-serif", 32),
            series_color: RGBColor(0x1f, 0x77, 0xb4),
        }
    }
}

/// Render a horizontal bar chart of category counts.
///
/// `counts` must already be sorted ascending by count; the last entry is
/// drawn as the topmost (largest) bar. Returns `false` without touching
/// the filesystem when there is nothing to plot.
pub fn render_bar_chart(
    theme: &ChartTheme,
    counts: &[(String, u64)],
    title: &str,
    out_path: &Path,
) -> Result<bool> {
    if counts.is_empty() {
        debug!("No values to plot for '{}'; skipping chart", title);
        return Ok(false);
    }
    draw_bar(theme, counts, title, out_path).map_err(|e| AnalyticsError::ChartRender {
        chart: title.to_string(),
        reason: e.to_string(),
    })?;
    Ok(true)
}

fn draw_bar(
    theme: &ChartTheme,
    counts: &[(String, u64)],
    title: &str,
    out_path: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let max_count = counts.iter().map(|(_, c)| *c).max().unwrap_or(1);
    let x_max = max_count + (max_count / 10).max(1);

    let root = BitMapBackend::new(out_path, theme.bar_dimensions).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, theme.caption_font)
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(260)
        .build_cartesian_2d(0u64..x_max, (0..counts.len()).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Count")
        .y_labels(counts.len())
        .y_label_formatter(&|segment| match segment {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => counts
                .get(*i)
                .map(|(name, _)| name.clone())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, (_, count))| {
        let mut bar = Rectangle::new(
            [(0, SegmentValue::Exact(i)), (*count, SegmentValue::Exact(i + 1))],
            theme.series_color.mix(0.85).filled(),
        );
        bar.set_margin(8, 8, 0, 0);
        bar
    }))?;

    root.present()?;
    Ok(())
}

/// Render a line chart of daily occurrence counts.
///
/// `points` must be sorted chronologically. Returns `false` without
/// touching the filesystem when there are no valid dates.
pub fn render_line_chart(
    theme: &ChartTheme,
    points: &[(NaiveDate, u64)],
    title: &str,
    out_path: &Path,
) -> Result<bool> {
    if points.is_empty() {
        debug!("No valid dates to plot for '{}'; skipping chart", title);
        return Ok(false);
    }
    draw_line(theme, points, title, out_path).map_err(|e| AnalyticsError::ChartRender {
        chart: title.to_string(),
        reason: e.to_string(),
    })?;
    Ok(true)
}

fn draw_line(
    theme: &ChartTheme,
    points: &[(NaiveDate, u64)],
    title: &str,
    out_path: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let first = points[0].0;
    let last = points[points.len() - 1].0;
    // A single-day series still needs a non-degenerate x range.
    let x_max = if last > first {
        last
    } else {
        first + Duration::days(1)
    };
    let y_max = points.iter().map(|(_, c)| *c).max().unwrap_or(1) + 1;

    let root = BitMapBackend::new(out_path, theme.line_dimensions).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, theme.caption_font)
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(56)
        .build_cartesian_2d(first..x_max, 0u64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Count")
        .x_label_formatter(&|date: &NaiveDate| date.format("%Y-%m-%d").to_string())
        .draw()?;

    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        &theme.series_color,
    ))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_counts_produce_no_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty_bar.png");
        let produced =
            render_bar_chart(&ChartTheme::default(), &[], "Observations by type", &path).unwrap();
        assert!(!produced);
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_points_produce_no_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty_line.png");
        let produced =
            render_line_chart(&ChartTheme::default(), &[], "Incidents over time", &path).unwrap();
        assert!(!produced);
        assert!(!path.exists());
    }
}
