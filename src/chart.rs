//! Line charts of year series.

use anyhow::{Result, bail};
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::analyzers::types::YearSeries;

/// Draws one line per named series into an SVG file at `path`.
///
/// Years without a value are left out of the line.
pub fn render_line_chart(
    path: &Path,
    title: &str,
    y_desc: &str,
    series: &BTreeMap<String, YearSeries>,
) -> Result<()> {
    let lines: Vec<(&String, Vec<(i32, f64)>)> = series
        .iter()
        .map(|(name, s)| {
            let points = s
                .iter()
                .filter_map(|(year, value)| value.map(|v| (*year, v)))
                .collect::<Vec<_>>();
            (name, points)
        })
        .filter(|(_, points)| !points.is_empty())
        .collect();

    if lines.is_empty() {
        bail!("nothing to plot for {title}");
    }

    let all_points = lines.iter().flat_map(|(_, p)| p.iter());
    let (mut min_year, mut max_year) = (i32::MAX, i32::MIN);
    let (mut min_v, mut max_v) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(year, value) in all_points {
        min_year = min_year.min(year);
        max_year = max_year.max(year);
        min_v = min_v.min(value);
        max_v = max_v.max(value);
    }
    let pad = if max_v > min_v { (max_v - min_v) * 0.1 } else { 1.0 };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(min_year..max_year.max(min_year + 1), (min_v - pad)..(max_v + pad))?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(y_desc)
        .x_labels((max_year - min_year + 1).max(2) as usize)
        .draw()?;

    for (idx, (name, points)) in lines.into_iter().enumerate() {
        let color = Palette99::pick(idx).mix(0.9);
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))?
            .label(name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    debug!(path = %path.display(), series = series.len(), "Chart rendered");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_render_line_chart_writes_svg() {
        let path = env::temp_dir().join("genco_analyzer_test_chart.svg");
        let _ = fs::remove_file(&path);

        let mut series: BTreeMap<String, YearSeries> = BTreeMap::new();
        series.insert(
            "puding".to_string(),
            [(2019, Some(30.0)), (2020, None), (2021, Some(34.5))].into_iter().collect(),
        );
        render_line_chart(&path, "Generation output", "GWh", &series).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_render_empty_is_error() {
        let path = env::temp_dir().join("genco_analyzer_test_empty_chart.svg");
        let mut series: BTreeMap<String, YearSeries> = BTreeMap::new();
        series.insert("x".to_string(), [(2019, None)].into_iter().collect());

        assert!(render_line_chart(&path, "Empty", "", &series).is_err());
        assert!(!path.exists());
    }
}
