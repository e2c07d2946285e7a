use std::collections::hash_map::DefaultHasher;
use std::error::Error;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use lru::LruCache;
use once_cell::sync::Lazy;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::charts::chart_data;
use crate::types::{Category, ChartData, ChartKind, CorrelationMatrix, Record};

use super::styles::{ChartStyle, ChartTheme};

type PlotError = Box<dyn Error + Send + Sync>;

/// Rendered plot size in pixels.
const PLOT_SIZE: (u32, u32) = (900, 540);

// Rendered plots for the session's immutable datasets. Entries never go
// stale (a dataset is never mutated in place), so eviction is purely LRU.
static PLOT_CACHE: Lazy<Mutex<LruCache<PlotCacheKey, Vec<u8>>>> =
    Lazy::new(|| Mutex::new(LruCache::new(NonZeroUsize::new(8).unwrap())));

#[derive(Hash, Eq, PartialEq)]
struct PlotCacheKey {
    kind: ChartKind,
    data_hash: u64,
}

impl PlotCacheKey {
    fn new(kind: ChartKind, records: &[Record]) -> Self {
        Self {
            kind,
            data_hash: dataset_fingerprint(records),
        }
    }
}

/// Bit-pattern hash of every row, used to key the plot cache.
fn dataset_fingerprint(records: &[Record]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for record in records {
        record.date.hash(&mut hasher);
        record.sales.to_bits().hash(&mut hasher);
        record.visitors.to_bits().hash(&mut hasher);
        record.conversion_rate.to_bits().hash(&mut hasher);
        record.category.hash(&mut hasher);
    }
    hasher.finish()
}

fn plot_cache() -> MutexGuard<'static, LruCache<PlotCacheKey, Vec<u8>>> {
    PLOT_CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Render the selected chart for `records` into `plot_path`, returning the
/// PNG bytes. Repeated requests for an unchanged dataset are served from
/// the in-memory cache without touching the filesystem.
pub fn render_chart_cached(
    kind: ChartKind,
    records: &[Record],
    plot_path: &str,
) -> Result<Vec<u8>, PlotError> {
    let cache_key = PlotCacheKey::new(kind, records);
    if let Some(bytes) = plot_cache().get(&cache_key) {
        return Ok(bytes.clone());
    }

    let data = chart_data(kind, records)?;
    let bytes = {
        let root = BitMapBackend::new(plot_path, PLOT_SIZE).into_drawing_area();
        render_chart(&data, &root)?;
        root.present()?;

        // Read the image back and drop the temporary file.
        let bytes = std::fs::read(plot_path)?;
        let _ = std::fs::remove_file(plot_path);
        bytes
    };

    plot_cache().put(cache_key, bytes.clone());
    Ok(bytes)
}

/// Draw `data` onto a prepared drawing area.
pub fn render_chart(
    data: &ChartData,
    root_area: &DrawingArea<BitMapBackend, Shift>,
) -> Result<(), PlotError> {
    let theme = ChartTheme::default();
    let style = ChartStyle::default();
    root_area.fill(&theme.background_color)?;

    match data {
        ChartData::TimeSeries(points) => draw_time_series(root_area, points, &theme, &style),
        ChartData::CategoryTotals(totals) => {
            draw_category_totals(root_area, totals, &theme, &style)
        }
        ChartData::ScatterByCategory(points) => draw_scatter(root_area, points, &theme, &style),
        ChartData::CorrelationMatrix(matrix) => draw_heatmap(root_area, matrix, &theme, &style),
    }
}

fn draw_time_series(
    root_area: &DrawingArea<BitMapBackend, Shift>,
    points: &[(NaiveDate, f64)],
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<(), PlotError> {
    let (y_min, y_max) = padded_range(points.iter().map(|(_, sales)| *sales));

    let mut chart_builder = ChartBuilder::on(root_area)
        .caption(
            ChartKind::TimeSeries.title(),
            ("sans-serif", 30).into_font().color(&theme.text_color),
        )
        .margin(style.margin)
        .set_all_label_area_size(style.label_area_size)
        .build_cartesian_2d(0f64..(points.len() as f64), y_min..y_max)?;

    let dates: Vec<String> = points.iter().map(|(date, _)| date.to_string()).collect();
    let x_label_formatter = move |x: &f64| {
        let idx = *x as usize;
        if idx < dates.len() {
            // Show fewer labels to prevent overlap
            if idx == 0
                || idx == dates.len() - 1
                || (idx % (dates.len() / 4).max(1) == 0 && idx > 0 && idx < dates.len() - 1)
            {
                dates[idx].clone()
            } else {
                String::new()
            }
        } else {
            String::new()
        }
    };

    let mut mesh = chart_builder.configure_mesh();
    mesh.light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .y_desc("Sales")
        .label_style(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color),
        )
        .x_label_formatter(&x_label_formatter)
        .y_label_formatter(&format_axis_value)
        // Rotate x labels for better readability
        .x_label_style(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color)
                .transform(FontTransform::Rotate90)
                .pos(Pos::new(HPos::Right, VPos::Center)),
        );
    mesh.draw()?;

    let series: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, (_, sales))| (i as f64, *sales))
        .collect();

    // Draw a subtle glow under the main line
    chart_builder.draw_series(LineSeries::new(
        series.clone(),
        theme.line_glow_color.mix(0.3).stroke_width(style.line_width * 2),
    ))?;

    let line_color = theme.line_color;
    chart_builder
        .draw_series(LineSeries::new(
            series,
            line_color.stroke_width(style.line_width),
        ))?
        .label("Sales")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_color));

    Ok(())
}

fn draw_category_totals(
    root_area: &DrawingArea<BitMapBackend, Shift>,
    totals: &[(Category, f64)],
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<(), PlotError> {
    let max_total = totals
        .iter()
        .map(|(_, total)| *total)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_total = totals.iter().map(|(_, total)| *total).fold(0.0, f64::min);
    let y_max = if max_total.is_finite() && max_total > 0.0 {
        max_total * 1.1
    } else {
        1.0
    };
    let y_min = min_total * 1.1;

    let mut chart_builder = ChartBuilder::on(root_area)
        .caption(
            ChartKind::CategoryTotals.title(),
            ("sans-serif", 30).into_font().color(&theme.text_color),
        )
        .margin(style.margin)
        .set_all_label_area_size(style.label_area_size)
        .build_cartesian_2d(-0.5f64..(totals.len() as f64 - 0.5), y_min..y_max)?;

    let labels: Vec<&'static str> = totals.iter().map(|(category, _)| category.as_str()).collect();
    let x_label_formatter = move |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() < 1e-6 && idx >= 0.0 && (idx as usize) < labels.len() {
            labels[idx as usize].to_string()
        } else {
            String::new()
        }
    };

    let mut mesh = chart_builder.configure_mesh();
    mesh.light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .y_desc("Total Sales")
        .x_desc("Category")
        .x_labels(totals.len())
        .label_style(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color),
        )
        .x_label_formatter(&x_label_formatter)
        .y_label_formatter(&format_axis_value);
    mesh.draw()?;

    chart_builder.draw_series(totals.iter().enumerate().map(|(i, (category, total))| {
        let x0 = i as f64 - style.bar_half_width;
        let x1 = i as f64 + style.bar_half_width;
        Rectangle::new(
            [(x0, 0.0), (x1, *total)],
            theme.category_color(*category).mix(0.85).filled(),
        )
    }))?;

    Ok(())
}

fn draw_scatter(
    root_area: &DrawingArea<BitMapBackend, Shift>,
    points: &[(f64, f64, Category)],
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<(), PlotError> {
    let (x_min, x_max) = padded_range(points.iter().map(|(visitors, _, _)| *visitors));
    let (y_min, y_max) = padded_range(points.iter().map(|(_, sales, _)| *sales));

    let mut chart_builder = ChartBuilder::on(root_area)
        .caption(
            ChartKind::ScatterByCategory.title(),
            ("sans-serif", 30).into_font().color(&theme.text_color),
        )
        .margin(style.margin)
        .set_all_label_area_size(style.label_area_size)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    let mut mesh = chart_builder.configure_mesh();
    mesh.light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .x_desc("Visitors")
        .y_desc("Sales")
        .label_style(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color),
        )
        .y_label_formatter(&format_axis_value);
    mesh.draw()?;

    for category in Category::ALL {
        let color = theme.category_color(category);
        let radius = style.point_radius;
        chart_builder
            .draw_series(
                points
                    .iter()
                    .filter(|(_, _, c)| *c == category)
                    .map(|(visitors, sales, _)| {
                        Circle::new((*visitors, *sales), radius, color.mix(0.8).filled())
                    }),
            )?
            .label(category.as_str())
            .legend(move |(x, y)| Circle::new((x + 10, y), radius, color.mix(0.8).filled()));
    }

    chart_builder
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(BLACK.mix(0.6))
        .border_style(theme.grid_color)
        .label_font(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color),
        )
        .draw()?;

    Ok(())
}

fn draw_heatmap(
    root_area: &DrawingArea<BitMapBackend, Shift>,
    matrix: &CorrelationMatrix,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<(), PlotError> {
    let n = matrix.fields.len();
    let span = -0.5f64..(n as f64 - 0.5);

    let mut chart_builder = ChartBuilder::on(root_area)
        .caption(
            ChartKind::CorrelationMatrix.title(),
            ("sans-serif", 30).into_font().color(&theme.text_color),
        )
        .margin(style.margin)
        .set_all_label_area_size(style.label_area_size + 40)
        .build_cartesian_2d(span.clone(), span)?;

    let fields = matrix.fields;
    let x_label_formatter = move |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() < 1e-6 && idx >= 0.0 && (idx as usize) < fields.len() {
            fields[idx as usize].to_string()
        } else {
            String::new()
        }
    };
    // Row 0 sits at the top of the grid
    let y_label_formatter = move |y: &f64| {
        let idx = y.round();
        if (y - idx).abs() < 1e-6 && idx >= 0.0 && (idx as usize) < fields.len() {
            fields[fields.len() - 1 - idx as usize].to_string()
        } else {
            String::new()
        }
    };

    let mut mesh = chart_builder.configure_mesh();
    mesh.disable_mesh()
        .axis_style(theme.axis_color)
        .x_labels(n)
        .y_labels(n)
        .label_style(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color),
        )
        .x_label_formatter(&x_label_formatter)
        .y_label_formatter(&y_label_formatter);
    mesh.draw()?;

    let cell_font = ("sans-serif", style.font_size + 3)
        .into_font()
        .color(&theme.text_color)
        .pos(Pos::new(HPos::Center, VPos::Center));

    for i in 0..n {
        for j in 0..n {
            let value = matrix.coefficients[i][j];
            let x = j as f64;
            let y = (n - 1 - i) as f64;

            chart_builder.draw_series(std::iter::once(Rectangle::new(
                [(x - 0.48, y - 0.48), (x + 0.48, y + 0.48)],
                theme.correlation_color(value).filled(),
            )))?;
            chart_builder.draw_series(std::iter::once(Text::new(
                format!("{value:.2}"),
                (x, y),
                cell_font.clone(),
            )))?;
        }
    }

    Ok(())
}

/// Value range with a small margin so series never touch the plot border.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values {
        min = min.min(value);
        max = max.max(value);
    }

    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }

    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

/// Compact axis labels with K/M suffixes for large values.
fn format_axis_value(value: &f64) -> String {
    if value.abs() >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_widens_constant_series() {
        let (min, max) = padded_range([5.0, 5.0, 5.0].into_iter());
        assert!(min < 5.0 && max > 5.0);
    }

    #[test]
    fn padded_range_handles_empty_input() {
        let (min, max) = padded_range(std::iter::empty());
        assert_eq!((min, max), (0.0, 1.0));
    }

    #[test]
    fn axis_values_use_compact_suffixes() {
        assert_eq!(format_axis_value(&1_500_000.0), "1.5M");
        assert_eq!(format_axis_value(&2_300.0), "2.3K");
        assert_eq!(format_axis_value(&42.0), "42");
    }

    #[test]
    fn fingerprint_tracks_row_values() {
        use crate::data::generate_dataset;
        use crate::types::GenParams;

        let params = GenParams {
            seed: Some(5),
            ..GenParams::default()
        };
        let records = generate_dataset(&params).unwrap();
        assert_eq!(dataset_fingerprint(&records), dataset_fingerprint(&records));

        let mut altered = records.clone();
        altered[0].sales += 1.0;
        assert_ne!(dataset_fingerprint(&records), dataset_fingerprint(&altered));
    }
}
