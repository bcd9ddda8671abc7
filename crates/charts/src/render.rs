//! Bar/line PNG rendering with plotters.

use chrono::{NaiveDate, NaiveDateTime};
use plotters::prelude::*;
use serde_json::Value;
use shopscope_core::error::ChartError;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bar" => Ok(Self::Bar),
            "line" => Ok(Self::Line),
            _ => Err(ChartError::UnsupportedKind),
        }
    }
}

/// Everything needed to draw one chart, minus the rows.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub x_column: String,
    pub y_column: String,
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub filename: Option<String>,
}

/// Renders charts into its output directory.
#[derive(Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render the rows and return the artifact path.
    pub fn render(&self, rows: &[Value], spec: &ChartSpec) -> Result<PathBuf, ChartError> {
        if rows.is_empty() {
            return Err(ChartError::EmptyData);
        }

        let mut points = extract_points(rows, &spec.x_column, &spec.y_column)?;
        sort_if_temporal(&mut points);

        let filename = spec.filename.clone().unwrap_or_else(|| {
            format!("chart_{}.png", chrono::Local::now().format("%Y%m%d_%H%M%S"))
        });
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| ChartError::Render(e.to_string()))?;
        let path = self.output_dir.join(filename);

        let x_desc = spec
            .x_label
            .clone()
            .unwrap_or_else(|| prettify(&spec.x_column));
        let y_desc = spec
            .y_label
            .clone()
            .unwrap_or_else(|| prettify(&spec.y_column));

        draw(&path, &points, spec.kind, &spec.title, &x_desc, &y_desc)?;

        info!(path = %path.display(), "Chart saved");
        Ok(path)
    }
}

/// Extract (label, value) pairs, validating both columns exist somewhere in
/// the row set and every present y value is numeric.
fn extract_points(
    rows: &[Value],
    x_column: &str,
    y_column: &str,
) -> Result<Vec<(String, f64)>, ChartError> {
    let has_x = rows.iter().any(|r| r.get(x_column).is_some());
    let has_y = rows.iter().any(|r| r.get(y_column).is_some());
    if !has_x || !has_y {
        return Err(ChartError::MissingColumns {
            x: x_column.to_string(),
            y: y_column.to_string(),
        });
    }

    rows.iter()
        .map(|row| {
            let label = match row.get(x_column) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            let y = match row.get(y_column) {
                Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
                Some(Value::String(s)) => {
                    s.parse::<f64>().map_err(|_| ChartError::NonNumeric {
                        column: y_column.to_string(),
                        value: s.clone(),
                    })?
                }
                other => {
                    return Err(ChartError::NonNumeric {
                        column: y_column.to_string(),
                        value: other.map(|v| v.to_string()).unwrap_or_else(|| "null".into()),
                    });
                }
            };
            Ok((label, y))
        })
        .collect()
}

/// Sort by the x value when every label parses as a date or timestamp, so
/// line charts over time read left to right.
fn sort_if_temporal(points: &mut [(String, f64)]) {
    fn parse(label: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(label, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(label, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }

    if points.iter().all(|(label, _)| parse(label).is_some()) {
        points.sort_by_key(|(label, _)| parse(label).expect("checked above"));
    }
}

/// `total_sales_amount` → `Total Sales Amount`.
fn prettify(column: &str) -> String {
    column
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn draw(
    path: &Path,
    points: &[(String, f64)],
    kind: ChartKind,
    title: &str,
    x_desc: &str,
    y_desc: &str,
) -> Result<(), ChartError> {
    let render_err = |e: &dyn std::fmt::Display| ChartError::Render(e.to_string());

    let labels: Vec<&str> = points.iter().map(|(label, _)| label.as_str()).collect();
    let values: Vec<f64> = points.iter().map(|(_, y)| *y).collect();

    let y_low = values.iter().copied().fold(0.0_f64, f64::min);
    let mut y_high = values.iter().copied().fold(f64::MIN, f64::max).max(0.0);
    if (y_high - y_low).abs() < f64::EPSILON {
        y_high = y_low + 1.0;
    }
    let y_pad = (y_high - y_low) * 0.05;
    let n = points.len();

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_err(&e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), y_low..(y_high + y_pad))
        .map_err(|e| render_err(&e))?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(n.min(12))
        .x_label_formatter(&|v: &f64| {
            let idx = v.round();
            if (v - idx).abs() > 0.01 || idx < 0.0 {
                return String::new();
            }
            labels
                .get(idx as usize)
                .map(|s| s.to_string())
                .unwrap_or_default()
        })
        .draw()
        .map_err(|e| render_err(&e))?;

    match kind {
        ChartKind::Bar => {
            chart
                .draw_series(values.iter().enumerate().map(|(i, y)| {
                    Rectangle::new(
                        [(i as f64 - 0.35, 0.0), (i as f64 + 0.35, *y)],
                        BLUE.mix(0.6).filled(),
                    )
                }))
                .map_err(|e| render_err(&e))?;
        }
        ChartKind::Line => {
            chart
                .draw_series(LineSeries::new(
                    values.iter().enumerate().map(|(i, y)| (i as f64, *y)),
                    &BLUE,
                ))
                .map_err(|e| render_err(&e))?;
            chart
                .draw_series(
                    values
                        .iter()
                        .enumerate()
                        .map(|(i, y)| Circle::new((i as f64, *y), 3, BLUE.filled())),
                )
                .map_err(|e| render_err(&e))?;
        }
    }

    root.present().map_err(|e| render_err(&e))?;
    Ok(())
}
