use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use std::sync::OnceLock;

use plotters::coord::combinators::WithKeyPoints;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;

use super::metrics::{ClassificationReport, ConfusionMatrix, LabelMetrics};
use crate::errors::{AppError, Result};
use crate::models::shorten_label;

type ChartResult = std::result::Result<(), Box<dyn Error>>;

const FONT_FAMILY: &str = "sans-serif";

static FONT_REGISTRATION: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// Registers the chart font once per process.
pub fn register_chart_font(path: &Path) -> Result<()> {
    FONT_REGISTRATION
        .get_or_init(|| {
            let bytes = std::fs::read(path)
                .map_err(|e| format!("cannot read chart font {}: {e}", path.display()))?;
            // plotters keeps registered fonts for the whole process.
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes)
                .map_err(|_| format!("invalid chart font {}", path.display()))
        })
        .clone()
        .map_err(AppError::Chart)
}

/// Axis over `0..n` with one band per category and a tick at each band
/// center. Band `i` spans `i..i + 1`.
fn category_axis(n: usize) -> WithKeyPoints<RangedCoordf64> {
    (0.0..n as f64).with_key_points((0..n).map(|i| i as f64 + 0.5).collect())
}

/// Label of the band containing `value`. `reversed` flips the order so the
/// first label sits at the top of a vertical axis.
fn category_label(value: &f64, labels: &[&str], reversed: bool) -> String {
    if *value < 0.0 {
        return String::new();
    }
    let idx = value.floor() as usize;
    if idx >= labels.len() {
        return String::new();
    }
    let idx = if reversed { labels.len() - 1 - idx } else { idx };
    labels[idx].to_string()
}

/// Sequential "Blues" scale, `t` in `0.0..=1.0`.
fn blues(t: f64) -> RGBColor {
    let lerp = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * t).round() as u8;
    RGBColor(lerp(247, 8), lerp(251, 48), lerp(255, 107))
}

pub fn plot_confusion_matrix(cm: &ConfusionMatrix, path: &Path) -> ChartResult {
    let n = cm.labels.len();
    let labels: Vec<&str> = cm.labels.iter().map(|l| shorten_label(l)).collect();
    let max = cm.counts.iter().flatten().copied().max().unwrap_or(0).max(1) as f64;

    let root = BitMapBackend::new(path, (1400, 1200)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Confusion Matrix - Klassifikation der Anfragen", (FONT_FAMILY, 28))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(220)
        .build_cartesian_2d(category_axis(n), category_axis(n))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_label_formatter(&|v| category_label(v, &labels, false))
        .y_label_formatter(&|v| category_label(v, &labels, true))
        .x_desc("Vorhergesagt")
        .y_desc("Tatsächlich")
        .label_style((FONT_FAMILY, 14))
        .axis_desc_style((FONT_FAMILY, 18))
        .draw()?;

    let cells: Vec<(f64, f64, usize)> = cm
        .counts
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(move |(j, &count)| (j as f64, (n - 1 - i) as f64, count))
        })
        .collect();

    chart.draw_series(cells.iter().map(|&(x, y, count)| {
        Rectangle::new(
            [(x, y), (x + 1.0, y + 1.0)],
            blues(count as f64 / max).filled(),
        )
    }))?;

    chart.draw_series(cells.iter().map(|&(x, y, count)| {
        let color = if count as f64 / max > 0.5 { WHITE } else { BLACK };
        let style = (FONT_FAMILY, 20)
            .into_font()
            .color(&color)
            .pos(Pos::new(HPos::Center, VPos::Center));
        Text::new(count.to_string(), (x + 0.5, y + 0.5), style)
    }))?;

    root.present()?;
    Ok(())
}

/// Label counts, most frequent first.
fn value_counts(labels: &[String]) -> Vec<(&str, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label.as_str()).or_default() += 1;
    }
    let mut counts: Vec<(&str, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    counts
}

fn draw_counts(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    counts: &[(&str, usize)],
    color: RGBColor,
) -> ChartResult {
    let n = counts.len();
    let max = counts.iter().map(|(_, c)| *c as u32).max().unwrap_or(0);
    let labels: Vec<&str> = counts.iter().map(|(l, _)| shorten_label(l)).collect();

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT_FAMILY, 22))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(200)
        .build_cartesian_2d(0u32..max + 1, category_axis(n))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_label_formatter(&|v| category_label(v, &labels, true))
        .x_desc("Anzahl")
        .label_style((FONT_FAMILY, 14))
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, (_, count))| {
        let y = (n - 1 - i) as f64;
        let mut bar = Rectangle::new(
            [(0u32, y), (*count as u32, y + 1.0)],
            color.filled(),
        );
        bar.set_margin(4, 4, 0, 0);
        bar
    }))?;

    Ok(())
}

pub fn plot_class_distribution(y_true: &[String], y_pred: &[String], path: &Path) -> ChartResult {
    let root = BitMapBackend::new(path, (1600, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let (left, right) = root.split_horizontally(800);

    draw_counts(
        &left,
        "Tatsächliche Verteilung",
        &value_counts(y_true),
        RGBColor(70, 130, 180),
    )?;
    draw_counts(
        &right,
        "Vorhergesagte Verteilung",
        &value_counts(y_pred),
        RGBColor(255, 127, 80),
    )?;

    root.present()?;
    Ok(())
}

pub fn plot_metrics_per_class(report: &ClassificationReport, path: &Path) -> ChartResult {
    let n = report.per_label.len();
    let labels: Vec<&str> = report
        .per_label
        .iter()
        .map(|m| shorten_label(&m.label))
        .collect();

    let root = BitMapBackend::new(path, (1600, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Metriken pro Klasse", (FONT_FAMILY, 24))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(category_axis(n), 0.0..1.1f64)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|v| category_label(v, &labels, false))
        .y_desc("Score")
        .label_style((FONT_FAMILY, 13))
        .draw()?;

    // Pixel width of each class band, for placing three bars side by side.
    let widths: Vec<u32> = (0..n)
        .map(|i| {
            let left = chart.backend_coord(&(i as f64, 0.0)).0;
            let right = chart.backend_coord(&(i as f64 + 1.0, 0.0)).0;
            (right - left).max(0) as u32
        })
        .collect();

    let series: [(&str, RGBColor, fn(&LabelMetrics) -> f64); 3] = [
        ("Precision", RGBColor(46, 204, 113), |m| m.precision),
        ("Recall", RGBColor(52, 152, 219), |m| m.recall),
        ("F1-Score", RGBColor(155, 89, 182), |m| m.f1),
    ];

    for (k, (name, color, value)) in series.into_iter().enumerate() {
        let k = k as u32;
        chart
            .draw_series(report.per_label.iter().enumerate().map(|(i, m)| {
                let segment = widths[i];
                let bar_width = segment / 4;
                let padding = (segment - 3 * bar_width) / 2;
                let left = padding + k * bar_width;
                let right = segment.saturating_sub(left + bar_width);

                let x = i as f64;
                let mut bar = Rectangle::new(
                    [(x, 0.0), (x + 1.0, value(m))],
                    color.filled(),
                );
                bar.set_margin(0, 0, left, right);
                bar
            }))?
            .label(name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    let threshold = RGBColor(128, 128, 128);
    chart
        .draw_series(DashedLineSeries::new(
            vec![(0.0, 0.8), (n as f64, 0.8)],
            10,
            6,
            threshold.stroke_width(2),
        ))?
        .label("80% Threshold")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], threshold.stroke_width(2)));

    chart
        .configure_series_labels()
        .label_font((FONT_FAMILY, 14))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
