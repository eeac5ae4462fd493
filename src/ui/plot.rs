use std::f32::consts::FRAC_PI_4;

use eframe::egui::epaint::TextShape;
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Line, Plot, PlotPoint, PlotPoints, PlotTransform,
    Points,
};

use crate::color;
use crate::stats::correlation::CorrelationMatrix;
use crate::view::{BoxplotChart, DistributionChart, StudentChart};

/// Room under a category chart for its rotated labels.
const LABEL_STRIP: f32 = 90.0;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Labels slant 45° upwards and end at their anchor.
const LABEL_ANGLE: f32 = -FRAC_PI_4;

/// Top-left corner of a rotated label so that its text ends at `end`.
fn rotated_label_origin(end: Pos2, text_width: f32) -> Pos2 {
    let (sin, cos) = LABEL_ANGLE.sin_cos();
    end - text_width * Vec2::new(cos, sin)
}

fn rotated_label(painter: &egui::Painter, end: Pos2, label: &str, color: Color32) {
    let galley = painter.layout_no_wrap(label.to_string(), FontId::proportional(12.0), color);
    let origin = rotated_label_origin(end, galley.size().x);
    painter.add(TextShape::new(origin, galley, color).with_angle(LABEL_ANGLE));
}

/// Category names under a plot, each ending under x = 0, 1, 2, ...
fn rotated_labels(ui: &mut Ui, transform: &PlotTransform, labels: &[String]) {
    let width = ui.available_width();
    let (strip, _) = ui.allocate_exact_size(Vec2::new(width, LABEL_STRIP), Sense::hover());
    let painter = ui.painter_at(strip);
    let text_color = ui.visuals().text_color();

    for (i, label) in labels.iter().enumerate() {
        let x = transform.position_from_point(&PlotPoint::new(i as f64, 0.0)).x;
        rotated_label(&painter, Pos2::new(x, strip.top() + 4.0), label, text_color);
    }
}

// ---------------------------------------------------------------------------
// Histogram with density overlay
// ---------------------------------------------------------------------------

pub fn distribution_plot(ui: &mut Ui, chart: &DistributionChart) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(egui::RichText::new(&chart.title).strong());
        ui.weak(format!("n = {}", chart.histogram.total()));
    });

    let bars: Vec<Bar> = chart
        .histogram
        .bins
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .fill(chart.color)
                .stroke(Stroke::new(1.0, Color32::from_gray(60)))
        })
        .collect();

    Plot::new(format!("hist_{}", chart.column))
        .height(280.0)
        .x_axis_label(chart.column.clone())
        .y_axis_label("Count")
        .include_y(0.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(chart.color).name("count"));
            if let Some(kde) = &chart.kde {
                plot_ui.line(
                    Line::new(PlotPoints::new(kde.clone()))
                        .color(chart.color.gamma_multiply(0.8))
                        .width(2.0)
                        .name("density"),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Annotated heatmap, diverging colours centred at zero.
pub fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    ui.label(egui::RichText::new("Correlation Between Numeric Metrics").strong());

    let n = matrix.size();
    let text_color = ui.visuals().text_color();
    let row_label_width = 160.0;
    let colorbar_width = 60.0;
    let cell = if n == 0 {
        0.0
    } else {
        ((ui.available_width() - row_label_width - colorbar_width) / n as f32).clamp(18.0, 56.0)
    };
    let grid = cell * n as f32;
    let size = Vec2::new(
        row_label_width + grid + colorbar_width,
        grid + LABEL_STRIP + 20.0,
    );
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);

    let origin = rect.min + Vec2::new(row_label_width, 0.0);
    let limit = matrix.max_abs();
    let font = FontId::proportional((cell * 0.3).clamp(8.0, 13.0));

    for row in 0..n {
        for col in 0..n {
            let min = origin + Vec2::new(col as f32 * cell, row as f32 * cell);
            let cell_rect = Rect::from_min_size(min, Vec2::splat(cell));
            let (fill, text) = match matrix.get(row, col) {
                Some(r) => (color::coolwarm(r, limit), format!("{r:.2}")),
                None => (color::MISSING, "nan".to_string()),
            };
            painter.rect_filled(cell_rect, 0.0, fill);
            painter.text(
                cell_rect.center(),
                Align2::CENTER_CENTER,
                text,
                font.clone(),
                color::contrast_text(fill),
            );
        }
    }

    for (i, label) in matrix.labels.iter().enumerate() {
        painter.text(
            Pos2::new(origin.x - 6.0, origin.y + (i as f32 + 0.5) * cell),
            Align2::RIGHT_CENTER,
            label,
            FontId::proportional(12.0),
            text_color,
        );
        let end = Pos2::new(origin.x + (i as f32 + 0.5) * cell, origin.y + grid + 4.0);
        rotated_label(&painter, end, label, text_color);
    }

    // Colour bar, top = +limit, bottom = -limit.
    if n > 0 {
        let bar_left = origin.x + grid + 12.0;
        let steps = 32;
        let step_h = grid / steps as f32;
        let span = if limit > 0.0 { limit } else { 1.0 };
        for s in 0..steps {
            let t = 1.0 - (s as f64 + 0.5) / steps as f64;
            let value = -span + 2.0 * span * t;
            let r = Rect::from_min_size(
                Pos2::new(bar_left, origin.y + s as f32 * step_h),
                Vec2::new(14.0, step_h + 0.5),
            );
            painter.rect_filled(r, 0.0, color::coolwarm(value, span));
        }
        for (y, value) in [(origin.y, span), (origin.y + grid, -span)] {
            painter.text(
                Pos2::new(bar_left + 18.0, y),
                Align2::LEFT_CENTER,
                format!("{value:.2}"),
                FontId::proportional(11.0),
                text_color,
            );
        }
    }

    if let Some(pos) = response.hover_pos() {
        let local = pos - origin;
        if cell > 0.0 && local.x >= 0.0 && local.y >= 0.0 {
            let (col, row) = ((local.x / cell) as usize, (local.y / cell) as usize);
            if row < n && col < n {
                let value = matrix
                    .get(row, col)
                    .map_or_else(|| "nan".to_string(), |r| format!("{r:.4}"));
                response.on_hover_text_at_pointer(format!(
                    "{} × {}: {value}",
                    matrix.labels[row], matrix.labels[col]
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Boxplots
// ---------------------------------------------------------------------------

pub fn boxplot_chart(ui: &mut Ui, chart: &BoxplotChart) {
    ui.label(egui::RichText::new(&chart.title).strong());

    let labels: Vec<String> = chart.boxes.iter().map(|(name, _)| name.clone()).collect();
    let palette = color::viridis_palette(chart.boxes.len());

    let mut elems = Vec::new();
    let mut outliers = Vec::new();
    for (i, ((name, stats), fill)) in chart.boxes.iter().zip(palette).enumerate() {
        let Some(b) = stats else {
            continue;
        };
        let x = i as f64;
        elems.push(
            BoxElem::new(
                x,
                BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
            )
            .name(name)
            .box_width(0.6)
            .fill(fill.gamma_multiply(0.6))
            .stroke(Stroke::new(1.5, Color32::from_gray(50))),
        );
        outliers.extend(b.outliers.iter().map(|&v| [x, v]));
    }

    let response = Plot::new("boxplot_first_scores")
        .height(320.0)
        .show_axes([false, true])
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(elems));
            if !outliers.is_empty() {
                plot_ui.points(
                    Points::new(PlotPoints::new(outliers))
                        .radius(2.5)
                        .color(Color32::from_gray(90))
                        .name("outliers"),
                );
            }
        });
    rotated_labels(ui, &response.transform, &labels);
}

// ---------------------------------------------------------------------------
// Per-student bars
// ---------------------------------------------------------------------------

pub fn student_bars(ui: &mut Ui, chart: &StudentChart) {
    ui.label(egui::RichText::new(&chart.title).strong());

    let labels: Vec<String> = chart.bars.iter().map(|b| b.metric.clone()).collect();
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .enumerate()
        .filter_map(|(i, bar)| {
            let value = bar.value?;
            Some(
                Bar::new(i as f64, value)
                    .width(0.8)
                    .fill(bar.color)
                    .name(&bar.metric),
            )
        })
        .collect();

    let response = Plot::new("student_bars")
        .height(260.0)
        .y_axis_label("Value")
        .include_y(0.0)
        .show_axes([false, true])
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
    rotated_labels(ui, &response.transform, &labels);
}
