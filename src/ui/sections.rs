use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::state::AppState;
use crate::stats::summary::{STAT_NAMES, SummaryTable};
use crate::ui::plot;
use crate::view::{DashboardView, StudentSection};

// ---------------------------------------------------------------------------
// Central panel – the dashboard page
// ---------------------------------------------------------------------------

/// Render the whole page in fixed order. A load failure replaces it.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    if let Some(err) = &state.load_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(err).color(Color32::RED).heading());
        });
        return;
    }

    // Cloned so the student picker can update the state while drawing.
    let Some(view) = state.view.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Loading…");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new(&view.title).size(28.0));
            ui.add_space(8.0);

            ui.heading("Summary Statistics");
            summary_table(ui, &view.summary);
            ui.add_space(12.0);

            ui.heading("Distributions");
            distributions(ui, &view);
            ui.add_space(12.0);

            ui.heading("Correlation Heatmap");
            plot::correlation_heatmap(ui, &view.correlation);
            ui.add_space(12.0);

            ui.heading("Assignment Score Comparison");
            if let Some(chart) = &view.boxplot {
                plot::boxplot_chart(ui, chart);
            }
            ui.add_space(12.0);

            ui.heading("Per Student Grade and Attendance Distribution");
            if let Some(student) = &view.student {
                student_section(ui, state, student);
            }
            ui.add_space(12.0);

            success_banner(ui, view.success);
        });
}

fn summary_table(ui: &mut Ui, summary: &SummaryTable) {
    if summary.is_empty() {
        ui.weak("No numeric columns in the current selection.");
    }
    ui.push_id("summary_table", |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .column(TableColumn::auto().at_least(50.0))
                .columns(TableColumn::auto().at_least(90.0), summary.columns.len())
                .header(22.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("");
                    });
                    for col in &summary.columns {
                        header.col(|ui| {
                            ui.strong(&col.name);
                        });
                    }
                })
                .body(|mut body| {
                    for (stat_idx, stat_name) in STAT_NAMES.iter().enumerate() {
                        body.row(20.0, |mut row| {
                            row.col(|ui| {
                                ui.strong(*stat_name);
                            });
                            for col in &summary.columns {
                                row.col(|ui| {
                                    ui.monospace(SummaryTable::format_cell(col.stats[stat_idx]));
                                });
                            }
                        });
                    }
                });
        });
    });
}

/// Two histograms side by side; an absent column leaves its half empty.
fn distributions(ui: &mut Ui, view: &DashboardView) {
    ui.columns(2, |cols| {
        for (col_ui, chart) in cols.iter_mut().zip(&view.distributions) {
            if let Some(chart) = chart {
                plot::distribution_plot(col_ui, chart);
            }
        }
    });
}

fn student_section(ui: &mut Ui, state: &mut AppState, student: &StudentSection) {
    let selected_text = student
        .selected
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();

    egui::ComboBox::from_label("Select Student ID")
        .selected_text(selected_text)
        .height(300.0)
        .show_ui(ui, |ui: &mut Ui| {
            for id in &student.ids {
                let is_selected = student.selected.as_ref() == Some(id);
                if ui.selectable_label(is_selected, id.to_string()).clicked() {
                    state.select_student(id.clone());
                }
            }
        });

    if let Some(chart) = &student.chart {
        plot::student_bars(ui, chart);
    }
}

fn success_banner(ui: &mut Ui, message: &str) {
    egui::Frame::group(ui.style())
        .fill(Color32::from_rgb(33, 195, 84).gamma_multiply(0.2))
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new(message).color(Color32::from_rgb(23, 114, 51)));
        });
}
