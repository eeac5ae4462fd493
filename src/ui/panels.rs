use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the loop.
    let Some(filter) = state.selections.status.clone() else {
        ui.label(RichText::new("No completion_status column.").weak());
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let header_text = format!(
                "Completion Status  ({}/{})",
                filter.selected.len(),
                filter.options.len()
            );

            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("completion_status")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    // Select all / none buttons
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_status();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_status();
                        }
                    });

                    for value in &filter.options {
                        let mut checked = filter.is_selected(value);
                        if ui.checkbox(&mut checked, value.to_string()).changed() {
                            state.toggle_status(value);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload data").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(RichText::new(state.cache.path().display().to_string()).monospace());
        if !state.cache.is_loaded() && state.load_error.is_none() {
            ui.spinner();
        }

        if let Some(view) = &state.view {
            ui.separator();
            ui.label(format!(
                "{} students loaded, {} selected",
                view.total_rows, view.working_rows
            ));
        }

        if let Some(msg) = &state.load_error {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open student records")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        log::info!("opening {}", path.display());
        state.open_path(path);
    }
}
