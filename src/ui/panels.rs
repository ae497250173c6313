use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered, optional) ----
    if let Some(logo) = &state.logo {
        let uri = format!("file://{}", logo.display());
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::new(uri)
                    .max_width(100.0)
                    .max_height(100.0)
                    .corner_radius(4.0),
            );
        });
        ui.add_space(4.0);
    }

    ui.heading("Hotel Dashboard Filters");
    ui.separator();

    if state.years.is_empty() {
        ui.label("The dataset has no bookings.");
        return;
    }

    // Clone what we need so we can mutate state inside the widgets.
    let years = state.years.clone();
    let months = state.months.clone();

    ui.strong("Select Year");
    let current_year = state.selected_year;
    egui::ComboBox::from_id_salt("select_year")
        .selected_text(current_year.map(|y| y.to_string()).unwrap_or_default())
        .show_ui(ui, |ui: &mut Ui| {
            for year in &years {
                if ui
                    .selectable_label(current_year == Some(*year), year.to_string())
                    .clicked()
                {
                    state.set_year(*year);
                }
            }
        });

    ui.add_space(6.0);
    ui.strong("Select Month");
    let current_month = state.selected_month.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("select_month")
        .selected_text(current_month.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for month in &months {
                if ui
                    .selectable_label(current_month == *month, month.as_str())
                    .clicked()
                {
                    state.set_month(month);
                }
            }
        });

    ui.separator();
    correlation_settings(ui, state);
}

/// Multi-select of the numeric columns feeding the heatmap.
fn correlation_settings(ui: &mut Ui, state: &mut AppState) {
    let columns = state.numeric_columns.clone();
    let n_selected = state.correlation_columns.len();
    let header_text = format!("Correlation Heatmap Settings  ({n_selected}/{})", columns.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("correlation_settings")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_correlation();
                }
                if ui.small_button("None").clicked() {
                    state.select_none_correlation();
                }
            });

            ScrollArea::vertical()
                .auto_shrink([false, true])
                .show(ui, |ui: &mut Ui| {
                    for col in &columns {
                        let mut checked = state.correlation_columns.contains(col);
                        if ui.checkbox(&mut checked, col.as_str()).changed() {
                            state.toggle_correlation_column(col);
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
            if ui.button("Download CSV…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let source = state
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        ui.label(format!(
            "{source}: {} bookings loaded, {} in view",
            state.dataset.len(),
            state.report.indices.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download filtered data")
        .set_file_name(&state.export_name)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
