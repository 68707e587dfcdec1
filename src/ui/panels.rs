use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, FilterColumn};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the loop.
    let options = state.options.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            multi_select(ui, state, FilterColumn::Unit, "Unit", &options.units);
            multi_select(ui, state, FilterColumn::Month, "Month", &options.months);
            ui.separator();

            // ---- Organism (single, required) ----
            ui.strong("Organism (required)");
            let current = state.selection.organism.clone();
            egui::ComboBox::from_id_salt("organism")
                .selected_text(current.as_str())
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for organism in &options.organisms {
                        if ui.selectable_label(current == *organism, organism.as_str()).clicked()
                            && current != *organism
                        {
                            state.select_organism(organism);
                        }
                    }
                });
        });
}

/// Collapsible checkbox list with All / None buttons.
fn multi_select(
    ui: &mut Ui,
    state: &mut AppState,
    column: FilterColumn,
    title: &str,
    all_values: &[String],
) {
    let selected = match column {
        FilterColumn::Unit => &state.selection.units,
        FilterColumn::Month => &state.selection.months,
    };
    let header_text = format!("{title}  ({}/{})", selected.len(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(column);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(column);
                }
            });

            for value in all_values {
                let mut checked = match column {
                    FilterColumn::Unit => state.selection.units.contains(value),
                    FilterColumn::Month => state.selection.months.contains(value),
                };
                if ui.checkbox(&mut checked, value.as_str()).changed() {
                    state.toggle_filter_value(column, value);
                }
            }
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
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} isolates loaded, {} antibiotics",
                ds.len(),
                ds.schema.antibiotics.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Pick another table and load it directly, bypassing the startup cache.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open isolate table")
        .add_filter("Semicolon tables", &["csv", "txt"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load(&path) {
            Ok(dataset) => state.set_dataset(Arc::new(dataset)),
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {}", error_chain(&e)));
            }
        }
    }
}

/// `error: cause: cause` on one line.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
