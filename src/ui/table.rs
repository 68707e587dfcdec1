use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Raw data view (collapsed by default)
// ---------------------------------------------------------------------------

/// Render the filtered rows, every column in file order.
pub fn raw_table(ui: &mut Ui, state: &AppState) {
    let filtered = &state.filtered;
    let header_text = format!("Raw data table  ({} rows)", filtered.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("raw_table")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let columns = &filtered.schema.columns;
            egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .resizable(true)
                    .max_scroll_height(400.0)
                    .columns(Column::auto().at_least(60.0), columns.len())
                    .header(20.0, |mut header| {
                        for column in columns {
                            header.col(|ui| {
                                ui.strong(column.name.as_str());
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(18.0, filtered.records.len(), |mut row| {
                            let record = &filtered.records[row.index()];
                            for column in columns {
                                row.col(|ui| {
                                    ui.label(record.cell(column.kind));
                                });
                            }
                        });
                    });
            });
        });
}
