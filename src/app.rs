use eframe::egui::{self, RichText};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AntibiogramApp {
    pub state: AppState,
}

impl AntibiogramApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for AntibiogramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // A failed startup load replaces the whole window.
        if let Some(err) = &self.state.load_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(format!("Error: {err}"))
                            .color(ui.visuals().error_fg_color)
                            .size(18.0),
                    );
                });
            });
            return;
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: summary, chart, raw table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open an isolate table  (File → Open…)");
                });
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.columns(2, |cols| {
                        plot::summary_card(&mut cols[0], &self.state.view);
                        plot::susceptibility_chart(&mut cols[1], &self.state);
                    });
                    ui.separator();
                    table::raw_table(ui, &self.state);
                });
        });
    }
}
