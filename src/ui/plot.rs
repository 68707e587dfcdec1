use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, Text};

use crate::color::{label_color, series_colors};
use crate::report::view::ViewModel;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Summary card
// ---------------------------------------------------------------------------

/// Isolate count, organism label and the empty-result notice.
pub fn summary_card(ui: &mut Ui, view: &ViewModel) {
    ui.label("Total isolates (N)");
    ui.heading(RichText::new(view.summary.total_isolates.to_string()).size(32.0));
    ui.add_space(8.0);
    ui.label(RichText::new(format!("Organism: {}", view.summary.selected_organism)).strong());
    if !view.has_data {
        ui.add_space(8.0);
        ui.colored_label(
            ui.visuals().warn_fg_color,
            "No susceptibility tests for the selected filters.",
        );
    }
}

// ---------------------------------------------------------------------------
// Stacked percentage chart (central panel)
// ---------------------------------------------------------------------------

/// Horizontal stacked bars: one bar per antibiotic, one segment per outcome.
pub fn susceptibility_chart(ui: &mut Ui, state: &AppState) {
    let view = &state.view;
    if !view.has_data {
        return;
    }

    ui.heading("Susceptibility profile (%)");

    let series = view.series();
    let colors = series_colors(&series);
    let names: Vec<String> = view
        .categories
        .iter()
        .map(|c| c.display_name.clone())
        .collect();

    let mut charts: Vec<BarChart> = Vec::with_capacity(series.len());
    let mut labels: Vec<Text> = Vec::new();
    // Running right edge of every bar, for stacking.
    let mut offsets = vec![0.0; view.categories.len()];

    for (s, &color) in series.iter().zip(colors.iter()) {
        let mut bars: Vec<Bar> = Vec::with_capacity(s.segments.len());
        for (slot, segment) in s.segments.iter().enumerate() {
            let Some(seg) = segment else {
                continue;
            };
            if let Some(text) = seg.label() {
                let center = PlotPoint::new(offsets[slot] + seg.percentage / 2.0, slot as f64);
                labels.push(Text::new(
                    center,
                    RichText::new(text).color(label_color(color)),
                ));
            }
            bars.push(
                Bar::new(slot as f64, seg.percentage)
                    .base_offset(offsets[slot])
                    .name(seg.hover_text(&view.categories[slot], &s.outcome))
                    .fill(color),
            );
            offsets[slot] += seg.percentage;
        }

        charts.push(
            BarChart::new(bars)
                .name(s.outcome.label())
                .color(color)
                .horizontal()
                .width(0.7)
                .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| bar.name.clone())),
        );
    }

    let height = (view.categories.len() as f32 * 28.0).clamp(240.0, 600.0);
    Plot::new("susceptibility_chart")
        .legend(Legend::default())
        .height(height)
        .x_axis_label("% of tested isolates")
        .include_x(0.0)
        .include_x(100.0)
        .include_y(-0.5)
        .include_y(view.categories.len() as f64 - 0.5)
        .y_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            names.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
            for label in labels {
                plot_ui.text(label);
            }
        });
}
