use serde::Serialize;

use super::aggregate::{Aggregation, AggregationRow};
use crate::data::filter::FilterSelection;
use crate::data::model::Outcome;

// ---------------------------------------------------------------------------
// Outcome styling
// ---------------------------------------------------------------------------

/// Fixed visual identity of the recognised outcome categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStyle {
    Susceptible,
    Resistant,
    Intermediate,
    /// Any other label. Drawn, but without a reserved colour.
    Unstyled,
}

impl OutcomeStyle {
    pub fn of(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Susceptible => OutcomeStyle::Susceptible,
            Outcome::Resistant => OutcomeStyle::Resistant,
            Outcome::Intermediate => OutcomeStyle::Intermediate,
            Outcome::NotTested | Outcome::Other(_) => OutcomeStyle::Unstyled,
        }
    }

    /// Reserved colour as `#rrggbb`.
    pub fn hex(self) -> Option<&'static str> {
        match self {
            OutcomeStyle::Susceptible => Some("#2ecc71"),
            OutcomeStyle::Resistant => Some("#e74c3c"),
            OutcomeStyle::Intermediate => Some("#f1c40f"),
            OutcomeStyle::Unstyled => None,
        }
    }
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryCard {
    pub total_isolates: usize,
    pub selected_organism: String,
}

/// One bar of the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartCategory {
    pub antibiotic: String,
    pub display_name: String,
    pub tested_total: usize,
}

/// Segments narrower than this (in percent of the bar) carry no text label;
/// the value stays available in the hover detail.
pub const MIN_LABELLED_PERCENT: f64 = 4.0;

/// One stacked segment of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub count: usize,
    pub percentage: f64,
}

impl Segment {
    /// Text drawn on the segment, if it is wide enough to hold one.
    pub fn label(&self) -> Option<String> {
        (self.percentage >= MIN_LABELLED_PERCENT).then(|| format!("{:.1}", self.percentage))
    }

    /// Hover detail: raw count and one-decimal percentage.
    pub fn hover_text(&self, category: &ChartCategory, outcome: &Outcome) -> String {
        let noun = if self.count == 1 { "isolate" } else { "isolates" };
        format!(
            "{}\n{}: {} {noun} ({:.1}%)",
            category.display_name, outcome, self.count, self.percentage
        )
    }
}

/// All segments of one outcome, one slot per category in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub outcome: Outcome,
    pub style: OutcomeStyle,
    pub segments: Vec<Option<Segment>>,
}

/// Everything the rendering layer needs for one selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewModel {
    pub summary: SummaryCard,
    pub has_data: bool,
    /// Aggregator output, unchanged.
    pub rows: Vec<AggregationRow>,
    /// Bars in display order: ascending tested total.
    pub categories: Vec<ChartCategory>,
}

/// Assemble the view for the current selection.
pub fn build_view(aggregation: Aggregation, selection: &FilterSelection) -> ViewModel {
    let categories = chart_categories(&aggregation.rows);
    ViewModel {
        summary: SummaryCard {
            total_isolates: aggregation.total_isolates,
            selected_organism: selection.organism.clone(),
        },
        has_data: !aggregation.rows.is_empty(),
        rows: aggregation.rows,
        categories,
    }
}

/// Antibiotics ordered by ascending tested total; ties keep aggregator order.
fn chart_categories(rows: &[AggregationRow]) -> Vec<ChartCategory> {
    let mut categories: Vec<ChartCategory> = Vec::new();
    for row in rows {
        match categories.iter_mut().find(|c| c.antibiotic == row.antibiotic) {
            Some(c) => c.tested_total += row.count,
            None => categories.push(ChartCategory {
                antibiotic: row.antibiotic.clone(),
                display_name: row.display_name.clone(),
                tested_total: row.count,
            }),
        }
    }
    categories.sort_by_key(|c| c.tested_total);
    categories
}

impl ViewModel {
    /// Stacked series, one per outcome in order of first appearance.
    pub fn series(&self) -> Vec<ChartSeries> {
        let mut series: Vec<ChartSeries> = Vec::new();
        for row in &self.rows {
            let Some(slot) = self
                .categories
                .iter()
                .position(|c| c.antibiotic == row.antibiotic)
            else {
                continue;
            };
            let idx = match series.iter().position(|s| s.outcome == row.outcome) {
                Some(i) => i,
                None => {
                    series.push(ChartSeries {
                        outcome: row.outcome.clone(),
                        style: OutcomeStyle::of(&row.outcome),
                        segments: vec![None; self.categories.len()],
                    });
                    series.len() - 1
                }
            };
            series[idx].segments[slot] = Some(Segment {
                count: row.count,
                percentage: row.percentage,
            });
        }
        series
    }
}
