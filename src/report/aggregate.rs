use serde::Serialize;

use crate::data::model::{Dataset, Outcome};

// ---------------------------------------------------------------------------
// Aggregation rows
// ---------------------------------------------------------------------------

/// Share of one outcome among the tested isolates of one antibiotic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationRow {
    /// Raw column name; the identity of the antibiotic.
    pub antibiotic: String,
    /// Title-cased column name, for display only.
    pub display_name: String,
    pub outcome: Outcome,
    pub count: usize,
    pub percentage: f64,
}

/// Result of [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    pub total_isolates: usize,
    pub rows: Vec<AggregationRow>,
}

/// Per-antibiotic outcome percentages over the given (already filtered) rows.
///
/// For each antibiotic column, in schema order:
/// * not-tested cells are ignored entirely;
/// * an antibiotic with no tested isolates produces no rows;
/// * every other outcome produces one row, most frequent first, with its
///   share of the tested total.
pub fn aggregate(filtered: &Dataset) -> Aggregation {
    if filtered.is_empty() {
        return Aggregation::default();
    }

    let mut rows = Vec::new();
    for (idx, antibiotic) in filtered.schema.antibiotics.iter().enumerate() {
        let counts = tally(filtered.records.iter().filter_map(|r| r.results.get(idx)));
        let tested_total: usize = counts.iter().map(|(_, n)| n).sum();
        if tested_total == 0 {
            continue;
        }

        let display_name = title_case(antibiotic);
        for (outcome, count) in counts {
            rows.push(AggregationRow {
                antibiotic: antibiotic.clone(),
                display_name: display_name.clone(),
                outcome: outcome.clone(),
                count,
                percentage: 100.0 * count as f64 / tested_total as f64,
            });
        }
    }

    log::debug!(
        "aggregated {} isolates into {} rows",
        filtered.len(),
        rows.len()
    );
    Aggregation {
        total_isolates: filtered.len(),
        rows,
    }
}

/// Count tested outcomes, descending by count; ties keep first-seen order.
fn tally<'a>(outcomes: impl Iterator<Item = &'a Outcome>) -> Vec<(&'a Outcome, usize)> {
    let mut counts: Vec<(&Outcome, usize)> = Vec::new();
    for outcome in outcomes.filter(|o| o.is_tested()) {
        match counts.iter_mut().find(|(o, _)| *o == outcome) {
            Some((_, n)) => *n += 1,
            None => counts.push((outcome, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
///
/// `"AMOXICILINA/CLAVULANATO"` → `"Amoxicilina/Clavulanato"`.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;
    for c in name.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
