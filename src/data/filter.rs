use std::collections::BTreeSet;

use super::model::{Dataset, IsolateRecord};

// ---------------------------------------------------------------------------
// Filter predicate: selected units, months and the single organism
// ---------------------------------------------------------------------------

/// Current filter values. Unit and month sets may be empty, in which case
/// nothing matches. The organism is always a single value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub units: BTreeSet<String>,
    pub months: BTreeSet<String>,
    pub organism: String,
}

impl FilterSelection {
    /// A row passes when its unit and month are selected and its organism is
    /// exactly the selected one. Values are compared verbatim.
    pub fn matches(&self, record: &IsolateRecord) -> bool {
        self.units.contains(&record.unit)
            && self.months.contains(&record.month)
            && record.organism == self.organism
    }
}

/// Return indices of records that pass the selection, in dataset order.
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Filtered view with the same schema. An empty result is not an error.
pub fn apply_filters(dataset: &Dataset, selection: &FilterSelection) -> Dataset {
    dataset.select_rows(&filtered_indices(dataset, selection))
}
