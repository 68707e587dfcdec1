use std::collections::BTreeSet;
use std::sync::Arc;

use crate::data::filter::{apply_filters, FilterSelection};
use crate::data::model::{Dataset, UNIDENTIFIED_ORGANISM};
use crate::report::{aggregate, build_view, ViewModel};

// ---------------------------------------------------------------------------
// Selectable options
// ---------------------------------------------------------------------------

/// Organism values only offered when nothing else is present, in this order.
const PLACEHOLDER_ORGANISMS: [&str; 2] = [UNIDENTIFIED_ORGANISM, ""];

/// Values offered by the filter widgets, derived from the unfiltered dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionOptions {
    /// Distinct units, sorted.
    pub units: Vec<String>,
    /// Distinct months, in order of first appearance.
    pub months: Vec<String>,
    /// Distinct organisms, sorted, without the unidentified placeholder and
    /// the blank cell unless no named organism is present.
    pub organisms: Vec<String>,
}

impl SelectionOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let units: BTreeSet<&str> = dataset.records.iter().map(|r| r.unit.as_str()).collect();

        let mut months: Vec<String> = Vec::new();
        for rec in &dataset.records {
            if !months.contains(&rec.month) {
                months.push(rec.month.clone());
            }
        }

        let all_organisms: BTreeSet<&str> = dataset
            .records
            .iter()
            .map(|r| r.organism.as_str())
            .collect();
        let mut organisms: Vec<String> = all_organisms
            .iter()
            .filter(|o| !PLACEHOLDER_ORGANISMS.contains(*o))
            .map(|o| o.to_string())
            .collect();
        if organisms.is_empty() {
            organisms = PLACEHOLDER_ORGANISMS
                .iter()
                .filter(|o| all_organisms.contains(*o))
                .map(|o| o.to_string())
                .collect();
        }

        SelectionOptions {
            units: units.into_iter().map(str::to_string).collect(),
            months,
            organisms,
        }
    }

    /// All units, all months, first organism. With no rows at all the
    /// organism is empty and nothing matches.
    pub fn default_selection(&self) -> FilterSelection {
        FilterSelection {
            units: self.units.iter().cloned().collect(),
            months: self.months.iter().cloned().collect(),
            organism: self.organisms.first().cloned().unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Multi-select filter columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterColumn {
    Unit,
    Month,
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Arc<Dataset>>,

    /// Values offered by the filter widgets.
    pub options: SelectionOptions,

    /// Current filter values.
    pub selection: FilterSelection,

    /// Rows passing the current selection (cached).
    pub filtered: Dataset,

    /// View for the current selection (cached).
    pub view: ViewModel,

    /// Fatal load error; when set nothing else is rendered.
    pub load_error: Option<String>,

    /// Non-fatal status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the selection to its defaults.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.options = SelectionOptions::from_dataset(&dataset);
        self.selection = self.options.default_selection();
        self.dataset = Some(dataset);
        self.load_error = None;
        self.status_message = None;
        self.refresh();
    }

    /// Replace the whole selection.
    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.selection = selection;
        self.refresh();
    }

    /// Recompute filtered rows and the view from scratch.
    pub fn refresh(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.filtered = apply_filters(ds, &self.selection);
        self.view = build_view(aggregate(&self.filtered), &self.selection);
        log::debug!(
            "selection {} units / {} months / {:?}: {} isolates, {} chart rows",
            self.selection.units.len(),
            self.selection.months.len(),
            self.selection.organism,
            self.view.summary.total_isolates,
            self.view.rows.len()
        );
    }

    fn selected_mut(&mut self, column: FilterColumn) -> &mut BTreeSet<String> {
        match column {
            FilterColumn::Unit => &mut self.selection.units,
            FilterColumn::Month => &mut self.selection.months,
        }
    }

    fn all_values(&self, column: FilterColumn) -> &[String] {
        match column {
            FilterColumn::Unit => &self.options.units,
            FilterColumn::Month => &self.options.months,
        }
    }

    /// Toggle a single value in a multi-select filter.
    pub fn toggle_filter_value(&mut self, column: FilterColumn, value: &str) {
        let selected = self.selected_mut(column);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refresh();
    }

    /// Select all values in a multi-select filter.
    pub fn select_all(&mut self, column: FilterColumn) {
        let all: BTreeSet<String> = self.all_values(column).iter().cloned().collect();
        *self.selected_mut(column) = all;
        self.refresh();
    }

    /// Deselect all values in a multi-select filter.
    pub fn select_none(&mut self, column: FilterColumn) {
        self.selected_mut(column).clear();
        self.refresh();
    }

    /// Choose the organism.
    pub fn select_organism(&mut self, organism: &str) {
        self.selection.organism = organism.to_string();
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_table;

    fn dataset(rows: &str) -> Arc<Dataset> {
        let text = format!("Unidade;Mês;Microorganismo;Ampicilina\n{rows}");
        Arc::new(parse_table(&text).unwrap())
    }

    #[test]
    fn options_follow_dataset() {
        let ds = dataset(
            "UTI;Mar;Não Identificado;-\n\
             CC;Jan;S. aureus;Sensível\n\
             UTI;Fev;E. coli;Resistente\n\
             CC;Jan;E. coli;Sensível\n",
        );
        let opts = SelectionOptions::from_dataset(&ds);
        assert_eq!(opts.units, vec!["CC", "UTI"]);
        assert_eq!(opts.months, vec!["Mar", "Jan", "Fev"]);
        assert_eq!(opts.organisms, vec!["E. coli", "S. aureus"]);

        let sel = opts.default_selection();
        assert_eq!(sel.organism, "E. coli");
        assert_eq!(sel.units.len(), 2);
        assert_eq!(sel.months.len(), 3);
    }

    #[test]
    fn unidentified_kept_when_it_is_the_only_organism() {
        let ds = dataset("UTI;Jan;Não Identificado;Sensível\n");
        let opts = SelectionOptions::from_dataset(&ds);
        assert_eq!(opts.organisms, vec![UNIDENTIFIED_ORGANISM]);
        assert_eq!(opts.default_selection().organism, UNIDENTIFIED_ORGANISM);

        let mut state = AppState::default();
        state.set_dataset(ds);
        assert_eq!(state.view.summary.total_isolates, 1);
        assert!(state.view.has_data);
    }

    #[test]
    fn blank_organism_is_not_the_default() {
        let ds = dataset(
            "UTI;Jan;;Sensível\n\
             UTI;Jan;E. coli;Resistente\n",
        );
        let opts = SelectionOptions::from_dataset(&ds);
        assert_eq!(opts.organisms, vec!["E. coli"]);

        let mut state = AppState::default();
        state.set_dataset(ds);
        assert_eq!(state.selection.organism, "E. coli");
        assert_eq!(state.view.summary.total_isolates, 1);
        assert_eq!(state.view.rows[0].outcome.label(), "Resistente");
    }

    #[test]
    fn short_row_organism_is_blank_and_hidden() {
        let ds = dataset(
            "UTI;Jan\n\
             CC;Jan;S. aureus;Sensível\n",
        );
        assert_eq!(ds.records[0].organism, "");
        let opts = SelectionOptions::from_dataset(&ds);
        assert_eq!(opts.organisms, vec!["S. aureus"]);
    }

    #[test]
    fn blank_organism_kept_when_nothing_else_is_named() {
        let ds = dataset("UTI;Jan;;Sensível\n");
        let opts = SelectionOptions::from_dataset(&ds);
        assert_eq!(opts.organisms, vec![""]);

        let both = dataset(
            "UTI;Jan;;Sensível\n\
             UTI;Jan;Não Identificado;Resistente\n",
        );
        let opts = SelectionOptions::from_dataset(&both);
        assert_eq!(opts.organisms, vec![UNIDENTIFIED_ORGANISM, ""]);
        assert_eq!(opts.default_selection().organism, UNIDENTIFIED_ORGANISM);
    }

    #[test]
    fn empty_dataset_selects_nothing() {
        let ds = dataset("");
        let mut state = AppState::default();
        state.set_dataset(ds);
        assert!(state.options.organisms.is_empty());
        assert_eq!(state.selection.organism, "");
        assert_eq!(state.view.summary.total_isolates, 0);
        assert!(!state.view.has_data);
    }

    #[test]
    fn every_change_recomputes_the_view() {
        let ds = dataset(
            "UTI;Jan;E. coli;Resistente\n\
             CC;Jan;E. coli;Sensível\n\
             CC;Fev;K. pneumoniae;Sensível\n",
        );
        let mut state = AppState::default();
        state.set_dataset(ds);
        assert_eq!(state.view.summary.total_isolates, 2);

        state.toggle_filter_value(FilterColumn::Unit, "UTI");
        assert_eq!(state.view.summary.total_isolates, 1);
        assert_eq!(state.view.rows[0].percentage, 100.0);

        state.select_none(FilterColumn::Month);
        assert_eq!(state.view.summary.total_isolates, 0);
        assert!(!state.view.has_data);

        state.select_all(FilterColumn::Month);
        state.toggle_filter_value(FilterColumn::Unit, "UTI");
        state.select_organism("K. pneumoniae");
        assert_eq!(state.view.summary.total_isolates, 1);
        assert_eq!(state.view.summary.selected_organism, "K. pneumoniae");
        assert_eq!(state.filtered.records[0].unit, "CC");
    }
}
