use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Identification columns
// ---------------------------------------------------------------------------

pub const CASE_ID_COLUMN: &str = "Código da O.S.";
pub const UNIT_COLUMN: &str = "Unidade";
pub const MONTH_COLUMN: &str = "Mês";
pub const ORGANISM_COLUMN: &str = "Microorganismo";

/// Organism label hidden from the organism selector.
pub const UNIDENTIFIED_ORGANISM: &str = "Não Identificado";

// ---------------------------------------------------------------------------
// Outcome – a single cell in an antibiotic column
// ---------------------------------------------------------------------------

/// Susceptibility test result for one isolate against one antibiotic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    Susceptible,
    Intermediate,
    Resistant,
    /// `-` or an empty cell.
    NotTested,
    /// Any other free-text result, tallied under its own label.
    Other(String),
}

impl Outcome {
    pub const SUSCEPTIBLE_LABEL: &'static str = "Sensível";
    pub const INTERMEDIATE_LABEL: &'static str = "Intermediário";
    pub const RESISTANT_LABEL: &'static str = "Resistente";
    pub const NOT_TESTED_LABEL: &'static str = "-";

    /// Interpret a raw cell. Matching is exact: no trimming, no case folding.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" | Self::NOT_TESTED_LABEL => Outcome::NotTested,
            Self::SUSCEPTIBLE_LABEL => Outcome::Susceptible,
            Self::INTERMEDIATE_LABEL => Outcome::Intermediate,
            Self::RESISTANT_LABEL => Outcome::Resistant,
            other => Outcome::Other(other.to_string()),
        }
    }

    /// The label as it appears in the source table.
    pub fn label(&self) -> &str {
        match self {
            Outcome::Susceptible => Self::SUSCEPTIBLE_LABEL,
            Outcome::Intermediate => Self::INTERMEDIATE_LABEL,
            Outcome::Resistant => Self::RESISTANT_LABEL,
            Outcome::NotTested => Self::NOT_TESTED_LABEL,
            Outcome::Other(s) => s,
        }
    }

    pub fn is_tested(&self) -> bool {
        !matches!(self, Outcome::NotTested)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Schema – ordered columns with their role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    CaseId,
    Unit,
    Month,
    Organism,
    /// Index into [`IsolateRecord::results`].
    Antibiotic(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// Column layout of a loaded table, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub columns: Vec<Column>,
    /// Antibiotic column names, in file order.
    pub antibiotics: Vec<String>,
}

impl Schema {
    /// Classify header names. Identification columns are recognised by exact
    /// name; everything else is an antibiotic. Returns the name of the first
    /// required column that is missing, if any.
    pub fn from_headers<I, S>(headers: I) -> Result<Self, &'static str>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns = Vec::new();
        let mut antibiotics = Vec::new();

        for name in dedup_headers(headers.into_iter().map(Into::into)) {
            let kind = match name.as_str() {
                CASE_ID_COLUMN => ColumnKind::CaseId,
                UNIT_COLUMN => ColumnKind::Unit,
                MONTH_COLUMN => ColumnKind::Month,
                ORGANISM_COLUMN => ColumnKind::Organism,
                _ => {
                    antibiotics.push(name.clone());
                    ColumnKind::Antibiotic(antibiotics.len() - 1)
                }
            };
            columns.push(Column { name, kind });
        }

        let schema = Schema {
            columns,
            antibiotics,
        };
        for (required, kind) in [
            (UNIT_COLUMN, ColumnKind::Unit),
            (MONTH_COLUMN, ColumnKind::Month),
            (ORGANISM_COLUMN, ColumnKind::Organism),
        ] {
            if !schema.columns.iter().any(|c| c.kind == kind) {
                return Err(required);
            }
        }
        Ok(schema)
    }
}

/// Repeated header names get a `.N` suffix so every column stays addressable.
fn dedup_headers(headers: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut out: Vec<String> = Vec::new();
    for name in headers {
        let mut candidate = name.clone();
        while out.contains(&candidate) {
            let n = seen.entry(name.clone()).or_insert(0);
            *n += 1;
            candidate = format!("{name}.{n}");
        }
        out.push(candidate);
    }
    out
}

// ---------------------------------------------------------------------------
// IsolateRecord – one row of the table
// ---------------------------------------------------------------------------

/// One microbiology result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsolateRecord {
    pub case_id: String,
    pub unit: String,
    pub month: String,
    pub organism: String,
    /// One outcome per antibiotic, aligned with [`Schema::antibiotics`].
    pub results: Vec<Outcome>,
}

impl IsolateRecord {
    /// Text of the cell under the given column, as it would be displayed.
    pub fn cell(&self, kind: ColumnKind) -> &str {
        match kind {
            ColumnKind::CaseId => &self.case_id,
            ColumnKind::Unit => &self.unit,
            ColumnKind::Month => &self.month,
            ColumnKind::Organism => &self.organism,
            ColumnKind::Antibiotic(i) => self
                .results
                .get(i)
                .map(Outcome::label)
                .unwrap_or(Outcome::NOT_TESTED_LABEL),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The parsed table. Never mutated after load; filtering builds a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub schema: Schema,
    pub records: Vec<IsolateRecord>,
}

impl Dataset {
    /// Build a dataset, padding or truncating each record's results to the
    /// schema's antibiotic count so that every antibiotic has a value.
    pub fn new(schema: Schema, mut records: Vec<IsolateRecord>) -> Self {
        let n = schema.antibiotics.len();
        for rec in &mut records {
            rec.results.resize(n, Outcome::NotTested);
        }
        Dataset { schema, records }
    }

    /// Number of isolates.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Same schema, rows picked by index in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            schema: self.schema.clone(),
            records: indices
                .iter()
                .filter_map(|&i| self.records.get(i).cloned())
                .collect(),
        }
    }
}
