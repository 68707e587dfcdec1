use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{ColumnKind, Dataset, IsolateRecord, Outcome, Schema};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to turn decoded text into a [`Dataset`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("line {line}: expected {expected} fields, found {found}")]
    RowTooLong {
        line: u64,
        expected: usize,
        found: usize,
    },
}

/// Failure to load the table from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("the file '{}' was not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("reading '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Both the UTF-8 and the Latin-1 attempt failed; carries the latter's cause.
    #[error("could not read '{}' as a semicolon table", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the isolate table from a semicolon-delimited file.
///
/// The bytes are first read as UTF-8. If decoding or parsing fails, they are
/// read again as Latin-1 before giving up.
pub fn load(path: &Path) -> Result<Dataset, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let dataset = match parse_utf8(&bytes) {
        Ok(ds) => ds,
        Err(e) => {
            log::warn!(
                "{}: UTF-8 read failed ({e}), retrying as Latin-1",
                path.display()
            );
            parse_table(&decode_latin1(&bytes)).map_err(|source| LoadError::Unreadable {
                path: path.to_path_buf(),
                source,
            })?
        }
    };

    log::info!(
        "Loaded {} isolates with {} antibiotic columns from {}",
        dataset.len(),
        dataset.schema.antibiotics.len(),
        path.display()
    );
    Ok(dataset)
}

/// Parse an already-decoded table.
///
/// Layout: header row, `;` separators. Blank lines are skipped and cells are
/// kept verbatim. Short rows are padded; rows wider than the header fail.
pub fn parse_table(text: &str) -> Result<Dataset, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let schema = Schema::from_headers(headers).map_err(ParseError::MissingColumn)?;
    let width = schema.columns.len();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        if row.len() > width {
            return Err(ParseError::RowTooLong {
                line: row.position().map(|p| p.line()).unwrap_or(0),
                expected: width,
                found: row.len(),
            });
        }

        let mut rec = IsolateRecord {
            case_id: String::new(),
            unit: String::new(),
            month: String::new(),
            organism: String::new(),
            results: vec![Outcome::NotTested; schema.antibiotics.len()],
        };
        for (column, value) in schema.columns.iter().zip(row.iter()) {
            match column.kind {
                ColumnKind::CaseId => rec.case_id = value.to_string(),
                ColumnKind::Unit => rec.unit = value.to_string(),
                ColumnKind::Month => rec.month = value.to_string(),
                ColumnKind::Organism => rec.organism = value.to_string(),
                ColumnKind::Antibiotic(i) => rec.results[i] = Outcome::parse(value),
            }
        }
        records.push(rec);
    }

    Ok(Dataset::new(schema, records))
}

// -- Decoding helpers --

fn parse_utf8(bytes: &[u8]) -> Result<Dataset, ParseError> {
    let text = std::str::from_utf8(bytes)?;
    parse_table(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// ISO-8859-1: every byte is the code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str = "Código da O.S.;Unidade;Mês;Microorganismo;Ampicilina;Meropenem";

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_utf8_table() {
        let text = format!("{HEADER}\n1;UTI;Jan;K. pneumoniae;Resistente;Sensível\n");
        let file = write_temp(text.as_bytes());
        let ds = load(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].month, "Jan");
        assert_eq!(
            ds.records[0].results,
            vec![Outcome::Resistant, Outcome::Susceptible]
        );
    }

    #[test]
    fn strips_utf8_bom() {
        let text = format!("\u{feff}{HEADER}\n1;UTI;Jan;E. coli;-;-\n");
        let file = write_temp(text.as_bytes());
        let ds = load(file.path()).unwrap();
        assert_eq!(ds.schema.columns[0].name, "Código da O.S.");
        assert_eq!(ds.schema.columns[0].kind, ColumnKind::CaseId);
    }

    #[test]
    fn falls_back_to_latin1() {
        // "Mês" and "Sensível" in ISO-8859-1.
        let mut bytes = b"Unidade;M\xeas;Microorganismo;Meropenem\n".to_vec();
        bytes.extend_from_slice(b"UTI;Mar\xe7o;E. coli;Sens\xedvel\n");
        let file = write_temp(&bytes);
        let ds = load(file.path()).unwrap();
        assert_eq!(ds.records[0].month, "Março");
        assert_eq!(ds.records[0].results, vec![Outcome::Susceptible]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resultado_final_ccih.csv");
        match load(&path) {
            Err(LoadError::NotFound { path: p }) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn missing_column_is_unreadable() {
        let file = write_temp(b"Unidade;Microorganismo;Ampicilina\nUTI;E. coli;-\n");
        match load(file.path()) {
            Err(LoadError::Unreadable {
                source: ParseError::MissingColumn(col),
                ..
            }) => assert_eq!(col, "Mês"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn short_rows_are_padded() {
        let text = format!("{HEADER}\n1;UTI;Jan;E. coli;Resistente\n");
        let ds = parse_table(&text).unwrap();
        assert_eq!(
            ds.records[0].results,
            vec![Outcome::Resistant, Outcome::NotTested]
        );
    }

    #[test]
    fn long_rows_are_rejected() {
        let text = format!("{HEADER}\n1;UTI;Jan;E. coli;-;-;extra\n");
        let err = parse_table(&text).unwrap_err();
        assert!(matches!(
            err,
            ParseError::RowTooLong {
                expected: 6,
                found: 7,
                ..
            }
        ));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let text = format!("{HEADER}\n\n1;UTI;Jan;E. coli;-;-\n\n");
        assert_eq!(parse_table(&text).unwrap().len(), 1);
    }

    #[test]
    fn free_text_results_are_kept() {
        let text = format!("{HEADER}\n1;UTI;Jan;E. coli;Sensível dose dependente;\n");
        let ds = parse_table(&text).unwrap();
        assert_eq!(
            ds.records[0].results,
            vec![
                Outcome::Other("Sensível dose dependente".to_string()),
                Outcome::NotTested
            ]
        );
    }
}
