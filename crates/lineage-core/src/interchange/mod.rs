//! Import and export of family datasets
//!
//! CSV and JSON share one column schema. Imports are lenient per row:
//! a malformed row is skipped and reported, never fatal.

pub mod csv;
pub mod graphml;
pub mod json;

use crate::dataset::FamilyDataset;
use crate::error::{Error, Result};
use crate::limits::{validate_free_text, validate_import_size, validate_person_name};
use crate::person::{normalize_reference, Gender, PersonRecord, Year};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Column names, in export order
pub const COLUMNS: [&str; 12] = [
    "Name",
    "Parent",
    "Birth",
    "Death",
    "Location",
    "Gender",
    "Spouse",
    "Occupation",
    "Photo",
    "Generation",
    "Highlight",
    "Notes",
];

/// Interchange format of a dataset file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        ext.parse().map_err(|_| {
            Error::UnsupportedFormat(format!(
                "cannot detect format of {} (expected .csv or .json)",
                path.display()
            ))
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Parse file content into records
    pub fn import(&self, content: &str) -> Result<ImportReport> {
        match self {
            Self::Csv => csv::import(content),
            Self::Json => json::import(content),
        }
    }

    /// Serialize records in this format
    pub fn export(&self, dataset: &FamilyDataset) -> Result<String> {
        match self {
            Self::Csv => Ok(csv::export(dataset)),
            Self::Json => json::export(dataset),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row rejected during import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-based data row number, header excluded
    pub row: usize,
    pub reason: String,
}

/// Result of parsing an import file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub records: FamilyDataset,
    pub skipped: Vec<SkippedRow>,
}

impl ImportReport {
    pub fn imported(&self) -> usize {
        self.records.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// A raw cell value before conversion
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    fn into_text(self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s,
            Cell::Number(n) => format_number(n),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Position of a column name in `COLUMNS`, ignoring case and surrounding space
pub(crate) fn column_index(header: &str) -> Option<usize> {
    let header = header.trim();
    COLUMNS.iter().position(|c| c.eq_ignore_ascii_case(header))
}

/// Convert one row of cells, ordered as `COLUMNS`, into a record
pub(crate) fn record_from_cells(cells: [Cell; 12]) -> std::result::Result<PersonRecord, String> {
    let [name, parent, birth, death, location, gender, spouse, occupation, photo, generation, highlight, notes] =
        cells;

    let name = name.into_text().trim().to_string();
    if name.is_empty() {
        return Err("missing name".to_string());
    }
    validate_person_name(&name).map_err(|e| e.to_string())?;

    let notes = notes.into_text();
    validate_free_text("Notes", &notes).map_err(|e| e.to_string())?;
    let location = location.into_text();
    validate_free_text("Location", &location).map_err(|e| e.to_string())?;
    let occupation = occupation.into_text();
    validate_free_text("Occupation", &occupation).map_err(|e| e.to_string())?;

    let photo = photo.into_text();
    let photo = photo.trim();

    Ok(PersonRecord {
        name,
        parent: normalize_reference(&parent.into_text()),
        birth: Year::from(parse_year("Birth", birth)?),
        death: Year::from(parse_year("Death", death)?),
        location,
        gender: Gender::parse(&gender.into_text()),
        spouse: normalize_reference(&spouse.into_text()),
        occupation,
        photo: (!photo.is_empty()).then(|| photo.to_string()),
        generation: parse_year("Generation", generation)?,
        highlight: parse_flag(highlight)?,
        notes,
    })
}

/// Integer cell; integral float text such as `1990.0` is accepted
fn parse_year(column: &str, cell: Cell) -> std::result::Result<Option<i32>, String> {
    let number = match cell {
        Cell::Empty => return Ok(None),
        Cell::Number(n) => n,
        Cell::Bool(b) => return Err(format!("invalid {} value '{}'", column, b)),
        Cell::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            if let Ok(value) = text.parse::<i32>() {
                return Ok(Some(value));
            }
            text.parse::<f64>()
                .map_err(|_| format!("invalid {} value '{}'", column, text))?
        }
    };

    if number.is_finite()
        && number.fract() == 0.0
        && number >= f64::from(i32::MIN)
        && number <= f64::from(i32::MAX)
    {
        Ok(Some(number as i32))
    } else {
        Err(format!("invalid {} value '{}'", column, number))
    }
}

fn parse_flag(cell: Cell) -> std::result::Result<bool, String> {
    match cell {
        Cell::Empty => Ok(false),
        Cell::Bool(b) => Ok(b),
        Cell::Number(n) if n == 0.0 => Ok(false),
        Cell::Number(n) if n == 1.0 => Ok(true),
        Cell::Number(n) => Err(format!("invalid Highlight value '{}'", n)),
        Cell::Text(text) => match text.trim().to_lowercase().as_str() {
            "" | "false" | "0" | "no" | "n" => Ok(false),
            "true" | "1" | "yes" | "y" => Ok(true),
            other => Err(format!("invalid Highlight value '{}'", other)),
        },
    }
}

/// Build the report from converted rows, enforcing the record-count limit
pub(crate) fn collect_rows(
    rows: impl IntoIterator<Item = std::result::Result<PersonRecord, String>>,
) -> Result<ImportReport> {
    let mut report = ImportReport::default();
    let mut total = 0;
    for (i, row) in rows.into_iter().enumerate() {
        total += 1;
        validate_import_size(total)?;
        match row {
            Ok(record) => report.records.push(record),
            Err(reason) => {
                tracing::warn!("Skipping row {}: {}", i + 1, reason);
                report.skipped.push(SkippedRow { row: i + 1, reason });
            }
        }
    }
    tracing::debug!(
        "Parsed {} records, skipped {}",
        report.imported(),
        report.skipped_count()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(name: &str) -> [Cell; 12] {
        let mut cells: [Cell; 12] = Default::default();
        cells[0] = Cell::Text(name.to_string());
        cells
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("family.csv")).unwrap(), Format::Csv);
        assert_eq!(Format::from_path(Path::new("data/Family.JSON")).unwrap(), Format::Json);
        assert!(matches!(
            Format::from_path(Path::new("family.xlsx")),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(Format::from_path(Path::new("family")).is_err());
    }

    #[test]
    fn test_year_parsing() {
        assert_eq!(parse_year("Birth", Cell::Text("1990".into())), Ok(Some(1990)));
        assert_eq!(parse_year("Birth", Cell::Text("1990.0".into())), Ok(Some(1990)));
        assert_eq!(parse_year("Birth", Cell::Text(" ".into())), Ok(None));
        assert_eq!(parse_year("Birth", Cell::Number(1990.0)), Ok(Some(1990)));
        assert!(parse_year("Birth", Cell::Text("1990.5".into())).is_err());
        assert!(parse_year("Birth", Cell::Text("abc".into())).is_err());
    }

    #[test]
    fn test_flag_parsing() {
        assert_eq!(parse_flag(Cell::Text("TRUE".into())), Ok(true));
        assert_eq!(parse_flag(Cell::Number(0.0)), Ok(false));
        assert_eq!(parse_flag(Cell::Empty), Ok(false));
        assert!(parse_flag(Cell::Text("maybe".into())).is_err());
    }

    #[test]
    fn test_row_conversion() {
        let mut row = cells(" Leah ");
        row[1] = Cell::Text("None".into());
        row[2] = Cell::Number(1925.0);
        row[5] = Cell::Text("F".into());
        row[8] = Cell::Text("  ".into());

        let record = record_from_cells(row).unwrap();
        assert_eq!(record.name, "Leah");
        assert_eq!(record.parent, None);
        assert_eq!(record.birth, Year::Known(1925));
        assert_eq!(record.gender, Gender::Female);
        assert_eq!(record.photo, None);
    }

    #[test]
    fn test_row_rejections() {
        assert!(record_from_cells(cells("")).is_err());
        assert!(record_from_cells(cells(&"x".repeat(300))).is_err());

        let mut row = cells("Eli");
        row[9] = Cell::Text("second".into());
        let err = record_from_cells(row).unwrap_err();
        assert!(err.contains("Generation"));
    }
}
