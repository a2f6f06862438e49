//! CSV reading and writing (RFC 4180)

use super::{collect_rows, column_index, record_from_cells, Cell, ImportReport, COLUMNS};
use crate::dataset::FamilyDataset;
use crate::error::{Error, Result};
use crate::person::PersonRecord;

/// Parse CSV text with a header row
pub fn import(content: &str) -> Result<ImportReport> {
    let mut rows = parse(content)?.into_iter();

    let Some((_, header)) = rows.next() else {
        return Err(Error::MissingColumn("Name".to_string()));
    };

    // Position in COLUMNS for each CSV column; unknown columns map to None
    let mapping: Vec<Option<usize>> = header.iter().map(|h| column_index(h)).collect();
    if !mapping.contains(&Some(0)) {
        return Err(Error::MissingColumn("Name".to_string()));
    }

    let converted = rows.map(|(_, fields)| {
        let mut cells: [Cell; 12] = Default::default();
        for (field, slot) in fields.into_iter().zip(&mapping) {
            if let Some(slot) = *slot {
                cells[slot] = Cell::Text(field);
            }
        }
        record_from_cells(cells)
    });

    collect_rows(converted)
}

/// Write records with every column, header first
pub fn export(dataset: &FamilyDataset) -> String {
    let mut output = String::new();
    output.push_str(&COLUMNS.join(","));
    output.push('\n');

    for record in dataset.iter() {
        let fields = record_fields(record);
        let line: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
        output.push_str(&line.join(","));
        output.push('\n');
    }

    output
}

fn record_fields(record: &PersonRecord) -> [String; 12] {
    let year = |y: Option<i32>| y.map(|y| y.to_string()).unwrap_or_default();
    [
        record.name.clone(),
        record.parent.clone().unwrap_or_default(),
        year(record.birth.known()),
        year(record.death.known()),
        record.location.clone(),
        record.gender.as_str().to_string(),
        record.spouse.clone().unwrap_or_default(),
        record.occupation.clone(),
        record.photo.clone().unwrap_or_default(),
        year(record.generation),
        record.highlight.to_string(),
        record.notes.clone(),
    ]
}

/// Quote a field when it holds a delimiter, quote, line break, or edge space
fn csv_escape(s: &str) -> String {
    let needs_quotes = s.contains([',', '"', '\n', '\r']) || s.trim() != s;
    if needs_quotes {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Split CSV text into records of fields, each tagged with its starting line.
///
/// Blank lines are skipped. An unterminated quote is a file-level error.
fn parse(content: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted_field = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !quoted_field => {
                in_quotes = true;
                quoted_field = true;
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                quoted_field = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                fields.push(std::mem::take(&mut field));
                quoted_field = false;
                push_record(&mut records, record_line, std::mem::take(&mut fields));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(Error::Import {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }

    if !field.is_empty() || !fields.is_empty() || quoted_field {
        fields.push(field);
        push_record(&mut records, record_line, fields);
    }

    Ok(records)
}

fn push_record(records: &mut Vec<(usize, Vec<String>)>, line: usize, fields: Vec<String>) {
    let blank = fields.len() == 1 && fields[0].is_empty();
    if !blank {
        records.push((line, fields));
    }
}
