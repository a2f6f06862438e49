//! JSON reading and writing: an array of record objects

use super::{collect_rows, column_index, record_from_cells, Cell, ImportReport};
use crate::dataset::FamilyDataset;
use crate::error::{Error, Result};
use serde_json::Value;

pub fn import(content: &str) -> Result<ImportReport> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(items) = value else {
        return Err(Error::Import {
            line: 1,
            message: "expected a JSON array of records".to_string(),
        });
    };

    let converted = items.into_iter().map(|item| {
        let Value::Object(fields) = item else {
            return Err("row is not an object".to_string());
        };

        let mut cells: [Cell; 12] = Default::default();
        for (key, value) in fields {
            if let Some(slot) = column_index(&key) {
                cells[slot] = cell_from_value(value)?;
            }
        }
        record_from_cells(cells)
    });

    collect_rows(converted)
}

pub fn export(dataset: &FamilyDataset) -> Result<String> {
    Ok(serde_json::to_string_pretty(dataset)?)
}

fn cell_from_value(value: Value) -> std::result::Result<Cell, String> {
    match value {
        Value::Null => Ok(Cell::Empty),
        Value::String(s) => Ok(Cell::Text(s)),
        Value::Bool(b) => Ok(Cell::Bool(b)),
        Value::Number(n) => n
            .as_f64()
            .map(Cell::Number)
            .ok_or_else(|| format!("unsupported number {}", n)),
        Value::Array(_) | Value::Object(_) => Err("nested values are not supported".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::{Gender, PersonRecord, Year};

    #[test]
    fn test_import_lenient_values() {
        let json = r#"[
            {"Name": "Jacob", "Birth": 1900.0, "Death": "1970", "Gender": "Male", "Highlight": 1},
            {"Name": "Leah", "Parent": "Jacob", "Birth": null, "Generation": "2", "Extra": [1, 2]},
            {"Birth": 1950},
            "not a record"
        ]"#;
        let report = import(json).unwrap();

        assert_eq!(report.imported(), 2);
        assert_eq!(report.skipped_count(), 2);
        assert_eq!(report.skipped[0].row, 3);
        assert_eq!(report.skipped[1].reason, "row is not an object");

        let jacob = report.records.get("Jacob").unwrap();
        assert_eq!(jacob.birth, Year::Known(1900));
        assert_eq!(jacob.death, Year::Known(1970));
        assert_eq!(jacob.gender, Gender::Male);
        assert!(jacob.highlight);

        let leah = report.records.get("Leah").unwrap();
        assert_eq!(leah.birth, Year::Unknown);
        assert_eq!(leah.generation, Some(2));
    }

    #[test]
    fn test_import_requires_array() {
        assert!(matches!(
            import(r#"{"Name": "Jacob"}"#),
            Err(Error::Import { .. })
        ));
        assert!(matches!(import("not json"), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_roundtrip_preserves_records() {
        let dataset = FamilyDataset::from_records(vec![
            PersonRecord::new("Jacob")
                .with_birth(1900)
                .with_gender(Gender::Male)
                .with_generation(1),
            PersonRecord::new("Leah")
                .with_parent("Jacob")
                .with_spouse("Dan")
                .with_notes("Twin")
                .highlighted(),
        ]);

        let text = export(&dataset).unwrap();
        assert!(text.contains("\"Name\": \"Jacob\""));

        let report = import(&text).unwrap();
        assert_eq!(report.records, dataset);
    }
}
