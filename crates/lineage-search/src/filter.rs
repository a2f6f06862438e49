//! Structured filters shared by all engines

use lineage_core::{PersonQuery, PersonRecord};

/// Whether a record passes every non-text filter of the query
pub fn matches_filters(record: &PersonRecord, query: &PersonQuery) -> bool {
    if let Some(generation) = query.generation {
        if record.generation != Some(generation) {
            return false;
        }
    }

    if let Some(gender) = query.gender {
        if record.gender != gender {
            return false;
        }
    }

    if let Some(ref location) = query.location {
        let wanted = location.trim().to_lowercase();
        if !wanted.is_empty() && !record.location.to_lowercase().contains(&wanted) {
            return false;
        }
    }

    if query.living_only && !record.is_living() {
        return false;
    }

    true
}

/// Text searched by the engines: name, location, occupation, spouse, notes
pub fn searchable_text(record: &PersonRecord) -> String {
    let mut parts = vec![record.name.as_str()];
    for part in [
        record.location.as_str(),
        record.occupation.as_str(),
        record.spouse.as_deref().unwrap_or(""),
        record.notes.as_str(),
    ] {
        if !part.is_empty() {
            parts.push(part);
        }
    }
    parts.join(" ")
}
