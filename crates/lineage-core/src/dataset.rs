//! The family dataset: the owned, ordered collection of person records

use crate::error::{Error, Result};
use crate::generation::{infer_generations, GenerationOptions, GenerationReport};
use crate::limits::{validate_free_text, validate_person_name};
use crate::person::PersonRecord;
use crate::resolver::Relationships;
use serde::{Deserialize, Serialize};

/// All person records of one family tree
///
/// Record order is preserved and drives validation and export order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyDataset {
    records: Vec<PersonRecord>,
}

impl FamilyDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<PersonRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PersonRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<PersonRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PersonRecord> {
        self.records.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.name == name)
    }

    /// First record with the given name
    pub fn get(&self, name: &str) -> Option<&PersonRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PersonRecord> {
        self.records.iter_mut().find(|r| r.name == name)
    }

    /// Append a record without any uniqueness check.
    ///
    /// Imports use this so duplicates survive and get reported by validation.
    pub fn push(&mut self, record: PersonRecord) {
        self.records.push(record);
    }

    /// Add a new person, rejecting names already present
    pub fn add(&mut self, record: PersonRecord) -> Result<()> {
        validate_person_name(&record.name)?;
        validate_free_text("notes", &record.notes)?;
        if self.contains(&record.name) {
            return Err(Error::PersonExists(record.name));
        }
        tracing::debug!("Adding person: {}", record.name);
        self.records.push(record);
        Ok(())
    }

    /// Append records from another dataset
    pub fn extend(&mut self, other: FamilyDataset) {
        self.records.extend(other.records);
    }

    /// Remove every record with the given name, returning how many were removed
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.name != name);
        before - self.records.len()
    }

    /// Rename a person and rewrite every parent/spouse reference to them
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        validate_person_name(new)?;
        if !self.contains(old) {
            return Err(Error::PersonNotFound(old.to_string()));
        }
        if old != new && self.contains(new) {
            return Err(Error::PersonExists(new.to_string()));
        }

        for record in &mut self.records {
            if record.name == old {
                record.name = new.to_string();
            }
            if record.parent.as_deref() == Some(old) {
                record.parent = Some(new.to_string());
            }
            if record.spouse.as_deref() == Some(old) {
                record.spouse = Some(new.to_string());
            }
        }
        Ok(())
    }

    /// Resolve relationships over the current records
    pub fn relationships(&self) -> Relationships {
        Relationships::resolve(self)
    }

    /// Run generation inference and write the results back
    pub fn recompute_generations(&mut self, options: &GenerationOptions) -> GenerationReport {
        let relationships = self.relationships();
        let outcome = infer_generations(self, &relationships, options);
        outcome.apply(self)
    }

    pub(crate) fn records_mut(&mut self) -> &mut [PersonRecord] {
        &mut self.records
    }
}

impl FromIterator<PersonRecord> for FamilyDataset {
    fn from_iter<I: IntoIterator<Item = PersonRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FamilyDataset {
    type Item = &'a PersonRecord;
    type IntoIter = std::slice::Iter<'a, PersonRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
