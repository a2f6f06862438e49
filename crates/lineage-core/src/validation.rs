//! Consistency validation: chronology and referential checks
//!
//! Validation only reports. Nothing here mutates the dataset, and every
//! violation leaves the dataset usable.

use crate::dataset::FamilyDataset;
use crate::person::PersonRecord;
use crate::resolver::Relationships;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default minimum gap between a parent's and a child's birth year
pub const DEFAULT_MIN_PARENT_AGE: i32 = 10;

/// Default lifespan above which a record is flagged
pub const DEFAULT_MAX_LIFESPAN: i32 = 120;

/// Thresholds used by the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Minimum plausible parent age at a child's birth
    #[serde(default = "default_min_parent_age")]
    pub min_parent_age: i32,

    /// Flag lifespans longer than this; `None` disables the check
    #[serde(default = "default_max_lifespan")]
    pub max_lifespan: Option<i32>,
}

fn default_min_parent_age() -> i32 {
    DEFAULT_MIN_PARENT_AGE
}

fn default_max_lifespan() -> Option<i32> {
    Some(DEFAULT_MAX_LIFESPAN)
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_parent_age: DEFAULT_MIN_PARENT_AGE,
            max_lifespan: Some(DEFAULT_MAX_LIFESPAN),
        }
    }
}

impl ValidationConfig {
    pub fn with_min_parent_age(mut self, years: i32) -> Self {
        self.min_parent_age = years;
        self
    }

    pub fn with_max_lifespan(mut self, years: Option<i32>) -> Self {
        self.max_lifespan = years;
        self
    }
}

/// How serious a violation is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// What kind of rule was broken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    DuplicateIdentity,
    InvalidLifespan,
    ImplausibleLifespan,
    DanglingParent,
    ImplausibleParentAge,
    DanglingSpouse,
    ParentCycle,
}

impl ViolationCategory {
    pub fn severity(&self) -> Severity {
        match self {
            Self::DuplicateIdentity | Self::InvalidLifespan | Self::ParentCycle => Severity::Error,
            Self::ImplausibleLifespan | Self::DanglingParent | Self::ImplausibleParentAge => {
                Severity::Warning
            }
            Self::DanglingSpouse => Severity::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateIdentity => "duplicate identity",
            Self::InvalidLifespan => "invalid lifespan",
            Self::ImplausibleLifespan => "implausible lifespan",
            Self::DanglingParent => "dangling parent reference",
            Self::ImplausibleParentAge => "implausible parent age",
            Self::DanglingSpouse => "dangling spouse reference",
            Self::ParentCycle => "parent cycle",
        }
    }
}

impl std::fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub severity: Severity,
    pub category: ViolationCategory,
    pub message: String,
    /// Names of the records involved, offending record first
    pub names: Vec<String>,
}

impl Violation {
    fn new(category: ViolationCategory, names: Vec<String>, message: String) -> Self {
        Self {
            severity: category.severity(),
            category,
            message,
            names,
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)
    }
}

/// Ordered list of violations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.with_severity(Severity::Warning)
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.severity == severity)
    }

    pub fn in_category(&self, category: ViolationCategory) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.category == category)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.with_severity(severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Check every record and collect violations in dataset order
pub fn validate(
    dataset: &FamilyDataset,
    relationships: &Relationships,
    config: &ValidationConfig,
) -> ValidationReport {
    let records = dataset.records();
    let mut violations = Vec::new();

    let mut duplicate_at = HashMap::new();
    for (name, indices) in relationships.duplicates() {
        if let Some(&first) = indices.first() {
            duplicate_at.insert(first, (name, indices.len()));
        }
    }

    let dangling: HashMap<usize, &str> = relationships
        .dangling_parents()
        .iter()
        .map(|(i, name)| (*i, name.as_str()))
        .collect();

    let dangling_spouses: HashMap<usize, &str> = relationships
        .dangling_spouses()
        .iter()
        .map(|(i, name)| (*i, name.as_str()))
        .collect();

    for (i, record) in records.iter().enumerate() {
        if let Some((name, count)) = duplicate_at.get(&i) {
            violations.push(Violation::new(
                ViolationCategory::DuplicateIdentity,
                vec![name.to_string()],
                format!(
                    "'{}' is used by {} records; links to this name are ambiguous",
                    name, count
                ),
            ));
        }

        check_lifespan(record, config, &mut violations);

        if let Some(parent) = dangling.get(&i) {
            violations.push(Violation::new(
                ViolationCategory::DanglingParent,
                vec![record.name.clone(), parent.to_string()],
                format!(
                    "{}'s parent '{}' does not match any person in the tree",
                    record.name, parent
                ),
            ));
        }

        if let Some(parent) = relationships.parent_index(i).map(|p| &records[p]) {
            check_parent_age(record, parent, config, &mut violations);
        }

        if let Some(spouse) = dangling_spouses.get(&i) {
            violations.push(Violation::new(
                ViolationCategory::DanglingSpouse,
                vec![record.name.clone(), spouse.to_string()],
                format!("{}'s spouse '{}' is not in the tree", record.name, spouse),
            ));
        }
    }

    for cycle in relationships.cycles() {
        let names: Vec<String> = cycle.iter().map(|&i| records[i].name.clone()).collect();
        let unique: HashSet<&String> = names.iter().collect();
        let message = if unique.len() == 1 {
            format!("{} is listed as their own parent", names[0])
        } else {
            format!("Parent links form a loop: {}", names.join(" -> "))
        };
        violations.push(Violation::new(ViolationCategory::ParentCycle, names, message));
    }

    tracing::debug!(
        "Validated {} records: {} violations",
        records.len(),
        violations.len()
    );

    ValidationReport { violations }
}

fn check_lifespan(record: &PersonRecord, config: &ValidationConfig, out: &mut Vec<Violation>) {
    let Some(lifespan) = record.lifespan() else {
        return;
    };

    if lifespan < 0 {
        out.push(Violation::new(
            ViolationCategory::InvalidLifespan,
            vec![record.name.clone()],
            format!(
                "{} died ({}) before being born ({})",
                record.name, record.death, record.birth
            ),
        ));
    } else if let Some(max) = config.max_lifespan {
        if lifespan > i64::from(max) {
            out.push(Violation::new(
                ViolationCategory::ImplausibleLifespan,
                vec![record.name.clone()],
                format!(
                    "{} lived {} years ({}-{}), more than {}",
                    record.name, lifespan, record.birth, record.death, max
                ),
            ));
        }
    }
}

fn check_parent_age(
    child: &PersonRecord,
    parent: &PersonRecord,
    config: &ValidationConfig,
    out: &mut Vec<Violation>,
) {
    let (Some(child_birth), Some(parent_birth)) = (child.birth.known(), parent.birth.known())
    else {
        return;
    };

    let gap = i64::from(child_birth) - i64::from(parent_birth);
    let message = if gap < 0 {
        format!(
            "{} (born {}) was born before their parent {} (born {})",
            child.name, child_birth, parent.name, parent_birth
        )
    } else if gap < i64::from(config.min_parent_age) {
        format!(
            "{} was {} when {} was born (minimum {})",
            parent.name, gap, child.name, config.min_parent_age
        )
    } else {
        return;
    };

    out.push(Violation::new(
        ViolationCategory::ImplausibleParentAge,
        vec![child.name.clone(), parent.name.clone()],
        message,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(records: Vec<PersonRecord>) -> ValidationReport {
        let dataset = FamilyDataset::from_records(records);
        validate(&dataset, &dataset.relationships(), &ValidationConfig::default())
    }

    fn categories(report: &ValidationReport) -> Vec<ViolationCategory> {
        report.violations().iter().map(|v| v.category).collect()
    }

    #[test]
    fn test_clean_dataset() {
        let report = run(vec![
            PersonRecord::new("Jacob").with_birth(1900).with_death(1970),
            PersonRecord::new("Leah").with_parent("Jacob").with_birth(1925),
        ]);
        assert!(report.is_clean());
        assert!(!report.has_errors());
    }

    #[test]
    fn test_invalid_lifespan() {
        let report = run(vec![PersonRecord::new("X").with_birth(1990).with_death(1980)]);
        assert_eq!(categories(&report), vec![ViolationCategory::InvalidLifespan]);
        assert_eq!(report.violations()[0].severity, Severity::Error);
        assert_eq!(report.violations()[0].names, vec!["X".to_string()]);
    }

    #[test]
    fn test_implausible_parent_age() {
        let report = run(vec![
            PersonRecord::new("P").with_birth(1990),
            PersonRecord::new("C").with_parent("P").with_birth(1992),
        ]);
        assert_eq!(categories(&report), vec![ViolationCategory::ImplausibleParentAge]);
        let violation = &report.violations()[0];
        assert_eq!(violation.severity, Severity::Warning);
        assert_eq!(violation.names, vec!["C".to_string(), "P".to_string()]);
    }

    #[test]
    fn test_child_born_before_parent() {
        let report = run(vec![
            PersonRecord::new("P").with_birth(1950),
            PersonRecord::new("C").with_parent("P").with_birth(1940),
        ]);
        assert_eq!(categories(&report), vec![ViolationCategory::ImplausibleParentAge]);
        assert!(report.violations()[0].message.contains("before their parent"));
    }

    #[test]
    fn test_min_parent_age_is_configurable() {
        let dataset = FamilyDataset::from_records(vec![
            PersonRecord::new("P").with_birth(1990),
            PersonRecord::new("C").with_parent("P").with_birth(2005),
        ]);
        let relationships = dataset.relationships();

        let strict = ValidationConfig::default().with_min_parent_age(16);
        assert_eq!(validate(&dataset, &relationships, &strict).len(), 1);
        assert!(validate(&dataset, &relationships, &ValidationConfig::default()).is_clean());
    }

    #[test]
    fn test_dangling_parent() {
        let report = run(vec![PersonRecord::new("Orphan").with_parent("Nonexistent")]);
        assert_eq!(categories(&report), vec![ViolationCategory::DanglingParent]);
        assert_eq!(
            report.violations()[0].names,
            vec!["Orphan".to_string(), "Nonexistent".to_string()]
        );
    }

    #[test]
    fn test_duplicate_identity_reported_once() {
        let report = run(vec![
            PersonRecord::new("Jane Doe"),
            PersonRecord::new("Eli"),
            PersonRecord::new("Jane Doe"),
        ]);
        assert_eq!(categories(&report), vec![ViolationCategory::DuplicateIdentity]);
        assert_eq!(report.violations()[0].severity, Severity::Error);
        assert!(report.has_errors());
    }

    #[test]
    fn test_dangling_spouse_is_info() {
        let report = run(vec![PersonRecord::new("Eli").with_spouse("Outsider")]);
        assert_eq!(categories(&report), vec![ViolationCategory::DanglingSpouse]);
        assert_eq!(report.count(Severity::Info), 1);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_implausible_lifespan() {
        let report = run(vec![PersonRecord::new("Old").with_birth(1800).with_death(1950)]);
        assert_eq!(categories(&report), vec![ViolationCategory::ImplausibleLifespan]);

        let dataset = FamilyDataset::from_records(vec![
            PersonRecord::new("Old").with_birth(1800).with_death(1950),
        ]);
        let relaxed = ValidationConfig::default().with_max_lifespan(None);
        assert!(validate(&dataset, &dataset.relationships(), &relaxed).is_clean());
    }

    #[test]
    fn test_extreme_years_do_not_overflow() {
        let report = run(vec![
            PersonRecord::new("Ancient")
                .with_birth(-2_000_000_000)
                .with_death(2_000_000_000),
            PersonRecord::new("Late").with_birth(i32::MAX),
            PersonRecord::new("Early").with_parent("Late").with_birth(i32::MIN),
        ]);
        assert_eq!(
            categories(&report),
            vec![
                ViolationCategory::ImplausibleLifespan,
                ViolationCategory::ImplausibleParentAge,
            ]
        );
        assert!(!report.has_errors());
        assert!(report.violations()[0].message.contains("4000000000 years"));
    }

    #[test]
    fn test_cycle_reported_last() {
        let report = run(vec![
            PersonRecord::new("A").with_parent("B"),
            PersonRecord::new("B").with_parent("C"),
            PersonRecord::new("C").with_parent("A"),
            PersonRecord::new("D").with_parent("Nobody"),
        ]);
        assert_eq!(
            categories(&report),
            vec![ViolationCategory::DanglingParent, ViolationCategory::ParentCycle]
        );
        let cycle = &report.violations()[1];
        assert_eq!(cycle.names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_violations_follow_record_order() {
        let report = run(vec![
            PersonRecord::new("First").with_birth(2000).with_death(1990),
            PersonRecord::new("Second").with_parent("Ghost"),
            PersonRecord::new("Third").with_birth(1990).with_death(1980),
        ]);
        let names: Vec<&str> = report
            .violations()
            .iter()
            .map(|v| v.names[0].as_str())
            .collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
        assert_eq!(report.errors().count(), 2);
        assert_eq!(report.warnings().count(), 1);
    }
}
