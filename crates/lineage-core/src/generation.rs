//! Generation inference over resolved parent links

use crate::dataset::FamilyDataset;
use crate::error::Error;
use crate::resolver::Relationships;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Generation assigned to roots unless configured otherwise
pub const DEFAULT_BASELINE: i32 = 1;

/// How user-supplied generation values are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Recompute every record, discarding existing values
    #[default]
    Overwrite,
    /// Keep existing values and count their descendants from them
    PreserveExisting,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::PreserveExisting => "preserve",
        }
    }
}

impl FromStr for GenerationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "preserve" | "preserve_existing" | "preserve-existing" => Ok(Self::PreserveExisting),
            other => Err(Error::InvalidOption(format!(
                "unknown generation mode '{}' (expected overwrite or preserve)",
                other
            ))),
        }
    }
}

/// Options for generation inference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Generation given to roots
    #[serde(default = "default_baseline")]
    pub baseline: i32,

    #[serde(default)]
    pub mode: GenerationMode,
}

fn default_baseline() -> i32 {
    DEFAULT_BASELINE
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            baseline: DEFAULT_BASELINE,
            mode: GenerationMode::default(),
        }
    }
}

impl GenerationOptions {
    pub fn with_baseline(mut self, baseline: i32) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }
}

/// A loop in the parent links, listed child first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentCycle {
    pub members: Vec<String>,
}

impl ParentCycle {
    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }
}

impl std::fmt::Display for ParentCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.members.join(" -> "))?;
        if let Some(first) = self.members.first() {
            write!(f, " -> {}", first)?;
        }
        Ok(())
    }
}

/// Result of an inference pass, not yet applied
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Computed generation per record index; `None` when blocked by a cycle
    pub generations: Vec<Option<i32>>,
    pub cycles: Vec<ParentCycle>,
    /// Records that descend from a cycle
    pub unresolved: Vec<String>,
    mode: GenerationMode,
}

impl GenerationOutcome {
    /// Write the computed generations into the dataset
    pub fn apply(self, dataset: &mut FamilyDataset) -> GenerationReport {
        let mut assigned = 0;
        for (record, generation) in dataset.records_mut().iter_mut().zip(&self.generations) {
            match (generation, self.mode) {
                (Some(g), _) => {
                    record.generation = Some(*g);
                    assigned += 1;
                }
                (None, GenerationMode::Overwrite) => record.generation = None,
                (None, GenerationMode::PreserveExisting) => {}
            }
        }

        GenerationReport {
            assigned,
            cycles: self.cycles,
            unresolved: self.unresolved,
        }
    }
}

/// Summary of an applied inference pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub assigned: usize,
    pub cycles: Vec<ParentCycle>,
    pub unresolved: Vec<String>,
}

impl GenerationReport {
    /// Every record received a generation
    pub fn is_complete(&self) -> bool {
        self.cycles.is_empty() && self.unresolved.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Pending,
    Resolved(i32),
    Blocked,
}

/// Assign a generation to every record reachable from a root.
///
/// Roots get `options.baseline` and each child is one more than its resolved
/// parent. Cycle members and their descendants stay unassigned.
pub fn infer_generations(
    dataset: &FamilyDataset,
    relationships: &Relationships,
    options: &GenerationOptions,
) -> GenerationOutcome {
    let records = dataset.records();
    let n = records.len();
    let mut slots = vec![Slot::Pending; n];

    for cycle in relationships.cycles() {
        for &member in cycle {
            slots[member] = Slot::Blocked;
        }
    }

    let anchor = |i: usize| match options.mode {
        GenerationMode::PreserveExisting => records[i].generation,
        GenerationMode::Overwrite => None,
    };

    for start in 0..n {
        if slots[start] != Slot::Pending {
            continue;
        }

        // Walk up until the generation of some ancestor is known
        let mut path = Vec::new();
        let mut current = start;
        let mut value = loop {
            match slots[current] {
                Slot::Resolved(g) => break Some(g),
                Slot::Blocked => break None,
                Slot::Pending => {
                    if let Some(g) = anchor(current) {
                        slots[current] = Slot::Resolved(g);
                        break Some(g);
                    }
                    match relationships.parent_index(current) {
                        None => {
                            slots[current] = Slot::Resolved(options.baseline);
                            break Some(options.baseline);
                        }
                        Some(parent) => {
                            path.push(current);
                            current = parent;
                        }
                    }
                }
            }
            if path.len() > n {
                tracing::warn!("Parent walk from record {} exceeded dataset size", start);
                break None;
            }
        };

        for &node in path.iter().rev() {
            value = value.map(|g| g.saturating_add(1));
            slots[node] = match value {
                Some(g) => Slot::Resolved(g),
                None => Slot::Blocked,
            };
        }
    }

    let cycles: Vec<ParentCycle> = relationships
        .cycles()
        .iter()
        .map(|cycle| ParentCycle {
            members: cycle.iter().map(|&i| records[i].name.clone()).collect(),
        })
        .collect();

    for cycle in &cycles {
        tracing::warn!("Parent cycle detected: {}", cycle);
    }

    let unresolved: Vec<String> = slots
        .iter()
        .enumerate()
        .filter(|(i, slot)| {
            **slot == Slot::Blocked && !relationships.cycles().iter().any(|c| c.contains(i))
        })
        .map(|(i, _)| records[i].name.clone())
        .collect();

    let generations: Vec<Option<i32>> = slots
        .iter()
        .map(|slot| match slot {
            Slot::Resolved(g) => Some(*g),
            _ => None,
        })
        .collect();

    tracing::debug!(
        "Inferred generations for {} of {} records ({} cycles, {} unresolved)",
        generations.iter().filter(|g| g.is_some()).count(),
        n,
        cycles.len(),
        unresolved.len()
    );

    GenerationOutcome {
        generations,
        cycles,
        unresolved,
        mode: options.mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::PersonRecord;

    fn recompute(
        records: Vec<PersonRecord>,
        options: GenerationOptions,
    ) -> (FamilyDataset, GenerationReport) {
        let mut dataset = FamilyDataset::from_records(records);
        let report = dataset.recompute_generations(&options);
        (dataset, report)
    }

    fn generation(dataset: &FamilyDataset, name: &str) -> Option<i32> {
        dataset.get(name).and_then(|r| r.generation)
    }

    #[test]
    fn test_child_is_parent_plus_one() {
        // Children listed before their parents on purpose
        let (dataset, report) = recompute(
            vec![
                PersonRecord::new("G1").with_parent("C1"),
                PersonRecord::new("C1").with_parent("R"),
                PersonRecord::new("C2").with_parent("R"),
                PersonRecord::new("R"),
            ],
            GenerationOptions::default(),
        );

        assert!(report.is_complete());
        assert_eq!(report.assigned, 4);
        for record in dataset.iter() {
            if let Some(parent) = record.parent.as_deref() {
                assert_eq!(record.generation, generation(&dataset, parent).map(|g| g + 1));
            }
        }
        assert_eq!(generation(&dataset, "R"), Some(1));
        assert_eq!(generation(&dataset, "G1"), Some(3));
    }

    #[test]
    fn test_disconnected_lineages_share_baseline() {
        let (dataset, _) = recompute(
            vec![
                PersonRecord::new("Asher"),
                PersonRecord::new("Cohen"),
                PersonRecord::new("Orphan").with_parent("Nonexistent"),
                PersonRecord::new("Dan").with_parent("Cohen"),
            ],
            GenerationOptions::default().with_baseline(0),
        );

        assert_eq!(generation(&dataset, "Asher"), Some(0));
        assert_eq!(generation(&dataset, "Cohen"), Some(0));
        assert_eq!(generation(&dataset, "Orphan"), Some(0));
        assert_eq!(generation(&dataset, "Dan"), Some(1));
    }

    #[test]
    fn test_cycle_reported_and_left_unassigned() {
        let (dataset, report) = recompute(
            vec![
                PersonRecord::new("A").with_parent("B").with_generation(4),
                PersonRecord::new("B").with_parent("C"),
                PersonRecord::new("C").with_parent("A"),
                PersonRecord::new("Kid").with_parent("B"),
                PersonRecord::new("Root"),
                PersonRecord::new("Child").with_parent("Root"),
            ],
            GenerationOptions::default(),
        );

        assert_eq!(report.cycles.len(), 1);
        let cycle = &report.cycles[0];
        for name in ["A", "B", "C"] {
            assert!(cycle.contains(name));
            assert_eq!(generation(&dataset, name), None);
        }
        assert_eq!(report.unresolved, vec!["Kid".to_string()]);
        assert_eq!(generation(&dataset, "Kid"), None);

        // The unaffected lineage is still numbered
        assert_eq!(generation(&dataset, "Root"), Some(1));
        assert_eq!(generation(&dataset, "Child"), Some(2));
    }

    #[test]
    fn test_cycle_display() {
        let cycle = ParentCycle {
            members: vec!["A".into(), "B".into(), "C".into()],
        };
        assert_eq!(cycle.to_string(), "A -> B -> C -> A");
    }

    #[test]
    fn test_overwrite_discards_user_values() {
        let (dataset, _) = recompute(
            vec![
                PersonRecord::new("R").with_generation(5),
                PersonRecord::new("C").with_parent("R").with_generation(9),
            ],
            GenerationOptions::default(),
        );
        assert_eq!(generation(&dataset, "R"), Some(1));
        assert_eq!(generation(&dataset, "C"), Some(2));
    }

    #[test]
    fn test_preserve_existing_anchors_descendants() {
        let (dataset, report) = recompute(
            vec![
                PersonRecord::new("R"),
                PersonRecord::new("C").with_parent("R").with_generation(5),
                PersonRecord::new("G").with_parent("C"),
                PersonRecord::new("C2").with_parent("R"),
            ],
            GenerationOptions::default().with_mode(GenerationMode::PreserveExisting),
        );

        assert_eq!(report.assigned, 4);
        assert_eq!(generation(&dataset, "R"), Some(1));
        assert_eq!(generation(&dataset, "C"), Some(5));
        assert_eq!(generation(&dataset, "G"), Some(6));
        assert_eq!(generation(&dataset, "C2"), Some(2));
    }

    #[test]
    fn test_preserve_keeps_values_inside_cycle() {
        let (dataset, report) = recompute(
            vec![
                PersonRecord::new("A").with_parent("B").with_generation(3),
                PersonRecord::new("B").with_parent("A"),
            ],
            GenerationOptions::default().with_mode(GenerationMode::PreserveExisting),
        );
        assert_eq!(report.assigned, 0);
        assert_eq!(generation(&dataset, "A"), Some(3));
        assert_eq!(generation(&dataset, "B"), None);
    }

    #[test]
    fn test_inference_is_deterministic() {
        let records = vec![
            PersonRecord::new("R"),
            PersonRecord::new("C").with_parent("R"),
            PersonRecord::new("X").with_parent("Y"),
            PersonRecord::new("Y").with_parent("X"),
        ];
        let (first, _) = recompute(records.clone(), GenerationOptions::default());
        let (second, _) = recompute(records, GenerationOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("overwrite".parse::<GenerationMode>().unwrap(), GenerationMode::Overwrite);
        assert_eq!(
            "Preserve".parse::<GenerationMode>().unwrap(),
            GenerationMode::PreserveExisting
        );
        assert!("sometimes".parse::<GenerationMode>().is_err());
    }
}
