//! Descriptive statistics over a family dataset

use crate::dataset::FamilyDataset;
use crate::person::Gender;
use crate::resolver::Relationships;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Per-generation member count and birth range
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub count: usize,
    pub min_birth: Option<i32>,
    pub max_birth: Option<i32>,
}

impl GenerationSummary {
    fn add_birth(&mut self, birth: Option<i32>) {
        self.count += 1;
        if let Some(year) = birth {
            self.min_birth = Some(self.min_birth.map_or(year, |m| m.min(year)));
            self.max_birth = Some(self.max_birth.map_or(year, |m| m.max(year)));
        }
    }

    /// Birth range as `min-max`, or `N/A`
    pub fn birth_range(&self) -> String {
        match (self.min_birth, self.max_birth) {
            (Some(min), Some(max)) => format!("{}-{}", min, max),
            _ => "N/A".to_string(),
        }
    }
}

/// Descendant total for one root lineage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageSummary {
    pub root: String,
    pub birth: Option<i32>,
    pub descendants: usize,
}

/// Dataset-wide statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    pub total: usize,
    /// Records with no death year
    pub living: usize,
    pub deceased: usize,
    pub distinct_generations: usize,
    /// Records with no generation value
    pub without_generation: usize,
    pub generations: BTreeMap<i32, GenerationSummary>,
    pub genders: BTreeMap<Gender, usize>,
    /// Non-empty locations only
    pub locations: BTreeMap<String, usize>,
    /// Mean of death minus birth over records with both years
    pub average_lifespan: Option<f64>,
    pub lineages: Vec<LineageSummary>,
}

impl DatasetStatistics {
    /// Compute all statistics; pure function of its inputs
    pub fn compute(dataset: &FamilyDataset, relationships: &Relationships) -> Self {
        let mut stats = Self {
            total: dataset.len(),
            ..Self::default()
        };

        let mut lifespan_sum: i64 = 0;
        let mut lifespan_count: usize = 0;

        for record in dataset.iter() {
            if record.is_living() {
                stats.living += 1;
            } else {
                stats.deceased += 1;
            }

            match record.generation {
                Some(generation) => stats
                    .generations
                    .entry(generation)
                    .or_default()
                    .add_birth(record.birth.known()),
                None => stats.without_generation += 1,
            }

            *stats.genders.entry(record.gender).or_default() += 1;

            let location = record.location.trim();
            if !location.is_empty() {
                *stats.locations.entry(location.to_string()).or_default() += 1;
            }

            if let Some(lifespan) = record.lifespan() {
                lifespan_sum += lifespan;
                lifespan_count += 1;
            }
        }

        stats.distinct_generations = stats.generations.len();
        stats.average_lifespan =
            (lifespan_count > 0).then(|| lifespan_sum as f64 / lifespan_count as f64);

        let records = dataset.records();
        stats.lineages = relationships
            .roots()
            .iter()
            .map(|&i| {
                let root = &records[i];
                LineageSummary {
                    root: root.name.clone(),
                    birth: root.birth.known(),
                    descendants: relationships.descendants(&root.name).len(),
                }
            })
            .collect();

        tracing::debug!(
            "Computed statistics: {} records, {} generations, {} lineages",
            stats.total,
            stats.distinct_generations,
            stats.lineages.len()
        );

        stats
    }

    /// Most common location; ties go to the alphabetically first
    pub fn top_location(&self) -> Option<(&str, usize)> {
        self.locations
            .iter()
            .fold(None, |best: Option<(&str, usize)>, (loc, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((loc.as_str(), count)),
            })
    }

    pub fn gender_count(&self, gender: Gender) -> usize {
        self.genders.get(&gender).copied().unwrap_or(0)
    }

    /// Descendant total of the named root, if it is a root
    pub fn lineage(&self, root: &str) -> Option<&LineageSummary> {
        self.lineages.iter().find(|l| l.root == root)
    }
}

/// Transitive descendant count for every person
pub fn descendant_counts(dataset: &FamilyDataset, relationships: &Relationships) -> HashMap<String, usize> {
    dataset
        .names()
        .map(|name| (name.to_string(), relationships.descendants(name).len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::PersonRecord;

    fn compute(records: Vec<PersonRecord>) -> DatasetStatistics {
        let dataset = FamilyDataset::from_records(records);
        DatasetStatistics::compute(&dataset, &dataset.relationships())
    }

    #[test]
    fn test_descendant_count_of_root() {
        let stats = compute(vec![
            PersonRecord::new("R"),
            PersonRecord::new("C1").with_parent("R"),
            PersonRecord::new("C2").with_parent("R"),
            PersonRecord::new("G1").with_parent("C1"),
        ]);

        assert_eq!(stats.lineages.len(), 1);
        assert_eq!(stats.lineage("R").unwrap().descendants, 3);
    }

    #[test]
    fn test_counts_and_distributions() {
        let stats = compute(vec![
            PersonRecord::new("Jacob")
                .with_birth(1900)
                .with_death(1970)
                .with_gender(Gender::Male)
                .with_location("Israel")
                .with_generation(1),
            PersonRecord::new("Leah")
                .with_parent("Jacob")
                .with_birth(1925)
                .with_death(1995)
                .with_gender(Gender::Female)
                .with_location("Israel")
                .with_generation(2),
            PersonRecord::new("Dan")
                .with_parent("Jacob")
                .with_birth(1930)
                .with_gender(Gender::Male)
                .with_location("USA")
                .with_generation(2),
            PersonRecord::new("Stranger"),
        ]);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.living, 2);
        assert_eq!(stats.deceased, 2);
        assert_eq!(stats.distinct_generations, 2);
        assert_eq!(stats.without_generation, 1);

        let second = &stats.generations[&2];
        assert_eq!(second.count, 2);
        assert_eq!(second.min_birth, Some(1925));
        assert_eq!(second.max_birth, Some(1930));
        assert_eq!(second.birth_range(), "1925-1930");

        assert_eq!(stats.gender_count(Gender::Male), 2);
        assert_eq!(stats.gender_count(Gender::Female), 1);
        assert_eq!(stats.gender_count(Gender::Unknown), 1);

        assert_eq!(stats.locations.len(), 2);
        assert_eq!(stats.top_location(), Some(("Israel", 2)));
        assert_eq!(stats.average_lifespan, Some(70.0));

        assert_eq!(stats.lineage("Jacob").unwrap().descendants, 2);
        assert_eq!(stats.lineage("Stranger").unwrap().descendants, 0);
    }

    #[test]
    fn test_empty_dataset() {
        let stats = compute(vec![]);
        assert_eq!(stats.total, 0);
        assert!(stats.average_lifespan.is_none());
        assert!(stats.top_location().is_none());
        assert!(stats.lineages.is_empty());
    }

    #[test]
    fn test_descendant_counts_for_everyone() {
        let dataset = FamilyDataset::from_records(vec![
            PersonRecord::new("R"),
            PersonRecord::new("C").with_parent("R"),
            PersonRecord::new("G").with_parent("C"),
        ]);
        let counts = descendant_counts(&dataset, &dataset.relationships());
        assert_eq!(counts["R"], 2);
        assert_eq!(counts["C"], 1);
        assert_eq!(counts["G"], 0);
    }
}
