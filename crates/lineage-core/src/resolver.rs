//! Relationship resolution: parent/child adjacency and spouse pairing
//!
//! Links are resolved by exact, case-sensitive name match. When a name is
//! shared by several records, links resolve to its first occurrence.

use crate::dataset::FamilyDataset;
use std::collections::{HashMap, HashSet, VecDeque};

/// Resolved relationships of a dataset
///
/// Indices refer to record positions in the dataset the value was built from.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Name to index of its first record
    index: HashMap<String, usize>,

    /// Per record, index of the resolved parent
    parent_of: Vec<Option<usize>>,

    /// Parent name to child names, in record order
    children: HashMap<String, Vec<String>>,

    /// Resolvable spouse links
    spouses: HashMap<String, String>,

    roots: Vec<usize>,
    dangling_parents: Vec<(usize, String)>,
    dangling_spouses: Vec<(usize, String)>,
    duplicates: Vec<(String, Vec<usize>)>,
    cycles: Vec<Vec<usize>>,
}

impl Relationships {
    /// Resolve all parent and spouse references of a dataset
    pub fn resolve(dataset: &FamilyDataset) -> Self {
        let records = dataset.records();

        let mut index: HashMap<String, usize> = HashMap::with_capacity(records.len());
        let mut occurrences: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();
        for (i, record) in records.iter().enumerate() {
            index.entry(record.name.clone()).or_insert(i);
            let slots = occurrences.entry(record.name.as_str()).or_default();
            if slots.is_empty() {
                first_seen.push(record.name.as_str());
            }
            slots.push(i);
        }

        let duplicates: Vec<(String, Vec<usize>)> = first_seen
            .into_iter()
            .filter_map(|name| {
                let slots = &occurrences[name];
                (slots.len() > 1).then(|| (name.to_string(), slots.clone()))
            })
            .collect();

        let mut parent_of = Vec::with_capacity(records.len());
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        let mut roots = Vec::new();
        let mut dangling_parents = Vec::new();

        for (i, record) in records.iter().enumerate() {
            let resolved = match record.parent.as_deref() {
                Some(parent) => match index.get(parent) {
                    Some(&p) => {
                        children
                            .entry(parent.to_string())
                            .or_default()
                            .push(record.name.clone());
                        Some(p)
                    }
                    None => {
                        dangling_parents.push((i, parent.to_string()));
                        None
                    }
                },
                None => None,
            };
            if resolved.is_none() {
                roots.push(i);
            }
            parent_of.push(resolved);
        }

        let mut spouses = HashMap::new();
        let mut dangling_spouses = Vec::new();
        for (i, record) in records.iter().enumerate() {
            if let Some(spouse) = record.spouse.as_deref() {
                if index.contains_key(spouse) {
                    spouses
                        .entry(record.name.clone())
                        .or_insert_with(|| spouse.to_string());
                } else {
                    dangling_spouses.push((i, spouse.to_string()));
                }
            }
        }

        let cycles = find_cycles(&parent_of);

        tracing::debug!(
            "Resolved {} records: {} roots, {} dangling parents, {} duplicate names, {} cycles",
            records.len(),
            roots.len(),
            dangling_parents.len(),
            duplicates.len(),
            cycles.len()
        );

        Self {
            index,
            parent_of,
            children,
            spouses,
            roots,
            dangling_parents,
            dangling_spouses,
            duplicates,
            cycles,
        }
    }

    /// Number of records resolved
    pub fn len(&self) -> usize {
        self.parent_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent_of.is_empty()
    }

    /// Index of the first record with this name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Index of the resolved parent of record `i`
    pub fn parent_index(&self, i: usize) -> Option<usize> {
        self.parent_of.get(i).copied().flatten()
    }

    /// Names of the children of `name`, in record order
    pub fn children_of(&self, name: &str) -> &[String] {
        self.children.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Spouse of `name`, if it resolves to a record
    pub fn spouse_of(&self, name: &str) -> Option<&str> {
        self.spouses.get(name).map(String::as_str)
    }

    /// Resolvable spouse pairs, one per unordered pair, sorted
    pub fn spouse_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .spouses
            .iter()
            .filter(|(a, b)| a != b)
            .map(|(a, b)| {
                if a <= b {
                    (a.clone(), b.clone())
                } else {
                    (b.clone(), a.clone())
                }
            })
            .collect();
        pairs.sort();
        pairs.dedup();
        pairs
    }

    /// Records with no resolvable parent, dangling ones included
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Records whose parent name matches no record
    pub fn dangling_parents(&self) -> &[(usize, String)] {
        &self.dangling_parents
    }

    /// Records whose spouse name matches no record
    pub fn dangling_spouses(&self) -> &[(usize, String)] {
        &self.dangling_spouses
    }

    /// Names shared by more than one record, with every index
    pub fn duplicates(&self) -> &[(String, Vec<usize>)] {
        &self.duplicates
    }

    /// Parent-link cycles, each starting at its lowest record index
    pub fn cycles(&self) -> &[Vec<usize>] {
        &self.cycles
    }

    /// All transitive descendants of `name`, breadth-first
    pub fn descendants(&self, name: &str) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut order = Vec::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(name);
        seen.insert(name);

        while let Some(current) = queue.pop_front() {
            for child in self.children_of(current) {
                if seen.insert(child.as_str()) {
                    order.push(child.clone());
                    queue.push_back(child.as_str());
                }
            }
        }

        order
    }
}

/// Find cycles in the parent links.
///
/// Each record has at most one parent, so a walk that meets its own path has
/// closed a loop.
fn find_cycles(parent_of: &[Option<usize>]) -> Vec<Vec<usize>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        OnPath,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; parent_of.len()];
    let mut cycles = Vec::new();

    for start in 0..parent_of.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }

        let mut path = Vec::new();
        let mut current = Some(start);
        while let Some(node) = current {
            match marks[node] {
                Mark::Unvisited => {
                    marks[node] = Mark::OnPath;
                    path.push(node);
                    current = parent_of[node];
                }
                Mark::OnPath => {
                    if let Some(pos) = path.iter().position(|&p| p == node) {
                        let mut cycle = path[pos..].to_vec();
                        if let Some(min_pos) = (0..cycle.len()).min_by_key(|&k| cycle[k]) {
                            cycle.rotate_left(min_pos);
                        }
                        cycles.push(cycle);
                    }
                    break;
                }
                Mark::Done => break,
            }
        }

        for node in path {
            marks[node] = Mark::Done;
        }
    }

    cycles.sort_by_key(|cycle| cycle.first().copied());
    cycles
}
