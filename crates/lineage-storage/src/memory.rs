//! In-memory storage backend for testing

use crate::error::{StorageError, StorageResult};
use crate::traits::StorageBackend;
use async_trait::async_trait;
use lineage_core::{FamilyDataset, FamilyTree, TreeId};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage backend
///
/// Useful for testing and temporary storage.
pub struct MemoryStorage {
    trees: RwLock<HashMap<String, FamilyTree>>,
    datasets: RwLock<HashMap<TreeId, FamilyDataset>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            trees: RwLock::new(HashMap::new()),
            datasets: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Database(format!("Lock error: {}", e))
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        Ok(true)
    }

    // Tree operations

    async fn save_tree(&self, tree: &FamilyTree) -> StorageResult<()> {
        let mut trees = self.trees.write().map_err(lock_error)?;
        trees.insert(tree.name.clone(), tree.clone());
        Ok(())
    }

    async fn get_tree(&self, name: &str) -> StorageResult<Option<FamilyTree>> {
        let trees = self.trees.read().map_err(lock_error)?;
        Ok(trees.get(name).cloned())
    }

    async fn get_all_trees(&self) -> StorageResult<Vec<FamilyTree>> {
        let trees = self.trees.read().map_err(lock_error)?;
        let mut all: Vec<FamilyTree> = trees.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn delete_tree(&self, name: &str) -> StorageResult<()> {
        let removed = self.trees.write().map_err(lock_error)?.remove(name);
        if let Some(tree) = removed {
            self.datasets.write().map_err(lock_error)?.remove(&tree.id);
        }
        Ok(())
    }

    // Dataset operations

    async fn load_dataset(&self, tree_id: &TreeId) -> StorageResult<FamilyDataset> {
        let datasets = self.datasets.read().map_err(lock_error)?;
        Ok(datasets.get(tree_id).cloned().unwrap_or_default())
    }

    async fn save_dataset(&self, tree_id: &TreeId, dataset: &FamilyDataset) -> StorageResult<()> {
        let mut datasets = self.datasets.write().map_err(lock_error)?;
        datasets.insert(tree_id.clone(), dataset.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_core::PersonRecord;

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.initialize().await.unwrap();

        let tree = FamilyTree::new("asher");
        storage.create_tree(&tree).await.unwrap();
        assert!(matches!(
            storage.create_tree(&FamilyTree::new("asher")).await,
            Err(StorageError::DuplicateTree(_))
        ));

        let dataset = FamilyDataset::from_records(vec![
            PersonRecord::new("Jacob"),
            PersonRecord::new("Leah").with_parent("Jacob"),
        ]);
        storage.save_dataset(&tree.id, &dataset).await.unwrap();
        assert_eq!(storage.load_dataset(&tree.id).await.unwrap(), dataset);

        storage.delete_tree("asher").await.unwrap();
        assert!(storage.get_tree("asher").await.unwrap().is_none());
        assert!(storage.load_dataset(&tree.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_require_tree() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            storage.require_tree("missing").await,
            Err(StorageError::TreeNotFound(name)) if name == "missing"
        ));
    }

    #[tokio::test]
    async fn test_trees_sorted_by_name() {
        let storage = MemoryStorage::new();
        for name in ["zeta", "alpha", "mid"] {
            storage.save_tree(&FamilyTree::new(name)).await.unwrap();
        }
        let names: Vec<String> = storage
            .get_all_trees()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }
}
