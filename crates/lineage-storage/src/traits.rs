//! Storage backend trait definitions

use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use lineage_core::{FamilyDataset, FamilyTree, TreeId};

/// Trait for storage backend implementations
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Initialize the storage (create tables, run migrations)
    async fn initialize(&self) -> StorageResult<()>;

    /// Close the storage connection
    async fn close(&self) -> StorageResult<()>;

    /// Health check
    async fn health_check(&self) -> StorageResult<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Tree Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Save a tree, replacing any tree with the same name
    async fn save_tree(&self, tree: &FamilyTree) -> StorageResult<()>;

    /// Get a tree by name
    async fn get_tree(&self, name: &str) -> StorageResult<Option<FamilyTree>>;

    /// Get all trees, ordered by name
    async fn get_all_trees(&self) -> StorageResult<Vec<FamilyTree>>;

    /// Delete a tree and its dataset; missing trees are ignored
    async fn delete_tree(&self, name: &str) -> StorageResult<()>;

    /// Get a tree by name, or fail with `TreeNotFound`
    async fn require_tree(&self, name: &str) -> StorageResult<FamilyTree> {
        self.get_tree(name)
            .await?
            .ok_or_else(|| StorageError::TreeNotFound(name.to_string()))
    }

    /// Create a new tree, failing if the name is taken
    async fn create_tree(&self, tree: &FamilyTree) -> StorageResult<()> {
        if self.get_tree(&tree.name).await?.is_some() {
            return Err(StorageError::DuplicateTree(tree.name.clone()));
        }
        self.save_tree(tree).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dataset Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Load the dataset of a tree; empty when nothing was saved yet
    async fn load_dataset(&self, tree_id: &TreeId) -> StorageResult<FamilyDataset>;

    /// Save the dataset of a tree (replaces existing)
    async fn save_dataset(&self, tree_id: &TreeId, dataset: &FamilyDataset) -> StorageResult<()>;
}
