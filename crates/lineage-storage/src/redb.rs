//! ReDB storage backend

use crate::error::{StorageError, StorageResult};
use crate::migration::Migratable;
use crate::traits::StorageBackend;
use async_trait::async_trait;
use lineage_core::{FamilyDataset, FamilyTree, TreeId};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

// Table definitions
const TREES: TableDefinition<&str, &[u8]> = TableDefinition::new("trees");
const DATASETS: TableDefinition<&str, &[u8]> = TableDefinition::new("datasets");
const META: TableDefinition<&str, u32> = TableDefinition::new("meta");

const SCHEMA_VERSION_KEY: &str = "schema_version";

/// ReDB storage backend
///
/// Trees are keyed by name; each dataset is stored whole under its tree ID.
pub struct RedbStorage {
    db: Mutex<Database>,
}

impl RedbStorage {
    /// Open or create a ReDB database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path).map_err(|e| StorageError::Database(e.to_string()))?;

        // Initialize the version table
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| StorageError::Database(e.to_string()))?;
            {
                let _ = write_txn.open_table(META)?;
            }
            write_txn
                .commit()
                .map_err(|e| StorageError::Database(e.to_string()))?;
        }

        let storage = Self { db: Mutex::new(db) };
        storage.migrate_to_latest()?;
        Ok(storage)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))
    }
}

impl Migratable for RedbStorage {
    fn get_schema_version(&self) -> StorageResult<u32> {
        let db = self.lock()?;
        let read_txn = db
            .begin_read()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let table = read_txn.open_table(META)?;
        let version = table.get(SCHEMA_VERSION_KEY)?.map(|v| v.value());
        Ok(version.unwrap_or(0))
    }

    fn set_schema_version(&self, version: u32) -> StorageResult<()> {
        let db = self.lock()?;
        let write_txn = db
            .begin_write()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        {
            let mut table = write_txn.open_table(META)?;
            table.insert(SCHEMA_VERSION_KEY, version)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn run_migration(&self, version: u32) -> StorageResult<()> {
        match version {
            1 => {
                let db = self.lock()?;
                let write_txn = db
                    .begin_write()
                    .map_err(|e| StorageError::Database(e.to_string()))?;
                {
                    let _ = write_txn.open_table(TREES)?;
                    let _ = write_txn.open_table(DATASETS)?;
                }
                write_txn.commit()?;
                Ok(())
            }
            other => Err(StorageError::Migration(format!(
                "no migration defined for schema version {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl StorageBackend for RedbStorage {
    async fn initialize(&self) -> StorageResult<()> {
        self.migrate_to_latest()
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        Ok(self.get_schema_version()? > 0)
    }

    async fn save_tree(&self, tree: &FamilyTree) -> StorageResult<()> {
        let value = serde_json::to_vec(tree)?;

        let db = self.lock()?;
        let write_txn = db
            .begin_write()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        {
            let mut table = write_txn.open_table(TREES)?;
            table.insert(tree.name.as_str(), value.as_slice())?;
        }
        write_txn.commit()?;

        Ok(())
    }

    async fn get_tree(&self, name: &str) -> StorageResult<Option<FamilyTree>> {
        let db = self.lock()?;
        let read_txn = db
            .begin_read()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let table = read_txn.open_table(TREES)?;

        if let Some(value) = table.get(name)? {
            let tree: FamilyTree = serde_json::from_slice(value.value())?;
            Ok(Some(tree))
        } else {
            Ok(None)
        }
    }

    async fn get_all_trees(&self) -> StorageResult<Vec<FamilyTree>> {
        let db = self.lock()?;
        let read_txn = db
            .begin_read()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let table = read_txn.open_table(TREES)?;

        // Keys iterate in name order
        let mut trees = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let tree: FamilyTree = serde_json::from_slice(value.value())?;
            trees.push(tree);
        }

        Ok(trees)
    }

    async fn delete_tree(&self, name: &str) -> StorageResult<()> {
        let tree = match self.get_tree(name).await? {
            Some(t) => t,
            None => return Ok(()),
        };
        let dataset_key = tree.id.to_string();

        // Tree and dataset go in one transaction
        let db = self.lock()?;
        let write_txn = db
            .begin_write()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        {
            let mut trees = write_txn.open_table(TREES)?;
            trees.remove(name)?;
            let mut datasets = write_txn.open_table(DATASETS)?;
            datasets.remove(dataset_key.as_str())?;
        }
        write_txn.commit()?;

        tracing::debug!("Deleted tree '{}' and its dataset", name);
        Ok(())
    }

    async fn load_dataset(&self, tree_id: &TreeId) -> StorageResult<FamilyDataset> {
        let key = tree_id.to_string();

        let db = self.lock()?;
        let read_txn = db
            .begin_read()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let table = read_txn.open_table(DATASETS)?;

        match table.get(key.as_str())? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Ok(FamilyDataset::new()),
        }
    }

    async fn save_dataset(&self, tree_id: &TreeId, dataset: &FamilyDataset) -> StorageResult<()> {
        let key = tree_id.to_string();
        let value = serde_json::to_vec(dataset)?;

        let db = self.lock()?;
        let write_txn = db
            .begin_write()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        {
            let mut table = write_txn.open_table(DATASETS)?;
            table.insert(key.as_str(), value.as_slice())?;
        }
        write_txn.commit()?;

        tracing::debug!("Saved {} records for tree {}", dataset.len(), tree_id);
        Ok(())
    }
}
