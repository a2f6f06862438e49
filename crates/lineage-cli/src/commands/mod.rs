//! CLI command implementations

pub mod completions;
pub mod config;
pub mod generations;
pub mod io;
pub mod person;
pub mod render;
pub mod search;
pub mod stats;
pub mod tree;
pub mod validate;

use std::io::Write;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use clap::ValueEnum;
use lineage_core::{FamilyDataset, FamilyTree, Gender};
use lineage_storage::StorageBackend;

use crate::AppContext;

/// Gender as accepted on the command line
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum GenderArg {
    Male,
    Female,
    Unknown,
}

impl From<GenderArg> for Gender {
    fn from(g: GenderArg) -> Self {
        match g {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
            GenderArg::Unknown => Gender::Unknown,
        }
    }
}

/// Load the current tree and its dataset.
///
/// With `create`, a missing tree is created; otherwise it is an error.
pub async fn load_tree(
    ctx: &AppContext,
    create: bool,
) -> anyhow::Result<(FamilyTree, FamilyDataset)> {
    let tree = match ctx.storage.get_tree(&ctx.tree).await? {
        Some(tree) => tree,
        None if create => {
            FamilyTree::check_name(&ctx.tree)?;
            let tree = FamilyTree::new(&ctx.tree);
            ctx.storage.save_tree(&tree).await?;
            tracing::info!("Created new tree: {}", ctx.tree);
            tree
        }
        None => anyhow::bail!(
            "Tree '{}' not found. Create it with 'lineage tree create {}'",
            ctx.tree,
            ctx.tree
        ),
    };

    let dataset = ctx.storage.load_dataset(&tree.id).await?;
    tracing::debug!("Loaded {} records from tree '{}'", dataset.len(), tree.name);
    Ok((tree, dataset))
}

/// Persist a dataset and bump the tree's update time
pub async fn save_tree(
    ctx: &AppContext,
    tree: &mut FamilyTree,
    dataset: &FamilyDataset,
) -> anyhow::Result<()> {
    ctx.storage.save_dataset(&tree.id, dataset).await?;
    tree.touch();
    ctx.storage.save_tree(tree).await?;
    Ok(())
}

/// Write content to a file, or stdout when no path is given.
///
/// Files are created with owner-only permissions on unix.
pub fn write_output(path: Option<&Path>, content: &str) -> anyhow::Result<()> {
    let Some(path) = path else {
        print!("{}", content);
        if !content.ends_with('\n') {
            println!();
        }
        return Ok(());
    };

    // Write with secure permissions (0o600 = owner read/write only)
    #[cfg(unix)]
    {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(content.as_bytes())?;
    }
    #[cfg(not(unix))]
    {
        let mut file = std::fs::File::create(path)?;
        file.write_all(content.as_bytes())?;
    }
    Ok(())
}
