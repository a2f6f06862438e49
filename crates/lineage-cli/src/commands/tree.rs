//! Tree commands

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::config::Config;
use crate::output::{format_table, print_json, OutputFormat};
use crate::{AppContext, Cli};
use lineage_core::{validate, FamilyTree};
use lineage_storage::StorageBackend;

#[derive(Args)]
pub struct TreeArgs {
    #[command(subcommand)]
    pub command: TreeCommands,
}

#[derive(Subcommand)]
pub enum TreeCommands {
    /// List all trees
    List,
    /// Create a new tree
    Create {
        /// Tree name
        name: String,
        /// Tree description
        #[arg(long)]
        description: Option<String>,
    },
    /// Set the default tree
    Use {
        /// Tree name
        name: String,
    },
    /// Delete a tree and all its persons
    Delete {
        /// Tree name
        name: String,
        /// Force deletion without confirmation
        #[arg(long)]
        force: bool,
    },
    /// Show details of the current tree
    Show,
}

#[derive(Serialize)]
struct TreeSummary<'a> {
    #[serde(flatten)]
    tree: &'a FamilyTree,
    persons: usize,
    errors: usize,
    warnings: usize,
}

pub async fn run(args: &TreeArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    tracing::debug!("Running tree command");

    match &args.command {
        TreeCommands::List => {
            let trees = ctx.storage.get_all_trees().await?;
            tracing::info!("Found {} trees", trees.len());

            if cli.format == OutputFormat::Json {
                return print_json(&trees);
            }

            if trees.is_empty() {
                println!("No trees found. Create one with 'lineage tree create <name>'");
            } else {
                println!("Trees ({} found):", trees.len());
                for tree in &trees {
                    let current = if tree.name == ctx.tree { " (current)" } else { "" };
                    let desc = tree
                        .description
                        .as_ref()
                        .map(|d| format!(" - {}", d))
                        .unwrap_or_default();
                    println!("  {}{}{}", tree.name, current, desc);
                }
            }
        }
        TreeCommands::Create { name, description } => {
            FamilyTree::check_name(name)?;

            let mut tree = FamilyTree::new(name);
            if let Some(desc) = description {
                tree = tree.with_description(desc);
            }

            ctx.storage.create_tree(&tree).await?;
            tracing::info!("Created tree: {}", name);

            println!("Created tree: {}", name);
            if let Some(desc) = description {
                println!("  description: {}", desc);
            }
        }
        TreeCommands::Use { name } => {
            if ctx.storage.get_tree(name).await?.is_none() {
                anyhow::bail!(
                    "Tree '{}' not found. Create it with 'lineage tree create {}'",
                    name,
                    name
                );
            }

            let path = cli.config_path();
            let mut config = Config::load(&path)?;
            config.set("default_tree", name)?;
            config.save(&path)?;

            tracing::info!("Switched default tree to: {}", name);
            println!("Default tree is now '{}'", name);
        }
        TreeCommands::Delete { name, force } => {
            let tree = match ctx.storage.get_tree(name).await? {
                Some(t) => t,
                None => anyhow::bail!("Tree '{}' not found", name),
            };

            let person_count = ctx.storage.load_dataset(&tree.id).await?.len();

            if !force {
                println!("Tree '{}' has {} persons", name, person_count);
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            ctx.storage.delete_tree(name).await?;
            tracing::info!("Deleted tree: {} ({} persons)", name, person_count);
            println!("Deleted tree: {} ({} persons)", name, person_count);
        }
        TreeCommands::Show => {
            let (tree, dataset) = super::load_tree(ctx, false).await?;
            let report = validate(
                &dataset,
                &dataset.relationships(),
                &ctx.config.validation_config(),
            );

            let summary = TreeSummary {
                tree: &tree,
                persons: dataset.len(),
                errors: report.errors().count(),
                warnings: report.warnings().count(),
            };

            if cli.format == OutputFormat::Json {
                return print_json(&summary);
            }

            let rows = vec![
                vec!["Name".to_string(), tree.name.clone()],
                vec!["ID".to_string(), tree.id.to_string()],
                vec![
                    "Description".to_string(),
                    tree.description.clone().unwrap_or_else(|| "-".to_string()),
                ],
                vec!["Created".to_string(), tree.created_at.to_rfc3339()],
                vec!["Updated".to_string(), tree.updated_at.to_rfc3339()],
                vec!["Persons".to_string(), summary.persons.to_string()],
                vec!["Errors".to_string(), summary.errors.to_string()],
                vec!["Warnings".to_string(), summary.warnings.to_string()],
            ];
            println!("{}", format_table(&["Field", "Value"], &rows));
        }
    }

    Ok(())
}
