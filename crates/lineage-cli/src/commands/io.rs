//! Import/Export commands

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};

use super::{load_tree, save_tree, write_output};
use crate::output::{print_json, OutputFormat};
use crate::{AppContext, Cli};
use lineage_core::interchange::graphml;
use lineage_core::{Format, ImportReport};

/// Input format
#[derive(Clone, Copy, ValueEnum)]
pub enum InputFormat {
    Csv,
    Json,
}

impl From<InputFormat> for Format {
    fn from(f: InputFormat) -> Self {
        match f {
            InputFormat::Csv => Format::Csv,
            InputFormat::Json => Format::Json,
        }
    }
}

/// Export format
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    #[value(name = "graphml")]
    GraphML,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Input file (.csv or .json)
    pub file: PathBuf,

    /// Input format (default: from the file extension)
    #[arg(long, value_enum)]
    pub input_format: Option<InputFormat>,

    /// Append to existing persons (default: error if the tree is not empty)
    #[arg(long)]
    pub merge: bool,

    /// Recompute generations after importing
    #[arg(long)]
    pub recompute: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format
    #[arg(long, value_enum, default_value = "json")]
    pub export_format: ExportFormat,
}

pub async fn run_import(args: &ImportArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    tracing::info!("Importing from {:?}", args.file);

    let format = match args.input_format {
        Some(format) => Format::from(format),
        None => Format::from_path(&args.file)?,
    };
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let ImportReport { records, skipped } = format.import(&content)?;

    let (mut tree, mut dataset) = load_tree(ctx, true).await?;
    if !dataset.is_empty() && !args.merge {
        anyhow::bail!(
            "Tree '{}' already has {} persons. Use --merge to append",
            tree.name,
            dataset.len()
        );
    }

    let imported = records.len();
    dataset.extend(records);

    let generations = if args.recompute {
        Some(dataset.recompute_generations(&ctx.config.generation_options()))
    } else {
        None
    };

    save_tree(ctx, &mut tree, &dataset).await?;
    tracing::info!(
        "Imported {} persons into '{}' ({} rows skipped)",
        imported,
        tree.name,
        skipped.len()
    );

    if cli.format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "tree": tree.name,
            "format": format,
            "imported": imported,
            "skipped": skipped,
            "generations": generations,
        }));
    }

    println!(
        "Imported {} persons from {} into tree '{}'",
        imported,
        format,
        tree.name
    );
    if !skipped.is_empty() {
        println!("Skipped {} rows:", skipped.len());
        for row in &skipped {
            println!("  row {}: {}", row.row, row.reason);
        }
    }
    if let Some(report) = generations {
        println!("Assigned {} generations", report.assigned);
        for cycle in &report.cycles {
            println!("  parent cycle: {}", cycle);
        }
    }

    Ok(())
}

pub async fn run_export(args: &ExportArgs, _cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let (tree, dataset) = load_tree(ctx, false).await?;

    let content = match args.export_format {
        ExportFormat::Json => Format::Json.export(&dataset)?,
        ExportFormat::Csv => Format::Csv.export(&dataset)?,
        ExportFormat::GraphML => graphml::export(&dataset, &dataset.relationships(), &tree.name),
    };

    write_output(args.output.as_deref(), &content)?;

    if let Some(path) = &args.output {
        tracing::info!("Exported {} persons to {:?}", dataset.len(), path);
        eprintln!("Exported {} persons to {}", dataset.len(), path.display());
    }

    Ok(())
}
