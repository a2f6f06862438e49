//! Generation inference command

use clap::Args;

use super::{load_tree, save_tree};
use crate::output::{print_json, OutputFormat};
use crate::{AppContext, Cli};
use lineage_core::GenerationMode;

#[derive(Args)]
pub struct GenerationsArgs {
    /// overwrite replaces every value; preserve keeps values no parent link reaches
    #[arg(long)]
    pub mode: Option<GenerationMode>,

    /// Generation assigned to roots
    #[arg(long, allow_negative_numbers = true)]
    pub baseline: Option<i32>,

    /// Report without saving
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(args: &GenerationsArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let (mut tree, mut dataset) = load_tree(ctx, false).await?;

    let mut options = ctx.config.generation_options();
    if let Some(mode) = args.mode {
        options = options.with_mode(mode);
    }
    if let Some(baseline) = args.baseline {
        options = options.with_baseline(baseline);
    }
    tracing::debug!(
        "Recomputing generations: mode={}, baseline={}",
        options.mode.as_str(),
        options.baseline
    );

    let report = dataset.recompute_generations(&options);
    for cycle in &report.cycles {
        tracing::warn!("Parent cycle: {}", cycle);
    }

    if !args.dry_run {
        save_tree(ctx, &mut tree, &dataset).await?;
    }
    tracing::info!("Assigned {} generations", report.assigned);

    if cli.format == OutputFormat::Json {
        return print_json(&report);
    }

    let verb = if args.dry_run { "Would assign" } else { "Assigned" };
    println!(
        "{} generations to {} of {} persons (baseline {}, mode {})",
        verb,
        report.assigned,
        dataset.len(),
        options.baseline,
        options.mode.as_str()
    );
    if !report.cycles.is_empty() {
        println!("\nParent cycles ({}):", report.cycles.len());
        for cycle in &report.cycles {
            println!("  {}", cycle);
        }
    }
    if !report.unresolved.is_empty() {
        println!("\nUnresolved ({}):", report.unresolved.len());
        for name in &report.unresolved {
            println!("  {}", name);
        }
    }

    Ok(())
}
