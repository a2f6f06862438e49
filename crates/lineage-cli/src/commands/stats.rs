//! Statistics command

use super::load_tree;
use crate::output::{format_table, print_json, OutputFormat};
use crate::{AppContext, Cli};
use lineage_core::{DatasetStatistics, Gender};

/// Lineages shown in the table view
const TOP_LINEAGES: usize = 10;

pub async fn run(cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let (tree, dataset) = load_tree(ctx, false).await?;
    let stats = DatasetStatistics::compute(&dataset, &dataset.relationships());
    tracing::info!("Computed statistics for {} persons", stats.total);

    if cli.format == OutputFormat::Json {
        return print_json(&stats);
    }

    println!("Tree: {}", tree.name);
    println!("  Total persons: {}", stats.total);
    println!("  Living: {}", stats.living);
    println!("  Deceased: {}", stats.deceased);
    println!(
        "  Gender: {} male, {} female, {} unknown",
        stats.gender_count(Gender::Male),
        stats.gender_count(Gender::Female),
        stats.gender_count(Gender::Unknown)
    );
    println!("  Generations: {}", stats.distinct_generations);
    if stats.without_generation > 0 {
        println!("  Without generation: {}", stats.without_generation);
    }
    match stats.average_lifespan {
        Some(avg) => println!("  Average lifespan: {:.1} years", avg),
        None => println!("  Average lifespan: N/A"),
    }
    if let Some((location, count)) = stats.top_location() {
        println!("  Most common location: {} ({})", location, count);
    }

    if !stats.generations.is_empty() {
        let rows: Vec<Vec<String>> = stats
            .generations
            .iter()
            .map(|(generation, summary)| {
                vec![
                    generation.to_string(),
                    summary.count.to_string(),
                    summary.birth_range(),
                ]
            })
            .collect();
        println!(
            "\n{}",
            format_table(&["Generation", "Persons", "Births"], &rows)
        );
    }

    if !stats.lineages.is_empty() {
        let rows: Vec<Vec<String>> = stats
            .lineages
            .iter()
            .take(TOP_LINEAGES)
            .map(|l| {
                vec![
                    l.root.clone(),
                    l.birth.map(|b| b.to_string()).unwrap_or_else(|| "?".to_string()),
                    l.descendants.to_string(),
                ]
            })
            .collect();
        println!(
            "\n{}",
            format_table(&["Lineage", "Born", "Descendants"], &rows)
        );
    }

    Ok(())
}
