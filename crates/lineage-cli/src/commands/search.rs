//! Search command

use clap::Args;

use super::{load_tree, GenderArg};
use crate::output::{format_table, or_dash, print_json, OutputFormat};
use crate::{AppContext, Cli};
use lineage_core::{PersonQuery, SearchMode};
use lineage_search::engine_for;

#[derive(Args)]
pub struct SearchArgs {
    /// Text matched against name, location, occupation, spouse and notes
    #[arg(default_value = "")]
    pub query: String,

    /// Use fuzzy matching
    #[arg(long)]
    pub fuzzy: bool,

    /// Only this generation
    #[arg(long, allow_negative_numbers = true)]
    pub generation: Option<i32>,

    #[arg(long, value_enum)]
    pub gender: Option<GenderArg>,

    /// Location substring
    #[arg(long)]
    pub location: Option<String>,

    /// Only persons without a death year
    #[arg(long)]
    pub living: bool,

    /// Results per page
    #[arg(short, long, default_value = "100")]
    pub limit: usize,

    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: usize,
}

impl SearchArgs {
    fn to_query(&self) -> PersonQuery {
        let mode = if self.fuzzy {
            SearchMode::Fuzzy
        } else {
            SearchMode::Exact
        };

        let mut query = PersonQuery::new(&self.query)
            .with_mode(mode)
            .with_pagination(self.page, self.limit);
        if let Some(generation) = self.generation {
            query = query.with_generation(generation);
        }
        if let Some(gender) = self.gender {
            query = query.with_gender(gender.into());
        }
        if let Some(location) = &self.location {
            query = query.with_location(location);
        }
        if self.living {
            query = query.living_only();
        }
        query
    }
}

pub async fn run(args: &SearchArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let (tree, dataset) = load_tree(ctx, false).await?;

    let query = args.to_query();
    let engine = engine_for(query.mode)?;
    let results = engine.search(&query, dataset.records())?;
    tracing::info!(
        "Search '{}' found {} matches",
        args.query,
        results.pagination.total_count
    );

    if cli.format == OutputFormat::Json {
        let records: Vec<_> = results.data.iter().map(|hit| &hit.record).collect();
        return print_json(&serde_json::json!({
            "data": records,
            "pagination": results.pagination,
        }));
    }

    if results.data.is_empty() {
        println!("No matches in tree '{}'", tree.name);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = results
        .data
        .iter()
        .map(|hit| {
            let r = &hit.record;
            vec![
                r.name.clone(),
                r.birth.to_string(),
                or_dash(r.generation),
                r.location.clone(),
                r.occupation.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        format_table(&["Name", "Birth", "Gen", "Location", "Occupation"], &rows)
    );

    let info = &results.pagination;
    println!(
        "\nPage {} of {} ({} matches)",
        info.current_page, info.total_pages, info.total_count
    );

    Ok(())
}
