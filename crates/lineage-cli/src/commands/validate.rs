//! Validate command

use clap::Args;

use super::load_tree;
use crate::output::{format_table, print_json, OutputFormat};
use crate::{AppContext, Cli};
use lineage_core::{validate, Severity};

#[derive(Args)]
pub struct ValidateArgs {
    /// Minimum parent age at a child's birth
    #[arg(long)]
    pub min_parent_age: Option<i32>,

    /// Longest plausible lifespan; 0 disables the check
    #[arg(long)]
    pub max_lifespan: Option<i32>,

    /// Exit successfully even when errors are found
    #[arg(long)]
    pub no_fail: bool,
}

pub async fn run(args: &ValidateArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let (tree, dataset) = load_tree(ctx, false).await?;

    let mut config = ctx.config.validation_config();
    if let Some(age) = args.min_parent_age {
        config = config.with_min_parent_age(age);
    }
    if let Some(years) = args.max_lifespan {
        config = config.with_max_lifespan((years > 0).then_some(years));
    }

    let report = validate(&dataset, &dataset.relationships(), &config);
    let errors = report.count(Severity::Error);
    tracing::info!(
        "Validated {} persons: {} violations ({} errors)",
        dataset.len(),
        report.len(),
        errors
    );

    if cli.format == OutputFormat::Json {
        print_json(report.violations())?;
    } else if report.is_empty() {
        println!("Tree '{}' is consistent ({} persons)", tree.name, dataset.len());
    } else {
        let rows: Vec<Vec<String>> = report
            .violations()
            .iter()
            .map(|v| {
                vec![
                    v.severity.to_string(),
                    v.category.to_string(),
                    v.message.clone(),
                ]
            })
            .collect();
        println!("{}", format_table(&["Severity", "Category", "Message"], &rows));
        println!(
            "\n{} errors, {} warnings, {} info",
            errors,
            report.count(Severity::Warning),
            report.count(Severity::Info)
        );
    }

    if errors > 0 && !args.no_fail {
        anyhow::bail!("Validation found {} errors in tree '{}'", errors, tree.name);
    }

    Ok(())
}
