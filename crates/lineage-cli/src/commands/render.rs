//! Render command: emits the view model consumed by graph front ends

use std::path::PathBuf;

use clap::Args;

use super::{load_tree, write_output};
use crate::{AppContext, Cli};
use lineage_core::{ColorBy, TreeView};

#[derive(Args)]
pub struct RenderArgs {
    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Node coloring: generation, gender, location or highlight
    #[arg(long)]
    pub color_by: Option<ColorBy>,

    /// Leave birth and death years out of labels
    #[arg(long)]
    pub no_lifespan: bool,

    /// Leave the generation out of labels
    #[arg(long)]
    pub no_generation: bool,

    /// Scale nodes by descendant count
    #[arg(long)]
    pub size_by_descendants: bool,

    /// Color of highlighted persons
    #[arg(long)]
    pub highlight_color: Option<String>,

    /// Color of persons that are not highlighted
    #[arg(long)]
    pub default_color: Option<String>,
}

pub async fn run(args: &RenderArgs, _cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let (_, dataset) = load_tree(ctx, false).await?;

    let mut options = ctx.config.render_options();
    if let Some(color_by) = args.color_by {
        options.color_by = color_by;
    }
    options.show_lifespan &= !args.no_lifespan;
    options.show_generation &= !args.no_generation;
    options.size_by_descendants |= args.size_by_descendants;
    if let Some(color) = &args.highlight_color {
        options.highlight_color = color.clone();
    }
    if let Some(color) = &args.default_color {
        options.default_color = color.clone();
    }

    let view = TreeView::build(&dataset, &dataset.relationships(), &options);
    tracing::info!(
        "Rendered {} nodes and {} edges",
        view.nodes.len(),
        view.edges.len()
    );

    write_output(args.output.as_deref(), &serde_json::to_string_pretty(&view)?)
}
