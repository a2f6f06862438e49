//! Lineage CLI - Command line interface for family trees

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{
    completions, config as config_cmd, generations, io, person, render, search, stats, tree,
    validate,
};
use config::{config_file_path, Config};
use lineage_storage::{RedbStorage, StorageBackend};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "lineage")]
#[command(
    author,
    version,
    about = "Genealogy tool: family trees, generations, validation and statistics"
)]
pub struct Cli {
    /// Family tree to operate on (default: from config)
    #[arg(short, long, global = true, env = "LINEAGE_TREE")]
    pub tree: Option<String>,

    /// Data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<String>,

    /// Config file
    #[arg(long, global = true, env = "LINEAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Path of the config file in effect
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage family trees
    Tree(tree::TreeArgs),
    /// Manage persons in the current tree
    Person(person::PersonArgs),
    /// Infer generation numbers from parent links
    Generations(generations::GenerationsArgs),
    /// Check the tree for inconsistencies
    Validate(validate::ValidateArgs),
    /// Show tree statistics
    Stats,
    /// Search persons
    Search(search::SearchArgs),
    /// Import persons from CSV or JSON
    Import(io::ImportArgs),
    /// Export the tree as JSON, CSV or GraphML
    Export(io::ExportArgs),
    /// Emit the renderer view model as JSON
    Render(render::RenderArgs),
    /// Manage configuration
    Config(config_cmd::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with storage backend and configuration
pub struct AppContext {
    pub storage: Arc<dyn StorageBackend>,
    pub config: Config,
    /// Tree selected by `--tree` or the config default
    pub tree: String,
}

impl AppContext {
    pub async fn new(cli: &Cli, config: Config) -> anyhow::Result<Self> {
        let data_dir = cli
            .data_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| config.data_dir());
        std::fs::create_dir_all(&data_dir)?;

        let db_path = data_dir.join("lineage.redb");
        tracing::debug!("Using database at: {:?}", db_path);

        let storage = RedbStorage::open(&db_path)?;
        let tree = cli
            .tree
            .clone()
            .unwrap_or_else(|| config.default_tree.clone());

        Self::with_storage(Arc::new(storage), config, tree).await
    }

    /// Build a context over an already opened backend
    pub async fn with_storage(
        storage: Arc<dyn StorageBackend>,
        config: Config,
        tree: String,
    ) -> anyhow::Result<Self> {
        storage.initialize().await?;
        if !storage.health_check().await? {
            anyhow::bail!("Storage failed its health check");
        }

        Ok(Self {
            storage,
            config,
            tree,
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting lineage CLI");

    // Commands that need no storage
    match &cli.command {
        Commands::Config(args) => return config_cmd::run(args, &cli.config_path()),
        Commands::Completions(args) => return completions::run(args),
        _ => {}
    }

    let config = Config::load(&cli.config_path())?;
    let ctx = AppContext::new(&cli, config).await?;

    match &cli.command {
        Commands::Tree(args) => tree::run(args, &cli, &ctx).await?,
        Commands::Person(args) => person::run(args, &cli, &ctx).await?,
        Commands::Generations(args) => generations::run(args, &cli, &ctx).await?,
        Commands::Validate(args) => validate::run(args, &cli, &ctx).await?,
        Commands::Stats => stats::run(&cli, &ctx).await?,
        Commands::Search(args) => search::run(args, &cli, &ctx).await?,
        Commands::Import(args) => io::run_import(args, &cli, &ctx).await?,
        Commands::Export(args) => io::run_export(args, &cli, &ctx).await?,
        Commands::Render(args) => render::run(args, &cli, &ctx).await?,
        Commands::Config(_) | Commands::Completions(_) => {}
    }

    ctx.storage.close().await?;
    Ok(())
}
