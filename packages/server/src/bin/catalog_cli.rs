//! Operator CLI for the resource catalog
//!
//! Runs migrations and queries the catalog the same way the HTTP API does.
//! Every command prints JSON on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use catalog_core::config::Config;
use catalog_core::domains::catalog::{PgCatalogStore, SearchEngine, SearchError, SearchParams};

#[derive(Parser)]
#[command(name = "catalog_cli")]
#[command(about = "Resource catalog CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// List categories
    Categories,

    /// Search resources (same parameters as GET /resources)
    Search(SearchArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// Case-insensitive text matched against title and description
    #[arg(long)]
    search: Option<String>,
    /// Category slug
    #[arg(long)]
    category: Option<String>,
    /// pc, android, ios, mobile or other
    #[arg(long)]
    platform: Option<String>,
    /// Comma separated; every tag must be present
    #[arg(long)]
    tags: Option<String>,
    /// recency, downloads, likes or alphabetical
    #[arg(long)]
    sort: Option<String>,
    #[arg(long)]
    page: Option<String>,
    #[arg(long)]
    page_size: Option<String>,
}

impl From<SearchArgs> for SearchParams {
    fn from(args: SearchArgs) -> Self {
        SearchParams {
            search: args.search,
            category: args.category,
            platform: args.platform,
            tags: args.tags,
            sort: args.sort,
            page: args.page,
            page_size: args.page_size,
        }
    }
}

// ============================================================================
// JSON Response Types
// ============================================================================

#[derive(Serialize)]
struct ErrorOutput {
    success: bool,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    message: String,
}

#[derive(Serialize)]
struct MessageOutput {
    success: bool,
    message: String,
}

fn output<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let pool = get_pool(&config).await?;

    match cli.command {
        Commands::Migrate => cmd_migrate(&pool).await,
        Commands::Categories => cmd_categories(engine(&config, pool)).await,
        Commands::Search(args) => cmd_search(engine(&config, pool), args).await,
    }
}

async fn get_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

fn engine(config: &Config, pool: PgPool) -> SearchEngine {
    SearchEngine::new(Arc::new(PgCatalogStore::new(pool)), config.page_limits)
}

// ============================================================================
// Commands
// ============================================================================

async fn cmd_migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    output(&MessageOutput {
        success: true,
        message: "Migrations applied".to_string(),
    })
}

async fn cmd_categories(engine: SearchEngine) -> Result<()> {
    match engine.categories().await {
        Ok(categories) => output(&categories),
        Err(e) => fail(e),
    }
}

async fn cmd_search(engine: SearchEngine, args: SearchArgs) -> Result<()> {
    let params = SearchParams::from(args);
    let result = match params.into_filter_spec(engine.limits().default_page_size) {
        Ok(spec) => engine.search(&spec).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(page) => output(&page),
        Err(e) => fail(e),
    }
}

/// Print the error as JSON and exit non-zero.
fn fail(error: SearchError) -> Result<()> {
    let (kind, field, code) = match &error {
        SearchError::InvalidFilter { field, .. } => ("InvalidFilter", Some(*field), 2),
        SearchError::StorageUnavailable(_) => ("StorageUnavailable", None, 1),
    };
    let message = match &error {
        SearchError::InvalidFilter { message, .. } => message.clone(),
        other => other.to_string(),
    };
    output(&ErrorOutput {
        success: false,
        error: kind,
        field,
        message,
    })?;
    std::process::exit(code);
}
