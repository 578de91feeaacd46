//! CLI administration tool for linkforge.
//!
//! Checks the schema and manages links and statistics without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check connection, table, and the atomic click counter
//! cargo run --bin admin -- db check
//!
//! # Create a link (prompts for missing values)
//! cargo run --bin admin -- link create --url example.com/page --owner user-1
//!
//! # Show a link without counting a visit
//! cargo run --bin admin -- link show k3x9qa
//!
//! # Global or per-owner statistics
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- stats --owner user-1
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or the `DB_*` components (see the `config` module)
//! - `PUBLIC_BASE_URL` - used to print short URLs

use linkforge::application::services::{
    CountingMode, DashboardService, LinkService, RedirectService,
};
use linkforge::config::{Config, mask_connection_string};
use linkforge::domain::repositories::LinkRepository;
use linkforge::infrastructure::persistence::PgLinkRepository;
use linkforge::server::connect_pool;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkforge.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats {
        /// Restrict to one owner's links
        #[arg(short, long)]
        owner: Option<String>,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a short link
    Create {
        /// URL to shorten (scheme optional)
        #[arg(short, long)]
        url: Option<String>,

        /// Owner identity
        #[arg(short, long)]
        owner: Option<String>,
    },

    /// Show a link by short code (does not count a visit)
    Show {
        /// Short code (normalized before lookup)
        code: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check connection, `links` table, and `increment_click_count`
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &pool, &config).await?,
        Commands::Stats { owner } => handle_stats(owner, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &config).await?,
    }

    Ok(())
}

fn repository(pool: &PgPool) -> Arc<PgLinkRepository> {
    Arc::new(PgLinkRepository::new(Arc::new(pool.clone())))
}

fn short_url(config: &Config, code: &str) -> String {
    format!("{}/{}", config.public_base_url.trim_end_matches('/'), code)
}

/// Dispatches link commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool, config: &Config) -> Result<()> {
    match action {
        LinkAction::Create { url, owner } => create_link(pool, config, url, owner).await,
        LinkAction::Show { code } => show_link(pool, config, &code).await,
    }
}

/// Creates a link through the same allocator the API uses.
async fn create_link(
    pool: &PgPool,
    config: &Config,
    url: Option<String>,
    owner: Option<String>,
) -> Result<()> {
    println!("{}", "🔗 Create Link".bright_blue().bold());
    println!();

    let url = match url {
        Some(u) => u,
        None => Input::new().with_prompt("URL").interact_text()?,
    };

    let owner = match owner {
        Some(o) => o,
        None => Input::new()
            .with_prompt("Owner")
            .with_initial_text("admin")
            .interact_text()?,
    };

    let service = LinkService::new(repository(pool));
    let link = service
        .create_link(&url, &owner)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!("{}", "✅ Link created".green().bold());
    println!();
    println!("  Code:      {}", link.short_code.bright_yellow().bold());
    println!("  Short URL: {}", short_url(config, &link.short_code).cyan());
    println!("  Target:    {}", link.original_url);
    println!("  Owner:     {}", link.owner_id);
    println!();

    Ok(())
}

/// Resolves a code and prints the stored link.
async fn show_link(pool: &PgPool, config: &Config, code: &str) -> Result<()> {
    let service = RedirectService::new(repository(pool), CountingMode::Strict);

    let link = service
        .resolve(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("{}", "🔗 Link".bright_blue().bold());
    println!();
    println!("  ID:        {}", link.id.to_string().bright_black());
    println!("  Code:      {}", link.short_code.bright_yellow().bold());
    println!("  Short URL: {}", short_url(config, &link.short_code).cyan());
    println!("  Target:    {}", link.original_url);
    println!("  Owner:     {}", link.owner_id);
    println!(
        "  Clicks:    {}",
        link.click_count.to_string().bright_green().bold()
    );
    println!(
        "  Created:   {}",
        link.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );
    println!();

    Ok(())
}

/// Displays global or per-owner statistics.
async fn handle_stats(owner: Option<String>, pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    match owner {
        Some(owner) => {
            let service = DashboardService::new(repository(pool));
            let dashboard = service
                .dashboard(&owner)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to load dashboard: {}", e))?;

            println!("  Owner:          {}", owner.cyan());
            println!(
                "  Links:          {}",
                dashboard.stats.total_links.to_string().bright_green().bold()
            );
            println!(
                "  Clicks:         {}",
                dashboard.stats.total_clicks.to_string().bright_green().bold()
            );
            println!(
                "  Last 7 days:    {}",
                dashboard
                    .stats
                    .links_last_7_days
                    .to_string()
                    .bright_green()
                    .bold()
            );
        }
        None => {
            let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(pool)
                .await?;

            let clicks_count: i64 =
                sqlx::query_scalar("SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM links")
                    .fetch_one(pool)
                    .await?;

            let owners_count: i64 =
                sqlx::query_scalar("SELECT COUNT(DISTINCT owner_id) FROM links")
                    .fetch_one(pool)
                    .await?;

            println!(
                "  Links:  {}",
                links_count.to_string().bright_green().bold()
            );
            println!(
                "  Clicks: {}",
                clicks_count.to_string().bright_green().bold()
            );
            println!(
                "  Owners: {}",
                owners_count.to_string().bright_green().bold()
            );
        }
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database...".bright_blue());
            println!();

            repository(pool)
                .ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;
            println!("{}", "  ✅ Connection OK".green());

            let table_exists: bool =
                sqlx::query_scalar("SELECT to_regclass('public.links') IS NOT NULL")
                    .fetch_one(pool)
                    .await?;

            if table_exists {
                println!("{}", "  ✅ Table `links` exists".green());
            } else {
                println!("{}", "  ❌ Table `links` is missing".red().bold());
                println!("     Start the server once to apply migrations.");
            }

            let function_exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM pg_proc WHERE proname = 'increment_click_count')",
            )
            .fetch_one(pool)
            .await?;

            if function_exists {
                println!("{}", "  ✅ Function `increment_click_count` exists".green());
            } else if config.counting_mode == CountingMode::Strict {
                println!(
                    "{}",
                    "  ❌ Function `increment_click_count` is missing; strict counting will drop every visit"
                        .red()
                        .bold()
                );
            } else {
                println!(
                    "{}",
                    "  ⚠️  Function `increment_click_count` is missing; visits use read-then-write"
                        .yellow()
                );
            }
            println!();
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!(
                "  Connection: {}",
                mask_connection_string(&config.database_url).bright_white()
            );
            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
