//! CLI administration tool for base62-shortener.
//!
//! Talks to the record store directly, bypassing the HTTP API and the cache.
//!
//! # Usage
//!
//! ```bash
//! # Offline alias arithmetic
//! cargo run --bin admin -- encode 125
//! cargo run --bin admin -- decode 21
//!
//! # Shorten and resolve through the service
//! cargo run --bin admin -- shorten https://example.com
//! cargo run --bin admin -- resolve 1
//!
//! # Record counts
//! cargo run --bin admin -- stats
//!
//! # Database tools
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db repair --limit 500
//! ```
//!
//! # Environment Variables
//!
//! Same database settings as the server (`DATABASE_URL` or `DB_*`).

use base62_shortener::application::services::{LinkService, ServiceSettings};
use base62_shortener::config::{self, Config};
use base62_shortener::infrastructure::cache::NullCache;
use base62_shortener::infrastructure::persistence::PgLinkRepository;
use base62_shortener::server::connect_database;
use base62_shortener::utils::base62;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing base62-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Print the alias for a record id
    Encode {
        /// Record id (positive integer)
        id: u64,
    },

    /// Print the record id an alias decodes to
    Decode {
        /// Alias to decode
        alias: String,
    },

    /// Shorten a URL (returns the existing alias if already shortened)
    Shorten {
        /// Original URL
        url: String,
    },

    /// Resolve an alias to its original URL
    Resolve {
        /// Alias to resolve
        alias: String,
    },

    /// Show record counts
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Attach aliases to records left without one
    Repair {
        /// Maximum number of records to repair
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { id } => encode(id)?,
        Commands::Decode { alias } => decode(&alias)?,
        Commands::Shorten { url } => shorten(&connect().await?, &url).await?,
        Commands::Resolve { alias } => resolve(&connect().await?, &alias).await?,
        Commands::Stats => stats(&connect().await?).await?,
        Commands::Db { action } => handle_db_action(action, &connect().await?).await?,
    }

    Ok(())
}

/// Builds a service over PostgreSQL with caching disabled.
async fn connect() -> Result<LinkService> {
    let config: Config = config::load_from_env().context("Failed to load configuration")?;
    let pool = connect_database(&config).await?;

    Ok(LinkService::new(
        Arc::new(PgLinkRepository::new(Arc::new(pool))),
        Arc::new(NullCache::new()),
        ServiceSettings::from_config(&config),
    ))
}

fn encode(id: u64) -> Result<()> {
    if id == 0 {
        anyhow::bail!("Record ids start at 1");
    }

    println!("{}", base62::encode(id).bright_yellow().bold());
    Ok(())
}

fn decode(alias: &str) -> Result<()> {
    let id = base62::decode(alias).with_context(|| format!("Cannot decode '{}'", alias))?;

    println!("{}", id.to_string().bright_yellow().bold());
    if !base62::is_canonical(alias) {
        println!(
            "{}",
            "⚠️  Non-canonical spelling: the service will not resolve it".yellow()
        );
    }

    Ok(())
}

async fn shorten(service: &LinkService, url: &str) -> Result<()> {
    let link = service
        .create_link(url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    println!("{}", "✅ Shortened".green().bold());
    println!("  ID:    {}", link.id.to_string().bright_black());
    println!("  Alias: {}", link.alias.bright_yellow().bold());
    println!("  URL:   {}", link.original_url.cyan());

    Ok(())
}

async fn resolve(service: &LinkService, alias: &str) -> Result<()> {
    let url = service
        .resolve(alias)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to resolve '{}': {}", alias, e))?;

    println!("{}", url.cyan());
    Ok(())
}

/// Displays total and pending record counts.
async fn stats(service: &LinkService) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let counts = service
        .counts()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    println!(
        "  Links:   {}",
        counts.total.to_string().bright_green().bold()
    );

    let pending = counts.pending.to_string();
    println!(
        "  Pending: {}",
        if counts.pending > 0 {
            pending.yellow().bold()
        } else {
            pending.bright_green().bold()
        }
    );
    println!();

    if counts.pending > 0 {
        println!(
            "  Attach missing aliases with: {} admin db repair",
            "cargo run --bin".bright_cyan()
        );
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, service: &LinkService) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            if !service.health().await.db {
                anyhow::bail!("Database connection failed");
            }

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Repair { limit, yes } => repair(service, limit, yes).await?,
    }

    Ok(())
}

/// Attaches aliases to pending records after confirmation (unless `--yes`).
async fn repair(service: &LinkService, limit: i64, skip_confirm: bool) -> Result<()> {
    if limit <= 0 {
        anyhow::bail!("--limit must be positive");
    }

    println!("{}", "🔧 Repair pending links".bright_blue().bold());
    println!();

    let counts = service
        .counts()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    if counts.pending == 0 {
        println!("{}", "  Nothing to repair".green());
        return Ok(());
    }

    println!(
        "  {} pending, repairing up to {}",
        counts.pending.to_string().yellow().bold(),
        limit
    );

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Attach aliases now?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let repaired = service
        .repair_pending(limit)
        .await
        .map_err(|e| anyhow::anyhow!("Repair failed: {}", e))?;

    for link in &repaired {
        println!(
            "  {:<8} {:<12} {}",
            link.id.to_string().bright_black(),
            link.alias.bright_yellow(),
            link.original_url.cyan()
        );
    }

    println!();
    println!(
        "{} {}",
        "✅ Repaired".green().bold(),
        repaired.len().to_string().bright_white().bold()
    );

    Ok(())
}
