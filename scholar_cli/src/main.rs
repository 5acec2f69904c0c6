use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use scholar_cli::config::{AppConfig, ConfigManager, get_config};
use scholar_core::cache::{ResultCache, SqliteCacheStore};
use scholar_core::models::ParsedReport;
use scholar_core::parser::parse_report;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "scholar")]
#[command(author, version, about = "ScholarSource - educational resource discovery tooling", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a saved discovery report into structured resources
    Parse {
        /// Markdown report file to parse
        report: PathBuf,

        /// Comma-separated domains to exclude from the results
        #[arg(long, value_name = "DOMAINS")]
        excluded_sites: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Inspect or clean the result cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Show entry counts against the current config fingerprint
    Stats,

    /// Delete entries stored under a different config fingerprint
    Purge,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Print the configuration file path
    Path,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = get_config().context("Failed to load configuration")?;

    match cli.command {
        Commands::Parse {
            report,
            excluded_sites,
            format,
        } => parse_command(report, excluded_sites, format),
        Commands::Cache { command } => cache_command(config, command).await,
        Commands::Config { command } => config_command(command),
    }
}

fn parse_command(
    report_path: PathBuf,
    excluded_sites: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let markdown = std::fs::read_to_string(&report_path)
        .with_context(|| format!("Failed to read report file {}", report_path.display()))?;

    let report = parse_report(&markdown, excluded_sites.as_deref());

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_report(&report),
    }

    Ok(())
}

fn print_report(report: &ParsedReport) {
    if let Some(textbook) = &report.textbook_info {
        println!("{}", "Textbook".bold());
        if let Some(title) = &textbook.title {
            println!("  Title:  {title}");
        }
        if let Some(author) = &textbook.author {
            println!("  Author: {author}");
        }
        if let Some(source) = &textbook.source {
            println!("  Source: {source}");
        }
        println!();
    }

    if report.resources.is_empty() {
        println!("No resources found in report");
        return;
    }

    println!(
        "{} ({} found)",
        "Resources".bold(),
        report.resources.len()
    );
    for resource in &report.resources {
        println!(
            "  [{}] {}",
            resource.resource_type.to_string().cyan(),
            resource.title.bold()
        );
        println!("      {} | {}", resource.source, resource.url.underline());
        if let Some(description) = &resource.description {
            println!("      {description}");
        }
    }
}

async fn cache_command(config: AppConfig, command: CacheCommand) -> Result<()> {
    let db_path = config.cache.database_path();
    let store = SqliteCacheStore::new(&db_path)
        .await
        .with_context(|| format!("Failed to open cache database {}", db_path.display()))?;
    let cache = ResultCache::new(Arc::new(store), config.cache.to_cache_config());

    match command {
        CacheCommand::Stats => {
            let summary = cache.stats().await;
            println!("{}", "Cache statistics".bold());
            println!("  Fingerprint:   {}", summary.config_fingerprint);
            println!("  Total entries: {}", summary.total_entries);
            println!("  Valid entries: {}", summary.valid_entries);
            println!("  Stale entries: {}", summary.stale_entries);
        }
        CacheCommand::Purge => {
            let deleted = cache.purge_stale().await;
            println!("Deleted {deleted} stale cache entries");
        }
    }

    Ok(())
}

fn config_command(command: ConfigCommand) -> Result<()> {
    let manager = ConfigManager::new();

    match command {
        ConfigCommand::Path => {
            println!("{}", manager.get_config_path().display());
        }
        ConfigCommand::Show => {
            let config = manager.load()?;
            let rendered = toml::to_string_pretty(&config)?;
            print!("{rendered}");
        }
    }

    Ok(())
}
