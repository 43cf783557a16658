use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use deprewatch_catalog::{CatalogAcquirer, CatalogStore, StoreError};
use deprewatch_core::{Catalog, Config};

/// deprewatch - deprecated platform API usage scanner
#[derive(Parser)]
#[command(name = "deprewatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: deprewatch.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan files for deprecated API usages
    Check {
        /// Files or directories to scan (default: current directory)
        paths: Vec<PathBuf>,
    },

    /// Acquire the deprecation catalog and persist it to the cache
    Fetch {
        /// Discard any cached catalog for this version first
        #[arg(long)]
        refresh: bool,
    },

    /// Print the cached deprecation catalog
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("deprewatch.toml").exists() {
        Config::from_file(Path::new("deprewatch.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    if cli.verbose {
        eprintln!(
            "{} catalog version: {}",
            "Using".cyan(),
            config.catalog.version
        );
    }

    match cli.command {
        Commands::Check { paths } => check_command(&config, &paths, cli.verbose).await,
        Commands::Fetch { refresh } => fetch_command(&config, refresh, cli.verbose).await,
        Commands::Show => show_command(&config),
    }
}

/// Check command - scan files against the deprecation catalog
async fn check_command(config: &Config, paths: &[PathBuf], verbose: bool) -> Result<()> {
    let catalog = load_catalog(config, verbose).await;

    if catalog.is_empty() {
        println!("{}", "No known deprecations; nothing to check.".yellow());
        return Ok(());
    }

    let default_paths = [PathBuf::from(".")];
    let paths: &[PathBuf] = if paths.is_empty() { &default_paths } else { paths };

    let mut total_matches = 0usize;
    let mut files_with_matches = 0usize;
    let mut files_scanned = 0usize;

    for file in collect_files(paths) {
        let text = match std::fs::read_to_string(&file) {
            Ok(text) => text,
            Err(e) => {
                if verbose {
                    eprintln!("{} {}: {}", "Skipping".yellow(), file.display(), e);
                }
                continue;
            }
        };
        files_scanned += 1;

        let matches = deprewatch_engine::scan(&catalog, &text)?;
        if matches.is_empty() {
            continue;
        }

        files_with_matches += 1;
        for m in &matches {
            total_matches += 1;
            let (line, column) = line_col(&text, m.start);
            println!(
                "{}:{}:{}: {} {}",
                file.display(),
                line,
                column,
                m.label().yellow().bold(),
                m.description
            );
        }
    }

    println!(
        "\n{} {} deprecated API usage(s) in {} of {} file(s)",
        if total_matches > 0 { "Found".red().bold() } else { "Found".green() },
        total_matches,
        files_with_matches,
        files_scanned
    );

    if total_matches > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Fetch command - drive catalog acquisition explicitly
async fn fetch_command(config: &Config, refresh: bool, verbose: bool) -> Result<()> {
    let store = CatalogStore::new(&config.catalog.cache_dir);
    let path = store.catalog_path(&config.catalog.version);

    if refresh && path.exists() {
        if verbose {
            eprintln!("{} {}", "Removing".cyan(), path.display());
        }
        std::fs::remove_file(&path)?;
    }

    let acquirer = CatalogAcquirer::from_config(config, None);
    let catalog = acquirer
        .catalog_for(
            &config.catalog.resolved_source_url(),
            &config.catalog.version,
        )
        .await?;

    if catalog.is_empty() {
        println!(
            "{}",
            "No deprecation records obtained; nothing was persisted.".yellow()
        );
    } else {
        println!(
            "{} {} record(s) for version {} -> {}",
            "Cached".green().bold(),
            catalog.len(),
            config.catalog.version,
            path.display()
        );
    }

    Ok(())
}

/// Show command - print the cached catalog
fn show_command(config: &Config) -> Result<()> {
    let store = CatalogStore::new(&config.catalog.cache_dir);

    let catalog = match store.load(&config.catalog.version) {
        Ok(catalog) => catalog,
        Err(StoreError::NotFound(version)) => {
            println!(
                "No cached catalog for version {}. Run {} first.",
                version,
                "deprewatch fetch".cyan()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!(
        "Catalog version {} ({} records):\n",
        config.catalog.version,
        catalog.len()
    );
    for record in catalog.iter() {
        println!(
            "  {} {}\n      {}",
            format!("[{}]", record.change_type).yellow().bold(),
            record.api_name.bold(),
            record.description
        );
    }

    Ok(())
}

/// Load the catalog, degrading to empty with a visible notice on failure
async fn load_catalog(config: &Config, verbose: bool) -> Arc<Catalog> {
    let acquirer = CatalogAcquirer::from_config(config, None);
    match acquirer
        .catalog_for(
            &config.catalog.resolved_source_url(),
            &config.catalog.version,
        )
        .await
    {
        Ok(catalog) => {
            if verbose {
                eprintln!(
                    "{} catalog with {} record(s)",
                    "Loaded".cyan(),
                    catalog.len()
                );
            }
            catalog
        }
        Err(e) => {
            eprintln!(
                "{} no deprecation data could be obtained: {}",
                "Warning:".yellow().bold(),
                e
            );
            Arc::new(Catalog::empty())
        }
    }
}

/// Expand paths into scannable files, directories walked recursively
fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let walk = walkdir::WalkDir::new(path)
                .into_iter()
                .filter_entry(|e| !is_hidden(e));
            for entry in walk.flatten() {
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(path.clone());
        }
    }

    files
}

/// Hidden entries (dotfiles, .git) are skipped when walking directories
fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map_or(false, |name| name.starts_with('.'))
}

/// 1-based line and column (in characters) of a byte offset
fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let before = &text[..offset];

    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = text[line_start..offset].chars().count() + 1;

    (line, column)
}
