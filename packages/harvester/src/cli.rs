//! Command-line interface for the harvester.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cache::{self, CachedClient};
use crate::config::{validate_output_dir, HarvestOptions, DEFAULT_CACHE_DIR, DEFAULT_SUBUNIT_DEPTH};
use crate::error::Result;
use crate::harvester::harvest;
use crate::yaml::save_yaml;

/// Spectrum Harvester - Crawl the Spectrum information requirements into YAML.
#[derive(Parser)]
#[command(name = "spectrum-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crawl the site and save the tree as YAML.
    Harvest {
        /// Output directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for cached pages
        #[arg(long, default_value = DEFAULT_CACHE_DIR)]
        cache_dir: PathBuf,

        /// Levels of nested unit lists to follow
        #[arg(long, default_value_t = DEFAULT_SUBUNIT_DEPTH)]
        depth: usize,

        /// Index page listing the appendices
        #[arg(long)]
        index_url: Option<String>,
    },

    /// Delete the page cache.
    ClearCache {
        /// Directory for cached pages
        #[arg(long, default_value = DEFAULT_CACHE_DIR)]
        cache_dir: PathBuf,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Harvest {
            output,
            cache_dir,
            depth,
            index_url,
        } => harvest_command(output.as_deref(), &cache_dir, depth, index_url),
        Commands::ClearCache { cache_dir } => clear_cache_command(&cache_dir),
    }
}

/// Execute the harvest command.
fn harvest_command(
    output: Option<&Path>,
    cache_dir: &Path,
    depth: usize,
    index_url: Option<String>,
) -> Result<()> {
    let output_dir = output.unwrap_or_else(|| Path::new("."));

    // Validate output directory before crawling
    validate_output_dir(output_dir)?;

    let mut options = HarvestOptions::default().with_subunit_depth(depth);
    if let Some(url) = index_url {
        options = options.with_index_url(url);
    }

    println!(
        "{} {}",
        style("Harvesting").bold(),
        style(&options.index_url).cyan()
    );
    println!();

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Crawling pages...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let client = CachedClient::open(cache_dir)?;
    let result = match harvest(&client, options) {
        Ok(result) => result,
        Err(e) => {
            pb.finish_and_clear();
            client.close();
            return Err(e);
        }
    };
    let stats = client.close();

    pb.set_message("Saving YAML...");
    let today = chrono::Local::now().date_naive();
    let output_path = match save_yaml(&result.spectrum, output_dir, today) {
        Ok(path) => path,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.finish_and_clear();

    let counts = result.spectrum.counts();
    println!("  Group types: {}", style(counts.group_types).green());
    println!("  Groups: {}", counts.groups);
    println!("  Units: {}", counts.units);
    println!(
        "  Pages fetched: {} ({} from cache)",
        stats.hits + stats.misses,
        stats.hits
    );
    if !result.report.is_empty() {
        println!(
            "  Warnings: {}",
            style(result.report.warnings.len()).yellow().bold()
        );
        for warning in &result.report.warnings {
            println!("    {}", style(warning).yellow());
        }
    }

    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        output_path.display()
    );

    Ok(())
}

/// Execute the clear-cache command.
fn clear_cache_command(cache_dir: &Path) -> Result<()> {
    if cache::clear(cache_dir)? {
        println!(
            "{} {}",
            style("Cleared cache:").green().bold(),
            cache_dir.display()
        );
    } else {
        println!("No cache at {}", cache_dir.display());
    }
    Ok(())
}
