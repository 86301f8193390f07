//! Lead-Scout main entry point
//!
//! This is the command-line interface for the Lead-Scout email lead finder.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use lead_scout::ai::{GeminiClient, SiteAdvisor};
use lead_scout::collector::OutputFormat;
use lead_scout::config::{load_config, Config};
use lead_scout::crawler::{validate_topic, Coordinator, RunOptions};
use lead_scout::ledger::{export_ledger_csv, JsonLedger, Ledger};
use lead_scout::output;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Lead-Scout: topic-driven email lead discovery
///
/// Lead-Scout asks a generative-AI service for websites about a topic,
/// crawls them for email addresses and remembers which sites it has
/// already visited.
#[derive(Parser, Debug)]
#[command(name = "lead-scout")]
#[command(version)]
#[command(about = "Find email leads for a topic", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find websites for a topic and collect their email addresses
    Run(RunArgs),

    /// Analyze a topic without scraping
    Analyze {
        /// Topic or classification to analyze
        #[arg(short, long)]
        topic: String,

        /// Also suggest this many search queries
        #[arg(long, default_value_t = 0)]
        queries: usize,

        /// Also suggest this many related topics
        #[arg(long, default_value_t = 0)]
        alternatives: usize,
    },

    /// Display the effective configuration
    Config,

    /// Inspect or maintain the visited-URL cache
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Topic or classification to search for
    #[arg(short, long)]
    topic: String,

    /// Maximum number of websites to scrape
    #[arg(short, long)]
    max_sites: Option<usize>,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (csv or json)
    #[arg(short, long)]
    format: Option<String>,

    /// Country code for the search
    #[arg(long)]
    country: Option<String>,

    /// Language code for the search
    #[arg(short, long)]
    language: Option<String>,

    /// Minimum confidence score for emails (0.0 to 1.0)
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Scrape websites even if they are in the visited-URL cache
    #[arg(long)]
    force_rescrape: bool,

    /// Merge the emails of an earlier output file into the results
    #[arg(long, value_name = "FILE")]
    merge: Option<PathBuf>,

    /// Also write a markdown summary of the run
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum CacheCommand {
    /// Show cache statistics
    Stats,

    /// List cached URLs
    List {
        /// Only URLs whose last visit failed
        #[arg(long, conflicts_with = "successful")]
        failed: bool,

        /// Only URLs whose last visit succeeded
        #[arg(long)]
        successful: bool,
    },

    /// Remove every cached URL
    Clear,

    /// Remove one URL from the cache
    Remove {
        /// The URL to forget
        url: String,
    },

    /// Remove entries last visited at least this many days ago
    Cleanup {
        #[arg(long, default_value_t = 30)]
        days: i64,
    },

    /// Export the cache as CSV
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    // Setup logging based on configuration and verbosity
    setup_logging(&config, cli.verbose, cli.quiet);

    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from: {}", path.display());
    }

    let result = match cli.command {
        Command::Run(args) => handle_run(config, args, cli.quiet).await,
        Command::Analyze {
            topic,
            queries,
            alternatives,
        } => handle_analyze(&config, &topic, queries, alternatives).await,
        Command::Config => {
            output::print_config(&config);
            Ok(())
        }
        Command::Cache { action } => handle_cache(&config, action),
    };

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}

/// Sets up the logging/tracing subscriber
///
/// `RUST_LOG` wins when set. Otherwise `-q` and `-v` override the
/// configured log level.
fn setup_logging(config: &Config, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            // Only show errors
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new(format!("lead_scout={},warn", config.tracing_level())),
                1 => EnvFilter::new("lead_scout=debug,info"),
                2 => EnvFilter::new("lead_scout=trace,debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the `run` command: discovers, crawls and writes results
async fn handle_run(config: Config, args: RunArgs, quiet: bool) -> anyhow::Result<()> {
    let topic = validate_topic(&args.topic)?;

    let mut options = RunOptions::from_config(&config);
    if let Some(max_sites) = args.max_sites {
        if max_sites == 0 {
            bail!("--max-sites must be greater than 0");
        }
        options.max_sites = max_sites;
    }
    if let Some(country) = args.country {
        options.country = country;
    }
    if let Some(language) = args.language {
        options.language = language;
    }
    if let Some(min_confidence) = args.min_confidence {
        if !(0.0..=1.0).contains(&min_confidence) {
            bail!("--min-confidence must be between 0.0 and 1.0, got {}", min_confidence);
        }
        options.min_confidence = min_confidence;
    }
    options.force_rescrape = args.force_rescrape;

    let format = match (&args.format, &args.output) {
        (Some(format), _) => format.parse::<OutputFormat>()?,
        (None, Some(path)) => OutputFormat::from_path(path).unwrap_or(config.output.format),
        (None, None) => config.output.format,
    };

    let advisor = GeminiClient::new(&config).context("Failed to create AI client")?;
    let ledger = JsonLedger::open(&config.cache.file).with_context(|| {
        format!("Failed to open cache file {}", config.cache.file.display())
    })?;

    tracing::info!(
        "Topic: {}, max websites: {}, force rescrape: {}",
        topic,
        options.max_sites,
        options.force_rescrape
    );

    let output_dir = config.output.dir.clone();
    let mut coordinator = Coordinator::new(config, advisor, ledger)?;
    let report = coordinator.run(&topic, &options).await?;

    if let Some(merge) = &args.merge {
        let added = coordinator
            .collector_mut()
            .merge_file(merge)
            .with_context(|| format!("Failed to merge {}", merge.display()))?;
        tracing::info!("Merged {} emails from {}", added, merge.display());
    }

    let output_path = args.output.unwrap_or_else(|| {
        output::default_output_path(&output_dir, &topic, format, report.started_at)
    });
    let written = coordinator
        .collector()
        .export(format, &output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    tracing::info!("Wrote {} emails to {}", written, output_path.display());

    if let Some(summary) = &args.summary {
        output::generate_markdown_summary(&report, coordinator.collector(), summary)
            .with_context(|| format!("Failed to write summary {}", summary.display()))?;
        tracing::info!("Summary written to {}", summary.display());
    }

    if !quiet {
        output::print_run_summary(&report, coordinator.collector(), &output_path);
    }

    Ok(())
}

/// Handles the `analyze` command: shows what the AI service makes of a topic
async fn handle_analyze(
    config: &Config,
    topic: &str,
    queries: usize,
    alternatives: usize,
) -> anyhow::Result<()> {
    let topic = validate_topic(topic)?;
    let advisor = GeminiClient::new(config).context("Failed to create AI client")?;

    let analysis = advisor.analyze_topic(&topic).await?;
    output::print_topic_analysis(&topic, &analysis);

    if queries > 0 {
        let queries = advisor.generate_search_queries(&topic, queries).await?;
        output::print_list("Search queries", &queries);
    }

    if alternatives > 0 {
        let suggestions = advisor
            .suggest_alternative_topics(&topic, alternatives)
            .await?;
        output::print_list("Related topics", &suggestions);
    }

    Ok(())
}

/// Handles the `cache` subcommands
fn handle_cache(config: &Config, action: CacheCommand) -> anyhow::Result<()> {
    let path = &config.cache.file;
    let mut ledger = JsonLedger::open(path)
        .with_context(|| format!("Failed to open cache file {}", path.display()))?;

    match action {
        CacheCommand::Stats => {
            output::print_ledger_stats(&ledger.stats(), path);
        }
        CacheCommand::List { failed, successful } => {
            let records: Vec<_> = if failed || successful {
                let urls = if failed {
                    ledger.failed_urls()
                } else {
                    ledger.successful_urls()
                };
                urls.iter().filter_map(|url| ledger.get(url)).collect()
            } else {
                ledger.records()
            };
            output::print_visit_records(&records);
        }
        CacheCommand::Clear => {
            let count = ledger.len();
            ledger.clear()?;
            println!("✓ Cleared {} cached URLs", count);
        }
        CacheCommand::Remove { url } => {
            if ledger.remove(&url)? {
                println!("✓ Removed {} from cache", url);
            } else {
                println!("{} was not in the cache", url);
            }
        }
        CacheCommand::Cleanup { days } => {
            if days < 0 {
                bail!("--days must not be negative, got {}", days);
            }
            let max_age = chrono::Duration::try_days(days)
                .with_context(|| format!("--days is too large: {}", days))?;
            let removed = ledger.cleanup(max_age)?;
            println!("✓ Removed {} entries older than {} days", removed, days);
        }
        CacheCommand::Export { output } => {
            let count = export_ledger_csv(&ledger, &output)
                .with_context(|| format!("Failed to export cache to {}", output.display()))?;
            println!("✓ Exported {} cached URLs to {}", count, output.display());
        }
    }

    Ok(())
}
