// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use chrono::Duration as ChronoDuration;
use clap::{ArgAction, Parser, Subcommand};
use stackrank::exporter::text::{self, DEFAULT_EXCERPT_LEN};
use stackrank::utils::logging::{format_error, format_info, format_success, format_warning};
use stackrank::{
    Clock, Config, ExportedLookup, JsonExporter, LookupError, LookupOutcome, LookupPipeline,
    ProgressTracker, StackExchangeClient, SystemClock, UnansweredRequest, UnansweredScanner,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "stackrank")]
#[command(version = "0.1.0")]
#[command(about = "Search Stack Overflow and rank the answers for an error message", long_about = None)]
struct Cli {
    /// Configuration file; config/default.toml is used when present
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one error message or question
    Ask {
        /// Query text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Number of search hits to fetch answers for
        #[arg(short, long)]
        limit: Option<usize>,

        /// Number of ranked answers to print
        #[arg(short, long, default_value_t = 5)]
        show: usize,

        #[arg(long)]
        json: bool,

        #[arg(long)]
        no_cache: bool,
    },

    /// Read one query per line from stdin, sharing one cache
    Interactive {
        #[arg(short, long, default_value_t = 5)]
        show: usize,
    },

    /// List the most viewed unanswered questions for a tag
    Unanswered {
        #[arg(short, long)]
        tag: String,

        #[arg(long, default_value = "")]
        in_title: String,

        /// Look-back window in days
        #[arg(long)]
        days: Option<i64>,

        #[arg(long)]
        top: Option<usize>,

        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    stackrank::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    if let Err(e) = run(cli).await {
        eprintln!("{}", format_error(&describe(&e)));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!("Configuration loaded for site {}", config.api.site);

    match cli.command {
        Commands::Ask {
            text,
            limit,
            show,
            json,
            no_cache,
        } => cmd_ask(config, &text.join(" "), limit, show, json, no_cache).await,
        Commands::Interactive { show } => cmd_interactive(&config, show).await,
        Commands::Unanswered {
            tag,
            in_title,
            days,
            top,
            json,
            output,
        } => cmd_unanswered(&config, tag, in_title, days, top, json, output, cli.color).await,
    }
}

async fn cmd_ask(
    mut config: Config,
    query: &str,
    limit: Option<usize>,
    show: usize,
    json: bool,
    no_cache: bool,
) -> Result<()> {
    if no_cache {
        config.cache.enabled = false;
    }

    let mut pipeline = LookupPipeline::from_config(&config)?;
    if let Some(limit) = limit {
        pipeline = pipeline.with_limit(limit);
    }

    let outcome = pipeline.lookup(query).await?;
    print_outcome(&outcome, show, json)?;
    Ok(())
}

async fn cmd_interactive(config: &Config, show: usize) -> Result<()> {
    let pipeline = LookupPipeline::from_config(config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut delivered = 0usize;

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match pipeline.lookup(&line).await {
            Ok(outcome) => {
                delivered += 1;
                print_outcome(&outcome, show, false)?;
            }
            Err(e) => eprintln!("{}", format_error(&format!("{}: {}", e.kind(), e))),
        }
    }

    pipeline.log_final_stats();
    let stats = pipeline.stats();
    let cache = pipeline.cache_stats();
    println!(
        "{}",
        format_info(&format!(
            "{} lookups, {} from cache, cache hit rate {:.1}%",
            stats.lookups,
            stats.served_from_cache,
            cache.hit_rate()
        ))
    );

    if delivered == 0 {
        anyhow::bail!(LookupError::NoResults("no lookup produced results".to_string()));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn cmd_unanswered(
    config: &Config,
    tag: String,
    in_title: String,
    days: Option<i64>,
    top: Option<usize>,
    json: bool,
    output: Option<PathBuf>,
    colored: bool,
) -> Result<()> {
    let backend = StackExchangeClient::new(config.api.clone(), config.search.request_timeout())?;
    let scanner = UnansweredScanner::new(Arc::new(backend), &config.unanswered);

    let now = SystemClock.utc_now();
    let mut request = UnansweredRequest::new(tag, &config.unanswered, now);
    request.in_title = in_title;
    if let Some(days) = days {
        request.from_date = now - ChronoDuration::days(days);
    }
    if let Some(top) = top {
        request.top_n = top;
    }

    info!("Scanning unanswered [{}] questions since {}", request.tag, request.from_date);
    let progress = ProgressTracker::new(1, colored);
    let report = scanner.scan(&request, &progress).await?;

    if let Some(path) = output {
        JsonExporter::new(true).export_file(&report, &path)?;
        println!("{}", format_success(&format!("Report written to {}", path.display())));
    } else if json {
        JsonExporter::new(true).write(&report, &mut std::io::stdout())?;
    } else {
        print!("{}", text::render_unanswered(&report));
    }
    Ok(())
}

fn print_outcome(outcome: &LookupOutcome, show: usize, json: bool) -> Result<()> {
    if let Some(warning) = text::render_failures(&outcome.failures) {
        eprintln!("{}", format_warning(&warning));
    }

    if json {
        JsonExporter::new(true).write(ExportedLookup::from(outcome), &mut std::io::stdout())?;
    } else {
        print!("{}", text::render_ranked(&outcome.result, show, DEFAULT_EXCERPT_LEN));
    }
    Ok(())
}

/// Single-line message naming the failure kind.
fn describe(error: &anyhow::Error) -> String {
    match error.chain().find_map(|cause| cause.downcast_ref::<LookupError>()) {
        Some(lookup) => format!("{}: {}", lookup.kind(), lookup),
        None => format!("Error: {:#}", error),
    }
}
