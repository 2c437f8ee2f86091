//! leafy-records - resolve one ISBN and print the record as JSON
//!
//! Exit code 0 with the record on stdout, 1 when no record was found.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use leafy_common::config::{load_config_file, resolve_image_search, LookupConfig};
use leafy_common::logging::init_logging;
use leafy_records::{ResolveError, Resolver};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Command-line arguments for leafy-records
#[derive(Parser, Debug)]
#[command(name = "leafy-records")]
#[command(about = "Resolve an ISBN to a bibliographic record")]
#[command(version)]
struct Args {
    /// ISBN-10 or ISBN-13, separators allowed
    isbn: String,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, env = "LEAFY_CONFIG")]
    config: Option<PathBuf>,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "LEAFY_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Comma-separated source order, e.g. "sudoc,bnf"
    #[arg(long, env = "LEAFY_SOURCES")]
    sources: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LEAFY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print provenance (winning source, attempts) along with the record
    #[arg(long)]
    detailed: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let (mut toml_config, origin) =
        load_config_file(args.config.as_deref()).context("Failed to load config")?;
    if let Some(level) = &args.log_level {
        toml_config.logging.level = level.clone();
    }
    init_logging(&toml_config.logging).context("Failed to initialize logging")?;
    origin.log();

    let lookup = apply_overrides(toml_config.lookup, &args)?;
    let resolver = Resolver::from_config(&lookup).context("Failed to build resolver")?;
    info!(sources = ?resolver.source_names(), covers = ?resolver.cover_names(), "Resolving {}", args.isbn);

    let token = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(token.clone()));

    match resolver.resolve_with_cancellation(&args.isbn, &token).await {
        Ok(resolution) => {
            let json = if args.detailed {
                serde_json::to_string_pretty(&resolution)
            } else {
                serde_json::to_string_pretty(&resolution.record)
            }
            .context("Failed to serialize record")?;
            println!("{}", json);
            Ok(ExitCode::SUCCESS)
        }
        Err(ResolveError::Cancelled) => {
            eprintln!("Cancelled");
            Ok(ExitCode::from(130))
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Command-line and environment overrides on top of the TOML settings
fn apply_overrides(mut lookup: LookupConfig, args: &Args) -> Result<LookupConfig> {
    if let Some(timeout_ms) = args.timeout_ms {
        lookup.request_timeout_ms = timeout_ms;
    }
    if let Some(list) = &args.sources {
        lookup.source_order =
            LookupConfig::parse_source_list(list).context("Invalid --sources value")?;
    }
    lookup.image_search = resolve_image_search(lookup.image_search.as_ref());
    debug!(
        sources = ?lookup.effective_source_order(),
        timeout_ms = lookup.request_timeout_ms,
        image_search = lookup.image_search.is_some(),
        "Effective lookup config"
    );
    Ok(lookup)
}

async fn cancel_on_ctrl_c(token: CancellationToken) {
    if signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl+C, cancelling lookup");
        token.cancel();
    }
}
