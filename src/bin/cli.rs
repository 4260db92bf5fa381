//! feedwatch CLI
//!
//! Local execution entry point for the feed watcher.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use feedwatch::{
    error::Result,
    extract,
    models::Config,
    pipeline::{RateLimiter, Watcher},
    services::{AlertHook, NoopAlert, PageSource, PublishSink, StdoutSink, TerminalBell, WebhookSink},
    storage::{EmissionLog, UsageLedger},
};

/// feedwatch - incremental text-feed watcher
#[derive(Parser, Debug)]
#[command(name = "feedwatch", version, about = "Watches a text feed and republishes new headlines")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "feedwatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watch the configured source until interrupted
    Watch,

    /// Validate the configuration file
    Validate,

    /// Run the configured extraction strategy over a local file
    Extract {
        /// Snapshot file to extract candidates from
        file: PathBuf,
    },

    /// Show emission log and publish window status
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Watch => {
            config.validate()?;

            let source = PageSource::new(&config.source)?;
            let sink: Box<dyn PublishSink> = if config.publish.webhook_url.is_empty() {
                log::info!("No webhook configured, publishing to stdout");
                Box::new(StdoutSink)
            } else {
                Box::new(WebhookSink::new(
                    config.publish.webhook_url.clone(),
                    &config.source.user_agent,
                    config.source.timeout(),
                )?)
            };
            let alert: Box<dyn AlertHook> = if config.watch.bell {
                Box::new(TerminalBell)
            } else {
                Box::new(NoopAlert)
            };

            let mut watcher = Watcher::new(&config, Box::new(source), sink, alert)?;

            let cancel = CancellationToken::new();
            let trigger = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::info!("Ctrl-C received");
                    trigger.cancel();
                }
            });

            let summary = watcher.run(cancel).await?;
            log::info!(
                "{} cycle(s), {} new item(s), {} payload(s) published",
                summary.cycles,
                summary.emitted,
                summary.published
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            let extractor = extract::build_extractor(&config.extract)?;
            log::info!("✓ Config OK ({} strategy ready)", extractor.name());

            log::info!("All validations passed!");
        }

        Command::Extract { file } => {
            let snapshot = std::fs::read_to_string(&file)?;
            let extractor = extract::build_extractor(&config.extract)?;
            let candidates = extractor.extract(&snapshot)?;

            log::info!(
                "{} candidate(s) via the {} strategy",
                candidates.len(),
                extractor.name()
            );
            for candidate in candidates {
                println!("{}", candidate);
            }
        }

        Command::Info => {
            log::info!("Config: {}", cli.config.display());
            log::info!(
                "Source: {}",
                if config.source.url.is_empty() {
                    "not configured"
                } else {
                    config.source.url.as_str()
                }
            );

            let emission_log = EmissionLog::new(config.paths.emission_log.clone());
            log::info!("Emission log: {}", emission_log.path().display());
            let emitted = emission_log.read_all()?;
            log::info!("Emitted so far: {} item(s)", emitted.len());
            if let Some(last) = emitted.last() {
                log::info!("Last emission: {} ({})", last.text, last.emitted_at);
            }

            let ledger = UsageLedger::new(config.paths.usage_ledger.clone());
            log::info!("Usage ledger: {}", ledger.path().display());
            let mut limiter = RateLimiter::new(
                ledger,
                config.publish.max_attempts,
                config.publish.window(),
            );
            log::info!(
                "Publish window: {}/{} attempt(s) used",
                limiter.attempts_in_window(),
                config.publish.max_attempts
            );
        }
    }

    log::info!("Done!");

    Ok(())
}
