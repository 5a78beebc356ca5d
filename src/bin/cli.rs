//! vitrine CLI
//!
//! Local and CI execution entry point.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use vitrine::{
    config,
    error::Result,
    notify::WebhookClient,
    pipeline,
    state::{LedgerStore, LocalLedgerStore},
    utils::time::format_relative,
};

/// vitrine - Seller Profile Monitor
#[derive(Parser, Debug)]
#[command(
    name = "vitrine",
    version,
    about = "Monitors marketplace seller profiles and posts new listings to a chat webhook"
)]

struct Cli {
    /// Path to data directory containing config.toml and ledger.json
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep all profiles and post new listings
    Run {
        /// Log what would be posted without delivering or marking the ledger
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Prune expired ledger records now, ignoring the prune interval
    Prune,

    /// Show data directory and ledger info
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

    log::info!("vitrine starting...");

    let config = config::load_config(&cli.data_dir);
    let config = Arc::new(config);
    let store = LocalLedgerStore::new(config::ledger_path(&cli.data_dir));

    match cli.command {
        Command::Run { dry_run } => {
            config.validate()?;

            let webhook = if dry_run {
                log::info!("Dry-run: nothing will be delivered");
                None
            } else {
                Some(WebhookClient::new(&config.webhook, config.webhook_url()?)?)
            };

            pipeline::run_monitor(&config, &store, webhook.as_ref()).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} profiles)", config.profiles.len());

            match config.webhook_url() {
                Ok(_) => log::info!("✓ Webhook URL configured"),
                Err(e) => log::warn!("No webhook URL yet: {}", e),
            }

            log::info!("All validations passed!");
        }

        Command::Prune => {
            let mut ledger = store.load().await?;
            let before = ledger.len();
            let dropped = ledger.prune_now(Utc::now(), config.dedup.retention());
            store.save(&ledger).await?;

            log::info!("Prune: {} -> {} records ({} dropped)", before, ledger.len(), dropped);
        }

        Command::Info => {
            log::info!("Data directory: {}", cli.data_dir.display());

            let ledger = store.load().await?;
            log::info!("Ledger records: {}", ledger.len());
            match ledger.last_prune() {
                Some(at) => log::info!("Last prune: {}", format_relative(at, Utc::now())),
                None => log::info!("Last prune: never"),
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
