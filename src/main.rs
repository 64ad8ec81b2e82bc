//! Timeworld → marketplace stock and price synchronizer.
//!
//! Fetches the seller's catalog from OZON or Yandex Market, reads the current
//! Timeworld stock feed, and pushes updated stock counts and whole-number
//! prices back to the marketplace.

use std::time::Duration;

use clap::{Parser, Subcommand};

use stock_sync::config::{MarketConfig, OzonConfig};
use stock_sync::error::Result;
use stock_sync::sync;
use stock_sync::yandex::DeliveryScheme;

/// Supplier-to-marketplace stock and price sync
#[derive(Parser, Debug)]
#[command(name = "stock_sync")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// HTTP timeout in seconds for feed and marketplace requests
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sync stock and prices to the OZON store
    Ozon,
    /// Sync stock and prices to the Yandex Market campaigns
    Market {
        /// Delivery scheme to sync; both campaigns when omitted
        #[arg(long, value_enum)]
        scheme: Option<DeliveryScheme>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let http = match reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build HTTP client: {e}");
            std::process::exit(1);
        }
    };

    let outcome = match args.command {
        Command::Ozon => run_ozon(&http).await,
        Command::Market { scheme } => run_market(&http, scheme).await,
    };

    match outcome {
        Ok(clean) => {
            if !clean {
                std::process::exit(1);
            }
        }
        Err(e) => {
            let message = e.user_message();
            log::error!("{message}");
            eprintln!("{message}");
            std::process::exit(1);
        }
    }
}

/// Syncs the OZON store; returns whether every batch was accepted.
async fn run_ozon(http: &reqwest::Client) -> Result<bool> {
    let config = OzonConfig::from_env()?;

    log::info!("Starting OZON sync...");
    let report = sync::run_ozon(http, &config).await?;
    log::info!("OZON sync finished: {report}");

    Ok(report.is_clean())
}

/// Syncs one or both Yandex Market campaigns, sequentially.
async fn run_market(http: &reqwest::Client, scheme: Option<DeliveryScheme>) -> Result<bool> {
    let config = MarketConfig::from_env()?;
    let schemes = match scheme {
        Some(scheme) => vec![scheme],
        None => vec![DeliveryScheme::Fbs, DeliveryScheme::Dbs],
    };

    let mut clean = true;
    for scheme in schemes {
        log::info!("Starting Market {} sync...", scheme.as_str());
        let report = sync::run_market(http, &config, scheme).await?;
        log::info!("Market {} sync finished: {report}", scheme.as_str());
        clean &= report.is_clean();
    }

    Ok(clean)
}
