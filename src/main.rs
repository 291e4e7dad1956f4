//! Swap tracker daemon
//!
//! Selects the configured wallet, resumes reconciliation of the swaps it left
//! pending, and keeps the history in sync until interrupted.
use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn};
use swap_tracker::{Config, ServiceContainer, SwapInteractor, SwapStatus};

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Starting swap tracker v{}", swap_tracker::VERSION);

    let config = Config::from_env();
    let wallet_address = config.wallet_address.clone();

    let services = ServiceContainer::new(config)
        .await
        .context("Failed to initialize swap tracker services")?;
    let swaps = services.swap_interactor();

    match wallet_address.as_deref() {
        Some(wallet) => swaps.select_wallet(Some(wallet)).await,
        None => warn!("WALLET_ADDRESS not set, no wallet selected"),
    }

    let history = swaps.swaps();
    let pending = history
        .iter()
        .filter(|swap| swap.status == SwapStatus::Pending)
        .count();
    info!(
        "{} swap(s) in history, {} pending",
        history.len(),
        pending
    );

    let watching = swaps.watch_pending();
    if pending > 0 && watching == 0 {
        warn!("No receipt provider configured, pending swaps stay pending");
    }

    info!("Swap tracker is running! Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    info!("Stopping receipt watcher...");
    swaps.shutdown();

    Ok(())
}
