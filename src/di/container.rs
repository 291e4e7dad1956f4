use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use sqlx::postgres::PgPoolOptions;

use crate::config::Config;
use crate::interactor::swap_history::SwapHistory;
use crate::interactor::swap_interactor::SwapInteractorImpl;
use crate::services::receipt_watcher::ReceiptWatcher;
use crate::solana::create_solana_client;
use crate::solana::receipt_provider::{ReceiptProvider, SolanaReceiptProvider};
use crate::storage::{
    FileSlotStorage, PgSlotStorage, SlotStorage, SlotSwapStore, SwapStore,
};

/// ServiceContainer wires the swap tracker together from a [`Config`]
pub struct ServiceContainer {
    swap_store: Arc<dyn SwapStore>,
    swap_interactor: Arc<SwapInteractorImpl>,
}

impl ServiceContainer {
    /// Connect the configured storage backend and receipt provider
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let slot_storage = Self::connect_storage(&config).await?;

        let solana_client = config.solana_rpc_url.as_deref().map(|url| {
            info!("Using Solana RPC at {} for receipts", url);
            create_solana_client(url, config.rpc_timeout)
        });
        let provider = solana_client.map(|client| {
            Arc::new(SolanaReceiptProvider::new(client)) as Arc<dyn ReceiptProvider>
        });
        if provider.is_none() {
            info!("SOLANA_RPC_URL not set, swaps will not be reconciled");
        }

        Ok(Self::assemble(&config, slot_storage, provider))
    }

    /// Build a container from already constructed parts
    pub fn with_parts(
        config: Config,
        slot_storage: Arc<dyn SlotStorage>,
        provider: Option<Arc<dyn ReceiptProvider>>,
    ) -> Self {
        Self::assemble(&config, slot_storage, provider)
    }

    fn assemble(
        config: &Config,
        slot_storage: Arc<dyn SlotStorage>,
        provider: Option<Arc<dyn ReceiptProvider>>,
    ) -> Self {
        let swap_store = Arc::new(SlotSwapStore::new(slot_storage, config.history_key.clone()))
            as Arc<dyn SwapStore>;

        let history = Arc::new(SwapHistory::new(swap_store.clone()));
        let watcher = ReceiptWatcher::new(
            provider,
            history.clone(),
            config.poll_interval,
            config.max_attempts,
        );
        let swap_interactor = Arc::new(SwapInteractorImpl::new(history, watcher));

        Self {
            swap_store,
            swap_interactor,
        }
    }

    async fn connect_storage(config: &Config) -> Result<Arc<dyn SlotStorage>> {
        let Some(database_url) = config.database_url.as_deref() else {
            info!(
                "Storing swap history under {}",
                config.history_dir.display()
            );
            return Ok(Arc::new(FileSlotStorage::new(config.history_dir.clone())));
        };

        info!("Connecting to database...");
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("Failed to create database connection pool")?;

        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .context("Failed to run database migrations")?;

        Ok(Arc::new(PgSlotStorage::new(Arc::new(db_pool))))
    }

    // Accessor methods

    pub fn swap_store(&self) -> Arc<dyn SwapStore> {
        self.swap_store.clone()
    }

    pub fn swap_interactor(&self) -> Arc<SwapInteractorImpl> {
        self.swap_interactor.clone()
    }
}
