use crate::entity::{NewSwap, SwapOutcome, SwapRecord};
use crate::interactor::swap_history::SwapHistory;
use crate::services::receipt_watcher::ReceiptWatcher;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

/// Lifecycle of locally initiated swaps
#[async_trait]
pub trait SwapInteractor: Send + Sync {
    /// Switches the active wallet and reloads its swaps from storage
    async fn select_wallet(&self, wallet_address: Option<&str>);

    /// Records a new swap and returns its id
    async fn add_swap(&self, swap: NewSwap) -> String;

    async fn update_swap_status(&self, tx_hash: &str, outcome: SwapOutcome);

    async fn clear_history(&self, wallet_address: Option<&str>);

    /// Starts reconciling `tx_hash` in the background
    fn watch_transaction(&self, tx_hash: &str);

    /// Starts reconciling every pending swap of the active wallet
    fn watch_pending(&self) -> usize;

    /// Swaps of the active wallet, newest first
    fn swaps(&self) -> Vec<SwapRecord>;

    fn active_wallet(&self) -> Option<String>;
}

pub struct SwapInteractorImpl {
    history: Arc<SwapHistory>,
    watcher: ReceiptWatcher,
}

impl SwapInteractorImpl {
    pub fn new(history: Arc<SwapHistory>, watcher: ReceiptWatcher) -> Self {
        Self { history, watcher }
    }

    /// Stops all background reconciliation
    pub fn shutdown(&self) {
        self.watcher.shutdown();
    }
}

#[async_trait]
impl SwapInteractor for SwapInteractorImpl {
    async fn select_wallet(&self, wallet_address: Option<&str>) {
        self.history.select_wallet(wallet_address).await;
    }

    async fn add_swap(&self, swap: NewSwap) -> String {
        self.history.add_swap(swap).await
    }

    async fn update_swap_status(&self, tx_hash: &str, outcome: SwapOutcome) {
        self.history.update_swap_status(tx_hash, outcome).await;
    }

    async fn clear_history(&self, wallet_address: Option<&str>) {
        self.history.clear_history(wallet_address).await;
    }

    fn watch_transaction(&self, tx_hash: &str) {
        // Fire and forget: the loop reports through the history on its own
        let _ = self.watcher.watch(tx_hash);
    }

    fn watch_pending(&self) -> usize {
        if !self.watcher.has_provider() {
            return 0;
        }

        let pending = self.history.registry().pending_tx_hashes();
        for tx_hash in &pending {
            self.watch_transaction(tx_hash);
        }

        if !pending.is_empty() {
            info!("Resumed watching {} pending swap(s)", pending.len());
        }
        pending.len()
    }

    fn swaps(&self) -> Vec<SwapRecord> {
        self.history.swaps()
    }

    fn active_wallet(&self) -> Option<String> {
        self.history.registry().active_wallet()
    }
}
