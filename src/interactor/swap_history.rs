use crate::entity::{NewSwap, SwapOutcome, SwapRecord, SwapStatus};
use crate::interactor::swap_registry::{apply_status, SwapRegistry};
use crate::services::receipt_watcher::StatusSink;
use crate::storage::{SwapStore, MAX_STORED_SWAPS};
use crate::utils::shorten_address;
use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Swap history of this installation: the persisted all-wallet collection
/// plus the in-memory view of the active wallet.
///
/// Every read-modify-write of the persisted collection runs under
/// `persist_lock`, so concurrent callers never lose each other's writes.
pub struct SwapHistory {
    store: Arc<dyn SwapStore>,
    registry: SwapRegistry,
    persist_lock: Mutex<()>,
}

impl SwapHistory {
    pub fn new(store: Arc<dyn SwapStore>) -> Self {
        Self {
            store,
            registry: SwapRegistry::new(),
            persist_lock: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &SwapRegistry {
        &self.registry
    }

    /// Rebuilds the registry for `wallet_address` from the persisted history
    pub async fn select_wallet(&self, wallet_address: Option<&str>) {
        self.registry.reset(wallet_address);

        let Some(wallet) = wallet_address else {
            debug!("No wallet selected, swap registry is empty");
            return;
        };

        // Populate under the lock so updates and clears issued during the load
        // are applied on top of the loaded records instead of being overwritten
        let _guard = self.persist_lock.lock().await;
        let persisted = self.store.load().await;

        if self.registry.populate(wallet, &persisted) {
            info!(
                "Loaded {} swaps for wallet {}",
                self.registry.swaps().len(),
                shorten_address(wallet)
            );
        } else {
            debug!(
                "Wallet changed while loading history of {}, discarding",
                shorten_address(wallet)
            );
        }
    }

    pub async fn add_swap(&self, swap: NewSwap) -> String {
        let id = Uuid::new_v4().to_string();
        let record = swap.into_record(id.clone());

        self.registry.prepend(record.clone());

        let _guard = self.persist_lock.lock().await;
        let mut persisted = self.store.load().await;
        persisted.insert(0, record.clone());
        persisted.truncate(MAX_STORED_SWAPS);
        self.store.save(&persisted).await;

        info!(
            "Recorded swap {} ({} {} -> {} {}) tx {} for wallet {}",
            id,
            record.from_token.amount,
            record.from_token.symbol,
            record.to_token.amount,
            record.to_token.symbol,
            record.tx_hash,
            shorten_address(&record.wallet_address)
        );

        id
    }

    pub async fn update_swap_status(&self, tx_hash: &str, outcome: SwapOutcome) {
        let status = SwapStatus::from(outcome);

        let _guard = self.persist_lock.lock().await;
        let in_memory = self.registry.update_status(tx_hash, status);
        let mut persisted = self.store.load().await;
        let stored = apply_status(&mut persisted, tx_hash, status);
        if stored > 0 {
            self.store.save(&persisted).await;
        }

        if in_memory == 0 && stored == 0 {
            debug!("No pending swap matches tx {}", tx_hash);
        } else {
            info!(
                "Swap tx {} marked {} ({} in view, {} stored)",
                tx_hash, status, in_memory, stored
            );
        }
    }

    pub async fn clear_history(&self, wallet_address: Option<&str>) {
        let _guard = self.persist_lock.lock().await;
        let removed = self.registry.clear(wallet_address);

        let Some(wallet) = wallet_address else {
            debug!("No wallet given, cleared {} swaps from the view only", removed);
            return;
        };

        let mut persisted = self.store.load().await;
        let before = persisted.len();
        persisted.retain(|swap| !swap.belongs_to(wallet));
        self.store.save(&persisted).await;

        info!(
            "Cleared swap history of wallet {} ({} stored swaps removed)",
            shorten_address(wallet),
            before - persisted.len()
        );
    }

    pub fn swaps(&self) -> Vec<SwapRecord> {
        self.registry.swaps()
    }
}

#[async_trait]
impl StatusSink for SwapHistory {
    async fn apply_outcome(&self, tx_hash: &str, outcome: SwapOutcome) {
        self.update_swap_status(tx_hash, outcome).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::TokenAmount;
    use crate::entity::TrackerError;
    use crate::storage::{MemorySlotStorage, SlotStorage, SlotSwapStore, DEFAULT_SLOT_KEY};
    use std::time::Duration;

    /// Memory slots whose reads take a while, like a remote database
    struct SlowReadStorage {
        inner: MemorySlotStorage,
        delay: Duration,
    }

    #[async_trait]
    impl SlotStorage for SlowReadStorage {
        async fn read(&self, key: &str) -> Result<Option<String>, TrackerError> {
            tokio::time::sleep(self.delay).await;
            self.inner.read(key).await
        }

        async fn write(&self, key: &str, value: String) -> Result<(), TrackerError> {
            self.inner.write(key, value).await
        }
    }

    /// History over slow storage with one pending swap `a1` of walletA
    async fn slow_history_with_swap() -> (Arc<SwapHistory>, Arc<SlotSwapStore>) {
        let storage = Arc::new(SlowReadStorage {
            inner: MemorySlotStorage::new(),
            delay: Duration::from_millis(100),
        });
        let store = Arc::new(SlotSwapStore::new(storage, DEFAULT_SLOT_KEY));
        let history = Arc::new(SwapHistory::new(store.clone()));
        history.select_wallet(Some("walletA")).await;
        history.add_swap(new_swap("a1", "walletA")).await;
        (history, store)
    }

    fn history() -> (SwapHistory, Arc<SlotSwapStore>) {
        let store = Arc::new(SlotSwapStore::new(
            Arc::new(MemorySlotStorage::new()),
            DEFAULT_SLOT_KEY,
        ));
        (SwapHistory::new(store.clone()), store)
    }

    fn new_swap(tx_hash: &str, wallet: &str) -> NewSwap {
        NewSwap::new(
            tx_hash,
            TokenAmount::new("BNB", "1"),
            TokenAmount::new("CAMLY", "1000"),
            wallet,
        )
        .with_timestamp(1_700_000_000_000)
    }

    #[tokio::test]
    async fn add_swap_assigns_unique_ids() {
        let (history, store) = history();
        history.select_wallet(Some("0xWallet1")).await;

        let first = history.add_swap(new_swap("0xabc", "0xWallet1")).await;
        let second = history.add_swap(new_swap("0xabc", "0xWallet1")).await;

        assert_ne!(first, second);
        assert_eq!(history.swaps().len(), 2);
        assert_eq!(store.load().await.len(), 2);
    }

    #[tokio::test]
    async fn update_matches_across_case() {
        let (history, store) = history();
        history.select_wallet(Some("0xWallet1")).await;
        history.add_swap(new_swap("0xabc", "0xWallet1")).await;

        history
            .update_swap_status("0XABC", SwapOutcome::Success)
            .await;

        let swaps = history.swaps();
        assert_eq!(swaps.len(), 1);
        assert_eq!(swaps[0].status, SwapStatus::Success);
        assert_eq!(store.load().await[0].status, SwapStatus::Success);
    }

    #[tokio::test]
    async fn update_reaches_swaps_of_inactive_wallets() {
        let (history, store) = history();
        history.select_wallet(Some("walletA")).await;
        history.add_swap(new_swap("txB", "walletB")).await;

        history.update_swap_status("txb", SwapOutcome::Failed).await;

        assert!(history.swaps().is_empty());
        assert_eq!(store.load().await[0].status, SwapStatus::Failed);
    }

    #[tokio::test]
    async fn clear_without_wallet_keeps_persisted_history() {
        let (history, store) = history();
        history.select_wallet(Some("walletA")).await;
        history.add_swap(new_swap("tx1", "walletA")).await;

        history.clear_history(None).await;

        assert!(history.swaps().is_empty());
        assert_eq!(store.load().await.len(), 1);
    }

    #[tokio::test]
    async fn update_during_wallet_load_is_kept_in_view() {
        let (history, store) = slow_history_with_swap().await;

        let loading = {
            let history = history.clone();
            tokio::spawn(async move { history.select_wallet(Some("walletA")).await })
        };
        // let the load start and park in its slow read
        tokio::time::sleep(Duration::from_millis(20)).await;
        history.update_swap_status("a1", SwapOutcome::Success).await;
        loading.await.unwrap();

        let swaps = history.swaps();
        assert_eq!(swaps.len(), 1);
        assert_eq!(swaps[0].status, SwapStatus::Success);
        assert_eq!(store.load().await[0].status, SwapStatus::Success);
    }

    #[tokio::test]
    async fn clear_during_wallet_load_leaves_view_empty() {
        let (history, store) = slow_history_with_swap().await;

        let loading = {
            let history = history.clone();
            tokio::spawn(async move { history.select_wallet(Some("walletA")).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        history.clear_history(Some("walletA")).await;
        loading.await.unwrap();

        assert!(history.swaps().is_empty());
        assert!(store.load().await.is_empty());
    }
}
