use crate::entity::{SwapOutcome, TrackerError};
use crate::solana::receipt_provider::ReceiptProvider;
use async_trait::async_trait;
use log::{debug, info, log, warn, Level};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Receives the final outcome of a watched transaction
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn apply_outcome(&self, tx_hash: &str, outcome: SwapOutcome);
}

/// How a reconciliation loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The provider returned a receipt and the outcome was applied
    Resolved(SwapOutcome),
    /// Every attempt ran without a receipt; the swap stays pending
    Exhausted,
    /// The watcher was shut down before the loop finished
    Cancelled,
}

/// Polls the receipt provider for submitted swap transactions and reports
/// their outcome to a [`StatusSink`].
///
/// Each watch is its own tokio task. The task ends when a receipt arrives, when
/// the attempt budget runs out, or when the watcher shuts down or is dropped.
pub struct ReceiptWatcher {
    provider: Option<Arc<dyn ReceiptProvider>>,
    sink: Arc<dyn StatusSink>,
    poll_interval: Duration,
    max_attempts: u32,
    stop_tx: watch::Sender<bool>,
}

impl ReceiptWatcher {
    pub fn new(
        provider: Option<Arc<dyn ReceiptProvider>>,
        sink: Arc<dyn StatusSink>,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            provider,
            sink,
            poll_interval,
            max_attempts,
            stop_tx,
        }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Starts polling for `tx_hash`.
    ///
    /// Returns `None` without scheduling anything when no provider is
    /// available. Watching the same hash twice starts two independent loops.
    pub fn watch(&self, tx_hash: &str) -> Option<JoinHandle<WatchOutcome>> {
        let Some(provider) = self.provider.clone() else {
            debug!("No receipt provider available, not watching tx {}", tx_hash);
            return None;
        };

        let poll = ReceiptPoll {
            provider,
            sink: self.sink.clone(),
            tx_hash: tx_hash.to_string(),
            poll_interval: self.poll_interval,
            max_attempts: self.max_attempts,
            stop_rx: self.stop_tx.subscribe(),
        };

        debug!("Watching tx {}", tx_hash);
        Some(tokio::spawn(poll.run()))
    }

    /// Stops every running loop
    pub fn shutdown(&self) {
        self.stop_tx.send_replace(true);
        info!("Receipt watcher stop signal sent");
    }
}

impl Drop for ReceiptWatcher {
    fn drop(&mut self) {
        self.stop_tx.send_replace(true);
    }
}

struct ReceiptPoll {
    provider: Arc<dyn ReceiptProvider>,
    sink: Arc<dyn StatusSink>,
    tx_hash: String,
    poll_interval: Duration,
    max_attempts: u32,
    stop_rx: watch::Receiver<bool>,
}

impl ReceiptPoll {
    async fn run(mut self) -> WatchOutcome {
        let mut invalid_hash_reported = false;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                select! {
                    _ = sleep(self.poll_interval) => {}
                    // Fires on shutdown and when the watcher is dropped
                    _ = self.stop_rx.changed() => {
                        debug!("Stopped watching tx {}", self.tx_hash);
                        return WatchOutcome::Cancelled;
                    }
                }
            }

            if *self.stop_rx.borrow() {
                return WatchOutcome::Cancelled;
            }

            match self.provider.get_receipt(&self.tx_hash).await {
                Ok(Some(receipt)) => {
                    let outcome = if receipt.is_success() {
                        SwapOutcome::Success
                    } else {
                        SwapOutcome::Failed
                    };
                    info!(
                        "Tx {} finalized as {} after {} attempt(s)",
                        self.tx_hash, outcome, attempt
                    );
                    self.sink.apply_outcome(&self.tx_hash, outcome).await;
                    return WatchOutcome::Resolved(outcome);
                }
                Ok(None) => {
                    debug!(
                        "Tx {} not finalized yet (attempt {}/{})",
                        self.tx_hash, attempt, self.max_attempts
                    );
                }
                Err(e) => {
                    log!(
                        lookup_failure_level(&e, invalid_hash_reported),
                        "Receipt lookup for tx {} failed (attempt {}/{}): {}",
                        self.tx_hash,
                        attempt,
                        self.max_attempts,
                        e
                    );
                    if matches!(e, TrackerError::InvalidTransactionHash(_)) {
                        invalid_hash_reported = true;
                    }
                }
            }
        }

        warn!(
            "Gave up on tx {} after {} attempts, swap stays pending",
            self.tx_hash, self.max_attempts
        );
        WatchOutcome::Exhausted
    }
}

/// A hash that does not parse never will, so it is only worth one warning
fn lookup_failure_level(error: &TrackerError, invalid_hash_reported: bool) -> Level {
    match error {
        TrackerError::InvalidTransactionHash(_) if invalid_hash_reported => Level::Debug,
        _ => Level::Warn,
    }
}
