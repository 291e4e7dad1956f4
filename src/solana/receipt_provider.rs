use crate::entity::{TrackerError, TxReceipt};
use async_trait::async_trait;
use log::debug;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::Signature;
use std::str::FromStr;
use std::sync::Arc;

/// Source of finality receipts for submitted transactions
#[async_trait]
pub trait ReceiptProvider: Send + Sync {
    /// Returns `None` while the transaction is not finalized
    async fn get_receipt(&self, tx_hash: &str) -> Result<Option<TxReceipt>, TrackerError>;
}

/// Reads signature statuses from a Solana RPC node at finalized commitment
pub struct SolanaReceiptProvider {
    solana_client: Arc<RpcClient>,
}

impl SolanaReceiptProvider {
    pub fn new(solana_client: Arc<RpcClient>) -> Self {
        Self { solana_client }
    }
}

#[async_trait]
impl ReceiptProvider for SolanaReceiptProvider {
    async fn get_receipt(&self, tx_hash: &str) -> Result<Option<TxReceipt>, TrackerError> {
        let signature = Signature::from_str(tx_hash)
            .map_err(|_| TrackerError::InvalidTransactionHash(tx_hash.to_string()))?;

        let status = self
            .solana_client
            .get_signature_status_with_commitment(&signature, CommitmentConfig::finalized())
            .await
            .map_err(|e| TrackerError::Provider(e.to_string()))?;

        Ok(status.map(|result| match result {
            Ok(()) => TxReceipt::success(),
            Err(e) => {
                debug!("Transaction {} failed on chain: {}", tx_hash, e);
                TxReceipt::failed()
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solana::create_solana_client;
    use std::time::Duration;

    #[tokio::test]
    async fn malformed_signature_is_rejected_before_any_rpc_call() {
        // Nothing listens here; the hash must be rejected before a request is made
        let client = create_solana_client("http://127.0.0.1:1", Duration::from_secs(1));
        let provider = SolanaReceiptProvider::new(client);

        let result = provider.get_receipt("0xnot-a-signature").await;
        assert!(matches!(
            result,
            Err(TrackerError::InvalidTransactionHash(hash)) if hash == "0xnot-a-signature"
        ));
    }
}
