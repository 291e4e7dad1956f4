use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use std::sync::Arc;
use std::time::Duration;

/// Create an RPC client for receipt lookups.
///
/// Finalized commitment is the default because the tracker only cares about
/// outcomes that can no longer be rolled back.
pub fn create_solana_client(rpc_url: &str, timeout: Duration) -> Arc<RpcClient> {
    Arc::new(RpcClient::new_with_timeout_and_commitment(
        rpc_url.to_string(),
        timeout,
        CommitmentConfig::finalized(),
    ))
}
