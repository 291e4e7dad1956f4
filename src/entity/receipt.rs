use serde::{Deserialize, Serialize};

/// Status code a provider reports for a transaction that executed successfully
pub const RECEIPT_STATUS_SUCCESS: u64 = 1;

/// Status code used for a finalized transaction that failed
pub const RECEIPT_STATUS_FAILED: u64 = 0;

/// Finality receipt for a submitted transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub status: u64,
}

impl TxReceipt {
    pub fn success() -> Self {
        Self {
            status: RECEIPT_STATUS_SUCCESS,
        }
    }

    pub fn failed() -> Self {
        Self {
            status: RECEIPT_STATUS_FAILED,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RECEIPT_STATUS_SUCCESS
    }
}
