use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One leg of a swap. Both fields are kept exactly as the caller supplied them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    pub symbol: String,
    pub amount: String,
}

impl TokenAmount {
    pub fn new(symbol: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            amount: amount.into(),
        }
    }
}

/// Status of a tracked swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Success,
    Failed,
}

impl SwapStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SwapStatus::Pending)
    }
}

impl std::fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwapStatus::Pending => write!(f, "pending"),
            SwapStatus::Success => write!(f, "success"),
            SwapStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Final outcome reported for a swap transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    Success,
    Failed,
}

impl From<SwapOutcome> for SwapStatus {
    fn from(outcome: SwapOutcome) -> Self {
        match outcome {
            SwapOutcome::Success => SwapStatus::Success,
            SwapOutcome::Failed => SwapStatus::Failed,
        }
    }
}

impl std::fmt::Display for SwapOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", SwapStatus::from(*self))
    }
}

/// A swap as it is kept in the registry and in the persisted history slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRecord {
    pub id: String,
    pub tx_hash: String,
    pub from_token: TokenAmount,
    pub to_token: TokenAmount,
    pub status: SwapStatus,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,
    pub wallet_address: String,
}

impl SwapRecord {
    pub fn matches_tx(&self, tx_hash: &str) -> bool {
        self.tx_hash.eq_ignore_ascii_case(tx_hash)
    }

    pub fn belongs_to(&self, wallet_address: &str) -> bool {
        self.wallet_address.eq_ignore_ascii_case(wallet_address)
    }
}

/// Swap data supplied by the caller before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSwap {
    pub tx_hash: String,
    pub from_token: TokenAmount,
    pub to_token: TokenAmount,
    pub status: SwapStatus,
    pub timestamp: i64,
    pub wallet_address: String,
}

impl NewSwap {
    /// Pending swap stamped with the current time
    pub fn new(
        tx_hash: impl Into<String>,
        from_token: TokenAmount,
        to_token: TokenAmount,
        wallet_address: impl Into<String>,
    ) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            from_token,
            to_token,
            status: SwapStatus::Pending,
            timestamp: Utc::now().timestamp_millis(),
            wallet_address: wallet_address.into(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn into_record(self, id: String) -> SwapRecord {
        SwapRecord {
            id,
            tx_hash: self.tx_hash,
            from_token: self.from_token,
            to_token: self.to_token,
            status: self.status,
            timestamp: self.timestamp,
            wallet_address: self.wallet_address,
        }
    }
}
