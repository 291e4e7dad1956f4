use crate::entity::TrackerError;
use crate::services::receipt_watcher::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};
use crate::storage::DEFAULT_SLOT_KEY;
use log::warn;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string; file storage is used when unset
    pub database_url: Option<String>,

    /// Directory holding the swap history file
    pub history_dir: PathBuf,

    /// Name of the slot the swap history is stored under
    pub history_key: String,

    /// Solana RPC endpoint; without it swaps are never reconciled
    pub solana_rpc_url: Option<String>,

    pub rpc_timeout: Duration,

    pub poll_interval: Duration,

    pub max_attempts: u32,

    /// Wallet selected at startup
    pub wallet_address: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            history_dir: PathBuf::from("./data"),
            history_key: DEFAULT_SLOT_KEY.to_string(),
            solana_rpc_url: None,
            rpc_timeout: Duration::from_secs(30),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            wallet_address: None,
        }
    }
}

impl Config {
    /// Builds the configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            database_url: non_empty("DATABASE_URL"),
            history_dir: non_empty("SWAP_HISTORY_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.history_dir),
            history_key: non_empty("SWAP_HISTORY_KEY").unwrap_or(defaults.history_key),
            solana_rpc_url: non_empty("SOLANA_RPC_URL"),
            rpc_timeout: parse_or("RPC_TIMEOUT_SECS", non_empty("RPC_TIMEOUT_SECS"))
                .map(Duration::from_secs)
                .unwrap_or(defaults.rpc_timeout),
            poll_interval: parse_or(
                "RECEIPT_POLL_INTERVAL_MS",
                non_empty("RECEIPT_POLL_INTERVAL_MS"),
            )
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval),
            max_attempts: parse_or("RECEIPT_MAX_ATTEMPTS", non_empty("RECEIPT_MAX_ATTEMPTS"))
                .unwrap_or(defaults.max_attempts),
            wallet_address: non_empty("WALLET_ADDRESS"),
        }
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.history_key.contains(['/', '\\']) {
            return Err(TrackerError::Config(format!(
                "SWAP_HISTORY_KEY must not contain path separators: {}",
                self.history_key
            )));
        }
        if self.poll_interval.is_zero() {
            return Err(TrackerError::Config(
                "RECEIPT_POLL_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(TrackerError::Config(
                "RECEIPT_MAX_ATTEMPTS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_or<T: FromStr>(name: &str, value: Option<String>) -> Option<T> {
    let value = value?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring invalid {}={}, using default", name, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]);

        assert_eq!(config.database_url, None);
        assert_eq!(config.solana_rpc_url, None);
        assert_eq!(config.history_key, "swap_history");
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.max_attempts, 30);
        assert_eq!(config.rpc_timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reads_overrides_and_skips_bad_numbers() {
        let config = config_from(&[
            ("SOLANA_RPC_URL", "https://api.mainnet-beta.solana.com"),
            ("SWAP_HISTORY_DIR", "/var/lib/swaps"),
            ("RECEIPT_POLL_INTERVAL_MS", "500"),
            ("RECEIPT_MAX_ATTEMPTS", "many"),
            ("WALLET_ADDRESS", "  "),
        ]);

        assert_eq!(
            config.solana_rpc_url.as_deref(),
            Some("https://api.mainnet-beta.solana.com")
        );
        assert_eq!(config.history_dir, PathBuf::from("/var/lib/swaps"));
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.max_attempts, 30);
        assert_eq!(config.wallet_address, None);
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let config = config_from(&[("RECEIPT_MAX_ATTEMPTS", "0")]);
        assert!(matches!(config.validate(), Err(TrackerError::Config(_))));
    }
}
