pub mod client;
pub mod receipt_provider;

pub use client::create_solana_client;
pub use receipt_provider::{ReceiptProvider, SolanaReceiptProvider};
