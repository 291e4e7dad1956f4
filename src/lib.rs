//! Swap lifecycle tracking for a treasury wallet dashboard.
//!
//! Swaps started from the dashboard are recorded locally, persisted across
//! restarts and reconciled in the background against their on-chain outcome.

pub mod config;
pub mod di;
pub mod entity;
pub mod interactor;
pub mod services;
pub mod solana;
pub mod storage;
pub mod utils;

// Re-export commonly used items
pub use config::Config;
pub use di::*;
pub use entity::*;
pub use interactor::*;
pub use services::*;
pub use solana::*;
pub use storage::*;
pub use utils::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
