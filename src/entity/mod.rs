mod receipt;
mod swap;
mod tracker_error;

pub use receipt::{TxReceipt, RECEIPT_STATUS_FAILED, RECEIPT_STATUS_SUCCESS};
pub use swap::{NewSwap, SwapOutcome, SwapRecord, SwapStatus, TokenAmount};
pub use tracker_error::TrackerError;
