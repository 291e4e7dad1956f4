pub mod receipt_watcher;

pub use receipt_watcher::{ReceiptWatcher, StatusSink, WatchOutcome};
