pub mod swap_history;
pub mod swap_interactor;
pub mod swap_registry;

pub use swap_history::SwapHistory;
pub use swap_interactor::{SwapInteractor, SwapInteractorImpl};
pub use swap_registry::SwapRegistry;
