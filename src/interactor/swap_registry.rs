use crate::entity::{SwapRecord, SwapStatus};
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

#[derive(Default)]
struct RegistryState {
    wallet_address: Option<String>,
    swaps: Vec<SwapRecord>,
}

/// Swaps of the active wallet, newest first.
///
/// This is a projection of the persisted history filtered by wallet; it is
/// rebuilt from scratch every time the active wallet changes.
#[derive(Default)]
pub struct SwapRegistry {
    state: RwLock<RegistryState>,
}

impl SwapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_wallet(&self) -> Option<String> {
        self.read(|state| state.wallet_address.clone())
    }

    pub fn swaps(&self) -> Vec<SwapRecord> {
        self.read(|state| state.swaps.clone())
    }

    pub fn pending_tx_hashes(&self) -> Vec<String> {
        self.read(|state| {
            state
                .swaps
                .iter()
                .filter(|swap| swap.status == SwapStatus::Pending)
                .map(|swap| swap.tx_hash.clone())
                .collect()
        })
    }

    /// Switches to `wallet_address` and drops every entry of the previous wallet
    pub fn reset(&self, wallet_address: Option<&str>) {
        self.write(|state| {
            state.wallet_address = wallet_address.map(str::to_string);
            state.swaps.clear();
        });
    }

    /// Fills the registry from the persisted history.
    ///
    /// Only records of the active wallet are kept. Swaps prepended since the
    /// last [`reset`](Self::reset) stay in front. Returns `false` if the active
    /// wallet changed in the meantime, in which case nothing is touched.
    pub fn populate(&self, wallet_address: &str, persisted: &[SwapRecord]) -> bool {
        self.write(|state| {
            let still_active = state
                .wallet_address
                .as_deref()
                .is_some_and(|active| active.eq_ignore_ascii_case(wallet_address));
            if !still_active {
                return false;
            }

            let loaded: Vec<SwapRecord> = persisted
                .iter()
                .filter(|swap| swap.belongs_to(wallet_address))
                .cloned()
                .collect();
            let loaded_ids: HashSet<&str> = loaded.iter().map(|swap| swap.id.as_str()).collect();

            let mut swaps: Vec<SwapRecord> = state
                .swaps
                .iter()
                .filter(|swap| !loaded_ids.contains(swap.id.as_str()))
                .cloned()
                .collect();
            swaps.extend(loaded);
            state.swaps = swaps;
            true
        })
    }

    /// Prepends `record` if it belongs to the active wallet
    pub fn prepend(&self, record: SwapRecord) -> bool {
        self.write(|state| {
            let belongs = state
                .wallet_address
                .as_deref()
                .is_some_and(|active| record.belongs_to(active));
            if belongs {
                state.swaps.insert(0, record);
            }
            belongs
        })
    }

    /// Sets `status` on every pending swap with a matching hash; returns how many changed
    pub fn update_status(&self, tx_hash: &str, status: SwapStatus) -> usize {
        self.write(|state| apply_status(&mut state.swaps, tx_hash, status))
    }

    /// Removes the swaps of `wallet_address`, or everything when no wallet is given
    pub fn clear(&self, wallet_address: Option<&str>) -> usize {
        self.write(|state| {
            let before = state.swaps.len();
            match wallet_address {
                Some(wallet) => state.swaps.retain(|swap| !swap.belongs_to(wallet)),
                None => state.swaps.clear(),
            }
            before - state.swaps.len()
        })
    }

    fn read<T>(&self, f: impl FnOnce(&RegistryState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write<T>(&self, f: impl FnOnce(&mut RegistryState) -> T) -> T {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

/// Moves matching pending swaps to `status`. Terminal swaps are left alone.
pub(crate) fn apply_status(swaps: &mut [SwapRecord], tx_hash: &str, status: SwapStatus) -> usize {
    let mut changed = 0;
    for swap in swaps
        .iter_mut()
        .filter(|swap| swap.matches_tx(tx_hash) && !swap.status.is_terminal())
    {
        swap.status = status;
        changed += 1;
    }
    changed
}
