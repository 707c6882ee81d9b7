// ViewKeeper - read-only balance queries

use crate::account::{AccountStore, Address};
use crate::coin::Coins;
use crate::keeper::KeeperError;

/// Read-only access to account balances
///
/// Holding only a ViewKeeper makes balance mutation a type error: no
/// method on this tier writes to the store.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewKeeper;

impl ViewKeeper {
    /// Create a view keeper
    pub fn new() -> Self {
        Self
    }

    /// Balance of an address. An absent account reads as the empty
    /// balance, not an error.
    pub fn coins<S: AccountStore>(&self, store: &S, addr: &Address) -> Result<Coins, KeeperError> {
        Ok(store
            .account(addr)?
            .map(|account| account.coins().clone())
            .unwrap_or_default())
    }

    /// True iff the address holds at least the requested amount of every
    /// denomination in `amt`
    pub fn has_coins<S: AccountStore>(
        &self,
        store: &S,
        addr: &Address,
        amt: &Coins,
    ) -> Result<bool, KeeperError> {
        Ok(self.coins(store, addr)?.covers(amt))
    }
}
