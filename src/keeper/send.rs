// SendKeeper - balance-conserving transfers
//
// Extends the view tier with two-party transfers. Cannot mint or burn:
// every debit here is matched by an equal credit.

use crate::account::{AccountStore, Address};
use crate::coin::Coins;
use crate::keeper::{write_coins, KeeperError, ViewKeeper};
use tracing::debug;

/// Transfer-capable access to account balances
#[derive(Clone, Copy, Debug, Default)]
pub struct SendKeeper {
    view: ViewKeeper,
}

impl SendKeeper {
    /// Create a send keeper
    pub fn new() -> Self {
        Self {
            view: ViewKeeper::new(),
        }
    }

    /// The read tier of this keeper
    pub fn view(&self) -> &ViewKeeper {
        &self.view
    }

    /// Balance of an address
    pub fn coins<S: AccountStore>(&self, store: &S, addr: &Address) -> Result<Coins, KeeperError> {
        self.view.coins(store, addr)
    }

    /// True iff the address covers the requested amount
    pub fn has_coins<S: AccountStore>(
        &self,
        store: &S,
        addr: &Address,
        amt: &Coins,
    ) -> Result<bool, KeeperError> {
        self.view.has_coins(store, addr, amt)
    }

    /// Move `amt` from one account to another
    ///
    /// The sender's post-balance is validated on the signed diff before
    /// anything is written. Atomicity across the two writes is the
    /// enclosing transaction's responsibility.
    pub fn send_coins<S: AccountStore>(
        &self,
        store: &mut S,
        from: &Address,
        to: &Address,
        amt: &Coins,
    ) -> Result<(), KeeperError> {
        let new_from = self
            .coins(store, from)?
            .sub(amt)
            .settle()
            .map_err(|denom| KeeperError::InsufficientFunds {
                address: *from,
                denom,
            })?;
        write_coins(store, from, new_from)?;

        let new_to = self
            .coins(store, to)?
            .add(amt)
            .map_err(|overflow| KeeperError::BalanceOverflow { denom: overflow.0 })?;
        write_coins(store, to, new_to)?;

        debug!(%from, %to, %amt, "sent coins");
        Ok(())
    }
}
