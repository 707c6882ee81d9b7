// Keeper module - Capability-scoped access to the ledger
// View reads, Send transfers, Base mints and burns. A caller holding a
// narrower tier cannot reach the wider tier's operations.

mod base;
mod send;
mod view;

pub use base::{BaseKeeper, Input, Output};
pub use send::SendKeeper;
pub use view::ViewKeeper;

use crate::account::{AccountStore, Address, StoreError};
use crate::coin::{Coins, Denom};
use thiserror::Error;

/// Errors from keeper operations
#[derive(Error, Debug)]
pub enum KeeperError {
    #[error("No account found for address {address}")]
    AccountNotFound { address: Address },

    #[error("Insufficient funds: account {address} cannot cover {denom}")]
    InsufficientFunds { address: Address, denom: Denom },

    #[error("Cannot end up with negative coins: account {address}, denomination {denom}")]
    NegativeBalance { address: Address, denom: Denom },

    #[error("Balance overflow for denomination {denom}")]
    BalanceOverflow { denom: Denom },

    #[error("Account store error: {0}")]
    Store(#[from] StoreError),
}

/// Overwrite the coins of an existing account. The account must already
/// exist; account lifecycle belongs to the embedding layer.
fn write_coins<S: AccountStore>(
    store: &mut S,
    addr: &Address,
    coins: Coins,
) -> Result<(), KeeperError> {
    let mut account = store
        .account(addr)?
        .ok_or(KeeperError::AccountNotFound { address: *addr })?;
    account.set_coins(coins);
    store.set_account(account)?;
    Ok(())
}
