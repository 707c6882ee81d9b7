// BaseKeeper - full-permission balance mutation
//
// Extends the send tier with supply-changing operations. subtract_coins
// is the only path by which total supply decreases, add_coins the only
// path by which it increases.

use crate::account::{AccountStore, Address};
use crate::coin::Coins;
use crate::keeper::{write_coins, KeeperError, SendKeeper, ViewKeeper};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One debit leg of a multiparty transfer. Transient, never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    address: Address,
    coins: Coins,
}

impl Input {
    /// Create an input leg
    pub fn new(address: Address, coins: Coins) -> Self {
        Self { address, coins }
    }

    /// Get the debited address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Get the debited coins
    pub fn coins(&self) -> &Coins {
        &self.coins
    }
}

/// One credit leg of a multiparty transfer. Transient, never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    address: Address,
    coins: Coins,
}

impl Output {
    /// Create an output leg
    pub fn new(address: Address, coins: Coins) -> Self {
        Self { address, coins }
    }

    /// Get the credited address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Get the credited coins
    pub fn coins(&self) -> &Coins {
        &self.coins
    }
}

/// Full-permission access to account balances
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseKeeper {
    send: SendKeeper,
}

impl BaseKeeper {
    /// Create a base keeper
    pub fn new() -> Self {
        Self {
            send: SendKeeper::new(),
        }
    }

    /// The transfer tier of this keeper
    pub fn send(&self) -> &SendKeeper {
        &self.send
    }

    /// The read tier of this keeper
    pub fn view(&self) -> &ViewKeeper {
        self.send.view()
    }

    /// Balance of an address
    pub fn coins<S: AccountStore>(&self, store: &S, addr: &Address) -> Result<Coins, KeeperError> {
        self.send.coins(store, addr)
    }

    /// True iff the address covers the requested amount
    pub fn has_coins<S: AccountStore>(
        &self,
        store: &S,
        addr: &Address,
        amt: &Coins,
    ) -> Result<bool, KeeperError> {
        self.send.has_coins(store, addr, amt)
    }

    /// Move `amt` between two accounts
    pub fn send_coins<S: AccountStore>(
        &self,
        store: &mut S,
        from: &Address,
        to: &Address,
        amt: &Coins,
    ) -> Result<(), KeeperError> {
        self.send.send_coins(store, from, to, amt)
    }

    /// Overwrite an account's balance. The primitive every other
    /// mutation composes from; fails when the account does not exist.
    pub fn set_coins<S: AccountStore>(
        &self,
        store: &mut S,
        addr: &Address,
        amt: Coins,
    ) -> Result<(), KeeperError> {
        write_coins(store, addr, amt)
    }

    /// Remove `amt` from an account, decreasing total supply
    pub fn subtract_coins<S: AccountStore>(
        &self,
        store: &mut S,
        addr: &Address,
        amt: &Coins,
    ) -> Result<(), KeeperError> {
        let new_coins = self
            .coins(store, addr)?
            .sub(amt)
            .settle()
            .map_err(|denom| KeeperError::NegativeBalance {
                address: *addr,
                denom,
            })?;
        self.set_coins(store, addr, new_coins)?;

        debug!(%addr, %amt, "subtracted coins");
        Ok(())
    }

    /// Credit `amt` to an account, increasing total supply
    pub fn add_coins<S: AccountStore>(
        &self,
        store: &mut S,
        addr: &Address,
        amt: &Coins,
    ) -> Result<(), KeeperError> {
        let new_coins = self
            .coins(store, addr)?
            .add(amt)
            .map_err(|overflow| KeeperError::BalanceOverflow { denom: overflow.0 })?;
        self.set_coins(store, addr, new_coins)?;

        debug!(%addr, %amt, "added coins");
        Ok(())
    }

    /// Apply every input debit in order, then every output credit in
    /// order. Conservation is not checked here: callers must verify
    /// sum(inputs) == sum(outputs) before invoking. Fails on the first
    /// overdrafted input; the enclosing transaction discards any debit
    /// already applied.
    pub fn input_output_coins<S: AccountStore>(
        &self,
        store: &mut S,
        inputs: &[Input],
        outputs: &[Output],
    ) -> Result<(), KeeperError> {
        for input in inputs {
            self.subtract_coins(store, input.address(), input.coins())?;
        }
        for output in outputs {
            self.add_coins(store, output.address(), output.coins())?;
        }
        Ok(())
    }
}
