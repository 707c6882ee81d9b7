// Account - an address paired with its multi-asset balance
//
// Account lifecycle (creation, destruction) belongs to the embedding
// layer; this core only mutates the coins of accounts that exist.

use crate::account::Address;
use crate::coin::Coins;
use serde::{Deserialize, Serialize};

/// An externally owned account holding a balance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    address: Address,
    coins: Coins,
}

impl Account {
    /// Create a new account with an empty balance
    pub fn new(address: Address) -> Self {
        Self {
            address,
            coins: Coins::new(),
        }
    }

    /// Create an account holding the given balance
    pub fn with_coins(address: Address, coins: Coins) -> Self {
        Self { address, coins }
    }

    /// Get the address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Get the balance
    pub fn coins(&self) -> &Coins {
        &self.coins
    }

    /// Overwrite the balance
    pub fn set_coins(&mut self, coins: Coins) {
        self.coins = coins;
    }
}
