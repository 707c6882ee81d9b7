// Params - read-only configuration consumed during message handling
//
// The constant fee substitutes for metered execution cost on invariant
// verification: it is read here, never written.

use crate::coin::{Coin, Denom};
use serde::{Deserialize, Serialize};

const DEFAULT_FEE_DENOM: &str = "stake";
const DEFAULT_FEE_AMOUNT: u128 = 1000;

/// Ledger parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    constant_fee: Coin,
}

impl Params {
    /// Create params with the given constant fee
    pub fn new(constant_fee: Coin) -> Self {
        Self { constant_fee }
    }

    /// The fee charged for invariant verification
    pub fn constant_fee(&self) -> &Coin {
        &self.constant_fee
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            constant_fee: Coin::new(Denom::unchecked(DEFAULT_FEE_DENOM), DEFAULT_FEE_AMOUNT),
        }
    }
}
