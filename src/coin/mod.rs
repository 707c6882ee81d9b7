// Coin module - Multi-asset balance arithmetic
// Denominations, coin sets, and the signed diffs used to validate transfers

mod coins;
mod denom;

pub use coins::{Coin, CoinDiff, CoinError, Coins, OverflowError, MAX_COIN_AMOUNT};
pub use denom::{Denom, DenomError};
