// Coins - denomination-keyed balance sets
//
// Arithmetic is total: addition reports overflow through its return value
// and subtraction produces a signed CoinDiff that exists only so callers
// can validate before persisting. A Coins value never stores a zero or
// negative amount.

use crate::coin::{Denom, DenomError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Amounts are capped below i128::MAX so signed diffs stay exact.
pub const MAX_COIN_AMOUNT: u128 = i128::MAX as u128;

/// Errors that can occur when parsing coins from text
#[derive(Error, Debug)]
pub enum CoinError {
    #[error("Invalid coin '{0}': expected <amount><denom>, e.g. 100atom")]
    InvalidFormat(String),

    #[error("Invalid amount in '{0}'")]
    InvalidAmount(String),

    #[error("Amount in '{0}' exceeds the maximum representable value")]
    AmountTooLarge(String),

    #[error("Invalid denomination: {0}")]
    Denom(#[from] DenomError),
}

/// Overflow past the amount cap. Carries the offending denomination.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Amount overflow for denomination '{0}'")]
pub struct OverflowError(pub Denom);

/// A single denomination paired with a non-negative amount
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    denom: Denom,
    amount: u128,
}

impl Coin {
    /// Create a new coin
    pub fn new(denom: Denom, amount: u128) -> Self {
        Self { denom, amount }
    }

    /// Parse a coin from text of the form `100atom`
    pub fn parse(s: &str) -> Result<Self, CoinError> {
        let s = s.trim();
        let split = s.find(|c: char| !c.is_ascii_digit());

        let (amount_part, denom_part) = match split {
            Some(0) | None => return Err(CoinError::InvalidFormat(s.to_string())),
            Some(idx) => s.split_at(idx),
        };

        let amount: u128 = amount_part
            .parse()
            .map_err(|_| CoinError::InvalidAmount(s.to_string()))?;
        if amount > MAX_COIN_AMOUNT {
            return Err(CoinError::AmountTooLarge(s.to_string()));
        }

        let denom = Denom::parse(denom_part)?;
        Ok(Self { denom, amount })
    }

    /// Get the denomination
    pub fn denom(&self) -> &Denom {
        &self.denom
    }

    /// Get the amount
    pub fn amount(&self) -> u128 {
        self.amount
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A multi-asset balance: an ordered map from denomination to amount
///
/// Every entry is positive; a missing denomination reads as amount zero.
/// Ordering makes iteration and serialization deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coins(BTreeMap<Denom, u128>);

impl Coins {
    /// Create an empty balance
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build a balance from individual coins, merging duplicate
    /// denominations and dropping zero amounts
    pub fn from_coins<I>(coins: I) -> Result<Self, OverflowError>
    where
        I: IntoIterator<Item = Coin>,
    {
        let mut result = Self::new();
        for coin in coins {
            result.credit(coin.denom, coin.amount)?;
        }
        Ok(result)
    }

    /// Parse a balance from text of the form `100atom,5gold`
    pub fn parse(s: &str) -> Result<Self, CoinError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CoinError::InvalidFormat(s.to_string()));
        }

        let mut result = Self::new();
        for part in s.split(',') {
            let coin = Coin::parse(part)?;
            result
                .credit(coin.denom, coin.amount)
                .map_err(|_| CoinError::AmountTooLarge(s.to_string()))?;
        }
        Ok(result)
    }

    /// Amount held for a denomination (zero when absent)
    pub fn amount_of(&self, denom: &Denom) -> u128 {
        self.0.get(denom).copied().unwrap_or(0)
    }

    /// True when no denomination is held
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of denominations held
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate denominations and amounts in denomination order
    pub fn iter(&self) -> impl Iterator<Item = (&Denom, u128)> {
        self.0.iter().map(|(denom, amount)| (denom, *amount))
    }

    /// True iff every denomination in `amt` is covered at >= the
    /// requested amount. Denominations not present in `amt` are ignored.
    pub fn covers(&self, amt: &Coins) -> bool {
        amt.iter().all(|(denom, amount)| self.amount_of(denom) >= amount)
    }

    /// Denomination-wise sum. Commutative and associative; zero amounts
    /// never enter the result.
    pub fn add(&self, other: &Coins) -> Result<Coins, OverflowError> {
        let mut result = self.clone();
        for (denom, amount) in other.iter() {
            result.credit(denom.clone(), amount)?;
        }
        Ok(result)
    }

    /// Denomination-wise difference as a signed diff. The diff may carry
    /// negative amounts; it must be validated before any persist.
    pub fn sub(&self, other: &Coins) -> CoinDiff {
        let mut diff: BTreeMap<Denom, i128> = self
            .iter()
            .map(|(denom, amount)| (denom.clone(), amount as i128))
            .collect();

        for (denom, amount) in other.iter() {
            *diff.entry(denom.clone()).or_insert(0) -= amount as i128;
        }

        CoinDiff(diff)
    }

    fn credit(&mut self, denom: Denom, amount: u128) -> Result<(), OverflowError> {
        if amount == 0 {
            return Ok(());
        }
        let current = self.amount_of(&denom);
        let total = current
            .checked_add(amount)
            .filter(|total| *total <= MAX_COIN_AMOUNT)
            .ok_or_else(|| OverflowError(denom.clone()))?;
        self.0.insert(denom, total);
        Ok(())
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        let mut coins = Coins::new();
        if coin.amount > 0 {
            coins.0.insert(coin.denom, coin.amount);
        }
        coins
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (denom, amount) in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{amount}{denom}")?;
            first = false;
        }
        Ok(())
    }
}

/// The signed intermediate produced by subtraction
///
/// Used only to decide whether a mutation is allowed. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoinDiff(BTreeMap<Denom, i128>);

impl CoinDiff {
    /// True when any denomination went negative
    pub fn is_any_negative(&self) -> bool {
        self.0.values().any(|amount| *amount < 0)
    }

    /// True when every denomination is >= 0
    pub fn is_non_negative(&self) -> bool {
        !self.is_any_negative()
    }

    /// Convert into a persistable balance, dropping zero amounts.
    /// Err carries the first denomination that went negative.
    pub fn settle(self) -> Result<Coins, Denom> {
        if let Some((denom, _)) = self.0.iter().find(|(_, amount)| **amount < 0) {
            return Err(denom.clone());
        }

        let map = self
            .0
            .into_iter()
            .filter(|(_, amount)| *amount > 0)
            .map(|(denom, amount)| (denom, amount as u128))
            .collect();
        Ok(Coins(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(s: &str) -> Coins {
        Coins::parse(s).unwrap()
    }

    #[test]
    fn test_parse_and_display_roundtrip() {
        let c = coins("5gold,100atom");
        assert_eq!(c.to_string(), "100atom,5gold");
    }

    #[test]
    fn test_parse_merges_duplicates() {
        let c = coins("100atom,50atom");
        assert_eq!(c.amount_of(&Denom::parse("atom").unwrap()), 150);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_add_is_commutative() {
        let a = coins("100atom,5gold");
        let b = coins("30atom,7iron");
        assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());
    }

    #[test]
    fn test_add_rejects_overflow() {
        let atom = Denom::parse("atom").unwrap();
        let a = Coins::from(Coin::new(atom.clone(), MAX_COIN_AMOUNT));
        let b = Coins::from(Coin::new(atom.clone(), 1));
        assert_eq!(a.add(&b), Err(OverflowError(atom)));
    }

    #[test]
    fn test_zero_amounts_are_dropped() {
        let c = Coins::from(Coin::new(Denom::parse("atom").unwrap(), 0));
        assert!(c.is_empty());
    }

    #[test]
    fn test_sub_produces_negative_diff() {
        let diff = coins("100atom").sub(&coins("150atom"));
        assert!(diff.is_any_negative());
        assert_eq!(diff.settle(), Err(Denom::parse("atom").unwrap()));
    }

    #[test]
    fn test_sub_settles_when_covered() {
        let settled = coins("100atom,5gold").sub(&coins("40atom")).settle().unwrap();
        assert_eq!(settled, coins("60atom,5gold"));
    }

    #[test]
    fn test_sub_to_zero_drops_denomination() {
        let settled = coins("100atom,5gold").sub(&coins("100atom")).settle().unwrap();
        assert_eq!(settled, coins("5gold"));
    }

    #[test]
    fn test_covers_ignores_missing_denoms_in_request() {
        let held = coins("100atom,5gold");
        assert!(held.covers(&coins("40atom")));
        assert!(!held.covers(&coins("40atom,1iron")));
        assert!(held.covers(&Coins::new()));
    }
}
