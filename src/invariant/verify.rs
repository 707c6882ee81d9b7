// Invariant verification - fee-gated evaluation of a registered check
//
// The constant fee is charged before evaluation and kept when the check
// passes. A broken invariant produces a Halt: the enclosing transaction
// is discarded (refunding the fee) and message processing must stop.

use crate::account::{AccountStore, Address};
use crate::coin::{Coins, Denom};
use crate::invariant::InvariantRegistry;
use crate::keeper::{BaseKeeper, KeeperError};
use crate::params::Params;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error};

/// Recoverable failures of invariant verification
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("No invariant registered under route '{route}'")]
    UnknownRoute { route: String },

    #[error("Insufficient funds to pay the constant fee: account {address} cannot cover {denom}")]
    InsufficientFeeFunds { address: Address, denom: Denom },

    #[error(transparent)]
    Keeper(#[from] KeeperError),
}

/// Fatal stop-the-world signal
///
/// Not an error type: recoverable failures travel through Result; a
/// Halt must stop message processing entirely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Halt {
    route: String,
    description: String,
}

impl Halt {
    /// Create a halt signal for a broken invariant
    pub fn new(route: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            description: description.into(),
        }
    }

    /// Route of the violated invariant
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Description of the violation
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invariant '{}' broken: {}", self.route, self.description)
    }
}

/// Outcome of a completed verification
#[derive(Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The invariant holds; the fee deduction stands
    Passed,
    /// The invariant is broken; the caller must halt
    Broken(Halt),
}

/// Charge the constant fee and evaluate the named invariant
///
/// Step order is binding: route lookup (no fee on unknown route), fee
/// deduction (no evaluation without payment), then evaluation against
/// the current account set.
pub fn verify_invariant<S: AccountStore>(
    store: &mut S,
    keeper: &BaseKeeper,
    registry: &InvariantRegistry,
    params: &Params,
    sender: &Address,
    route: &str,
) -> Result<VerifyOutcome, VerifyError> {
    let check = registry.lookup(route).ok_or_else(|| VerifyError::UnknownRoute {
        route: route.to_string(),
    })?;

    let fee = params.constant_fee().clone();
    let fee_denom = fee.denom().clone();
    let fee_coins = Coins::from(fee);

    keeper
        .subtract_coins(store, sender, &fee_coins)
        .map_err(|err| match err {
            KeeperError::NegativeBalance { address, denom }
            | KeeperError::InsufficientFunds { address, denom } => {
                VerifyError::InsufficientFeeFunds { address, denom }
            }
            KeeperError::AccountNotFound { address } => VerifyError::InsufficientFeeFunds {
                address,
                denom: fee_denom,
            },
            other => VerifyError::Keeper(other),
        })?;

    let accounts = store.accounts().map_err(KeeperError::from)?;
    let report = check(&accounts);

    if report.is_broken() {
        error!(route, description = report.description(), "invariant broken");
        return Ok(VerifyOutcome::Broken(Halt::new(route, report.description())));
    }

    debug!(route, description = report.description(), "invariant holds");
    Ok(VerifyOutcome::Passed)
}
