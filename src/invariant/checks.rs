// Built-in ledger invariants

use crate::account::Account;
use crate::invariant::InvariantReport;

/// Route for the nonnegative-balances invariant
pub const NONNEGATIVE_BALANCES_ROUTE: &str = "bank/nonnegative-balances";

/// Every stored balance entry is strictly positive
///
/// Coins never store zero or negative amounts by construction, so a hit
/// here means the store itself was corrupted.
pub fn nonnegative_balances(accounts: &[Account]) -> InvariantReport {
    for account in accounts {
        for (denom, amount) in account.coins().iter() {
            if amount == 0 {
                return InvariantReport::broken(format!(
                    "account {} holds a zero-amount entry for {}",
                    account.address(),
                    denom
                ));
            }
        }
    }

    InvariantReport::ok(format!(
        "all balances positive across {} accounts",
        accounts.len()
    ))
}
