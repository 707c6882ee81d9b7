// StateTransaction - the all-or-nothing boundary around one message
//
// Writes are buffered in memory and reach the underlying store only on
// commit(). Dropping the transaction discards every buffered write, so a
// failed message leaves the base store untouched.

use crate::account::{Account, AccountStore, Address, StoreError};
use std::collections::BTreeMap;

/// A write-buffering overlay over an account store
pub struct StateTransaction<'a, S: AccountStore> {
    base: &'a mut S,
    writes: BTreeMap<Address, Account>,
}

impl<'a, S: AccountStore> StateTransaction<'a, S> {
    /// Start a transaction over the given store
    pub fn new(base: &'a mut S) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// Number of buffered writes
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Apply every buffered write to the base store
    pub fn commit(self) -> Result<(), StoreError> {
        let writes: Vec<Account> = self.writes.into_values().collect();
        self.base.set_accounts(writes)
    }
}

impl<S: AccountStore> AccountStore for StateTransaction<'_, S> {
    fn account(&self, addr: &Address) -> Result<Option<Account>, StoreError> {
        if let Some(account) = self.writes.get(addr) {
            return Ok(Some(account.clone()));
        }
        self.base.account(addr)
    }

    fn set_account(&mut self, account: Account) -> Result<(), StoreError> {
        self.writes.insert(*account.address(), account);
        Ok(())
    }

    fn accounts(&self) -> Result<Vec<Account>, StoreError> {
        let mut merged: BTreeMap<Address, Account> = self
            .base
            .accounts()?
            .into_iter()
            .map(|account| (*account.address(), account))
            .collect();

        for (addr, account) in &self.writes {
            merged.insert(*addr, account.clone());
        }

        Ok(merged.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MemoryAccountStore;
    use crate::coin::Coins;

    #[test]
    fn test_reads_see_buffered_writes() {
        let mut store = MemoryAccountStore::new();
        let addr = Address::generate();

        let mut txn = StateTransaction::new(&mut store);
        txn.set_account(Account::with_coins(addr, Coins::parse("10atom").unwrap()))
            .unwrap();

        let account = txn.account(&addr).unwrap().unwrap();
        assert_eq!(account.coins(), &Coins::parse("10atom").unwrap());
    }

    #[test]
    fn test_drop_discards_writes() {
        let mut store = MemoryAccountStore::new();
        let addr = Address::generate();

        {
            let mut txn = StateTransaction::new(&mut store);
            txn.set_account(Account::new(addr)).unwrap();
        }

        assert!(store.account(&addr).unwrap().is_none());
    }

    #[test]
    fn test_commit_applies_writes() {
        let mut store = MemoryAccountStore::new();
        let addr = Address::generate();

        let mut txn = StateTransaction::new(&mut store);
        txn.set_account(Account::with_coins(addr, Coins::parse("10atom").unwrap()))
            .unwrap();
        txn.commit().unwrap();

        let account = store.account(&addr).unwrap().unwrap();
        assert_eq!(account.coins(), &Coins::parse("10atom").unwrap());
    }
}
