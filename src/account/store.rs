// Account stores - the balance source of truth behind the keepers
//
// Provides the AccountStore trait plus two implementations:
// - MemoryAccountStore for tests and embedding
// - SledAccountStore for crash-safe persistence

use crate::account::{Account, Address};
use crate::params::Params;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Key prefixes for organizing data
mod keys {
    pub const ACCOUNT_PREFIX: &[u8] = b"account:";
    pub const PARAMS: &[u8] = b"params:bank";
}

/// Errors from storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Flush failed: {0}")]
    FlushFailed(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

/// Read/write access to the account set
///
/// Accounts are keyed by address; `accounts` lists them in address order
/// so that every sweep over the state is deterministic.
pub trait AccountStore {
    /// Look up an account. Absent accounts are not an error.
    fn account(&self, addr: &Address) -> Result<Option<Account>, StoreError>;

    /// Insert or overwrite an account
    fn set_account(&mut self, account: Account) -> Result<(), StoreError>;

    /// All accounts in address order
    fn accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Apply a batch of writes, as a single unit where the backend
    /// supports it
    fn set_accounts(&mut self, accounts: Vec<Account>) -> Result<(), StoreError> {
        for account in accounts {
            self.set_account(account)?;
        }
        Ok(())
    }
}

/// In-memory account store
///
/// Reference semantics for tests and lightweight embedding.
#[derive(Clone, Debug, Default)]
pub struct MemoryAccountStore {
    accounts: BTreeMap<Address, Account>,
}

impl MemoryAccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// True when no account is stored
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountStore for MemoryAccountStore {
    fn account(&self, addr: &Address) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(addr).cloned())
    }

    fn set_account(&mut self, account: Account) -> Result<(), StoreError> {
        self.accounts.insert(*account.address(), account);
        Ok(())
    }

    fn accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.accounts.values().cloned().collect())
    }
}

/// Persistent account store backed by sled
///
/// Accounts live under the `account:` prefix keyed by address bytes, so
/// sled's key order matches address order. All writes are durable after
/// flush.
pub struct SledAccountStore {
    db: sled::Db,
}

impl SledAccountStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        Ok(Self { db })
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::FlushFailed(e.to_string()))?;
        Ok(())
    }

    /// Save the ledger params
    pub fn save_params(&self, params: &Params) -> Result<(), StoreError> {
        let bytes = postcard::to_allocvec(params)
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;
        self.db.insert(keys::PARAMS, bytes)?;
        Ok(())
    }

    /// Load the ledger params
    pub fn load_params(&self) -> Result<Option<Params>, StoreError> {
        match self.db.get(keys::PARAMS)? {
            Some(bytes) => {
                let params = postcard::from_bytes(&bytes)
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(params))
            }
            None => Ok(None),
        }
    }

    fn account_key(addr: &Address) -> Vec<u8> {
        [keys::ACCOUNT_PREFIX, addr.as_bytes().as_slice()].concat()
    }

    fn decode_account(bytes: &[u8]) -> Result<Account, StoreError> {
        postcard::from_bytes(bytes).map_err(|e| StoreError::DeserializationFailed(e.to_string()))
    }

    fn encode_account(account: &Account) -> Result<Vec<u8>, StoreError> {
        postcard::to_allocvec(account).map_err(|e| StoreError::SerializationFailed(e.to_string()))
    }
}

impl AccountStore for SledAccountStore {
    fn account(&self, addr: &Address) -> Result<Option<Account>, StoreError> {
        match self.db.get(Self::account_key(addr))? {
            Some(bytes) => Ok(Some(Self::decode_account(&bytes)?)),
            None => Ok(None),
        }
    }

    fn set_account(&mut self, account: Account) -> Result<(), StoreError> {
        let key = Self::account_key(account.address());
        let bytes = Self::encode_account(&account)?;
        self.db.insert(key, bytes)?;
        Ok(())
    }

    fn accounts(&self) -> Result<Vec<Account>, StoreError> {
        let mut accounts = Vec::new();
        for result in self.db.scan_prefix(keys::ACCOUNT_PREFIX) {
            let (_, bytes) = result?;
            accounts.push(Self::decode_account(&bytes)?);
        }
        Ok(accounts)
    }

    fn set_accounts(&mut self, accounts: Vec<Account>) -> Result<(), StoreError> {
        let mut batch = sled::Batch::default();
        for account in &accounts {
            batch.insert(Self::account_key(account.address()), Self::encode_account(account)?);
        }
        self.db.apply_batch(batch)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin::Coins;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_accounts_are_address_ordered() {
        let mut store = MemoryAccountStore::new();
        let mut addrs: Vec<Address> = (0..4).map(|_| Address::generate()).collect();

        for addr in &addrs {
            store.set_account(Account::new(*addr)).unwrap();
        }

        addrs.sort();
        let stored: Vec<Address> = store
            .accounts()
            .unwrap()
            .iter()
            .map(|a| *a.address())
            .collect();
        assert_eq!(stored, addrs);
    }

    #[test]
    fn test_sled_store_account_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let addr = Address::generate();

        {
            let mut store = SledAccountStore::open(temp_dir.path()).unwrap();
            let account = Account::with_coins(addr, Coins::parse("100atom").unwrap());
            store.set_account(account).unwrap();
            store.flush().unwrap();
        }

        {
            let store = SledAccountStore::open(temp_dir.path()).unwrap();
            let account = store.account(&addr).unwrap().unwrap();
            assert_eq!(account.coins(), &Coins::parse("100atom").unwrap());
        }
    }
}
