// Account module - Addresses, account records, and the balance store
// The store is the sole source of balance truth; keepers mutate through it

mod address;
mod model;
mod store;
mod txn;

pub use address::{Address, AddressError, ADDRESS_LEN};
pub use model::Account;
pub use store::{AccountStore, MemoryAccountStore, SledAccountStore, StoreError};
pub use txn::StateTransaction;
