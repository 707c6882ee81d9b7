// chainbank - Deterministic multi-asset ledger subsystem
//
// Capability-scoped keepers over an account store, atomic multiparty
// transfers, and fee-gated invariant verification that halts message
// processing when a global accounting invariant is broken.

pub mod account;
pub mod coin;
pub mod invariant;
pub mod keeper;
pub mod msg;
pub mod params;
