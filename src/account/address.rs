// Account addresses - opaque fixed-length identifiers with a base58 text form

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

/// Length of an address in bytes
pub const ADDRESS_LEN: usize = 20;

/// Errors that can occur when parsing an address
#[derive(Error, Debug)]
pub enum AddressError {
    #[error("Invalid base58 encoding: {0}")]
    InvalidBase58(String),

    #[error("Invalid address length {0}: expected {ADDRESS_LEN} bytes")]
    InvalidLength(usize),
}

/// An account address
///
/// Equality-comparable and totally ordered (byte order) so account
/// iteration is deterministic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Generate a random address
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; ADDRESS_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Derive an address from public key bytes (truncated SHA256)
    pub fn from_public_key(pubkey: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"addr:");
        hasher.update(pubkey);
        let result = hasher.finalize();
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&result[..ADDRESS_LEN]);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Parse an address from its base58 text form
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|e| AddressError::InvalidBase58(e.to_string()))?;

        if decoded.len() != ADDRESS_LEN {
            return Err(AddressError::InvalidLength(decoded.len()));
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(&self.0).into_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_roundtrip() {
        let addr = Address::generate();
        let parsed = Address::parse(&addr.to_string()).unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn test_from_public_key_is_deterministic() {
        let a = Address::from_public_key(b"some public key bytes");
        let b = Address::from_public_key(b"some public key bytes");
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        let encoded = bs58::encode(b"short").into_string();
        assert!(matches!(
            Address::parse(&encoded),
            Err(AddressError::InvalidLength(5))
        ));
    }
}
