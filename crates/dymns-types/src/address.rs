//! Account addresses and the codec that validates them.
//!
//! Addresses travel through the system as strings. Anything that stores or
//! indexes an address first runs it through an [`AddressCodec`], so a string
//! that does not decode never reaches the store.

use sha2::{Digest, Sha256};

use crate::{constants, DymnsError, Result};

/// Converts between the textual and raw-byte form of an account address.
pub trait AddressCodec {
    /// Decode a textual address into its raw bytes.
    ///
    /// # Errors
    /// Returns [`DymnsError::InvalidAddress`] if the string is malformed.
    fn decode(&self, address: &str) -> Result<Vec<u8>>;

    /// Encode raw address bytes into the textual form.
    ///
    /// # Errors
    /// Returns [`DymnsError::InvalidAddress`] on an unsupported length.
    fn encode(&self, bytes: &[u8]) -> Result<String>;

    /// Whether `address` decodes.
    fn is_valid(&self, address: &str) -> bool {
        self.decode(address).is_ok()
    }
}

/// `0x`-prefixed lowercase hex addresses of 20 or 32 bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexAddressCodec;

impl AddressCodec for HexAddressCodec {
    fn decode(&self, address: &str) -> Result<Vec<u8>> {
        let body = address
            .strip_prefix("0x")
            .ok_or_else(|| DymnsError::InvalidAddress(address.to_string()))?;
        if body.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(DymnsError::InvalidAddress(address.to_string()));
        }
        let bytes =
            hex::decode(body).map_err(|_| DymnsError::InvalidAddress(address.to_string()))?;
        if !constants::ADDRESS_LENGTHS.contains(&bytes.len()) {
            return Err(DymnsError::InvalidAddress(address.to_string()));
        }
        Ok(bytes)
    }

    fn encode(&self, bytes: &[u8]) -> Result<String> {
        if !constants::ADDRESS_LENGTHS.contains(&bytes.len()) {
            return Err(DymnsError::InvalidAddress(hex::encode(bytes)));
        }
        Ok(format!("0x{}", hex::encode(bytes)))
    }
}

/// Address of the module account that holds escrowed funds.
///
/// Derived as the first 20 bytes of `sha256("module:" + name)`.
#[must_use]
pub fn module_address(name: &str) -> String {
    let digest = Sha256::digest(format!("module:{name}").as_bytes());
    format!("0x{}", hex::encode(&digest[..20]))
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
pub mod dummy {
    use rand::RngCore;

    /// A deterministic 20-byte address whose every byte is `seed`.
    #[must_use]
    pub fn address(seed: u8) -> String {
        format!("0x{}", hex::encode([seed; 20]))
    }

    /// A random 20-byte address.
    #[must_use]
    pub fn random_address() -> String {
        let mut bytes = [0u8; 20];
        rand::thread_rng().fill_bytes(&mut bytes);
        format!("0x{}", hex::encode(bytes))
    }
}
