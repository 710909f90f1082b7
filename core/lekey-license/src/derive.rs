//! Keyed segment derivation over HMAC-SHA256.
//!
//! A license key is made of two segments, each a truncated, uppercased hex
//! HMAC of the machine identifier under a different key. This module only
//! knows how to compute the public Prefix; the Body derivation lives with
//! the issuance secret in the issuer tool.

use crate::error::{LicenseError, LicenseResult};
use crate::machine::MachineId;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// Length of the Prefix segment in hex characters.
pub const PREFIX_HEX_LEN: usize = 8;

/// Length of the Body segment in hex characters.
pub const BODY_HEX_LEN: usize = 24;

/// Build-time salt, if the application was compiled with one.
const EMBEDDED_SALT: Option<&str> = option_env!("LEKEY_VERIFICATION_SALT");

/// The salt embedded in the shipped application, used to compute the key Prefix.
///
/// Reachable by anyone holding the binary. It cannot produce a Body.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct VerificationSalt {
    bytes: Vec<u8>,
}

impl VerificationSalt {
    /// Creates a salt from a configured value.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidSecret`] if the value is empty.
    pub fn new(value: impl Into<String>) -> LicenseResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(LicenseError::InvalidSecret(
                "verification salt is empty".to_string(),
            ));
        }
        Ok(Self {
            bytes: value.into_bytes(),
        })
    }

    /// Returns the salt compiled in through `LEKEY_VERIFICATION_SALT`, if any.
    #[must_use]
    pub fn embedded() -> Option<Self> {
        EMBEDDED_SALT.and_then(|s| Self::new(s).ok())
    }

    /// Returns the raw salt bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for VerificationSalt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationSalt")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Computes `HMAC-SHA256(key, machine)` truncated to `hex_len` uppercase hex chars.
///
/// `hex_len` must be even and at most 64.
///
/// # Errors
///
/// Returns [`LicenseError::Crypto`] for an out-of-range length or if the MAC
/// cannot be keyed.
pub fn keyed_segment(key: &[u8], machine: &MachineId, hex_len: usize) -> LicenseResult<String> {
    if hex_len % 2 != 0 || hex_len > 64 {
        return Err(LicenseError::Crypto(format!(
            "unsupported segment length {hex_len}"
        )));
    }

    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| LicenseError::Crypto(e.to_string()))?;
    mac.update(machine.as_str().as_bytes());
    let digest = mac.finalize().into_bytes();

    Ok(hex::encode_upper(&digest[..hex_len / 2]))
}

/// Computes the public Prefix segment for a machine.
///
/// # Errors
///
/// See [`keyed_segment`].
pub fn derive_prefix(salt: &VerificationSalt, machine: &MachineId) -> LicenseResult<String> {
    keyed_segment(salt.as_bytes(), machine, PREFIX_HEX_LEN)
}
