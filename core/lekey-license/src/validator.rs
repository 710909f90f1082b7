//! Offline license key verification.
//!
//! The validator recomputes the Prefix for the local machine from the
//! embedded salt and compares it, in constant time, with the Prefix of the
//! candidate key. The Body is carried along but never checked: doing so would
//! require the issuance secret, which is not present in this crate.

use crate::derive::{derive_prefix, VerificationSalt};
use crate::error::{LicenseError, LicenseResult};
use crate::key::LicenseKey;
use crate::machine::MachineId;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::debug;

/// Outcome of checking a candidate key against a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationResult {
    /// The key's Prefix matches this machine.
    Valid,
    /// Well-formed key issued for some other machine (or forged).
    Invalid,
    /// Not 32 hex characters after normalization.
    Malformed,
}

impl ValidationResult {
    /// Returns true only for [`ValidationResult::Valid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Proof that a key passed validation for a machine.
///
/// Only [`Validator::verify`] can build one, which is what lets
/// [`crate::ActivationStore::record_activation`] insist on a prior check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedLicense {
    machine: MachineId,
    key: LicenseKey,
}

impl VerifiedLicense {
    /// Returns the machine the key was verified for.
    #[must_use]
    pub fn machine(&self) -> &MachineId {
        &self.machine
    }

    /// Returns the verified key.
    #[must_use]
    pub fn key(&self) -> &LicenseKey {
        &self.key
    }
}

/// Checks license keys using only the verification salt.
#[derive(Debug, Clone)]
pub struct Validator {
    salt: VerificationSalt,
}

impl Validator {
    /// Creates a validator bound to a salt.
    #[must_use]
    pub fn new(salt: VerificationSalt) -> Self {
        Self { salt }
    }

    /// Validates a candidate key for a machine.
    ///
    /// A machine identifier that fails its format check can never match and
    /// yields [`ValidationResult::Invalid`].
    #[must_use]
    pub fn validate(&self, machine_identifier: &str, candidate_key: &str) -> ValidationResult {
        match self.verify_str(machine_identifier, candidate_key) {
            Ok(_) => ValidationResult::Valid,
            Err(LicenseError::Malformed) => ValidationResult::Malformed,
            Err(_) => ValidationResult::Invalid,
        }
    }

    /// Verifies a candidate key for a parsed machine identifier.
    ///
    /// # Errors
    ///
    /// - [`LicenseError::Malformed`] if the key fails normalization.
    /// - [`LicenseError::Invalid`] if the Prefix does not match.
    pub fn verify(
        &self,
        machine: &MachineId,
        candidate_key: &str,
    ) -> LicenseResult<VerifiedLicense> {
        let key = LicenseKey::parse(candidate_key)?;
        self.verify_key(machine, key)
    }

    /// Verifies an already-parsed key.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Invalid`] if the Prefix does not match.
    pub fn verify_key(&self, machine: &MachineId, key: LicenseKey) -> LicenseResult<VerifiedLicense> {
        let expected = derive_prefix(&self.salt, machine)?;

        if !bool::from(key.prefix().as_bytes().ct_eq(expected.as_bytes())) {
            debug!(machine = %machine, "license prefix mismatch");
            return Err(LicenseError::Invalid);
        }

        debug!(machine = %machine, "license prefix verified");
        Ok(VerifiedLicense {
            machine: machine.clone(),
            key,
        })
    }

    fn verify_str(&self, machine_identifier: &str, candidate_key: &str) -> LicenseResult<VerifiedLicense> {
        // Key format is judged first so a malformed key reports as such
        // regardless of the machine identifier.
        let key = LicenseKey::parse(candidate_key)?;
        let machine = MachineId::parse(machine_identifier)?;
        self.verify_key(&machine, key)
    }
}

/// Free-function form of [`Validator::validate`].
#[must_use]
pub fn validate_license_key(
    salt: &VerificationSalt,
    machine_identifier: &str,
    candidate_key: &str,
) -> ValidationResult {
    Validator::new(salt.clone()).validate(machine_identifier, candidate_key)
}
