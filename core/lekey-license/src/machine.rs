//! Machine identifiers that license keys are bound to.

use crate::error::{LicenseError, LicenseResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag every machine identifier starts with.
pub const MACHINE_ID_PREFIX: &str = "LE-";

/// An opaque, stable identifier for one installation.
///
/// Only the `LE-` tag is checked; everything after it is treated as an
/// uninterpreted string and fed to the MAC verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MachineId(String);

impl MachineId {
    /// Parses a machine identifier, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidMachineIdentifier`] when the input does
    /// not start with [`MACHINE_ID_PREFIX`] or has nothing after it.
    pub fn parse(raw: &str) -> LicenseResult<Self> {
        let trimmed = raw.trim();

        let Some(rest) = trimmed.strip_prefix(MACHINE_ID_PREFIX) else {
            return Err(LicenseError::InvalidMachineIdentifier(format!(
                "must start with {MACHINE_ID_PREFIX}"
            )));
        };
        if rest.is_empty() {
            return Err(LicenseError::InvalidMachineIdentifier(
                "nothing after the prefix tag".to_string(),
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for MachineId {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MachineId {
    type Error = LicenseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MachineId> for String {
    fn from(id: MachineId) -> Self {
        id.0
    }
}
