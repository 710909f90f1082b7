//! License key parsing and formatting.
//!
//! A key is 32 uppercase hex characters: an 8-character Prefix followed by
//! a 24-character Body. The canonical display form splits those into eight
//! hyphen-separated groups of four:
//!
//! ```text
//! XXXX-XXXX-XXXX-XXXX-XXXX-XXXX-XXXX-XXXX
//! ```
//!
//! Parsing is lenient about presentation (hyphens, whitespace and case are
//! ignored) and strict about content.

use crate::derive::{BODY_HEX_LEN, PREFIX_HEX_LEN};
use crate::error::{LicenseError, LicenseResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Total hex characters in a key.
pub const KEY_HEX_LEN: usize = PREFIX_HEX_LEN + BODY_HEX_LEN;

/// Characters per group in the canonical form.
pub const GROUP_LEN: usize = 4;

/// A syntactically valid license key.
///
/// Holding a `LicenseKey` says nothing about which machine it belongs to;
/// see [`crate::Validator`] for that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicenseKey {
    /// Normalized `Prefix‖Body`, uppercase, no separators.
    hex: String,
}

impl LicenseKey {
    /// Parses a user-entered key.
    ///
    /// Hyphens and whitespace are stripped and letters uppercased before the
    /// content check.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Malformed`] unless exactly 32 hex characters
    /// remain.
    pub fn parse(candidate: &str) -> LicenseResult<Self> {
        let hex: String = candidate
            .chars()
            .filter(|c| *c != '-' && !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if hex.len() != KEY_HEX_LEN || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(LicenseError::Malformed);
        }

        Ok(Self { hex })
    }

    /// Assembles a key from already-derived segments.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Malformed`] if either segment has the wrong
    /// length or contains non-hex characters.
    pub fn from_segments(prefix: &str, body: &str) -> LicenseResult<Self> {
        if prefix.len() != PREFIX_HEX_LEN || body.len() != BODY_HEX_LEN {
            return Err(LicenseError::Malformed);
        }
        Self::parse(&format!("{prefix}{body}"))
    }

    /// Returns the Prefix segment.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.hex[..PREFIX_HEX_LEN]
    }

    /// Returns the Body segment.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.hex[PREFIX_HEX_LEN..]
    }

    /// Returns the normalized key without separators.
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    /// Returns the canonical hyphenated form.
    #[must_use]
    pub fn canonical(&self) -> String {
        let mut out = String::with_capacity(KEY_HEX_LEN + KEY_HEX_LEN / GROUP_LEN - 1);
        for (i, c) in self.hex.chars().enumerate() {
            if i > 0 && i % GROUP_LEN == 0 {
                out.push('-');
            }
            out.push(c);
        }
        out
    }
}

impl fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl std::str::FromStr for LicenseKey {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LicenseKey {
    type Error = LicenseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LicenseKey> for String {
    fn from(key: LicenseKey) -> Self {
        key.canonical()
    }
}
