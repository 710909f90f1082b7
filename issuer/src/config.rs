//! Issuer configuration.
//!
//! Both values normally come from the environment at run time. A build of
//! the issuer may also bake them in through the same variable names; the
//! run-time value wins.

use crate::error::{IssuerError, IssuerResult};
use crate::issuer::Issuer;
use crate::secret::IssuanceSecret;
use lekey_license::VerificationSalt;

/// Environment variable holding the issuance secret.
pub const SECRET_ENV_VAR: &str = "LEKEY_ISSUANCE_SECRET";

/// Environment variable holding the verification salt.
pub const SALT_ENV_VAR: &str = lekey_license::SALT_ENV_VAR;

const EMBEDDED_SECRET: Option<&str> = option_env!("LEKEY_ISSUANCE_SECRET");

/// Secrets the issuer needs.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// Keys the Body segment.
    pub secret: IssuanceSecret,
    /// Keys the Prefix segment; must match the shipped application's salt.
    pub salt: VerificationSalt,
}

impl IssuerConfig {
    /// Resolves configuration from explicit values, falling back to values
    /// embedded at build time.
    ///
    /// # Errors
    ///
    /// Returns [`IssuerError::MissingConfig`] if either value is absent or
    /// empty everywhere.
    pub fn resolve(secret: Option<String>, salt: Option<String>) -> IssuerResult<Self> {
        let secret = match secret.filter(|s| !s.is_empty()) {
            Some(value) => IssuanceSecret::new(value)?,
            None => EMBEDDED_SECRET
                .filter(|s| !s.is_empty())
                .map(IssuanceSecret::new)
                .transpose()?
                .ok_or_else(|| IssuerError::MissingConfig(format!("{SECRET_ENV_VAR} is not set")))?,
        };

        let salt = match salt.filter(|s| !s.is_empty()) {
            Some(value) => VerificationSalt::new(value)?,
            None => VerificationSalt::embedded()
                .ok_or_else(|| IssuerError::MissingConfig(format!("{SALT_ENV_VAR} is not set")))?,
        };

        Ok(Self { secret, salt })
    }

    /// Builds an issuer from this config.
    #[must_use]
    pub fn issuer(&self) -> Issuer {
        Issuer::new(self.secret.clone(), self.salt.clone())
    }
}
