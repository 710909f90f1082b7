//! Runtime configuration for the shipped application.

use crate::activation::ActivationStore;
use crate::derive::VerificationSalt;
use crate::error::{LicenseError, LicenseResult};
use crate::gate::ActivationGate;
use crate::validator::Validator;
use std::path::PathBuf;
use tracing::debug;

/// Environment variable supplying the verification salt. Read at build time
/// to embed the salt; read at run time only by builds with nothing embedded.
pub const SALT_ENV_VAR: &str = "LEKEY_VERIFICATION_SALT";

/// Environment variable overriding the activation file location.
pub const ACTIVATION_PATH_ENV_VAR: &str = "LEKEY_ACTIVATION_PATH";

/// Everything the application needs to gate startup.
#[derive(Debug, Clone)]
pub struct LicenseConfig {
    /// Salt used to check key prefixes.
    pub salt: VerificationSalt,
    /// Where the activation record lives.
    pub store_path: PathBuf,
}

impl LicenseConfig {
    /// Creates a config with the default store path.
    #[must_use]
    pub fn new(salt: VerificationSalt) -> Self {
        Self {
            salt,
            store_path: ActivationStore::default_path(),
        }
    }

    /// Sets the activation file location.
    #[must_use]
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    /// Loads configuration from the environment.
    ///
    /// The salt embedded at build time always wins. `LEKEY_VERIFICATION_SALT`
    /// is consulted only when nothing was embedded, so a release build cannot
    /// be pointed at a salt of the user's choosing. `LEKEY_ACTIVATION_PATH`
    /// wins over [`ActivationStore::default_path`].
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidSecret`] if neither source provides a
    /// non-empty salt.
    pub fn from_env() -> LicenseResult<Self> {
        let salt = Self::resolve_salt(
            VerificationSalt::embedded(),
            std::env::var(SALT_ENV_VAR).ok(),
        )?;

        let config = Self::new(salt);
        Ok(match std::env::var_os(ACTIVATION_PATH_ENV_VAR) {
            Some(path) if !path.is_empty() => config.with_store_path(path),
            _ => config,
        })
    }

    /// Picks the verification salt: `embedded` if present, else `runtime`.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidSecret`] if there is no embedded salt
    /// and `runtime` is missing or empty.
    pub fn resolve_salt(
        embedded: Option<VerificationSalt>,
        runtime: Option<String>,
    ) -> LicenseResult<VerificationSalt> {
        if let Some(salt) = embedded {
            if runtime.is_some() {
                debug!("ignoring {SALT_ENV_VAR} at run time: a salt is embedded");
            }
            return Ok(salt);
        }
        match runtime {
            Some(value) if !value.is_empty() => VerificationSalt::new(value),
            _ => Err(LicenseError::InvalidSecret(format!(
                "no verification salt: set {SALT_ENV_VAR} at build time"
            ))),
        }
    }

    /// Builds a validator from this config.
    #[must_use]
    pub fn validator(&self) -> Validator {
        Validator::new(self.salt.clone())
    }

    /// Builds an activation store from this config.
    #[must_use]
    pub fn store(&self) -> ActivationStore {
        ActivationStore::new(&self.store_path, self.validator())
    }

    /// Builds the startup gate from this config.
    #[must_use]
    pub fn gate(&self) -> ActivationGate {
        ActivationGate::new(self.validator(), self.store())
    }
}
