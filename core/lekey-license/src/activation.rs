//! License activation and storage.
//!
//! After a key verifies, the outcome is saved locally so the application
//! does not ask for it again on the next launch. The store fails closed: any
//! problem reading the record is reported as "not activated", never as a
//! crash.

use crate::error::{LicenseError, LicenseResult};
use crate::key::LicenseKey;
use crate::machine::MachineId;
use crate::validator::{Validator, VerifiedLicense};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Activation state of this installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationStatus {
    /// No usable activation on record.
    Unactivated,
    /// A verified key is on record.
    Activated,
    /// The record was revoked or no longer verifies.
    Invalid,
}

impl ActivationStatus {
    /// Returns true if the application may be used.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Activated)
    }
}

/// A stored activation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationRecord {
    machine_identifier: MachineId,
    license_key: LicenseKey,
    activated_at: DateTime<Utc>,
    status: ActivationStatus,
}

impl ActivationRecord {
    pub(crate) fn activated(verified: &VerifiedLicense) -> Self {
        Self {
            machine_identifier: verified.machine().clone(),
            license_key: verified.key().clone(),
            activated_at: Utc::now(),
            status: ActivationStatus::Activated,
        }
    }

    /// Returns the machine the key was activated on.
    #[must_use]
    pub fn machine_identifier(&self) -> &MachineId {
        &self.machine_identifier
    }

    /// Returns the license key.
    #[must_use]
    pub fn license_key(&self) -> &LicenseKey {
        &self.license_key
    }

    /// Returns when the license was activated.
    #[must_use]
    pub fn activated_at(&self) -> DateTime<Utc> {
        self.activated_at
    }

    /// Returns the recorded status.
    #[must_use]
    pub fn status(&self) -> ActivationStatus {
        self.status
    }

    /// Returns true if the record is activated for `machine`.
    #[must_use]
    pub fn is_valid_for(&self, machine: &MachineId) -> bool {
        self.status.is_usable() && &self.machine_identifier == machine
    }

    /// Re-checks the stored key against the stored machine identifier.
    ///
    /// Guards against a record edited on disk to pair a key with a different
    /// machine, and against records written under a since-rotated salt.
    fn revalidate(&mut self, validator: &Validator) {
        if self.status != ActivationStatus::Activated {
            return;
        }
        if validator
            .verify_key(&self.machine_identifier, self.license_key.clone())
            .is_err()
        {
            warn!(machine = %self.machine_identifier, "stored activation no longer verifies");
            self.status = ActivationStatus::Invalid;
        }
    }
}

/// Manages activation storage and retrieval.
#[derive(Debug, Clone)]
pub struct ActivationStore {
    /// Path to the activation file.
    path: PathBuf,
    validator: Validator,
}

impl ActivationStore {
    /// Creates a store at `path` that re-checks records with `validator`.
    pub fn new(path: impl AsRef<Path>, validator: Validator) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            validator,
        }
    }

    /// Returns the default activation store path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lekey")
            .join("activation.json")
    }

    /// Returns the path of the activation file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored record.
    ///
    /// Returns `None` when nothing is stored or the file cannot be read or
    /// parsed. A record whose key no longer verifies comes back with status
    /// [`ActivationStatus::Invalid`].
    #[must_use]
    pub fn load(&self) -> Option<ActivationRecord> {
        match self.try_load() {
            Ok(record) => record,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "activation state unreadable, treating as unactivated");
                None
            }
        }
    }

    /// Returns the current activation status.
    #[must_use]
    pub fn status(&self) -> ActivationStatus {
        self.load()
            .map_or(ActivationStatus::Unactivated, |record| record.status())
    }

    /// Persists a successful activation and returns the new record.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::StorageUnavailable`] if the record cannot be
    /// written.
    pub fn record_activation(&self, verified: &VerifiedLicense) -> LicenseResult<ActivationRecord> {
        let record = ActivationRecord::activated(verified);
        self.save(&record)?;
        info!(machine = %record.machine_identifier, "license activated");
        Ok(record)
    }

    /// Marks the stored record invalid.
    ///
    /// Returns the updated record, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::StorageUnavailable`] if the record cannot be
    /// written back.
    pub fn revoke(&self) -> LicenseResult<Option<ActivationRecord>> {
        let Some(mut record) = self.load() else {
            return Ok(None);
        };
        record.status = ActivationStatus::Invalid;
        self.save(&record)?;
        info!(machine = %record.machine_identifier, "activation revoked");
        Ok(Some(record))
    }

    /// Clears the stored activation.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::StorageUnavailable`] if an existing record
    /// cannot be removed.
    pub fn reset(&self) -> LicenseResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "activation reset");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LicenseError::StorageUnavailable(e.to_string())),
        }
    }

    fn try_load(&self) -> LicenseResult<Option<ActivationRecord>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no activation on record");
                return Ok(None);
            }
            Err(e) => return Err(LicenseError::StorageUnavailable(e.to_string())),
        };

        let mut record: ActivationRecord = serde_json::from_str(&json)?;
        record.revalidate(&self.validator);
        Ok(Some(record))
    }

    /// Writes the record to a temp file beside the target and renames it into
    /// place. The temp file is removed on every failure path.
    fn save(&self, record: &ActivationRecord) -> LicenseResult<()> {
        let storage = |e: std::io::Error| LicenseError::StorageUnavailable(e.to_string());

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(storage)?;

        let json = serde_json::to_string_pretty(record)?;
        let mut temp = NamedTempFile::new_in(parent).map_err(storage)?;
        temp.write_all(json.as_bytes()).map_err(storage)?;
        temp.as_file().sync_all().map_err(storage)?;

        temp.persist(&self.path).map_err(|e| storage(e.error))?;
        Ok(())
    }
}
