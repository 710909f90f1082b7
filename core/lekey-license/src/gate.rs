//! Startup gate for the application shell.
//!
//! The shell asks [`ActivationGate::check`] on every launch. If the answer is
//! [`GateDecision::RequireActivation`] it shows an activation prompt and
//! hands the pasted key to [`ActivationGate::activate`].

use crate::activation::{ActivationRecord, ActivationStatus, ActivationStore};
use crate::error::LicenseError;
use crate::machine::MachineId;
use crate::validator::Validator;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Why the gate wants a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptReason {
    /// Nothing on record.
    NotActivated,
    /// The record belongs to a different machine identifier.
    MachineChanged,
    /// The record was revoked or no longer verifies.
    Invalidated,
}

/// The gate's answer at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the user in.
    Allow(ActivationRecord),
    /// Show the activation prompt.
    RequireActivation(PromptReason),
}

impl GateDecision {
    /// Returns true if entry is allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }
}

/// User-facing activation failure.
///
/// Messages deliberately say nothing about how keys are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActivationFailure {
    /// The pasted text is not a key.
    #[error("activation failed: invalid key format")]
    InvalidFormat,
    /// The key belongs to another machine.
    #[error("activation failed: key does not match this machine")]
    WrongMachine,
}

/// Combines validation and storage into the startup decision.
#[derive(Debug, Clone)]
pub struct ActivationGate {
    validator: Validator,
    store: ActivationStore,
}

impl ActivationGate {
    /// Creates a gate.
    #[must_use]
    pub fn new(validator: Validator, store: ActivationStore) -> Self {
        Self { validator, store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &ActivationStore {
        &self.store
    }

    /// Decides whether `machine` may enter without a prompt.
    #[must_use]
    pub fn check(&self, machine: &MachineId) -> GateDecision {
        let Some(record) = self.store.load() else {
            return GateDecision::RequireActivation(PromptReason::NotActivated);
        };

        match record.status() {
            ActivationStatus::Activated if record.machine_identifier() == machine => {
                debug!(machine = %machine, "activation on record");
                GateDecision::Allow(record)
            }
            ActivationStatus::Activated => {
                warn!(
                    recorded = %record.machine_identifier(),
                    current = %machine,
                    "activation recorded for a different machine"
                );
                GateDecision::RequireActivation(PromptReason::MachineChanged)
            }
            ActivationStatus::Invalid => GateDecision::RequireActivation(PromptReason::Invalidated),
            ActivationStatus::Unactivated => {
                GateDecision::RequireActivation(PromptReason::NotActivated)
            }
        }
    }

    /// Validates a pasted key and records the activation on success.
    ///
    /// If the key is valid but the record cannot be written, entry is still
    /// granted for this session and the failure is logged; the next launch
    /// will prompt again.
    ///
    /// # Errors
    ///
    /// Returns an [`ActivationFailure`] when the key is malformed or does not
    /// match `machine`.
    pub fn activate(
        &self,
        machine: &MachineId,
        pasted_key: &str,
    ) -> Result<ActivationRecord, ActivationFailure> {
        let verified = self.validator.verify(machine, pasted_key).map_err(|e| {
            debug!(machine = %machine, reason = %e, "activation rejected");
            match e {
                LicenseError::Malformed => ActivationFailure::InvalidFormat,
                _ => ActivationFailure::WrongMachine,
            }
        })?;

        match self.store.record_activation(&verified) {
            Ok(record) => Ok(record),
            Err(e) => {
                error!(error = %e, "could not persist activation, admitting for this session only");
                Ok(ActivationRecord::activated(&verified))
            }
        }
    }
}
