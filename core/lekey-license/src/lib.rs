//! Offline node-locked license validation for LeKey applications.
//!
//! This crate is linked into the shipped application. It handles:
//! - Parsing and formatting license keys
//! - Checking a key against the local machine identifier
//! - Recording and reading the activation state
//! - The startup gate that ties the two together
//!
//! # Key Format
//!
//! A key is `Prefix‖Body`, 32 uppercase hex characters shown as eight
//! hyphenated groups of four:
//! - `Prefix` = first 8 hex chars of `HMAC-SHA256(verification_salt, machine_id)`
//! - `Body` = first 24 hex chars of `HMAC-SHA256(issuance_secret, machine_id)`
//!
//! Only the Prefix is checkable here. The issuance secret, and with it the
//! ability to produce a Body, exists solely in the vendor's issuer tool.

mod activation;
mod config;
mod derive;
mod device;
mod error;
mod gate;
mod key;
mod machine;
mod validator;

pub use activation::{ActivationRecord, ActivationStatus, ActivationStore};
pub use config::{LicenseConfig, ACTIVATION_PATH_ENV_VAR, SALT_ENV_VAR};
pub use derive::{derive_prefix, keyed_segment, VerificationSalt, BODY_HEX_LEN, PREFIX_HEX_LEN};
pub use device::detect_machine_id;
pub use error::{LicenseError, LicenseResult};
pub use gate::{ActivationFailure, ActivationGate, GateDecision, PromptReason};
pub use key::{LicenseKey, GROUP_LEN, KEY_HEX_LEN};
pub use machine::{MachineId, MACHINE_ID_PREFIX};
pub use validator::{validate_license_key, ValidationResult, Validator, VerifiedLicense};
