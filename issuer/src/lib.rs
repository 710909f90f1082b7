//! Offline license key issuer for LeKey.
//!
//! Vendor-side only. This crate holds the issuance secret and is never
//! linked into the shipped application; the application depends on
//! `lekey-license` alone.

mod config;
mod error;
mod issuer;
mod secret;

pub use config::{IssuerConfig, SALT_ENV_VAR, SECRET_ENV_VAR};
pub use error::{IssuerError, IssuerResult};
pub use issuer::{derive_body, generate_license_key, IssuedLicense, Issuer};
pub use secret::IssuanceSecret;
