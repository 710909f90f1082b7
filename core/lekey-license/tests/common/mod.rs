//! Shared test helpers for license tests.

#![allow(dead_code)]

use lekey_license::{
    derive_prefix, keyed_segment, LicenseKey, MachineId, Validator, VerificationSalt, BODY_HEX_LEN,
};

pub const TEST_SECRET: &str = "secretA";
pub const TEST_SALT: &str = "saltB";
pub const TEST_MACHINE: &str = "LE-TESTMACHINE01";
pub const OTHER_MACHINE: &str = "LE-OTHERMACHINE02";

pub fn test_salt() -> VerificationSalt {
    VerificationSalt::new(TEST_SALT).unwrap()
}

pub fn test_validator() -> Validator {
    Validator::new(test_salt())
}

pub fn machine(raw: &str) -> MachineId {
    MachineId::parse(raw).unwrap()
}

/// Issues a key the way the vendor tool does, for tests on the validating side.
pub fn issue_key(secret: &str, salt: &VerificationSalt, machine_id: &str) -> LicenseKey {
    let machine = machine(machine_id);
    let prefix = derive_prefix(salt, &machine).unwrap();
    let body = keyed_segment(secret.as_bytes(), &machine, BODY_HEX_LEN).unwrap();
    LicenseKey::from_segments(&prefix, &body).unwrap()
}

/// Canonical key string for `machine_id` under the test secret and salt.
pub fn test_key(machine_id: &str) -> String {
    issue_key(TEST_SECRET, &test_salt(), machine_id).canonical()
}

/// Replaces the hex character at `index` (in the unhyphenated key) with a different one.
pub fn alter_hex_char(key: &LicenseKey, index: usize) -> String {
    let mut chars: Vec<char> = key.as_hex().chars().collect();
    chars[index] = if chars[index] == '0' { '1' } else { '0' };
    chars.into_iter().collect()
}
