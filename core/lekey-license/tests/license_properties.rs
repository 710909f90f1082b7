//! Property-based tests for key issuance and validation.
//!
//! These tests verify properties that must always hold:
//! - A key validates on the machine it was issued for
//! - A key never validates on any other machine
//! - Presentation (case, hyphenation) never changes the outcome
//! - Anything that is not 32 hex characters is malformed, never valid

mod common;

use common::{issue_key, test_salt, test_validator, TEST_SECRET};
use lekey_license::{LicenseKey, ValidationResult, KEY_HEX_LEN};
use proptest::prelude::*;
use rand::distributions::Alphanumeric;
use rand::Rng;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn machine_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("LE-[A-Za-z0-9_.-]{1,40}").unwrap()
}

fn distinct_machines() -> impl Strategy<Value = (String, String)> {
    (machine_strategy(), machine_strategy()).prop_filter("machines must differ", |(a, b)| a != b)
}

fn secret_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9!@#$%^&*()]{1,64}").unwrap()
}

fn wrong_length_hex() -> impl Strategy<Value = String> {
    prop::string::string_regex("[0-9A-Fa-f]{0,64}")
        .unwrap()
        .prop_filter("length must not be 32", |s| s.len() != KEY_HEX_LEN)
}

// =============================================================================
// ISSUANCE / VALIDATION PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Issuing twice for the same machine gives the same key.
    #[test]
    fn issuance_is_deterministic(machine in machine_strategy(), secret in secret_strategy()) {
        let salt = test_salt();
        prop_assert_eq!(
            issue_key(&secret, &salt, &machine),
            issue_key(&secret, &salt, &machine)
        );
    }

    /// A key validates on the machine it was issued for.
    #[test]
    fn round_trip(machine in machine_strategy()) {
        let key = issue_key(TEST_SECRET, &test_salt(), &machine);
        prop_assert_eq!(
            test_validator().validate(&machine, &key.canonical()),
            ValidationResult::Valid
        );
    }

    /// A key issued for one machine never validates on another.
    #[test]
    fn key_is_bound_to_its_machine((m1, m2) in distinct_machines()) {
        let key = issue_key(TEST_SECRET, &test_salt(), &m1);
        prop_assert_eq!(
            test_validator().validate(&m2, &key.canonical()),
            ValidationResult::Invalid
        );
    }

    /// Case and hyphenation do not change the outcome.
    #[test]
    fn presentation_is_irrelevant(machine in machine_strategy(), split in 1usize..31) {
        let hex = issue_key(TEST_SECRET, &test_salt(), &machine).as_hex().to_string();
        let regrouped = format!("{}-{}", &hex[..split], &hex[split..]).to_lowercase();
        prop_assert_eq!(
            test_validator().validate(&machine, &regrouped),
            ValidationResult::Valid
        );
    }

    /// Wrong-length hex is always malformed.
    #[test]
    fn wrong_length_is_malformed(machine in machine_strategy(), candidate in wrong_length_hex()) {
        prop_assert_eq!(
            test_validator().validate(&machine, &candidate),
            ValidationResult::Malformed
        );
    }

    /// A non-hex character anywhere makes the key malformed.
    #[test]
    fn non_hex_is_malformed(
        machine in machine_strategy(),
        pos in 0usize..32,
        bad in prop::char::range('G', 'Z'),
    ) {
        let mut chars: Vec<char> = issue_key(TEST_SECRET, &test_salt(), &machine)
            .as_hex()
            .chars()
            .collect();
        chars[pos] = bad;
        let candidate: String = chars.into_iter().collect();
        prop_assert_eq!(
            test_validator().validate(&machine, &candidate),
            ValidationResult::Malformed
        );
    }

    /// Parsing never panics on arbitrary input.
    #[test]
    fn parse_never_panics(input in ".{0,80}") {
        let _ = LicenseKey::parse(&input);
    }
}

/// Binding check over random identifier pairs from a plain RNG.
#[test]
fn binding_holds_for_random_pairs() {
    let mut rng = rand::thread_rng();
    let validator = test_validator();
    let salt = test_salt();

    let mut checked = 0;
    while checked < 200 {
        let len_a = rng.gen_range(1..=24);
        let len_b = rng.gen_range(1..=24);
        let a: String = (&mut rng).sample_iter(Alphanumeric).take(len_a).map(char::from).collect();
        let b: String = (&mut rng).sample_iter(Alphanumeric).take(len_b).map(char::from).collect();
        let (m1, m2) = (format!("LE-{a}"), format!("LE-{b}"));
        if m1 == m2 {
            continue;
        }

        let key = issue_key(TEST_SECRET, &salt, &m1);
        assert_eq!(
            validator.validate(&m2, &key.canonical()),
            ValidationResult::Invalid,
            "{m1} key accepted on {m2}"
        );
        checked += 1;
    }
}
