mod common;

use common::{test_key, TEST_MACHINE};
use lekey_license::{LicenseError, LicenseKey, KEY_HEX_LEN};

const SAMPLE: &str = "0123ABCD456789EF0123456789ABCDEF";

// ── Parsing ──────────────────────────────────────────────────────

#[test]
fn parse_plain_hex() {
    let key = LicenseKey::parse(SAMPLE).unwrap();
    assert_eq!(key.as_hex(), SAMPLE);
    assert_eq!(key.prefix(), "0123ABCD");
    assert_eq!(key.body(), "456789EF0123456789ABCDEF");
}

#[test]
fn parse_lowercase_is_uppercased() {
    let key = LicenseKey::parse(&SAMPLE.to_lowercase()).unwrap();
    assert_eq!(key.as_hex(), SAMPLE);
}

#[test]
fn parse_ignores_hyphens_and_whitespace() {
    let messy = " 0123-abcd 4567 89ef-0123-4567\t89ab-cdef\n";
    let key = LicenseKey::parse(messy).unwrap();
    assert_eq!(key.as_hex(), SAMPLE);
}

#[test]
fn parse_irregular_grouping() {
    let key = LicenseKey::parse("0123ABCD-456789EF0123-456789ABCDEF").unwrap();
    assert_eq!(key.as_hex(), SAMPLE);
}

// ── Malformed keys ───────────────────────────────────────────────

#[test]
fn parse_too_short() {
    let result = LicenseKey::parse(&SAMPLE[..31]);
    assert!(matches!(result, Err(LicenseError::Malformed)));
}

#[test]
fn parse_too_long() {
    let result = LicenseKey::parse(&format!("{SAMPLE}0"));
    assert!(matches!(result, Err(LicenseError::Malformed)));
}

#[test]
fn parse_empty() {
    assert!(matches!(LicenseKey::parse(""), Err(LicenseError::Malformed)));
    assert!(matches!(LicenseKey::parse("----"), Err(LicenseError::Malformed)));
}

#[test]
fn parse_non_hex() {
    let bad = format!("G{}", &SAMPLE[1..]);
    assert!(matches!(LicenseKey::parse(&bad), Err(LicenseError::Malformed)));
}

#[test]
fn parse_non_ascii() {
    let bad = format!("é{}", &SAMPLE[2..]);
    assert!(matches!(LicenseKey::parse(&bad), Err(LicenseError::Malformed)));
}

#[test]
fn parse_other_separators_rejected() {
    let bad = "0123_ABCD_4567_89EF_0123_4567_89AB_CDEF";
    assert!(matches!(LicenseKey::parse(bad), Err(LicenseError::Malformed)));
}

// ── Segments ─────────────────────────────────────────────────────

#[test]
fn from_segments_checks_lengths() {
    assert!(LicenseKey::from_segments("0123ABCD", "456789EF0123456789ABCDEF").is_ok());
    assert!(LicenseKey::from_segments("0123ABC", "D456789EF0123456789ABCDEF").is_err());
    assert!(LicenseKey::from_segments("0123ABCD", "ZZ6789EF0123456789ABCDEF").is_err());
}

// ── Canonical form ───────────────────────────────────────────────

#[test]
fn canonical_is_eight_groups_of_four() {
    let key = LicenseKey::parse(SAMPLE).unwrap();
    let canonical = key.canonical();
    assert_eq!(canonical, "0123-ABCD-4567-89EF-0123-4567-89AB-CDEF");

    let groups: Vec<&str> = canonical.split('-').collect();
    assert_eq!(groups.len(), 8);
    assert!(groups.iter().all(|g| g.len() == 4));
}

#[test]
fn display_matches_canonical() {
    let key = LicenseKey::parse(SAMPLE).unwrap();
    assert_eq!(key.to_string(), key.canonical());
}

#[test]
fn canonical_reparses_to_same_key() {
    let key = LicenseKey::parse(&test_key(TEST_MACHINE)).unwrap();
    assert_eq!(LicenseKey::parse(&key.canonical()).unwrap(), key);
    assert_eq!(key.as_hex().len(), KEY_HEX_LEN);
}

// ── Serde ────────────────────────────────────────────────────────

#[test]
fn serializes_as_canonical_string() {
    let key = LicenseKey::parse(SAMPLE).unwrap();
    let json = serde_json::to_string(&key).unwrap();
    assert_eq!(json, r#""0123-ABCD-4567-89EF-0123-4567-89AB-CDEF""#);
}

#[test]
fn deserialize_rejects_malformed() {
    let result: Result<LicenseKey, _> = serde_json::from_str(r#""not-a-key""#);
    assert!(result.is_err());
}
