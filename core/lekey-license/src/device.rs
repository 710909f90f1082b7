//! Host machine identifier detection.
//!
//! The license core treats the machine identifier as caller-supplied. This
//! module is a default source for shells that have no better one: it hashes
//! a handful of stable host properties into an `LE-` tagged identifier.

use crate::error::LicenseResult;
use crate::machine::{MachineId, MACHINE_ID_PREFIX};
use sha2::{Digest, Sha256};
use std::env;

/// Hex characters of fingerprint after the prefix tag.
const FINGERPRINT_HEX_LEN: usize = 16;

/// Derives this host's machine identifier.
///
/// Stable across reboots; changes when the hostname or the platform machine
/// id changes.
///
/// # Errors
///
/// Only fails if the formatted identifier is rejected by [`MachineId::parse`],
/// which cannot happen for a non-empty fingerprint.
pub fn detect_machine_id() -> LicenseResult<MachineId> {
    machine_id_from_components(&host_components())
}

/// Hashes identifier components into a machine identifier.
pub(crate) fn machine_id_from_components(components: &[String]) -> LicenseResult<MachineId> {
    let combined = components.join("|");

    let mut hasher = Sha256::new();
    hasher.update(combined.as_bytes());
    let hash = hasher.finalize();

    let fingerprint = hex::encode_upper(&hash[..FINGERPRINT_HEX_LEN / 2]);
    MachineId::parse(&format!("{MACHINE_ID_PREFIX}{fingerprint}"))
}

/// Host properties that feed the fingerprint, in a fixed order.
///
/// OS and architecture are always present. Hostname and the platform machine
/// id are skipped when the host cannot report them, which still yields a
/// stable (if weaker) identifier.
fn host_components() -> Vec<String> {
    let mut components = vec![env::consts::OS.to_string(), env::consts::ARCH.to_string()];
    components.extend([host_name(), platform_machine_id()].into_iter().flatten());
    components
}

fn host_name() -> Option<String> {
    let name = hostname::get().ok()?.into_string().ok()?;
    non_empty(&name)
}

#[cfg(target_os = "linux")]
fn platform_machine_id() -> Option<String> {
    ["/etc/machine-id", "/var/lib/dbus/machine-id"]
        .iter()
        .find_map(|path| std::fs::read_to_string(path).ok().and_then(|s| non_empty(&s)))
}

#[cfg(target_os = "macos")]
fn platform_machine_id() -> Option<String> {
    let output = command_stdout("ioreg", &["-rd1", "-c", "IOPlatformExpertDevice"])?;
    parse_ioreg_uuid(&output)
}

#[cfg(windows)]
fn platform_machine_id() -> Option<String> {
    let output = command_stdout(
        "reg",
        &["query", r"HKLM\SOFTWARE\Microsoft\Cryptography", "/v", "MachineGuid"],
    )?;
    parse_machine_guid(&output)
}

#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
fn platform_machine_id() -> Option<String> {
    None
}

#[cfg(any(target_os = "macos", windows))]
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = std::process::Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

/// Extracts `IOPlatformUUID` from `ioreg -rd1 -c IOPlatformExpertDevice`.
///
/// The line looks like `  "IOPlatformUUID" = "0A1B..."`.
#[cfg_attr(not(any(target_os = "macos", test)), allow(dead_code))]
fn parse_ioreg_uuid(output: &str) -> Option<String> {
    let line = output.lines().find(|l| l.contains("\"IOPlatformUUID\""))?;
    let (_, value) = line.split_once('=')?;
    non_empty(value.trim().trim_matches('"'))
}

/// Extracts the value from `reg query ... /v MachineGuid`.
///
/// The line looks like `    MachineGuid    REG_SZ    1a2b...`.
#[cfg_attr(not(any(windows, test)), allow(dead_code))]
fn parse_machine_guid(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next(), fields.next()) {
            (Some("MachineGuid"), Some("REG_SZ"), Some(value)) => non_empty(value),
            _ => None,
        }
    })
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detected_id_is_tagged_and_stable() {
        let a = detect_machine_id().unwrap();
        let b = detect_machine_id().unwrap();
        assert_eq!(a, b);
        assert!(a.as_str().starts_with(MACHINE_ID_PREFIX));
        assert_eq!(a.as_str().len(), MACHINE_ID_PREFIX.len() + FINGERPRINT_HEX_LEN);
    }

    #[test]
    fn host_components_start_with_platform() {
        let components = host_components();
        assert_eq!(components[0], env::consts::OS);
        assert_eq!(components[1], env::consts::ARCH);
        assert!(components.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn ioreg_uuid_is_extracted() {
        let output = r#"+-o J314sAP  <class IOPlatformExpertDevice>
    {
      "IOPlatformSerialNumber" = "C02XXXXXXX"
      "IOPlatformUUID" = "0A1B2C3D-4E5F-6071-8293-A4B5C6D7E8F9"
    }"#;
        assert_eq!(
            parse_ioreg_uuid(output).as_deref(),
            Some("0A1B2C3D-4E5F-6071-8293-A4B5C6D7E8F9")
        );
    }

    #[test]
    fn ioreg_without_uuid_is_none() {
        assert_eq!(parse_ioreg_uuid(r#"  "IOPlatformSerialNumber" = "C02""#), None);
        assert_eq!(parse_ioreg_uuid(r#"  "IOPlatformUUID" = """#), None);
    }

    #[test]
    fn machine_guid_is_extracted() {
        let output = "\r\nHKEY_LOCAL_MACHINE\\SOFTWARE\\Microsoft\\Cryptography\r\n    \
                      MachineGuid    REG_SZ    5f2b6c1e-8d3a-4b7f-9e21-0c4d5a6b7c8d\r\n\r\n";
        assert_eq!(
            parse_machine_guid(output).as_deref(),
            Some("5f2b6c1e-8d3a-4b7f-9e21-0c4d5a6b7c8d")
        );
    }

    #[test]
    fn machine_guid_missing_is_none() {
        let output = "ERROR: The system was unable to find the specified registry key";
        assert_eq!(parse_machine_guid(output), None);
        assert_eq!(parse_machine_guid(""), None);
    }

    #[test]
    fn components_change_the_id() {
        let a = machine_id_from_components(&["linux".to_string(), "host-a".to_string()]).unwrap();
        let b = machine_id_from_components(&["linux".to_string(), "host-b".to_string()]).unwrap();
        assert_ne!(a, b);
    }
}
