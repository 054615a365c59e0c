//! Config load validation tests for access-gate-config.
// crates/access-gate-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use access_gate_config::AccessGateConfig;
use access_gate_config::AuditSinkKind;
use access_gate_config::ConfigError;
use access_gate_config::DEFAULT_SNAPSHOT_MAX_BYTES;
use access_gate_config::config_toml_example;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<AccessGateConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(contents: &[u8]) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(contents).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    assert_invalid(AccessGateConfig::load(Some(Path::new(&long_path))), "config path exceeds max length")
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    assert_invalid(
        AccessGateConfig::load(Some(Path::new(&long_component))),
        "config path component too long",
    )
}

#[test]
fn load_rejects_missing_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(AccessGateConfig::load(Some(&path)), "config io error")
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let file = write_config(&vec![b'#'; 1_048_577])?;
    assert_invalid(AccessGateConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let file = write_config(&[0xFF, 0xFE, 0xFF])?;
    assert_invalid(AccessGateConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn load_rejects_unknown_fields() -> TestResult {
    let file = write_config(b"[audit]\nsink = \"stderr\"\nverbose = true\n")?;
    assert_invalid(AccessGateConfig::load(Some(file.path())), "config parse error")?;
    let file = write_config(b"[metrics]\nenabled = true\n")?;
    assert_invalid(AccessGateConfig::load(Some(file.path())), "config parse error")
}

#[test]
fn load_rejects_unknown_sink() -> TestResult {
    let file = write_config(b"[audit]\nsink = \"syslog\"\n")?;
    assert_invalid(AccessGateConfig::load(Some(file.path())), "config parse error")
}

#[test]
fn empty_file_yields_defaults() -> TestResult {
    let file = write_config(b"")?;
    let config = AccessGateConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.audit.sink != AuditSinkKind::Stderr {
        return Err("default sink should be stderr".to_string());
    }
    if config.audit.rollout_kill_switches {
        return Err("kill switch audit should default off".to_string());
    }
    if config.snapshot.max_bytes != DEFAULT_SNAPSHOT_MAX_BYTES || config.snapshot.path.is_some() {
        return Err("unexpected snapshot defaults".to_string());
    }
    Ok(())
}

#[test]
fn example_config_loads() -> TestResult {
    let file = write_config(config_toml_example().as_bytes())?;
    let config = AccessGateConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.audit.sink != AuditSinkKind::File || !config.audit.rollout_kill_switches {
        return Err("example should enable file audit with kill switches".to_string());
    }
    Ok(())
}
