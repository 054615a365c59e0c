// crates/access-gate-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and `config example`.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for Access Gate configuration. The example must always
//! load cleanly; a test pins that.

/// Returns a canonical example `access-gate.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[audit]
sink = "file"
path = "/var/log/access-gate/audit.jsonl"
rollout_kill_switches = true

[snapshot]
path = "/etc/access-gate/snapshot.json"
max_bytes = 16777216
"#,
    )
}
