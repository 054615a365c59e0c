// crates/access-gate-core/src/core/snapshot.rs
// ============================================================================
// Module: Access Gate Snapshot
// Description: Bundle of every record the engines read, with integrity checks.
// Purpose: Load administrator-managed records once and reject broken bundles.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`Snapshot`] is the unit an in-memory or replicated read model swaps in.
//! [`Snapshot::validate`] enforces the uniqueness rules that a relational
//! store would enforce with constraints, so a snapshot that loads is one the
//! engines can trust.
//!
//! Overrides naming a permission that is not in the catalog are accepted:
//! they stay inert because they can never equal a valid requested key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::access::Permission;
use crate::core::access::PolicyOverride;
use crate::core::access::Role;
use crate::core::access::RoleBinding;
use crate::core::access::RolePermission;
use crate::core::identifiers::TenantId;
use crate::core::rollout::Experiment;
use crate::core::rollout::FeatureFlag;
use crate::core::rollout::KillSwitch;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Snapshot load and validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// Snapshot payload could not be parsed.
    #[error("snapshot parse error: {0}")]
    Parse(String),
    /// A uniqueness rule was violated.
    #[error("snapshot duplicate {kind}: {key}")]
    Duplicate {
        /// Record kind.
        kind: &'static str,
        /// Offending key.
        key: String,
    },
    /// A record references something that does not exist.
    #[error("snapshot invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Snapshot
// ============================================================================

/// Read-only bundle of access and rollout records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    /// Permission catalog.
    #[serde(default)]
    pub permissions: Vec<Permission>,
    /// Roles.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Role grants.
    #[serde(default)]
    pub role_permissions: Vec<RolePermission>,
    /// Role bindings.
    #[serde(default)]
    pub bindings: Vec<RoleBinding>,
    /// Policy overrides.
    #[serde(default)]
    pub overrides: Vec<PolicyOverride>,
    /// Feature flags.
    #[serde(default)]
    pub feature_flags: Vec<FeatureFlag>,
    /// Experiments.
    #[serde(default)]
    pub experiments: Vec<Experiment>,
    /// Kill switches.
    #[serde(default)]
    pub kill_switches: Vec<KillSwitch>,
}

impl Snapshot {
    /// Parses and validates a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when parsing or validation fails.
    pub fn from_json(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self =
            serde_json::from_slice(bytes).map_err(|err| SnapshotError::Parse(err.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Checks record uniqueness and references.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] on the first violated rule.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut permission_keys = BTreeSet::new();
        for permission in &self.permissions {
            unique(&mut permission_keys, permission.key.as_str().to_string(), "permission")?;
        }

        let mut role_ids = BTreeSet::new();
        let mut role_names = BTreeSet::new();
        for role in &self.roles {
            unique(&mut role_ids, role.id.as_str().to_string(), "role id")?;
            let tenant = role.tenant_id.as_ref().map_or("<global>", |tenant| tenant.as_str());
            unique(&mut role_names, format!("{tenant}/{}/{}", role.service, role.name), "role")?;
        }

        let mut grants = BTreeSet::new();
        for grant in &self.role_permissions {
            if !role_ids.contains(grant.role_id.as_str()) {
                return Err(SnapshotError::Invalid(format!(
                    "role permission references unknown role {}",
                    grant.role_id
                )));
            }
            if !permission_keys.contains(grant.permission.as_str()) {
                return Err(SnapshotError::Invalid(format!(
                    "role {} grants unknown permission {}",
                    grant.role_id, grant.permission
                )));
            }
            unique(&mut grants, format!("{}/{}", grant.role_id, grant.permission), "grant")?;
        }

        let mut bindings = BTreeSet::new();
        for binding in &self.bindings {
            if !role_ids.contains(binding.role_id.as_str()) {
                return Err(SnapshotError::Invalid(format!(
                    "binding references unknown role {}",
                    binding.role_id
                )));
            }
            let key = format!(
                "{}/{}/{}/{}/{}",
                binding.tenant_id,
                binding.user_id,
                binding.scope_type,
                binding.scope_id,
                binding.role_id
            );
            unique(&mut bindings, key, "binding")?;
        }

        let mut override_ids = BTreeSet::new();
        for policy in &self.overrides {
            unique(&mut override_ids, policy.id.as_str().to_string(), "override")?;
        }

        let mut flags = BTreeSet::new();
        for flag in &self.feature_flags {
            unique(&mut flags, scoped_key(flag.key.as_str(), flag.tenant_id.as_ref()), "flag")?;
        }
        let mut experiments = BTreeSet::new();
        for experiment in &self.experiments {
            let key = scoped_key(experiment.key.as_str(), experiment.tenant_id.as_ref());
            unique(&mut experiments, key, "experiment")?;
        }
        let mut switches = BTreeSet::new();
        for switch in &self.kill_switches {
            let key = scoped_key(switch.feature_key.as_str(), switch.tenant_id.as_ref());
            unique(&mut switches, key, "kill switch")?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Inserts `key` or reports a duplicate of `kind`.
fn unique(seen: &mut BTreeSet<String>, key: String, kind: &'static str) -> Result<(), SnapshotError> {
    if seen.contains(&key) {
        return Err(SnapshotError::Duplicate {
            kind,
            key,
        });
    }
    seen.insert(key);
    Ok(())
}

/// Builds a `(key, tenant)` uniqueness key.
fn scoped_key(key: &str, tenant_id: Option<&TenantId>) -> String {
    tenant_id.map_or_else(|| format!("{key}@<global>"), |tenant| format!("{key}@{tenant}"))
}
