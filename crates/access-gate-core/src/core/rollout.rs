// crates/access-gate-core/src/core/rollout.rs
// ============================================================================
// Module: Access Gate Rollout Model
// Description: Feature flag, experiment, and kill switch records.
// Purpose: Provide the read-only records consumed by the rollout engine.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Flags, experiments, and kill switches are keyed by feature key and may be
//! global (`tenant_id = None`) or tenant-scoped. `target_type`,
//! `target_value`, and experiment `variants` are administrator-authored, so
//! they are read leniently: a malformed value degrades to a non-match or to
//! `control` for that row and never fails snapshot parsing. Interpretation
//! happens in `runtime::targeting`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::FeatureKey;
use crate::core::identifiers::TenantId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Variant name returned whenever a user is not enrolled in an experiment.
pub const CONTROL_VARIANT: &str = "control";

// ============================================================================
// SECTION: Targeting
// ============================================================================

/// Targeting strategy of a flag or experiment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Value")]
pub enum TargetType {
    /// Everyone matches.
    All,
    /// A deterministic percentage of users matches.
    Percent,
    /// Listed users match.
    UserList,
    /// Listed tenants match.
    TenantList,
    /// Unrecognized or malformed strategy; never matches.
    #[default]
    Unknown,
}

impl From<Value> for TargetType {
    fn from(value: Value) -> Self {
        match value.as_str() {
            Some("all") => Self::All,
            Some("percent") => Self::Percent,
            Some("user_list") => Self::UserList,
            Some("tenant_list") => Self::TenantList,
            _ => Self::Unknown,
        }
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Feature flag row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFlag {
    /// Record identifier.
    pub id: String,
    /// Feature key.
    pub key: FeatureKey,
    /// Owning tenant; `None` is a global row.
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    /// Master on/off switch.
    pub enabled: bool,
    /// Targeting strategy.
    #[serde(default)]
    pub target_type: TargetType,
    /// Strategy parameters (`pct`, `user_ids`, `tenant_ids`).
    #[serde(default)]
    pub target_value: Value,
}

/// Weighted experiment arm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Variant name reported to callers.
    pub name: String,
    /// Relative weight.
    pub weight: i64,
}

impl Variant {
    /// Reads one `{name, weight}` entry; `None` unless the name is a string
    /// and the weight an integer.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let name = value.get("name")?.as_str()?;
        let weight = value.get("weight")?.as_i64()?;
        Some(Self {
            name: name.to_string(),
            weight,
        })
    }
}

/// Experiment row: a feature flag with weighted variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    /// Record identifier.
    pub id: String,
    /// Experiment key.
    pub key: FeatureKey,
    /// Owning tenant; `None` is a global row.
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    /// Master on/off switch.
    pub enabled: bool,
    /// Targeting strategy for enrollment.
    #[serde(default)]
    pub target_type: TargetType,
    /// Strategy parameters.
    #[serde(default)]
    pub target_value: Value,
    /// Ordered weighted variants as authored (`[{name, weight}, ...]`).
    #[serde(default)]
    pub variants: Value,
}

impl Experiment {
    /// Returns the usable variants in order.
    ///
    /// A non-array `variants` yields nothing; entries without a string
    /// `name` or an integer `weight` are skipped.
    #[must_use]
    pub fn variant_list(&self) -> Vec<Variant> {
        self.variants
            .as_array()
            .map(|items| items.iter().filter_map(Variant::from_value).collect())
            .unwrap_or_default()
    }
}

/// Emergency override forcing a feature off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillSwitch {
    /// Feature key the switch applies to.
    pub feature_key: FeatureKey,
    /// Owning tenant; `None` applies to every tenant.
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    /// Whether the switch is engaged.
    pub active: bool,
}

// ============================================================================
// SECTION: Tenant Precedence
// ============================================================================

/// Rows keyed by feature key that may be global or tenant-scoped.
pub trait TenantScopedRow {
    /// Feature key of the row.
    fn feature_key(&self) -> &FeatureKey;

    /// Owning tenant, if any.
    fn owner(&self) -> Option<&TenantId>;
}

impl TenantScopedRow for FeatureFlag {
    fn feature_key(&self) -> &FeatureKey {
        &self.key
    }

    fn owner(&self) -> Option<&TenantId> {
        self.tenant_id.as_ref()
    }
}

impl TenantScopedRow for Experiment {
    fn feature_key(&self) -> &FeatureKey {
        &self.key
    }

    fn owner(&self) -> Option<&TenantId> {
        self.tenant_id.as_ref()
    }
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Per-user rollout snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloutOutcome {
    /// Feature flag states keyed by feature key.
    pub feature_flags: BTreeMap<FeatureKey, bool>,
    /// Assigned experiment variants keyed by experiment key.
    pub experiments: BTreeMap<FeatureKey, String>,
}
