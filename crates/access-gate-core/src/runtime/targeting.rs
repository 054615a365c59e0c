// crates/access-gate-core/src/runtime/targeting.rs
// ============================================================================
// Module: Access Gate Rollout Targeting
// Description: Target matching and weighted variant assignment.
// Purpose: Interpret administrator-authored targeting without ever failing.
// Dependencies: crate::core, serde_json
// ============================================================================

//! ## Overview
//! `target_value` is free-form JSON edited by administrators. Every shape
//! problem (missing key, wrong type, non-numeric `pct`) is a non-match, so a
//! bad edit turns a feature off instead of breaking evaluation.
//!
//! | target type   | parameter    | match rule                            |
//! |---------------|--------------|---------------------------------------|
//! | `all`         | -            | always                                |
//! | `percent`     | `pct`        | `percent_bucket < pct`                |
//! | `user_list`   | `user_ids`   | user id listed                        |
//! | `tenant_list` | `tenant_ids` | tenant id listed                      |
//! | other         | -            | never                                 |

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::CONTROL_VARIANT;
use crate::core::FeatureKey;
use crate::core::TargetType;
use crate::core::TenantId;
use crate::core::UserId;
use crate::core::Variant;
use crate::core::hashing::percent_bucket;
use crate::core::hashing::variant_bucket;

// ============================================================================
// SECTION: Target Context
// ============================================================================

/// Identity of the user a rollout is evaluated for.
#[derive(Debug, Clone, Copy)]
pub struct TargetContext<'a> {
    /// Tenant of the user.
    pub tenant_id: &'a TenantId,
    /// User identifier.
    pub user_id: &'a UserId,
    /// Stable user key hash used for bucketing.
    pub user_key_hash: &'a str,
}

// ============================================================================
// SECTION: Target Matching
// ============================================================================

/// Returns true when the user is targeted by `(target_type, target_value)`.
#[must_use]
pub fn target_matches(
    target_type: TargetType,
    target_value: &Value,
    feature_key: &FeatureKey,
    ctx: &TargetContext<'_>,
) -> bool {
    match target_type {
        TargetType::All => true,
        TargetType::Percent => percent_matches(target_value, feature_key, ctx.user_key_hash),
        TargetType::UserList => list_contains(target_value, "user_ids", ctx.user_id.as_str()),
        TargetType::TenantList => list_contains(target_value, "tenant_ids", ctx.tenant_id.as_str()),
        TargetType::Unknown => false,
    }
}

/// Percentage rollout: `pct >= 100` always, `pct <= 0` never.
fn percent_matches(target_value: &Value, feature_key: &FeatureKey, user_key_hash: &str) -> bool {
    let Some(pct) = target_value.get("pct").and_then(Value::as_f64) else {
        return false;
    };
    if pct >= 100.0 {
        return true;
    }
    if pct <= 0.0 {
        return false;
    }
    f64::from(percent_bucket(user_key_hash, feature_key)) < pct
}

/// Returns true when `target_value[field]` is an array holding `needle`.
///
/// Non-string entries are ignored.
fn list_contains(target_value: &Value, field: &str, needle: &str) -> bool {
    target_value
        .get(field)
        .and_then(Value::as_array)
        .is_some_and(|items| items.iter().any(|item| item.as_str() == Some(needle)))
}

// ============================================================================
// SECTION: Variant Assignment
// ============================================================================

/// Picks a variant by weight for an enrolled user.
///
/// With a non-positive total weight the first variant wins (or `control`
/// when there are none). Otherwise the user's bucket in `[0, total)` selects
/// the first variant whose running weight exceeds it; the last variant
/// absorbs anything left over.
#[must_use]
pub fn assign_variant(variants: &[Variant], experiment_key: &FeatureKey, user_key_hash: &str) -> String {
    let total: i128 = variants.iter().map(|variant| i128::from(variant.weight)).sum();
    let (Some(first), Some(last)) = (variants.first(), variants.last()) else {
        return CONTROL_VARIANT.to_string();
    };
    if total <= 0 {
        return first.name.clone();
    }
    let total = u64::try_from(total).unwrap_or(u64::MAX);
    let Some(bucket) = variant_bucket(user_key_hash, experiment_key, total) else {
        return first.name.clone();
    };

    let bucket = i128::from(bucket);
    let mut running: i128 = 0;
    for variant in variants {
        running += i128::from(variant.weight);
        if running > bucket {
            return variant.name.clone();
        }
    }
    last.name.clone()
}
