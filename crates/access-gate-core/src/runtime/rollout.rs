// crates/access-gate-core/src/runtime/rollout.rs
// ============================================================================
// Module: Access Gate Rollout Engine
// Description: Per-user feature flag and experiment evaluation.
// Purpose: Answer "which flags and variants apply to user U in tenant T?".
// Dependencies: crate::{core, interfaces, runtime::targeting}, thiserror
// ============================================================================

//! ## Overview
//! For each feature key the engine applies, in order: active kill switch,
//! disabled row, targeting, then (experiments only) weighted assignment.
//! Tenant rows replace global rows with the same key before any of that
//! happens.
//!
//! Results depend only on the user key hash, the stored rows, and the tenant
//! and user ids. The clock is read for audit timestamps and nothing else.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;

use crate::core::AuditEvent;
use crate::core::AuditSink;
use crate::core::CONTROL_VARIANT;
use crate::core::FeatureKey;
use crate::core::KillSwitch;
use crate::core::RolloutOutcome;
use crate::core::RolloutRequest;
use crate::core::TenantId;
use crate::core::TenantScopedRow;
use crate::core::hashing::user_key_hash;
use crate::interfaces::Clock;
use crate::interfaces::RolloutStore;
use crate::interfaces::StoreError;
use crate::interfaces::SystemClock;
use crate::runtime::targeting::TargetContext;
use crate::runtime::targeting::assign_variant;
use crate::runtime::targeting::target_matches;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Rollout engine errors.
#[derive(Debug, Error)]
pub enum RolloutError {
    /// The backing store could not answer.
    #[error("rollout evaluation unavailable: {0}")]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Rollout Engine
// ============================================================================

/// Feature flag and experiment engine over a read store.
pub struct RolloutEngine<S, C = SystemClock> {
    /// Read store.
    store: S,
    /// Clock used for audit timestamps.
    clock: C,
    /// Optional audit sink for kill-switch application.
    audit: Option<Arc<dyn AuditSink>>,
}

impl<S: RolloutStore> RolloutEngine<S> {
    /// Creates an engine using the system clock without audit.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: RolloutStore, C: Clock> RolloutEngine<S, C> {
    /// Creates an engine with an explicit clock without audit.
    #[must_use]
    pub const fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            audit: None,
        }
    }

    /// Records a `kill_switch_applied` event whenever a kill switch forces a
    /// flag or experiment off.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Evaluates every flag and experiment visible to the tenant for a user.
    ///
    /// # Errors
    ///
    /// Returns [`RolloutError::Store`] when the store cannot be read.
    pub fn evaluate_rollout(&self, request: &RolloutRequest) -> Result<RolloutOutcome, RolloutError> {
        let hash = request
            .user_key_hash
            .clone()
            .unwrap_or_else(|| user_key_hash(&request.user_id));
        let ctx = TargetContext {
            tenant_id: &request.tenant_id,
            user_id: &request.user_id,
            user_key_hash: &hash,
        };

        let killed = killed_keys(self.store.kill_switches(&request.tenant_id)?, &request.tenant_id);
        let flags = merge_tenant_rows(self.store.feature_flags(&request.tenant_id)?, &request.tenant_id);
        let experiments =
            merge_tenant_rows(self.store.experiments(&request.tenant_id)?, &request.tenant_id);

        let mut outcome = RolloutOutcome::default();
        let mut forced = BTreeSet::new();
        for (key, flag) in flags {
            let enabled = if killed.contains(&key) {
                forced.insert(key.clone());
                false
            } else {
                flag.enabled && target_matches(flag.target_type, &flag.target_value, &key, &ctx)
            };
            outcome.feature_flags.insert(key, enabled);
        }
        for (key, experiment) in experiments {
            let variant = if killed.contains(&key) {
                forced.insert(key.clone());
                CONTROL_VARIANT.to_string()
            } else if experiment.enabled
                && target_matches(experiment.target_type, &experiment.target_value, &key, &ctx)
            {
                assign_variant(&experiment.variant_list(), &key, &hash)
            } else {
                CONTROL_VARIANT.to_string()
            };
            outcome.experiments.insert(key, variant);
        }

        if let Some(audit) = &self.audit
            && !forced.is_empty()
        {
            let now = self.clock.now();
            for key in &forced {
                audit.record(&AuditEvent::kill_switch(
                    now,
                    &request.tenant_id,
                    &request.user_id,
                    key,
                ));
            }
        }
        Ok(outcome)
    }
}

// ============================================================================
// SECTION: Row Merging
// ============================================================================

/// Collects feature keys with an active kill switch for the tenant or global.
fn killed_keys(switches: Vec<KillSwitch>, tenant_id: &TenantId) -> BTreeSet<FeatureKey> {
    switches
        .into_iter()
        .filter(|switch| {
            switch.active && switch.tenant_id.as_ref().is_none_or(|owner| owner == tenant_id)
        })
        .map(|switch| switch.feature_key)
        .collect()
}

/// Merges global and tenant rows by feature key; the tenant row wins.
///
/// Global rows are placed first and tenant rows replace them in a second
/// pass, so the result never depends on input order. Rows owned by another
/// tenant are dropped.
pub fn merge_tenant_rows<T: TenantScopedRow>(
    rows: Vec<T>,
    tenant_id: &TenantId,
) -> BTreeMap<FeatureKey, T> {
    let (global, scoped): (Vec<T>, Vec<T>) = rows
        .into_iter()
        .filter(|row| row.owner().is_none_or(|owner| owner == tenant_id))
        .partition(|row| row.owner().is_none());

    let mut merged = BTreeMap::new();
    for row in global {
        merged.entry(row.feature_key().clone()).or_insert(row);
    }
    for row in scoped {
        merged.insert(row.feature_key().clone(), row);
    }
    merged
}
