// crates/access-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Access Gate Runtime
// Description: RBAC engine, rollout engine, targeting, and in-memory store.
// Purpose: Compute decisions from read-store snapshots.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Both engines are stateless over their store: no background work, no
//! shared mutable state, and no I/O beyond store reads. They are safe to
//! call concurrently from any number of threads.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod rbac;
pub mod rollout;
pub mod store;
pub mod targeting;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use rbac::AccessEngine;
pub use rbac::AccessError;
pub use rollout::RolloutEngine;
pub use rollout::RolloutError;
pub use rollout::merge_tenant_rows;
pub use store::InMemoryStore;
pub use targeting::TargetContext;
pub use targeting::assign_variant;
pub use targeting::target_matches;
