// crates/access-gate-core/src/lib.rs
// ============================================================================
// Module: Access Gate Core Library
// Description: Public API surface for the Access Gate decision engines.
// Purpose: Expose core types, read-store interfaces, and runtime engines.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Access Gate answers two questions for a federation of backend services:
//! whether a user may exercise a permission at a scope inside a tenant, and
//! which feature flags and experiment variants apply to that user. Both
//! answers are pure reads over administrator-managed records; the engines
//! never write.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::AccessStore;
pub use interfaces::Clock;
pub use interfaces::FixedClock;
pub use interfaces::RolloutStore;
pub use interfaces::StoreError;
pub use interfaces::SystemClock;
pub use runtime::AccessEngine;
pub use runtime::AccessError;
pub use runtime::InMemoryStore;
pub use runtime::RolloutEngine;
pub use runtime::RolloutError;
pub use runtime::TargetContext;
pub use runtime::assign_variant;
pub use runtime::merge_tenant_rows;
pub use runtime::target_matches;
