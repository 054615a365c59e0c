// crates/access-gate-config/src/lib.rs
// ============================================================================
// Module: Access Gate Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for access-gate.toml semantics.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! `access-gate-config` defines the configuration model for the Access Gate
//! command line: where audit events go and where the default record
//! snapshot lives. Validation is strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
