// crates/access-gate-cli/src/lib.rs
// ============================================================================
// Module: Access Gate CLI Library
// Description: Shared helpers for the Access Gate command-line interface.
// Purpose: Provide reusable components for the CLI binary and tests.
// Dependencies: access-gate-core, access-gate-config
// ============================================================================

//! ## Overview
//! This library houses the CLI's message catalog, audit sinks, and bounded
//! input readers. The binary entry point (`src/main.rs`) imports these
//! helpers to keep user-facing output consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// JSON-lines audit sinks.
pub mod audit;
/// Message catalog.
pub mod i18n;
/// Bounded input readers.
pub mod input;
