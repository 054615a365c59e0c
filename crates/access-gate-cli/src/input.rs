// crates/access-gate-cli/src/input.rs
// ============================================================================
// Module: CLI Input Loading
// Description: Size-limited file reads for snapshots and request payloads.
// Purpose: Refuse oversized inputs before buffering them.
// Dependencies: access-gate-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Every file the CLI reads goes through [`read_bytes_with_limit`], which
//! checks metadata first and then caps the actual read, so a file that grows
//! between the two steps is still rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;

use access_gate_core::Snapshot;
use access_gate_core::SnapshotError;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::t;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of an access or rollout request payload.
pub const MAX_REQUEST_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while reading a bounded input file.
#[derive(Debug, Error)]
pub enum ReadLimitError {
    /// The file could not be opened or read.
    #[error("{0}")]
    Io(std::io::Error),
    /// The file exceeds the configured limit.
    #[error("input is {size} bytes (limit {limit})")]
    TooLarge {
        /// Observed size in bytes.
        size: u64,
        /// Limit in bytes.
        limit: usize,
    },
}

/// Errors raised while loading a typed input file.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct InputError {
    /// Human-readable message.
    message: String,
}

impl InputError {
    /// Wraps a read failure for `kind` at `path`.
    fn read(kind: &str, path: &Path, err: ReadLimitError) -> Self {
        let message = match err {
            ReadLimitError::Io(error) => {
                t!("input.read_failed", kind = kind, path = path.display(), error = error)
            }
            ReadLimitError::TooLarge {
                size,
                limit,
            } => t!(
                "input.read_too_large",
                kind = kind,
                path = path.display(),
                size = size,
                limit = limit
            ),
        };
        Self {
            message,
        }
    }
}

// ============================================================================
// SECTION: Readers
// ============================================================================

/// Reads at most `max_bytes` from `path`.
///
/// # Errors
///
/// Returns [`ReadLimitError`] when the file cannot be read or exceeds the limit.
pub fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads and deserializes a JSON request payload.
///
/// # Errors
///
/// Returns [`InputError`] when the file is unreadable, oversized, or not
/// valid JSON for `T`.
pub fn read_json<T: DeserializeOwned>(kind: &str, path: &Path) -> Result<T, InputError> {
    let bytes =
        read_bytes_with_limit(path, MAX_REQUEST_BYTES).map_err(|err| InputError::read(kind, path, err))?;
    serde_json::from_slice(&bytes).map_err(|err| InputError {
        message: t!("input.parse_failed", kind = kind, path = path.display(), error = err),
    })
}

/// Reads, parses, and validates a snapshot file.
///
/// # Errors
///
/// Returns [`InputError`] when the file is unreadable, oversized, or fails
/// snapshot validation.
pub fn load_snapshot(path: &Path, max_bytes: usize) -> Result<Snapshot, InputError> {
    let bytes = read_bytes_with_limit(path, max_bytes)
        .map_err(|err| InputError::read("snapshot", path, err))?;
    Snapshot::from_json(&bytes).map_err(|err: SnapshotError| InputError {
        message: t!("snapshot.invalid", path = path.display(), error = err),
    })
}
