// crates/access-gate-cli/src/audit.rs
// ============================================================================
// Module: CLI Audit Sinks
// Description: JSON-lines audit sinks for stderr and append-only files.
// Purpose: Persist access and rollout audit events outside the core.
// Dependencies: access-gate-core, access-gate-config, serde_json
// ============================================================================

//! ## Overview
//! Each [`AuditEvent`] is written as one JSON object per line. Write
//! failures are swallowed; auditing never changes a decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use access_gate_config::AuditConfig;
use access_gate_config::AuditSinkKind;
use access_gate_core::AuditEvent;
use access_gate_core::AuditSink;
use access_gate_core::NoopAuditSink;

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &AuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &AuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds the audit sink selected by configuration.
///
/// # Errors
///
/// Returns an error when the file sink cannot open its log.
pub fn audit_sink_from_config(config: &AuditConfig) -> io::Result<Arc<dyn AuditSink>> {
    match config.sink {
        AuditSinkKind::Stderr => Ok(Arc::new(StderrAuditSink)),
        AuditSinkKind::None => Ok(Arc::new(NoopAuditSink)),
        AuditSinkKind::File => {
            let path = config.path.as_deref().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "file audit sink requires a path")
            })?;
            Ok(Arc::new(FileAuditSink::new(Path::new(path.trim()))?))
        }
    }
}
