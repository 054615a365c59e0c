// crates/access-gate-config/src/config.rs
// ============================================================================
// Module: Access Gate Configuration
// Description: Configuration loading and validation for Access Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Unknown keys are rejected and inconsistent combinations fail validation,
//! so a typo never silently disables auditing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "access-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "ACCESS_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default snapshot size limit in bytes.
pub const DEFAULT_SNAPSHOT_MAX_BYTES: usize = 16 * 1024 * 1024;
/// Upper bound accepted for `snapshot.max_bytes`.
pub const MAX_SNAPSHOT_BYTES: usize = 256 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Root Access Gate configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AccessGateConfig {
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Snapshot source configuration.
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

impl AccessGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// An explicit `path` wins, then [`CONFIG_ENV_VAR`], then
    /// [`DEFAULT_CONFIG_NAME`] in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Loads configuration like [`Self::load`], but falls back to defaults
    /// when no path was given and the default file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an explicit or existing file fails to
    /// load or validate.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        if path.is_none() && env::var_os(CONFIG_ENV_VAR).is_none() && !resolved.exists() {
            return Ok(Self::default());
        }
        Self::load(Some(&resolved))
    }

    /// Parses and validates configuration bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the payload is oversized, not UTF-8,
    /// unparsable, or inconsistent.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.audit.validate()?;
        self.snapshot.validate()
    }
}

/// Audit sink configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Where audit events are written.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// JSON lines file path when `sink = "file"`.
    #[serde(default)]
    pub path: Option<String>,
    /// Also audit kill switches applied during rollout evaluation.
    #[serde(default)]
    pub rollout_kill_switches: bool,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.sink {
            AuditSinkKind::File => {
                let path = self.path.as_deref().ok_or_else(|| {
                    ConfigError::Invalid("file audit sink requires audit.path".to_string())
                })?;
                validate_path_string("audit.path", path)
            }
            AuditSinkKind::Stderr | AuditSinkKind::None => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid(format!(
                        "{} audit sink must not set audit.path",
                        self.sink.as_str()
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
    /// Discard audit events.
    None,
}

impl AuditSinkKind {
    /// Returns the config label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stderr => "stderr",
            Self::File => "file",
            Self::None => "none",
        }
    }
}

/// Snapshot source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotConfig {
    /// Default snapshot file used when no path is passed on the command line.
    #[serde(default)]
    pub path: Option<String>,
    /// Maximum snapshot size in bytes.
    #[serde(default = "default_snapshot_max_bytes")]
    pub max_bytes: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_bytes: default_snapshot_max_bytes(),
        }
    }
}

impl SnapshotConfig {
    /// Validates snapshot configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid(
                "snapshot.max_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_bytes > MAX_SNAPSHOT_BYTES {
            return Err(ConfigError::Invalid(format!(
                "snapshot.max_bytes must be at most {MAX_SNAPSHOT_BYTES}"
            )));
        }
        if let Some(path) = &self.path {
            validate_path_string("snapshot.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Default for `snapshot.max_bytes`.
const fn default_snapshot_max_bytes() -> usize {
    DEFAULT_SNAPSHOT_MAX_BYTES
}
