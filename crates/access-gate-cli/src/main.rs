// crates/access-gate-cli/src/main.rs
// ============================================================================
// Module: Access Gate CLI Entry Point
// Description: Command dispatcher for access checks and rollout evaluation.
// Purpose: Evaluate requests against a snapshot file from the shell.
// Dependencies: clap, access-gate-core, access-gate-config, serde_jcs, thiserror.
// ============================================================================

//! ## Overview
//! The Access Gate CLI loads a record snapshot, evaluates one access or
//! rollout request against it, and prints the JSON response on stdout.
//! Errors go to stderr with a failure exit code; a denied access check is a
//! successful evaluation and exits zero.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use access_gate_cli::audit::audit_sink_from_config;
use access_gate_cli::input::load_snapshot;
use access_gate_cli::input::read_json;
use access_gate_cli::t;
use access_gate_config::AccessGateConfig;
use access_gate_config::config_toml_example;
use access_gate_core::AccessEngine;
use access_gate_core::AccessRequest;
use access_gate_core::AccessResponse;
use access_gate_core::InMemoryStore;
use access_gate_core::RolloutEngine;
use access_gate_core::RolloutRequest;
use access_gate_core::Snapshot;
use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "access-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate an access request.
    Check(EvaluateCommand),
    /// Evaluate feature flags and experiments for a user.
    Rollout(EvaluateCommand),
    /// Snapshot utilities.
    Snapshot {
        /// Selected snapshot subcommand.
        #[command(subcommand)]
        command: SnapshotCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Snapshot subcommands.
#[derive(Subcommand, Debug)]
enum SnapshotCommand {
    /// Validate a snapshot file.
    Validate(SnapshotValidateCommand),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate an Access Gate configuration file.
    Validate(ConfigValidateCommand),
    /// Print an example configuration file.
    Example,
}

/// Arguments shared by `check` and `rollout`.
#[derive(Args, Debug)]
struct EvaluateCommand {
    /// Snapshot JSON file (defaults to `snapshot.path` from config).
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,
    /// Request JSON file.
    #[arg(long, value_name = "PATH")]
    request: PathBuf,
    /// Optional config file path (defaults to access-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for snapshot validation.
#[derive(Args, Debug)]
struct SnapshotValidateCommand {
    /// Snapshot JSON file (defaults to `snapshot.path` from config).
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,
    /// Optional config file path (defaults to access-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to access-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Check(command) => command_check(&command),
        Commands::Rollout(command) => command_rollout(&command),
        Commands::Snapshot {
            command,
        } => match command {
            SnapshotCommand::Validate(command) => command_snapshot_validate(&command),
        },
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Validate(command) => command_config_validate(&command),
            ConfigCommand::Example => command_config_example(),
        },
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let help = Cli::command().render_help().to_string();
    write_stdout_line(&help).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Evaluation Commands
// ============================================================================

/// Executes the `check` command.
fn command_check(command: &EvaluateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let store = open_store(command.snapshot.as_deref(), &config)?;
    let request: AccessRequest = read_json("access request", &command.request)
        .map_err(|err| CliError::new(err.to_string()))?;
    let audit = audit_sink_from_config(&config.audit).map_err(|err| {
        CliError::new(t!("audit.open_failed", path = audit_path(&config), error = err))
    })?;

    let engine = AccessEngine::new(store).with_audit(audit);
    let decision = engine
        .compute_effective_access(&request)
        .map_err(|err| CliError::new(t!("check.failed", error = err)))?;
    write_json("access response", &AccessResponse::from(decision))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `rollout` command.
fn command_rollout(command: &EvaluateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let store = open_store(command.snapshot.as_deref(), &config)?;
    let request: RolloutRequest = read_json("rollout request", &command.request)
        .map_err(|err| CliError::new(err.to_string()))?;

    let mut engine = RolloutEngine::new(store);
    if config.audit.rollout_kill_switches {
        let audit = audit_sink_from_config(&config.audit).map_err(|err| {
            CliError::new(t!("audit.open_failed", path = audit_path(&config), error = err))
        })?;
        engine = engine.with_audit(audit);
    }
    let outcome = engine
        .evaluate_rollout(&request)
        .map_err(|err| CliError::new(t!("rollout.failed", error = err)))?;
    write_json("rollout response", &outcome)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Snapshot and Config Commands
// ============================================================================

/// Executes the snapshot validation command.
fn command_snapshot_validate(command: &SnapshotValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let snapshot = read_snapshot(command.snapshot.as_deref(), &config)?;
    write_stdout_line(&t!("snapshot.validate.ok", summary = snapshot_summary(&snapshot)))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = AccessGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the config example command.
fn command_config_example() -> CliResult<ExitCode> {
    let mut stdout = std::io::stdout();
    stdout
        .write_all(config_toml_example().as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads config, falling back to defaults when no file exists.
fn load_config(path: Option<&Path>) -> CliResult<AccessGateConfig> {
    AccessGateConfig::load_or_default(path)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Loads the snapshot named on the command line or in config.
fn read_snapshot(path: Option<&Path>, config: &AccessGateConfig) -> CliResult<Snapshot> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => config
            .snapshot
            .path
            .as_deref()
            .map(|path| PathBuf::from(path.trim()))
            .ok_or_else(|| CliError::new(t!("snapshot.missing_path")))?,
    };
    load_snapshot(&path, config.snapshot.max_bytes).map_err(|err| CliError::new(err.to_string()))
}

/// Builds an in-memory store over the selected snapshot.
fn open_store(path: Option<&Path>, config: &AccessGateConfig) -> CliResult<InMemoryStore> {
    let snapshot = read_snapshot(path, config)?;
    InMemoryStore::new(snapshot).map_err(|err| CliError::new(err.to_string()))
}

/// Renders the configured audit path for error messages.
fn audit_path(config: &AccessGateConfig) -> String {
    config.audit.path.clone().unwrap_or_default()
}

/// Summarizes record counts of a snapshot.
fn snapshot_summary(snapshot: &Snapshot) -> String {
    format!(
        "{} permissions, {} roles, {} grants, {} bindings, {} overrides, {} flags, {} \
         experiments, {} kill switches",
        snapshot.permissions.len(),
        snapshot.roles.len(),
        snapshot.role_permissions.len(),
        snapshot.bindings.len(),
        snapshot.overrides.len(),
        snapshot.feature_flags.len(),
        snapshot.experiments.len(),
        snapshot.kill_switches.len()
    )
}

/// Writes canonical JSON to stdout followed by a newline.
fn write_json<T: Serialize>(kind: &str, value: &T) -> CliResult<()> {
    let mut bytes = serde_jcs::to_vec(value)
        .map_err(|err| CliError::new(t!("output.serialize_failed", kind = kind, error = err)))?;
    bytes.push(b'\n');
    let mut stdout = std::io::stdout();
    stdout.write_all(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::Cli;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
