//! # dirlist Process Execution (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! This module is the command executor of the service. Given the raw `dir`
//! value taken from a request it builds an [`Invocation`] and runs it as a
//! child process with `tokio::process`, capturing standard output and
//! standard error without blocking the runtime.
//!
//! ## Execution Modes
//!
//! - **`shell`**: the command line is the configured program, a single space,
//!   and the raw value, handed to `<shell> -c`. Nothing is escaped or quoted,
//!   so shell metacharacters in the value (`;`, `|`, `&&`, backticks) are
//!   interpreted by the shell. **This allows arbitrary command execution by
//!   any client** and is kept only for compatibility with the original
//!   service behaviour.
//! - **`argv`** (default): the program is spawned directly with `--` and the
//!   value as one discrete argument. Values containing control characters or
//!   a `..` path component are refused before anything is spawned.
//!
//! ## Resources
//!
//! `Command::output` waits for the child and reaps it on both success and
//! failure. If the awaiting future is dropped (client went away), the child
//! keeps running to completion and is reaped by tokio in the background.
//!
//! ## Examples
//!
//! ```rust
//! let command = ListingCommand::new(ExecMode::Argv, "ls", default_shell());
//! match command.run(Some("/var/log")).await {
//!     Ok(output) => println!("{}", output.stdout),
//!     Err(e) => eprintln!("listing failed: {}", e),
//! }
//! ```
//!
use crate::core::error::DirlistError;
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, trace};

/// Flag that tells the platform shell to execute the following string.
#[cfg(not(windows))]
const SHELL_EXEC_FLAG: &str = "-c";
#[cfg(windows)]
const SHELL_EXEC_FLAG: &str = "/C";

/// The shell used by `shell` mode unless configured otherwise.
pub fn default_shell() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("cmd")
    } else {
        PathBuf::from("/bin/sh")
    }
}

/// How the request value reaches the listing program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExecMode {
    /// Concatenate into a shell command line (unsanitized).
    Shell,
    /// Pass as a discrete, validated argument. No shell involved.
    #[default]
    Argv,
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecMode::Shell => f.write_str("shell"),
            ExecMode::Argv => f.write_str("argv"),
        }
    }
}

/// The command template: which program lists a directory and how it is run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCommand {
    pub mode: ExecMode,
    pub program: String,
    pub shell: PathBuf,
}

/// A fully built command for one request. Created fresh per request and
/// discarded once the process completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Shell { shell: PathBuf, line: String },
    Direct { program: String, args: Vec<String> },
}

/// Captured output of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub stdout: String,
    /// Captured for logging; never rendered.
    pub stderr: String,
}

impl ListingCommand {
    /// # Create Listing Command (`new`)
    ///
    /// ## Arguments
    ///
    /// * `mode`: Whether request values go through a shell or as a discrete argument.
    /// * `program`: The listing program, `ls` by default. In `shell` mode this is
    ///   copied into the command line as-is, so it may carry flags (`"ls -la"`).
    /// * `shell`: The shell used by `shell` mode. Ignored in `argv` mode.
    pub fn new(mode: ExecMode, program: impl Into<String>, shell: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            program: program.into(),
            shell: shell.into(),
        }
    }

    /// # Build Invocation (`invocation`)
    ///
    /// Builds the command for a request value. A missing value is treated as
    /// the empty string.
    ///
    /// In `shell` mode this never fails: the line is `"{program} {dir}"`
    /// verbatim. In `argv` mode an empty value runs the program with no
    /// arguments and a non-empty value is validated first.
    ///
    /// ## Errors
    ///
    /// `DirlistError::ArgumentRejected` when `argv` mode refuses the value.
    pub fn invocation(&self, dir: Option<&str>) -> Result<Invocation, DirlistError> {
        let dir = dir.unwrap_or_default();
        match self.mode {
            ExecMode::Shell => Ok(Invocation::Shell {
                shell: self.shell.clone(),
                line: format!("{} {}", self.program, dir),
            }),
            ExecMode::Argv => {
                let args = if dir.is_empty() {
                    Vec::new()
                } else {
                    validate_argument(dir)?;
                    vec!["--".to_string(), dir.to_string()]
                };
                Ok(Invocation::Direct {
                    program: self.program.clone(),
                    args,
                })
            }
        }
    }

    /// # Run Listing (`run`)
    ///
    /// Builds the invocation for `dir` and runs it to completion.
    ///
    /// ## Returns
    ///
    /// * `Ok(CommandOutput)` when the program exited successfully.
    ///
    /// ## Errors
    ///
    /// Any of `ArgumentRejected`, `Spawn` or `CommandFailed`. The caller
    /// treats them all alike.
    pub async fn run(&self, dir: Option<&str>) -> Result<CommandOutput, DirlistError> {
        let invocation = self.invocation(dir)?;
        invocation.execute().await
    }
}

impl Invocation {
    fn to_command(&self) -> Command {
        match self {
            Invocation::Shell { shell, line } => {
                let mut cmd = Command::new(shell);
                cmd.arg(SHELL_EXEC_FLAG).arg(line);
                cmd
            }
            Invocation::Direct { program, args } => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
        }
    }

    /// # Execute Invocation (`execute`)
    ///
    /// Spawns the process, waits for it to exit and decodes both captured
    /// streams as (lossy) UTF-8.
    ///
    /// ## Errors
    ///
    /// - `DirlistError::Spawn` if the process could not be started or waited on.
    /// - `DirlistError::CommandFailed` if it exited unsuccessfully.
    pub async fn execute(&self) -> Result<CommandOutput, DirlistError> {
        // Rendered once for logging and error reporting.
        let cmd_str = self.to_string();
        debug!("Spawning: {}", cmd_str);

        let output = self
            .to_command()
            .output()
            .await
            .map_err(|source| DirlistError::Spawn {
                cmd: cmd_str.clone(),
                source,
            })?;

        // Listing output is not guaranteed to be UTF-8 (file names are bytes).
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        trace!(
            "`{}` exited with {} ({} bytes stdout, {} bytes stderr)",
            cmd_str,
            output.status,
            stdout.len(),
            stderr.len()
        );

        if !output.status.success() {
            return Err(DirlistError::CommandFailed {
                cmd: cmd_str,
                status: output.status,
                stderr: stderr.trim_end().to_string(),
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invocation::Shell { line, .. } => f.write_str(line),
            Invocation::Direct { program, args } => {
                f.write_str(program)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
        }
    }
}

/// # Validate Argument (`validate_argument`)
///
/// Checks a value destined for `argv` mode. Refuses control characters
/// (including NUL and newlines) and any `..` path component. Absolute paths
/// and names that merely contain dots (`a..b`) are accepted.
///
/// ## Errors
///
/// `DirlistError::ArgumentRejected` naming the offending value and the reason.
fn validate_argument(value: &str) -> Result<(), DirlistError> {
    if value.chars().any(char::is_control) {
        return Err(DirlistError::ArgumentRejected {
            value: value.to_string(),
            reason: "control characters are not allowed",
        });
    }
    if Path::new(value)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(DirlistError::ArgumentRejected {
            value: value.to_string(),
            reason: "parent directory components are not allowed",
        });
    }
    Ok(())
}

// --- Unit Tests ---
