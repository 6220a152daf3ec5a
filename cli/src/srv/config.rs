//! # dirlist Server Configuration
//!
//! File: cli/src/srv/config.rs
//!
//! ## Overview
//!
//! This module handles configuration loading and merging for the listing
//! service. It combines settings from:
//! 1. Command-line arguments or `DIRLIST_*` environment variables (highest priority)
//! 2. A TOML configuration file (`--config <path>`, or `.dirlist.toml` in the
//!    working directory if present)
//! 3. Default values (lowest priority)
//!
//! ## Examples
//!
//! Configuration file format:
//!
//! ```toml
//! host = "127.0.0.1"   # "0.0.0.0" (default) is IPv4 only; "::" is dual-stack
//! port = 8080
//! mode = "argv"        # or "shell"
//! program = "ls"
//! shell = "/bin/sh"
//! ```
//!
use crate::common::process::{default_shell, ExecMode, ListingCommand};
use crate::core::error::{DirlistError, Result};
use anyhow::Context;
use clap::Args;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::{env, fs};
use tracing::{debug, info};

/// The configuration file picked up from the working directory.
const CONFIG_FILE_NAME: &str = ".dirlist.toml";

/// Port used when neither the command line nor the file sets one.
pub const DEFAULT_PORT: u16 = 3000;

/// # Server Arguments (`SrvArgs`)
///
/// Command-line arguments of the service. Every field is optional so that
/// an unset flag falls through to the configuration file and then to the
/// defaults.
#[derive(Args, Debug, Default, Clone)]
pub struct SrvArgs {
    /// Address to bind (default: 0.0.0.0, all IPv4 interfaces). Use `::` to
    /// listen on IPv6 as well (dual-stack where the OS allows it).
    #[arg(long, env = "DIRLIST_HOST")]
    pub host: Option<IpAddr>,

    /// TCP port to listen on (default: 3000). Use 0 for an ephemeral port.
    #[arg(long, short, env = "DIRLIST_PORT")]
    pub port: Option<u16>,

    /// How the `dir` value is handed to the listing program. `shell` passes
    /// it unsanitized to a shell and allows command injection.
    #[arg(long, value_enum, env = "DIRLIST_MODE")]
    pub mode: Option<ExecMode>,

    /// Listing program (default: ls).
    #[arg(long, env = "DIRLIST_PROGRAM")]
    pub program: Option<String>,

    /// Shell used in `shell` mode (default: /bin/sh).
    #[arg(long, env = "DIRLIST_SHELL")]
    pub shell: Option<PathBuf>,

    /// Path to a TOML configuration file.
    #[arg(long, short, env = "DIRLIST_CONFIG")]
    pub config: Option<PathBuf>,
}

/// # Effective Server Configuration (`ServerConfig`)
///
/// The merged settings the server runs with. Initialized once at startup and
/// never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub mode: ExecMode,
    pub program: String,
    pub shell: PathBuf,
}

/// Shape of the TOML file. All keys optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    host: Option<IpAddr>,
    port: Option<u16>,
    mode: Option<ExecMode>,
    program: Option<String>,
    shell: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            mode: ExecMode::default(),
            program: "ls".to_string(),
            shell: default_shell(),
        }
    }
}

impl ServerConfig {
    /// # Bind Address (`addr`)
    ///
    /// ## Returns
    ///
    /// * `SocketAddr`: `host` and `port` combined. Port `0` asks the OS for an
    ///   ephemeral port; the actual port is reported once bound.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// # Listing Command (`listing_command`)
    ///
    /// Builds the command template every request is executed with. The
    /// returned value is shared read-only between requests.
    pub fn listing_command(&self) -> ListingCommand {
        ListingCommand::new(self.mode, self.program.clone(), self.shell.clone())
    }

    /// # Apply File Settings (`apply_file`)
    ///
    /// Overwrites each field for which the configuration file has a value.
    /// Keys absent from the file leave the current (default) value untouched.
    ///
    /// ## Arguments
    ///
    /// * `file`: The parsed `.dirlist.toml` (or `--config`) contents.
    fn apply_file(&mut self, file: FileConfig) {
        if let Some(host) = file.host {
            self.host = host;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(mode) = file.mode {
            self.mode = mode;
        }
        if let Some(program) = file.program {
            self.program = program;
        }
        if let Some(shell) = file.shell {
            self.shell = shell;
        }
    }

    /// # Apply Command-Line Settings (`apply_args`)
    ///
    /// Overwrites each field that was given on the command line or through
    /// its `DIRLIST_*` environment variable. Applied after `apply_file`, so
    /// these values win.
    ///
    /// ## Arguments
    ///
    /// * `args`: The parsed `SrvArgs`; `None` fields are skipped.
    fn apply_args(&mut self, args: &SrvArgs) {
        if let Some(host) = args.host {
            self.host = host;
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if let Some(mode) = args.mode {
            self.mode = mode;
        }
        if let Some(program) = &args.program {
            self.program = program.clone();
        }
        if let Some(shell) = &args.shell {
            self.shell = shell.clone();
        }
    }

    /// Rejects settings the server cannot run with.
    fn validate(&self) -> std::result::Result<(), DirlistError> {
        if self.program.trim().is_empty() {
            return Err(DirlistError::Config(
                "listing program must not be empty".to_string(),
            ));
        }
        if self.mode == ExecMode::Shell && self.shell.as_os_str().is_empty() {
            return Err(DirlistError::Config(
                "shell must not be empty in shell mode".to_string(),
            ));
        }
        Ok(())
    }
}

/// # Load and Merge Server Configuration (`load_and_merge_config`)
///
/// Resolves the configuration file relative to the current working directory
/// and merges it with `args`. See [`load_and_merge_config_in`].
pub fn load_and_merge_config(args: &SrvArgs) -> Result<ServerConfig> {
    let cwd = env::current_dir().context("Failed to get current working directory")?;
    load_and_merge_config_in(args, &cwd)
}

/// # Load and Merge Server Configuration (`load_and_merge_config_in`)
///
/// ## Process:
/// 1. Start from `ServerConfig::default()`.
/// 2. If `args.config` is set, that file must exist and parse. Otherwise
///    `.dirlist.toml` in `base_dir` is used when present.
/// 3. File values override defaults; explicitly given arguments override both.
/// 4. Validate the result.
///
/// ## Errors
///
/// Returns an error if an explicit config file is missing, a config file
/// cannot be parsed (including unknown keys), or validation fails.
pub fn load_and_merge_config_in(args: &SrvArgs, base_dir: &Path) -> Result<ServerConfig> {
    let mut config = ServerConfig::default();

    // An explicit path must exist; the implicit one is optional.
    let file_config = match &args.config {
        Some(path) => Some(read_config_file(&base_dir.join(path))?),
        None => {
            let candidate = base_dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                Some(read_config_file(&candidate)?)
            } else {
                debug!("No config file found at {}", candidate.display());
                None
            }
        }
    };

    if let Some(file_config) = file_config {
        config.apply_file(file_config);
    }
    config.apply_args(args);
    config.validate()?;

    Ok(config)
}

/// # Read Configuration File (`read_config_file`)
///
/// ## Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for
/// `FileConfig` (wrong types, unknown keys).
fn read_config_file(path: &Path) -> Result<FileConfig> {
    info!("Loading configuration from {}", path.display());

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let file_config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(file_config)
}

// --- Unit Tests ---
