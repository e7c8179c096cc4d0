// src/exec/command.rs

//! How the supervisor launches a runner child.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::debug;

use crate::cli::LogLevel;
use crate::errors::{RelaunchError, Result};
use crate::resolve::Locator;
use crate::types::{ROLE_ENV_VALUE, ROLE_ENV_VAR};

/// Program, arguments and extra environment for a child process.
///
/// The child inherits the supervisor's environment and stdio; `env` is layered
/// on top.
#[derive(Debug, Clone)]
pub struct ChildCommand {
    program: PathBuf,
    args: Vec<OsString>,
    env: Vec<(OsString, OsString)>,
}

impl ChildCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.env
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    /// Re-invoke the current executable as a runner for `locator`.
    ///
    /// The role marker is injected into the child's environment only. A log
    /// level given on the command line is forwarded so both processes log
    /// alike.
    pub fn reexec(locator: &Locator, log_level: Option<LogLevel>) -> Result<Self> {
        let exe = std::env::current_exe()?;
        let mut cmd = Self::new(exe)
            .arg("--app")
            .arg(locator.as_str())
            .env(ROLE_ENV_VAR, ROLE_ENV_VALUE);
        if let Some(level) = log_level {
            cmd = cmd.arg("--log-level").arg(level.as_arg());
        }
        Ok(cmd)
    }

    /// Human-readable command line, for logs and errors.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Spawn the child. It is killed if the returned handle is dropped.
    pub fn spawn(&self) -> Result<Child> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        debug!(command = %self.display(), "spawning child process");

        cmd.spawn().map_err(|source| RelaunchError::ChildSpawnFailure {
            command: self.display(),
            source,
        })
    }
}
