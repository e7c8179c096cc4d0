// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Locator used when `--app` is not given on the CLI or in the config file.
pub const DEFAULT_APP: &str = "app:run";

/// Command-line arguments for `relaunch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "relaunch",
    version,
    about = "Run an application entrypoint and restart it when its sources change.",
    long_about = None
)]
pub struct CliArgs {
    /// Watch the sources and restart the application on change.
    #[arg(long)]
    pub reload: bool,

    /// Run the application once in this process. Wins over `--reload`.
    #[arg(long)]
    pub no_reload: bool,

    /// Application entrypoint as `unit:attribute`.
    ///
    /// Default: `app:run` (or `[app].locator` from the config file).
    #[arg(long, value_name = "LOCATOR")]
    pub app: Option<String>,

    /// Directory to watch instead of the entrypoint's source directory.
    #[arg(long, value_name = "DIR")]
    pub watch: Option<PathBuf>,

    /// Watched file extension(s), e.g. `--ext rs,toml`.
    #[arg(long = "ext", value_name = "EXT", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Polling interval in milliseconds.
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// How long a child gets to exit after a stop request before it is killed.
    #[arg(long, value_name = "MS")]
    pub grace_period_ms: Option<u64>,

    /// Compare file contents (blake3) instead of modification times.
    #[arg(long)]
    pub use_hash: bool,

    /// Path to an optional config file (TOML).
    ///
    /// Default: `Relaunch.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RELAUNCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The spelling clap accepts, used when forwarding the flag to a child.
    pub fn as_arg(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reload_flags_and_locator() {
        let args = CliArgs::parse_from(["relaunch", "--reload", "--no-reload", "--app", "web:serve"]);
        assert!(args.reload);
        assert!(args.no_reload);
        assert_eq!(args.app.as_deref(), Some("web:serve"));
    }

    #[test]
    fn extensions_accept_commas_and_repeats() {
        let args = CliArgs::parse_from(["relaunch", "--ext", "rs,toml", "--ext", "sql"]);
        assert_eq!(args.extensions, vec!["rs", "toml", "sql"]);
    }

    #[test]
    fn log_level_round_trips_through_its_arg_spelling() {
        for level in [LogLevel::Error, LogLevel::Warn, LogLevel::Info, LogLevel::Debug, LogLevel::Trace] {
            let args = CliArgs::parse_from(["relaunch", "--log-level", level.as_arg()]);
            assert_eq!(args.log_level, Some(level));
        }
    }
}
