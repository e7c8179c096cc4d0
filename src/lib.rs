// src/lib.rs

pub mod apps;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod resolve;
pub mod runner;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, Settings, load_optional};
use crate::engine::{Supervisor, SupervisorExit};
use crate::errors::{RelaunchError, Result};
use crate::exec::{ChildCommand, shutdown_signal};
use crate::fs::{FileSystem, RealFileSystem};
use crate::resolve::{UnitLoader, resolve, resolve_directory};
use crate::types::{Role, RunMode};
use crate::watch::Snapshotter;

/// High-level entry point used by `main.rs`, with the units built into the
/// binary.
///
/// Returns the process exit code.
pub fn run(args: CliArgs) -> Result<i32> {
    run_with(args, Arc::new(apps::builtin_registry()))
}

/// Same as [`run`] with a caller-supplied loader.
///
/// This wires together:
/// - role detection (top-level vs. supervised child)
/// - config loading and CLI merge (top-level only)
/// - either a single in-process run, or the supervisor loop
pub fn run_with(args: CliArgs, loader: Arc<dyn UnitLoader>) -> Result<i32> {
    let role = Role::from_env();

    // A child is fully described by its command line.
    let cfg = match role {
        Role::SupervisedChild => ConfigFile::default(),
        Role::TopLevel => load_optional(&RealFileSystem, args.config.as_deref())?,
    };
    let settings = Settings::from_sources(&args, &cfg)?;
    let mode = RunMode::decide(role, settings.reload, settings.no_reload);
    debug!(?role, ?mode, locator = %settings.locator, "starting");

    match mode {
        RunMode::Direct => {
            runner::run_once(loader.as_ref(), settings.locator.as_str())?;
            Ok(0)
        }
        RunMode::Supervise => {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let exit = rt.block_on(supervise(&settings, loader.as_ref()))?;
            Ok(exit.code)
        }
    }
}

/// Run the supervisor loop until the child exits or a shutdown signal
/// arrives.
///
/// The entrypoint is resolved up front so a bad locator fails here, before
/// any child is started. Must be called inside a tokio runtime.
pub async fn supervise(settings: &Settings, loader: &dyn UnitLoader) -> Result<SupervisorExit> {
    let locator = settings.locator.as_str();
    resolve(loader, locator)?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let root = watch_root(fs.as_ref(), settings, loader)?;
    info!(locator, root = ?root, "reload enabled");

    let snapshotter = Snapshotter::new(fs, root, settings.filter.clone(), settings.detection);
    let command = ChildCommand::reexec(&settings.locator, settings.log_level)?;
    let shutdown = shutdown_signal()?;

    Supervisor::new(command, snapshotter, settings.supervisor_options())
        .run(shutdown)
        .await
}

/// `--watch` / `[reload].watch` if set, else the entrypoint unit's directory.
fn watch_root(fs: &dyn FileSystem, settings: &Settings, loader: &dyn UnitLoader) -> Result<PathBuf> {
    match &settings.watch {
        Some(dir) => fs
            .canonicalize(dir)
            .ok()
            .filter(|p| fs.is_dir(p))
            .ok_or_else(|| {
                RelaunchError::ConfigError(format!("watch directory {dir:?} is not a directory"))
            }),
        None => {
            let dir = resolve_directory(loader, settings.locator.as_str())?;
            Ok(fs.canonicalize(&dir)?)
        }
    }
}
