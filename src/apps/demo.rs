// src/apps/demo.rs

use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::exec::run_until_shutdown;

/// Exit code used by `app:exit`.
pub const EXIT_CODE_ENV_VAR: &str = "RELAUNCH_APP_EXIT_CODE";

const HEARTBEAT: Duration = Duration::from_secs(2);

pub(super) fn on_load() -> Result<()> {
    debug!(pid = std::process::id(), "demo unit loaded");
    Ok(())
}

/// Log a heartbeat until asked to stop, then return cleanly.
pub(super) fn run() -> Result<()> {
    info!(pid = std::process::id(), "demo app started");
    match run_until_shutdown(heartbeat()).context("installing signal handlers")? {
        Some(()) => info!("demo app finished"),
        None => info!("demo app stopping on signal"),
    }
    Ok(())
}

async fn heartbeat() {
    let mut ticks = tokio::time::interval(HEARTBEAT);
    let mut beat: u64 = 0;
    loop {
        ticks.tick().await;
        beat += 1;
        info!(beat, "heartbeat");
    }
}

pub(super) fn fail() -> Result<()> {
    bail!("requested failure")
}

/// Terminate the process with the code in `RELAUNCH_APP_EXIT_CODE` (default 0).
pub(super) fn exit() -> Result<()> {
    let code = match std::env::var(EXIT_CODE_ENV_VAR) {
        Ok(raw) => raw
            .trim()
            .parse::<i32>()
            .with_context(|| format!("{EXIT_CODE_ENV_VAR}={raw:?} is not an exit code"))?,
        Err(_) => 0,
    };
    info!(code, "demo app exiting");
    std::process::exit(code)
}
