// src/runner.rs

//! Single, in-process invocation of an entrypoint.

use anyhow::Context;
use tracing::info;

use crate::errors::Result;
use crate::resolve::{UnitLoader, resolve};

/// Resolve `locator` and call it once.
///
/// Resolution errors are returned as-is; an error from the entrypoint itself
/// is wrapped with the locator it came from.
pub fn run_once(loader: &dyn UnitLoader, locator: &str) -> Result<()> {
    let entrypoint = resolve(loader, locator)?;
    info!(locator, pid = std::process::id(), "running entrypoint");
    entrypoint().with_context(|| format!("entrypoint '{locator}' failed"))?;
    Ok(())
}
