// src/resolve/mod.rs

//! Entrypoint resolution.
//!
//! Turns an operator-supplied locator (`unit:attribute`) into something that
//! can be invoked, and finds the directory a unit's sources live in. The rest
//! of the crate only sees [`resolve`] and [`resolve_directory`]; how units are
//! found is hidden behind [`UnitLoader`].

pub mod locator;
pub mod registry;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::errors::{RelaunchError, Result};

pub use locator::Locator;
pub use registry::{Attribute, Invocable, LoadError, Registry, Unit, UnitHandle, UnitLoader};

/// Resolve `locator` to a zero-argument invocable.
///
/// Each step fails with its own error kind, all carrying the locator:
/// format, unit load, attribute lookup, invocability.
pub fn resolve(loader: &dyn UnitLoader, locator: &str) -> Result<Invocable> {
    let locator = Locator::parse(locator)?;
    let unit = load_unit(loader, &locator)?;

    match unit.get(locator.attribute()) {
        Some(Attribute::Callable(f)) => {
            debug!(locator = %locator, "resolved entrypoint");
            Ok(Arc::clone(f))
        }
        Some(Attribute::Value(_)) => Err(RelaunchError::NotInvocable {
            unit: locator.unit().to_string(),
            attribute: locator.attribute().to_string(),
            locator: locator.to_string(),
        }),
        None => Err(RelaunchError::AttributeNotFound {
            unit: locator.unit().to_string(),
            attribute: locator.attribute().to_string(),
            locator: locator.to_string(),
        }),
    }
}

/// Directory containing the source file of the unit named by `locator`.
///
/// Units without a recorded source file, or whose source directory is not on
/// disk, fail with [`RelaunchError::UnitNotFound`].
pub fn resolve_directory(loader: &dyn UnitLoader, locator: &str) -> Result<PathBuf> {
    let locator = Locator::parse(locator)?;
    let unit = load_unit(loader, &locator)?;

    let not_found = |source: LoadError| RelaunchError::UnitNotFound {
        unit: locator.unit().to_string(),
        locator: locator.to_string(),
        source,
    };

    let file = unit.source_file().ok_or_else(|| {
        not_found(LoadError::NoSourceLocation {
            unit: unit.name().to_string(),
        })
    })?;

    let dir = file
        .parent()
        .map(PathBuf::from)
        .filter(|d| d.is_dir())
        .ok_or_else(|| {
            not_found(LoadError::SourceMissing {
                unit: unit.name().to_string(),
                dir: file.parent().unwrap_or(file).to_path_buf(),
            })
        })?;

    debug!(locator = %locator, dir = ?dir, "resolved unit directory");
    Ok(dir)
}

fn load_unit(loader: &dyn UnitLoader, locator: &Locator) -> Result<Arc<UnitHandle>> {
    loader
        .load(locator.unit())
        .map_err(|source| RelaunchError::UnitNotFound {
            unit: locator.unit().to_string(),
            locator: locator.to_string(),
            source,
        })
}
