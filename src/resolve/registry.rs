// src/resolve/registry.rs

//! Registered-factory implementation of [`UnitLoader`].
//!
//! Units are registered up front with their attributes. "Loading" a unit
//! looks it up by name and runs its one-time initialisation hook, if it has
//! one, the first time it is loaded.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use thiserror::Error;
use tracing::debug;

/// A zero-argument entrypoint.
pub type Invocable = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

type InitHook = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// Absolute path of the source file this macro is expanded in.
///
/// Used when registering a unit so the supervisor can find the directory to
/// watch.
#[macro_export]
macro_rules! unit_source {
    () => {
        ::std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(file!())
    };
}

/// Why a unit could not be loaded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("no unit named '{unit}' is registered (known units: {})", known.join(", "))]
    NotRegistered { unit: String, known: Vec<String> },

    #[error("unit '{unit}' has no source file location")]
    NoSourceLocation { unit: String },

    #[error("source directory {dir:?} of unit '{unit}' does not exist")]
    SourceMissing { unit: String, dir: PathBuf },

    #[error("initialisation of unit '{unit}' failed: {message}")]
    InitFailed { unit: String, message: String },
}

/// One attribute of a unit.
#[derive(Clone)]
pub enum Attribute {
    Callable(Invocable),
    /// Plain data; looking it up succeeds but it cannot be invoked.
    Value(String),
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Callable(_) => f.write_str("Callable(..)"),
            Attribute::Value(v) => f.debug_tuple("Value").field(v).finish(),
        }
    }
}

/// A loaded unit.
#[derive(Debug)]
pub struct UnitHandle {
    name: String,
    source_file: Option<PathBuf>,
    attributes: BTreeMap<String, Attribute>,
}

impl UnitHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }

    pub fn get(&self, attribute: &str) -> Option<&Attribute> {
        self.attributes.get(attribute)
    }
}

/// Something that can produce a [`UnitHandle`] by name.
pub trait UnitLoader: Send + Sync {
    fn load(&self, unit: &str) -> Result<Arc<UnitHandle>, LoadError>;
}

/// Builder for a registrable unit.
pub struct Unit {
    handle: UnitHandle,
    init: Option<InitHook>,
}

impl Unit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            handle: UnitHandle {
                name: name.into(),
                source_file: None,
                attributes: BTreeMap::new(),
            },
            init: None,
        }
    }

    /// Source file the unit lives in; its directory becomes the watch root.
    pub fn source_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.handle.source_file = Some(path.into());
        self
    }

    pub fn callable<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.handle
            .attributes
            .insert(name.to_string(), Attribute::Callable(Arc::new(f)));
        self
    }

    pub fn value(mut self, name: &str, value: impl Into<String>) -> Self {
        self.handle
            .attributes
            .insert(name.to_string(), Attribute::Value(value.into()));
        self
    }

    /// Hook run once, the first time the unit is loaded.
    pub fn on_load<F>(mut self, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(f));
        self
    }
}

struct Registered {
    handle: Arc<UnitHandle>,
    init: Option<InitHook>,
    init_result: OnceLock<Result<(), String>>,
}

/// Name → unit map.
#[derive(Default)]
pub struct Registry {
    units: BTreeMap<String, Registered>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("units", &self.units.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit, replacing any previous unit of the same name.
    pub fn register(&mut self, unit: Unit) -> &mut Self {
        let name = unit.handle.name.clone();
        self.units.insert(
            name,
            Registered {
                handle: Arc::new(unit.handle),
                init: unit.init,
                init_result: OnceLock::new(),
            },
        );
        self
    }

    pub fn with(mut self, unit: Unit) -> Self {
        self.register(unit);
        self
    }

    pub fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }
}

impl UnitLoader for Registry {
    fn load(&self, unit: &str) -> Result<Arc<UnitHandle>, LoadError> {
        let entry = self.units.get(unit).ok_or_else(|| LoadError::NotRegistered {
            unit: unit.to_string(),
            known: self.unit_names().map(str::to_string).collect(),
        })?;

        if let Some(init) = &entry.init {
            let outcome = entry.init_result.get_or_init(|| {
                debug!(unit, "running unit initialisation");
                init().map_err(|e| format!("{e:#}"))
            });
            if let Err(message) = outcome {
                return Err(LoadError::InitFailed {
                    unit: unit.to_string(),
                    message: message.clone(),
                });
            }
        }

        Ok(Arc::clone(&entry.handle))
    }
}
