// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Resolution failures carry the full locator string so the operator can see
//! exactly which `--app` value was rejected and at which step.

use std::time::Duration;

use thiserror::Error;

use crate::resolve::LoadError;

/// The pattern every locator has to follow, shown in format errors.
pub const LOCATOR_PATTERN: &str = "unit:attribute";

#[derive(Error, Debug)]
pub enum RelaunchError {
    #[error("invalid locator '{locator}': expected format '{expected}', e.g. 'app:run'")]
    InvalidLocatorFormat {
        locator: String,
        expected: &'static str,
    },

    #[error("could not load unit '{unit}' (from locator '{locator}'): {source}")]
    UnitNotFound {
        unit: String,
        locator: String,
        #[source]
        source: LoadError,
    },

    #[error("unit '{unit}' has no attribute '{attribute}' (from locator '{locator}')")]
    AttributeNotFound {
        unit: String,
        attribute: String,
        locator: String,
    },

    #[error("attribute '{attribute}' in unit '{unit}' is not invocable (from locator '{locator}')")]
    NotInvocable {
        unit: String,
        attribute: String,
        locator: String,
    },

    #[error("failed to spawn child process `{command}`: {source}")]
    ChildSpawnFailure {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("child process {pid} did not exit within {grace:?}")]
    ChildTerminationTimeout { pid: u32, grace: Duration },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RelaunchError {
    /// True for the four entrypoint-resolution failures.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            RelaunchError::InvalidLocatorFormat { .. }
                | RelaunchError::UnitNotFound { .. }
                | RelaunchError::AttributeNotFound { .. }
                | RelaunchError::NotInvocable { .. }
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RelaunchError>;
