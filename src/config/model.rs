// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::ChangeDetection;
use crate::watch::{DEFAULT_EXCLUDES, DEFAULT_EXTENSIONS};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [reload]
/// enabled = true
/// interval_ms = 500
/// grace_period_ms = 3000
/// extensions = ["rs", "toml"]
/// exclude = ["target/**", "src/generated/**"]
/// watch = "crates/server/src"
/// detection = "hash"
///
/// [app]
/// locator = "app:run"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub reload: ReloadSection,

    #[serde(default)]
    pub app: AppSection,
}

/// `[reload]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReloadSection {
    /// Supervise by default, as if `--reload` were given.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,

    /// Watched file extensions, with or without the leading dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Globs, relative to the watch root, that are never watched.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Watch root override. Relative paths are taken from the config file's
    /// directory.
    #[serde(default)]
    pub watch: Option<PathBuf>,

    #[serde(default)]
    pub detection: ChangeDetection,
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_grace_period_ms() -> u64 {
    5000
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_exclude() -> Vec<String> {
    DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()
}

impl Default for ReloadSection {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: default_interval_ms(),
            grace_period_ms: default_grace_period_ms(),
            extensions: default_extensions(),
            exclude: default_exclude(),
            watch: None,
            detection: ChangeDetection::default(),
        }
    }
}

/// `[app]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    /// Default entrypoint locator when `--app` is not given.
    #[serde(default)]
    pub locator: Option<String>,
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    reload: ReloadSection,
    app: AppSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(reload: ReloadSection, app: AppSection) -> Self {
        Self { reload, app }
    }

    pub fn reload(&self) -> &ReloadSection {
        &self.reload
    }

    pub fn app(&self) -> &AppSection {
        &self.app
    }

    /// Make a relative `watch` override relative to `base` instead of the CWD.
    pub(crate) fn anchor_watch_dir(&mut self, base: &Path) {
        if let Some(watch) = &self.reload.watch {
            if watch.is_relative() {
                self.reload.watch = Some(base.join(watch));
            }
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(ReloadSection::default(), AppSection::default())
    }
}
