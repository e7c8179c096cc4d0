// src/config/settings.rs

//! Effective settings: CLI flags layered over the config file.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::{CliArgs, DEFAULT_APP, LogLevel};
use crate::config::model::ConfigFile;
use crate::config::validate::{validate_timing, validate_watch_filter};
use crate::engine::SupervisorOptions;
use crate::errors::Result;
use crate::resolve::Locator;
use crate::types::ChangeDetection;
use crate::watch::WatchFilter;

#[derive(Debug, Clone)]
pub struct Settings {
    pub locator: Locator,
    pub reload: bool,
    pub no_reload: bool,
    /// Watch root override; `None` means "the entrypoint unit's directory".
    pub watch: Option<PathBuf>,
    pub filter: WatchFilter,
    pub detection: ChangeDetection,
    pub interval: Duration,
    pub grace_period: Duration,
    pub log_level: Option<LogLevel>,
}

impl Settings {
    /// Merge `args` over `cfg`. CLI values win; an empty `--ext` list keeps
    /// the file's extensions.
    pub fn from_sources(args: &CliArgs, cfg: &ConfigFile) -> Result<Self> {
        let reload_cfg = cfg.reload();

        let locator = args
            .app
            .as_deref()
            .or(cfg.app().locator.as_deref())
            .unwrap_or(DEFAULT_APP);
        let locator = Locator::parse(locator)?;

        let interval_ms = args.interval_ms.unwrap_or(reload_cfg.interval_ms);
        let grace_period_ms = args.grace_period_ms.unwrap_or(reload_cfg.grace_period_ms);
        validate_timing(interval_ms, grace_period_ms)?;

        let extensions = if args.extensions.is_empty() {
            &reload_cfg.extensions
        } else {
            &args.extensions
        };
        let filter = validate_watch_filter(extensions, &reload_cfg.exclude)?;

        let detection = if args.use_hash {
            ChangeDetection::Hash
        } else {
            reload_cfg.detection
        };

        Ok(Self {
            locator,
            reload: args.reload || reload_cfg.enabled,
            no_reload: args.no_reload,
            watch: args.watch.clone().or_else(|| reload_cfg.watch.clone()),
            filter,
            detection,
            interval: Duration::from_millis(interval_ms),
            grace_period: Duration::from_millis(grace_period_ms),
            log_level: args.log_level,
        })
    }

    pub fn supervisor_options(&self) -> SupervisorOptions {
        SupervisorOptions {
            interval: self.interval,
            grace_period: self.grace_period,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::RawConfigFile;
    use crate::errors::RelaunchError;
    use clap::Parser;

    fn args(extra: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("relaunch").chain(extra.iter().copied()))
    }

    fn config(f: impl FnOnce(&mut RawConfigFile)) -> ConfigFile {
        let mut raw = RawConfigFile::default();
        f(&mut raw);
        ConfigFile::try_from(raw).unwrap()
    }

    #[test]
    fn defaults_without_flags_or_file() {
        let s = Settings::from_sources(&args(&[]), &ConfigFile::default()).unwrap();
        assert_eq!(s.locator.as_str(), "app:run");
        assert!(!s.reload);
        assert_eq!(s.interval, Duration::from_secs(1));
        assert_eq!(s.grace_period, Duration::from_secs(5));
        assert_eq!(s.detection, ChangeDetection::Mtime);
        assert_eq!(s.filter.extensions(), &["rs".to_string()]);
    }

    #[test]
    fn cli_overrides_file() {
        let cfg = config(|raw| {
            raw.reload.interval_ms = 300;
            raw.reload.extensions = vec!["py".to_string()];
            raw.app.locator = Some("file:main".to_string());
        });
        let s = Settings::from_sources(
            &args(&["--app", "cli:main", "--interval-ms", "50", "--ext", "rs", "--use-hash"]),
            &cfg,
        )
        .unwrap();

        assert_eq!(s.locator.as_str(), "cli:main");
        assert_eq!(s.interval, Duration::from_millis(50));
        assert_eq!(s.filter.extensions(), &["rs".to_string()]);
        assert_eq!(s.detection, ChangeDetection::Hash);
    }

    #[test]
    fn file_values_fill_gaps() {
        let cfg = config(|raw| {
            raw.reload.enabled = true;
            raw.app.locator = Some("file:main".to_string());
        });
        let s = Settings::from_sources(&args(&[]), &cfg).unwrap();
        assert!(s.reload);
        assert_eq!(s.locator.as_str(), "file:main");
    }

    #[test]
    fn cli_values_are_validated_too() {
        let err = Settings::from_sources(&args(&["--grace-period-ms", "0"]), &ConfigFile::default())
            .unwrap_err();
        assert!(matches!(err, RelaunchError::ConfigError(_)));

        let err = Settings::from_sources(&args(&["--app", "no-separator"]), &ConfigFile::default())
            .unwrap_err();
        assert!(matches!(err, RelaunchError::InvalidLocatorFormat { .. }));
    }
}
