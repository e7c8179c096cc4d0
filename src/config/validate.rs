use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{RelaunchError, Result};
use crate::resolve::Locator;
use crate::watch::WatchFilter;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::RelaunchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.reload, raw.app))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_timing(cfg.reload.interval_ms, cfg.reload.grace_period_ms)?;
    validate_watch_filter(&cfg.reload.extensions, &cfg.reload.exclude)?;
    if let Some(locator) = &cfg.app.locator {
        Locator::parse(locator)?;
    }
    Ok(())
}

/// Shared with the CLI merge in `settings.rs`.
pub(crate) fn validate_timing(interval_ms: u64, grace_period_ms: u64) -> Result<()> {
    if interval_ms == 0 {
        return Err(RelaunchError::ConfigError(
            "interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    if grace_period_ms == 0 {
        return Err(RelaunchError::ConfigError(
            "grace_period_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

/// Compile the watch filter, rejecting an empty extension set.
pub(crate) fn validate_watch_filter(extensions: &[String], exclude: &[String]) -> Result<WatchFilter> {
    let filter = WatchFilter::new(extensions, exclude)
        .map_err(|e| RelaunchError::ConfigError(format!("{e:#}")))?;
    if filter.extensions().is_empty() {
        return Err(RelaunchError::ConfigError(
            "at least one watched extension is required".to_string(),
        ));
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ConfigFile::try_from(RawConfigFile::default()).is_ok());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.reload.interval_ms = 0;
        match ConfigFile::try_from(raw) {
            Err(RelaunchError::ConfigError(msg)) => assert!(msg.contains("interval_ms")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn blank_extensions_are_rejected() {
        let mut raw = RawConfigFile::default();
        raw.reload.extensions = vec![" ".to_string(), ".".to_string()];
        assert!(matches!(
            ConfigFile::try_from(raw),
            Err(RelaunchError::ConfigError(_))
        ));
    }

    #[test]
    fn bad_locator_is_a_format_error() {
        let mut raw = RawConfigFile::default();
        raw.app.locator = Some("app".to_string());
        assert!(matches!(
            ConfigFile::try_from(raw),
            Err(RelaunchError::InvalidLocatorFormat { .. })
        ));
    }
}
