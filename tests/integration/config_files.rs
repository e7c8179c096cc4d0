use std::path::Path;
use std::time::Duration;

use clap::Parser;

use relaunch::cli::CliArgs;
use relaunch::config::{Settings, load_optional};
use relaunch::errors::RelaunchError;
use relaunch::fs::RealFileSystem;
use relaunch::types::{ChangeDetection, Role, RunMode};

use relaunch_test_utils::{FixtureTree, init_tracing};

fn args(extra: &[&str]) -> CliArgs {
    CliArgs::parse_from(std::iter::once("relaunch").chain(extra.iter().copied()))
}

#[test]
fn file_on_disk_feeds_settings() {
    init_tracing();
    let tree = FixtureTree::new();
    let path = tree.write(
        "Relaunch.toml",
        r#"
[reload]
enabled = true
interval_ms = 200
extensions = ["rs", "toml"]
watch = "crates/server"

[app]
locator = "server:main"
"#,
    );

    let cfg = load_optional(&RealFileSystem, Some(path.as_path())).unwrap();
    let settings = Settings::from_sources(&args(&["--grace-period-ms", "750"]), &cfg).unwrap();

    assert!(settings.reload);
    assert_eq!(settings.locator.as_str(), "server:main");
    assert_eq!(settings.interval, Duration::from_millis(200));
    assert_eq!(settings.grace_period, Duration::from_millis(750));
    assert_eq!(settings.detection, ChangeDetection::Mtime);
    assert_eq!(settings.watch.as_deref(), Some(tree.path("crates/server").as_path()));
    assert_eq!(
        RunMode::decide(Role::TopLevel, settings.reload, settings.no_reload),
        RunMode::Supervise
    );
}

#[test]
fn no_reload_flag_beats_enabled_reload_in_file() {
    init_tracing();
    let tree = FixtureTree::new();
    let path = tree.write("Relaunch.toml", "[reload]\nenabled = true\n");

    let cfg = load_optional(&RealFileSystem, Some(path.as_path())).unwrap();
    let settings = Settings::from_sources(&args(&["--no-reload"]), &cfg).unwrap();
    assert_eq!(
        RunMode::decide(Role::TopLevel, settings.reload, settings.no_reload),
        RunMode::Direct
    );
}

#[test]
fn invalid_file_is_rejected() {
    init_tracing();
    let tree = FixtureTree::new();
    let bad_glob = tree.write("glob.toml", "[reload]\nexclude = [\"a/[\"]\n");
    let bad_toml = tree.write("syntax.toml", "[reload\n");

    assert!(matches!(
        load_optional(&RealFileSystem, Some(bad_glob.as_path())),
        Err(RelaunchError::ConfigError(_))
    ));
    assert!(matches!(
        load_optional(&RealFileSystem, Some(bad_toml.as_path())),
        Err(RelaunchError::TomlError(_))
    ));
    assert!(load_optional(&RealFileSystem, Some(Path::new("/nonexistent/Relaunch.toml"))).is_err());
}
