use std::fs;

use relaunch::apps::builtin_registry;
use relaunch::errors::RelaunchError;
use relaunch::resolve::{LoadError, Registry, Unit, resolve, resolve_directory};
use relaunch::runner::run_once;

use relaunch_test_utils::{FixtureTree, init_tracing};

#[test]
fn unit_directory_is_the_parent_of_its_source_file() {
    init_tracing();
    let tree = FixtureTree::new();
    let source = tree.write("service/handlers.rs", "");
    let reg = Registry::new().with(Unit::new("handlers").source_file(&source).callable("serve", || Ok(())));

    let dir = resolve_directory(&reg, "handlers:serve").unwrap();
    assert_eq!(dir, tree.path("service"));
}

#[test]
fn removed_source_directory_is_reported() {
    init_tracing();
    let tree = FixtureTree::new();
    let source = tree.write("service/handlers.rs", "");
    let reg = Registry::new().with(Unit::new("handlers").source_file(&source).callable("serve", || Ok(())));

    fs::remove_dir_all(tree.path("service")).unwrap();

    let err = resolve_directory(&reg, "handlers:serve").unwrap_err();
    assert!(matches!(
        err,
        RelaunchError::UnitNotFound {
            source: LoadError::SourceMissing { .. },
            ..
        }
    ));
    assert!(err.to_string().contains("handlers:serve"));
}

#[test]
fn builtin_units_resolve() {
    init_tracing();
    let reg = builtin_registry();
    assert!(resolve(&reg, "app:run").is_ok());
    assert!(resolve(&reg, "app:exit").is_ok());
    assert!(run_once(&reg, "builtin:noop").is_ok());
}

#[test]
fn resolution_failures_through_the_runner() {
    init_tracing();
    let reg = builtin_registry();
    for locator in ["app", ":run", "app:", "app:run:extra", "missing:run", "app:missing", "app:name"] {
        let err = run_once(&reg, locator).unwrap_err();
        assert!(err.is_resolution_error(), "{locator}: {err}");
        assert!(err.to_string().contains(locator), "{locator}: {err}");
    }
}

#[test]
fn entrypoint_error_is_surfaced() {
    init_tracing();
    let err = run_once(&builtin_registry(), "app:fail").unwrap_err();
    assert!(!err.is_resolution_error());
    assert!(format!("{:#}", anyhow::Error::from(err)).contains("requested failure"));
}
