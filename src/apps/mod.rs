// src/apps/mod.rs

//! Units compiled into the `relaunch` binary.
//!
//! `app` is the default entrypoint (`app:run`) and a convenient target for
//! trying out reloading; `builtin` holds units with no source location.

mod demo;

use crate::resolve::{Registry, Unit};

/// Name of the demo unit, as used in locators.
pub const DEMO_UNIT: &str = "app";

/// Registry with every unit that ships with the binary.
pub fn builtin_registry() -> Registry {
    Registry::new()
        .with(
            Unit::new(DEMO_UNIT)
                .source_file(crate::unit_source!())
                .on_load(demo::on_load)
                .callable("run", demo::run)
                .callable("fail", demo::fail)
                .callable("exit", demo::exit)
                .value("name", env!("CARGO_PKG_NAME")),
        )
        .with(Unit::new("builtin").callable("noop", || Ok(())))
}
