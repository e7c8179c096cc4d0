// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for launching runner children with
//! `tokio::process::Command`, stopping them, and listening for the OS
//! signals that ask the supervisor itself to stop.
//!
//! - [`command`] describes the child command line and spawns it.
//! - [`child`] implements the graceful-then-forced stop sequence and maps
//!   exit statuses to exit codes.
//! - [`signals`] turns SIGINT / SIGTERM / SIGQUIT (Ctrl-C on Windows) into a
//!   future.

pub mod child;
pub mod command;
pub mod signals;

pub use child::{StopOutcome, exit_code, stop_child};
pub use command::ChildCommand;
pub use signals::{run_until_shutdown, shutdown_signal};
