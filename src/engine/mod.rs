// src/engine/mod.rs

//! Supervisor engine.
//!
//! The supervisor spawns one runner child at a time, polls the watched tree,
//! and restarts or stops the child:
//!
//! ```text
//! Idle -> Spawning -> Running -> { Restarting, Stopping, Exited }
//!                       ^             |
//!                       +-- Spawning -+
//! ```
//!
//! The pure state machine lives in [`core`]; the async/IO shell that owns
//! the child handle, the timer and the snapshots is implemented in
//! [`runtime`].

use std::time::Duration;

use crate::watch::SnapshotDiff;

pub mod core;
pub mod runtime;

pub use core::SupervisorCore;
pub use runtime::Supervisor;

/// Reference polling interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Reference grace period between stop request and kill.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(5000);

/// Timing knobs for the supervisor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorOptions {
    pub interval: Duration,
    pub grace_period: Duration,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Spawning,
    Running,
    Restarting,
    Stopping,
    Exited,
}

/// What the IO shell observed; fed into [`SupervisorCore::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// The loop is starting.
    Started,
    /// A child was launched.
    Spawned { pid: u32 },
    /// The running child exited on its own.
    ChildExited { code: i32 },
    /// One polling interval elapsed; `changed` if the snapshot differs.
    Tick { changed: bool },
    /// The operator asked the supervisor to stop.
    ShutdownRequested,
    /// The child the core asked to stop has been reaped.
    ChildStopped,
}

/// What the core wants the IO shell to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SpawnChild,
    StopChild,
    Finish(SupervisorExit),
}

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The child exited by itself; its code is propagated.
    ChildExited,
    /// A shutdown signal stopped the supervisor.
    Interrupted,
}

/// Final result of a supervisor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorExit {
    /// Exit code the supervisor process should end with.
    pub code: i32,
    /// How many change-triggered restarts happened.
    pub restarts: u32,
    pub reason: ExitReason,
}

/// Notifications for observers (tests, embedding tools).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    Spawned { pid: u32, generation: u32 },
    ChangeDetected { diff: SnapshotDiff },
    ChildStopped { pid: u32, code: i32, forced: bool },
    ChildExited { pid: u32, code: i32 },
    ShutdownRequested,
}
