// src/engine/runtime.rs

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::process::ExitStatus;

use tokio::process::Child;
use tokio::sync::mpsc;
use tracing::info;

use crate::errors::{RelaunchError, Result};
use crate::exec::{ChildCommand, exit_code, stop_child};
use crate::watch::{Snapshot, Snapshotter};

use super::core::SupervisorCore;
use super::{Action, Input, SupervisorEvent, SupervisorExit, SupervisorOptions, SupervisorState};

/// Drives [`SupervisorCore`] with real processes, a timer and snapshots.
///
/// Single-threaded and cooperative: the only suspension points are the
/// polling sleep (which also wakes on child exit and on shutdown) and the
/// bounded wait while a child is being stopped.
pub struct Supervisor {
    core: SupervisorCore,
    command: ChildCommand,
    snapshotter: Snapshotter,
    options: SupervisorOptions,
    events: Option<mpsc::UnboundedSender<SupervisorEvent>>,
}

impl fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("core", &self.core)
            .field("command", &self.command.display())
            .field("root", &self.snapshotter.root())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Supervisor {
    pub fn new(command: ChildCommand, snapshotter: Snapshotter, options: SupervisorOptions) -> Self {
        Self {
            core: SupervisorCore::new(),
            command,
            snapshotter,
            options,
            events: None,
        }
    }

    /// Report [`SupervisorEvent`]s on `tx` while running.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<SupervisorEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Run until the child exits on its own or `shutdown` completes.
    pub async fn run<S>(mut self, shutdown: S) -> Result<SupervisorExit>
    where
        S: Future<Output = ()>,
    {
        let mut shutdown = std::pin::pin!(shutdown);

        let mut baseline = self.snapshotter.take();
        info!(
            root = ?self.snapshotter.root(),
            files = baseline.len(),
            "watching for changes"
        );

        let mut child: Option<Child> = None;
        let mut pid = 0u32;
        let mut generation = 0u32;
        // The shutdown future must not be polled again once it has completed.
        let mut shutdown_seen = false;
        let mut pending: VecDeque<Action> = self.core.step(Input::Started).into();

        loop {
            while let Some(action) = pending.pop_front() {
                let next = match action {
                    Action::SpawnChild => {
                        let spawned = self.command.spawn()?;
                        pid = spawned.id().unwrap_or_default();
                        generation += 1;
                        info!(pid, generation, command = %self.command.display(), "started child process");
                        self.emit(SupervisorEvent::Spawned { pid, generation });
                        child = Some(spawned);
                        self.core.step(Input::Spawned { pid })
                    }
                    Action::StopChild => {
                        if let Some(mut running) = child.take() {
                            let stop = stop_child(&mut running, self.options.grace_period);
                            tokio::pin!(stop);
                            // A restart stop can be overtaken by shutdown; the
                            // stop sequence still runs to completion.
                            let outcome = tokio::select! {
                                biased;

                                _ = shutdown.as_mut(), if !shutdown_seen => {
                                    shutdown_seen = true;
                                    info!(pid, "shutdown requested during restart; not respawning");
                                    self.emit(SupervisorEvent::ShutdownRequested);
                                    pending.extend(self.core.step(Input::ShutdownRequested));
                                    stop.await?
                                }

                                outcome = &mut stop => outcome?,
                            };
                            self.emit(SupervisorEvent::ChildStopped {
                                pid,
                                code: exit_code(&outcome.status()),
                                forced: outcome.was_forced(),
                            });
                        }
                        self.core.step(Input::ChildStopped)
                    }
                    Action::Finish(exit) => {
                        info!(code = exit.code, restarts = exit.restarts, reason = ?exit.reason, "supervisor finished");
                        return Ok(exit);
                    }
                };
                pending.extend(next);
            }

            if self.core.state() != SupervisorState::Running {
                return Err(RelaunchError::Other(anyhow::anyhow!(
                    "supervisor stalled in state {:?}",
                    self.core.state()
                )));
            }
            let Some(running) = child.as_mut() else {
                return Err(RelaunchError::Other(anyhow::anyhow!(
                    "supervisor is running without a child"
                )));
            };

            let input = self
                .poll_once(running, pid, &mut baseline, shutdown.as_mut())
                .await?;
            match input {
                Input::ChildExited { .. } => child = None,
                Input::ShutdownRequested => shutdown_seen = true,
                _ => {}
            }
            pending.extend(self.core.step(input));
        }
    }

    /// Wait one polling interval and report what happened.
    ///
    /// Child exit and shutdown are observed as soon as they happen, not only
    /// at the end of the interval. Shutdown is checked first: an interrupt
    /// from the terminal reaches the child too, and its exit then must not
    /// decide the exit code.
    async fn poll_once<S>(
        &self,
        child: &mut Child,
        pid: u32,
        baseline: &mut Snapshot,
        shutdown: Pin<&mut S>,
    ) -> Result<Input>
    where
        S: Future<Output = ()>,
    {
        tokio::select! {
            biased;

            _ = shutdown => {
                info!(pid, "shutdown requested; stopping child");
                self.emit(SupervisorEvent::ShutdownRequested);
                Ok(Input::ShutdownRequested)
            }

            status = child.wait() => {
                Ok(self.child_exited(pid, &status?))
            }

            _ = tokio::time::sleep(self.options.interval) => {
                if let Some(status) = child.try_wait()? {
                    return Ok(self.child_exited(pid, &status));
                }

                let fresh = self.snapshotter.take();
                if fresh == *baseline {
                    return Ok(Input::Tick { changed: false });
                }

                let diff = baseline.diff(&fresh);
                info!(
                    added = diff.added.len(),
                    removed = diff.removed.len(),
                    modified = diff.modified.len(),
                    sample = ?diff.sample(3),
                    "detected file change; reloading"
                );
                *baseline = fresh;
                self.emit(SupervisorEvent::ChangeDetected { diff });
                Ok(Input::Tick { changed: true })
            }
        }
    }

    fn child_exited(&self, pid: u32, status: &ExitStatus) -> Input {
        let code = exit_code(status);
        info!(pid, code, ?status, "child exited on its own");
        self.emit(SupervisorEvent::ChildExited { pid, code });
        Input::ChildExited { code }
    }

    fn emit(&self, event: SupervisorEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}
