// src/engine/core.rs

//! Pure supervisor state machine.
//!
//! [`SupervisorCore`] consumes [`Input`]s and returns the [`Action`]s the IO
//! shell should perform. It owns no processes, timers or channels, so every
//! transition can be unit tested directly.

use tracing::debug;

use crate::engine::{Action, ExitReason, Input, SupervisorExit, SupervisorState};

#[derive(Debug)]
pub struct SupervisorCore {
    state: SupervisorState,
    restarts: u32,
}

impl Default for SupervisorCore {
    fn default() -> Self {
        Self::new()
    }
}

impl SupervisorCore {
    pub fn new() -> Self {
        Self {
            state: SupervisorState::Idle,
            restarts: 0,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    /// Apply one input and return the actions it requires.
    ///
    /// Inputs that make no sense in the current state are ignored.
    pub fn step(&mut self, input: Input) -> Vec<Action> {
        use SupervisorState::*;

        match (self.state, input) {
            (Idle, Input::Started) => {
                self.transition(Spawning);
                vec![Action::SpawnChild]
            }
            (Spawning, Input::Spawned { .. }) => {
                self.transition(Running);
                Vec::new()
            }
            (Running, Input::Tick { changed: false }) => Vec::new(),
            (Running, Input::Tick { changed: true }) => {
                self.transition(Restarting);
                vec![Action::StopChild]
            }
            (Running, Input::ChildExited { code }) => {
                self.transition(Exited);
                vec![Action::Finish(self.exit(code, ExitReason::ChildExited))]
            }
            (Running, Input::ShutdownRequested) => {
                self.transition(Stopping);
                vec![Action::StopChild]
            }
            // The child is already on its way out; just don't bring it back.
            (Restarting, Input::ShutdownRequested) => {
                self.transition(Stopping);
                Vec::new()
            }
            (Restarting, Input::ChildStopped) => {
                self.restarts += 1;
                self.transition(Spawning);
                vec![Action::SpawnChild]
            }
            (Stopping, Input::ChildStopped) => {
                self.transition(Exited);
                vec![Action::Finish(self.exit(0, ExitReason::Interrupted))]
            }
            (state, input) => {
                debug!(?state, ?input, "ignoring input");
                Vec::new()
            }
        }
    }

    fn transition(&mut self, to: SupervisorState) {
        debug!(from = ?self.state, ?to, "supervisor state change");
        self.state = to;
    }

    fn exit(&self, code: i32, reason: ExitReason) -> SupervisorExit {
        SupervisorExit {
            code,
            restarts: self.restarts,
            reason,
        }
    }
}
