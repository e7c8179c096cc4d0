// src/exec/child.rs

//! Stopping a running child: ask nicely, wait out the grace period, then kill.

use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;
use tracing::{debug, info, warn};

use crate::errors::{RelaunchError, Result};

/// How a child ended up stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// It had already exited before the stop request.
    AlreadyExited(ExitStatus),
    /// It exited within the grace period.
    Graceful(ExitStatus),
    /// It had to be killed.
    Killed(ExitStatus),
}

impl StopOutcome {
    pub fn status(&self) -> ExitStatus {
        match *self {
            StopOutcome::AlreadyExited(s) | StopOutcome::Graceful(s) | StopOutcome::Killed(s) => s,
        }
    }

    pub fn was_forced(&self) -> bool {
        matches!(self, StopOutcome::Killed(_))
    }
}

/// Stop `child` and reap it.
///
/// A cooperative stop (SIGTERM on unix) is sent first. If the child is still
/// alive after `grace`, it is killed. The child is always reaped before this
/// returns `Ok`.
pub async fn stop_child(child: &mut Child, grace: Duration) -> Result<StopOutcome> {
    if let Some(status) = child.try_wait()? {
        debug!(?status, "child already exited before stop request");
        return Ok(StopOutcome::AlreadyExited(status));
    }
    let pid = child.id().unwrap_or_default();

    if request_graceful_stop(child) {
        match wait_with_grace(child, pid, grace).await {
            Ok(status) => {
                info!(pid, ?status, "child exited after stop request");
                return Ok(StopOutcome::Graceful(status));
            }
            Err(err @ RelaunchError::ChildTerminationTimeout { .. }) => {
                warn!(pid, error = %err, "escalating to kill");
            }
            Err(err) => return Err(err),
        }
    }

    child.kill().await?;
    let status = child.wait().await?;
    info!(pid, ?status, "child killed");
    Ok(StopOutcome::Killed(status))
}

async fn wait_with_grace(child: &mut Child, pid: u32, grace: Duration) -> Result<ExitStatus> {
    match tokio::time::timeout(grace, child.wait()).await {
        Ok(status) => Ok(status?),
        Err(_elapsed) => Err(RelaunchError::ChildTerminationTimeout { pid, grace }),
    }
}

/// Send the cooperative stop request. Returns false when there is no way to
/// ask politely and the caller should kill straight away.
#[cfg(unix)]
fn request_graceful_stop(child: &Child) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        return false;
    };
    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };

    debug!(pid, "sending SIGTERM to child");
    match kill(Pid::from_raw(raw), Signal::SIGTERM) {
        // ESRCH: it exited in the meantime; the wait picks that up.
        Ok(()) | Err(Errno::ESRCH) => true,
        Err(e) => {
            warn!(pid, error = %e, "failed to send SIGTERM to child");
            false
        }
    }
}

#[cfg(not(unix))]
fn request_graceful_stop(_child: &Child) -> bool {
    false
}

/// Exit code to report for a finished child.
///
/// A child terminated by a signal has no exit code; on unix this maps to the
/// shell convention `128 + signal`, elsewhere to 1.
pub fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
