// src/exec/signals.rs

//! OS shutdown signals.
//!
//! [`shutdown_signal`] registers the handlers immediately and returns a future
//! that completes on the first termination request, so a signal arriving
//! before the future is first polled is not lost.
//!
//! ## Unix
//! SIGINT, SIGTERM and SIGQUIT.
//!
//! ## Windows
//! Only Ctrl-C.

use std::future::Future;

/// Must be called from inside a tokio runtime.
#[cfg(unix)]
pub fn shutdown_signal() -> std::io::Result<impl Future<Output = ()> + Send + 'static> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    Ok(async move {
        tokio::select! {
            _ = sigint.recv()  => {},
            _ = sigterm.recv() => {},
            _ = sigquit.recv() => {},
        }
    })
}

#[cfg(not(unix))]
pub fn shutdown_signal() -> std::io::Result<impl Future<Output = ()> + Send + 'static> {
    Ok(async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    })
}

/// Block the current thread on a fresh single-threaded runtime until a
/// shutdown signal arrives, running `work` concurrently until then.
///
/// Returns `Some(output)` if `work` finished first, `None` if interrupted.
/// Meant for synchronous entrypoints that want a cooperative stop.
pub fn run_until_shutdown<F>(work: F) -> std::io::Result<Option<F::Output>>
where
    F: Future,
{
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        let shutdown = shutdown_signal()?;
        let out = tokio::select! {
            out = work => Some(out),
            _ = shutdown => None,
        };
        Ok::<_, std::io::Error>(out)
    })
}
