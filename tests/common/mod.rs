#![allow(dead_code)]

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use relaunch::engine::{SupervisorEvent, SupervisorOptions};

use relaunch_test_utils::with_timeout;

/// Fast polling, short grace period.
pub fn fast_options() -> SupervisorOptions {
    SupervisorOptions {
        interval: Duration::from_millis(50),
        grace_period: Duration::from_secs(2),
    }
}

/// Shutdown future that completes when the sender fires (or is dropped).
pub fn manual_shutdown() -> (oneshot::Sender<()>, impl std::future::Future<Output = ()>) {
    let (tx, rx) = oneshot::channel::<()>();
    (tx, async move {
        let _ = rx.await;
    })
}

/// Receive events until one matches `pred`, returning it.
pub async fn wait_for<F>(rx: &mut mpsc::UnboundedReceiver<SupervisorEvent>, pred: F) -> SupervisorEvent
where
    F: Fn(&SupervisorEvent) -> bool,
{
    with_timeout(async {
        loop {
            match rx.recv().await {
                Some(event) if pred(&event) => return event,
                Some(_) => {}
                None => panic!("supervisor event channel closed"),
            }
        }
    })
    .await
}
