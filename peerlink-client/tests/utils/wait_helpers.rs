use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use peerlink_client::{CallHandle, CallPhase, OutboundEvent, RoomHandle, RoomNotification};

/// Timeout for any single wait in these tests (ms).
pub const WAIT_TIMEOUT_MS: u64 = 2000;

/// Poll until `check` passes or the timeout elapses.
pub async fn wait_until(what: &str, mut check: impl FnMut() -> bool) {
    let waited = timeout(Duration::from_millis(WAIT_TIMEOUT_MS), async {
        while !check() {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "timed out waiting for {what}");
}

/// Wait until the call reaches exactly `want`.
pub async fn wait_for_phase(call: &CallHandle, want: CallPhase) {
    let mut rx = call.phase_watch();
    let waited = timeout(Duration::from_millis(WAIT_TIMEOUT_MS), async {
        loop {
            if *rx.borrow() == want {
                return;
            }
            if rx.changed().await.is_err() {
                let last = rx.borrow().clone();
                assert_eq!(last, want, "call finished in a different phase");
                return;
            }
        }
    })
    .await;
    assert!(
        waited.is_ok(),
        "timed out waiting for phase {want:?}, current phase {:?}",
        call.phase()
    );
}

/// Next event the client sent to the relay.
pub async fn next_outbound(rx: &mut mpsc::UnboundedReceiver<OutboundEvent>) -> OutboundEvent {
    timeout(Duration::from_millis(WAIT_TIMEOUT_MS), rx.recv())
        .await
        .expect("timed out waiting for an outbound event")
        .expect("outbound event channel closed")
}

/// Next room notification; panics if the coordinator stopped.
pub async fn next_notification(room: &mut RoomHandle) -> RoomNotification {
    timeout(Duration::from_millis(WAIT_TIMEOUT_MS), room.notification())
        .await
        .expect("timed out waiting for a room notification")
        .expect("room coordinator stopped")
}

/// Take the started call's handle off the notification stream.
pub async fn expect_call_started(room: &mut RoomHandle) -> CallHandle {
    match next_notification(room).await {
        RoomNotification::CallStarted(call) => call,
        other => panic!("expected CallStarted, got {other:?}"),
    }
}

/// Assert that no notification arrives within `for_ms` milliseconds.
pub async fn assert_quiet(room: &mut RoomHandle, for_ms: u64) {
    if let Ok(Some(notification)) = timeout(Duration::from_millis(for_ms), room.notification()).await
    {
        panic!("unexpected notification: {notification:?}");
    }
}
