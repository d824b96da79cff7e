use peerlink_client::{CallOutcome, CallPhase, OutboundEvent, RoomNotification};
use peerlink_core::Role;

use crate::integration::{create_test_room, init_tracing, start_caller_call};
use crate::utils::{expect_call_started, next_notification, next_outbound, wait_for_phase};

#[tokio::test]
async fn test_ending_a_call_closes_the_session_once() {
    init_tracing();

    let mut room = create_test_room(Role::Caller);
    let call = start_caller_call(&mut room).await;
    let session = room.engine.last_session();

    call.end_call();
    wait_for_phase(&call, CallPhase::Ended).await;

    match next_notification(&mut room.handle).await {
        RoomNotification::CallEnded(CallOutcome::Ended) => {}
        other => panic!("expected CallEnded, got {other:?}"),
    }
    assert_eq!(session.close_count(), 1);

    // Ending twice is harmless.
    call.end_call();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(session.close_count(), 1);
}

#[tokio::test]
async fn test_room_survives_the_call_and_can_start_another() {
    init_tracing();

    let mut room = create_test_room(Role::Caller);
    let call = start_caller_call(&mut room).await;

    call.end_call();
    wait_for_phase(&call, CallPhase::Ended).await;
    match next_notification(&mut room.handle).await {
        RoomNotification::CallEnded(_) => {}
        other => panic!("expected CallEnded, got {other:?}"),
    }

    room.handle.start_call().await.expect("second call should start");
    let second = expect_call_started(&mut room.handle).await;
    match next_outbound(&mut room.outbound_rx).await {
        OutboundEvent::Offer(_) => {}
        other => panic!("expected an offer, got {other:?}"),
    }

    assert_eq!(room.engine.session_count(), 2);
    assert_eq!(second.peer_username(), Some("bob"));
}

#[tokio::test]
async fn test_ending_via_the_room_handle() {
    init_tracing();

    let mut room = create_test_room(Role::Caller);
    let call = start_caller_call(&mut room).await;

    room.handle.end_call();
    wait_for_phase(&call, CallPhase::Ended).await;
    match next_notification(&mut room.handle).await {
        RoomNotification::CallEnded(CallOutcome::Ended) => {}
        other => panic!("expected CallEnded, got {other:?}"),
    }
}
