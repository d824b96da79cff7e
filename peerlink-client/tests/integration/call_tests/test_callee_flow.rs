use peerlink_client::{CallPhase, InboundEvent, OutboundEvent};
use peerlink_core::{Role, SessionDescription};

use crate::integration::{create_test_room, init_tracing, join_remote};
use crate::utils::{SessionOp, expect_call_started, next_outbound, wait_for_phase};

#[tokio::test]
async fn test_incoming_offer_starts_call_and_sends_answer() {
    init_tracing();

    let mut room = create_test_room(Role::Callee);
    room.handle.connect().await.expect("connect failed");
    join_remote(&mut room, "bob", Role::Caller).await;

    let offer = SessionDescription::offer("remote-offer");
    room.transport.push(InboundEvent::OfferReceived(offer.clone()));

    let call = expect_call_started(&mut room.handle).await;
    assert_eq!(call.role(), Role::Callee);
    assert_eq!(call.peer_username(), Some("bob"));

    let answer = match next_outbound(&mut room.outbound_rx).await {
        OutboundEvent::Answer(desc) => desc,
        other => panic!("expected an answer, got {other:?}"),
    };
    assert_eq!(answer.sdp, "mock-answer-sdp");
    wait_for_phase(&call, CallPhase::Negotiating).await;

    // The remote offer was applied before the answer was created.
    let ops = room.engine.last_session().ops();
    let remote_at = ops
        .iter()
        .position(|op| *op == SessionOp::SetRemoteDescription(offer.clone()))
        .expect("remote offer was never applied");
    let answer_at = ops
        .iter()
        .position(|op| *op == SessionOp::CreateAnswer)
        .expect("answer was never created");
    assert!(remote_at < answer_at, "ops out of order: {ops:?}");
}

#[tokio::test]
async fn test_second_offer_during_call_is_ignored() {
    init_tracing();

    let mut room = create_test_room(Role::Callee);
    room.handle.connect().await.expect("connect failed");
    join_remote(&mut room, "bob", Role::Caller).await;

    room.transport.push(InboundEvent::OfferReceived(
        SessionDescription::offer("first-offer"),
    ));
    let _call = expect_call_started(&mut room.handle).await;
    match next_outbound(&mut room.outbound_rx).await {
        OutboundEvent::Answer(_) => {}
        other => panic!("expected an answer, got {other:?}"),
    }

    room.transport.push(InboundEvent::OfferReceived(
        SessionDescription::offer("second-offer"),
    ));
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    // No second session and no renegotiation.
    assert_eq!(room.engine.session_count(), 1);
    let applied = room
        .engine
        .last_session()
        .ops()
        .iter()
        .filter(|op| matches!(op, SessionOp::SetRemoteDescription(_)))
        .count();
    assert_eq!(applied, 1);
}
