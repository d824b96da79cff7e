use peerlink_client::{InboundEvent, RoomConnectionState, RoomNotification};
use peerlink_core::{Participant, Role};

use crate::integration::{create_test_room, init_tracing, join_remote};
use crate::utils::{assert_quiet, next_notification};

#[tokio::test]
async fn test_remote_peer_tracks_joins_and_leaves() {
    init_tracing();

    let mut room = create_test_room(Role::Caller);
    room.handle.connect().await.expect("connect failed");
    assert_eq!(room.handle.state(), RoomConnectionState::Connected);

    join_remote(&mut room, "bob", Role::Callee).await;
    assert_eq!(
        room.handle.remote_peer().map(|p| p.username),
        Some("bob".to_string())
    );

    // A leave for a name we never saw must not clear the slot.
    room.transport
        .push(InboundEvent::ParticipantLeft(Participant::new(
            "mallory",
            Role::Callee,
        )));
    assert_quiet(&mut room.handle, 100).await;
    assert_eq!(
        room.handle.remote_peer().map(|p| p.username),
        Some("bob".to_string())
    );

    room.transport
        .push(InboundEvent::ParticipantLeft(Participant::new(
            "bob",
            Role::Callee,
        )));
    match next_notification(&mut room.handle).await {
        RoomNotification::PeerLeft(peer) => assert_eq!(peer.username, "bob"),
        other => panic!("expected PeerLeft, got {other:?}"),
    }
    assert!(room.handle.remote_peer().is_none());
}

#[tokio::test]
async fn test_third_join_is_reported_and_replaces_peer() {
    init_tracing();

    let mut room = create_test_room(Role::Caller);
    room.handle.connect().await.expect("connect failed");
    join_remote(&mut room, "bob", Role::Callee).await;

    room.transport
        .push(InboundEvent::ParticipantJoined(Participant::new(
            "carol",
            Role::Callee,
        )));

    match next_notification(&mut room.handle).await {
        RoomNotification::ProtocolViolation(message) => {
            assert!(message.contains("carol"), "violation names the joiner: {message}");
        }
        other => panic!("expected ProtocolViolation, got {other:?}"),
    }
    match next_notification(&mut room.handle).await {
        RoomNotification::PeerJoined(peer) => assert_eq!(peer.username, "carol"),
        other => panic!("expected PeerJoined, got {other:?}"),
    }

    // Last writer wins.
    assert_eq!(
        room.handle.remote_peer().map(|p| p.username),
        Some("carol".to_string())
    );
}
