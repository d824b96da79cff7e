use crate::call::{CallHandle, CallOutcome};
use peerlink_core::Participant;

/// Relay-connection lifecycle, owned exclusively by the room coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed(String),
}

/// Out-of-band room events surfaced to the embedder.
#[derive(Debug)]
pub enum RoomNotification {
    PeerJoined(Participant),
    PeerLeft(Participant),
    /// A call began, either locally initiated (caller) or triggered by a
    /// received offer (callee). Carries the embedder's handle to it.
    CallStarted(CallHandle),
    CallEnded(CallOutcome),
    /// The relay did something the 2-party protocol does not allow, e.g.
    /// a third participant joining. The room stays usable.
    ProtocolViolation(String),
}
