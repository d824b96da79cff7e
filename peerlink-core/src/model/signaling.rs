use crate::model::participant::{Role, RoomId};
use crate::model::session::{IceCandidate, SessionDescription};
use serde::{Deserialize, Serialize};

/// Parameters sent to the relay when a client attaches to a room.
#[derive(Debug, Clone)]
pub struct ConnectParams {
    pub room_id: RoomId,
    pub username: String,
    pub role: Role,
}

/// Closed set of relay events. Both directions use the same envelope:
/// an `event` name plus a JSON `data` payload. New variants are a
/// breaking protocol change; every consumer matches exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum SignalMessage {
    #[serde(rename = "room_user_joined")]
    RoomUserJoined {
        username: String,
        #[serde(rename = "isCaller")]
        is_caller: bool,
    },
    #[serde(rename = "room_user_left")]
    RoomUserLeft {
        username: String,
        #[serde(rename = "isCaller")]
        is_caller: bool,
    },
    #[serde(rename = "offer")]
    Offer(SessionDescription),
    #[serde(rename = "answer")]
    Answer(SessionDescription),
    #[serde(rename = "candidate")]
    Candidate(IceCandidate),
    #[serde(rename = "error")]
    Error { message: String },
}
