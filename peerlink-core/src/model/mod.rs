mod participant;
mod session;
mod signaling;

pub use participant::{Participant, Role, RoomId};
pub use session::{IceCandidate, SdpType, SessionDescription};
pub use signaling::{ConnectParams, SignalMessage};
