pub mod model;

pub use model::{
    ConnectParams, IceCandidate, Participant, Role, RoomId, SdpType, SessionDescription,
    SignalMessage,
};
