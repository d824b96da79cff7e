pub mod call;
pub mod identity;
pub mod negotiation;
pub mod room;
pub mod transport;

pub use call::{CallConfig, CallHandle, CallOutcome, CallPhase};
pub use identity::{IdentityError, IdentityStore, JsonIdentityStore, StoredIdentity};
pub use negotiation::{
    EngineConfig, EngineEvent, IceConnectionState, MediaEngine, NegotiationError, PeerSession,
    SessionNegotiator, TrackInfo, WebrtcEngine,
};
pub use room::{
    RoomConnectionState, RoomCoordinator, RoomError, RoomHandle, RoomNotification,
};
pub use transport::{
    ConnectError, EventStream, InboundEvent, OutboundEvent, SignalingTransport,
    WsSignalingTransport, WsTransportConfig,
};
