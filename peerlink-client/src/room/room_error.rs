use crate::negotiation::NegotiationError;
use crate::transport::ConnectError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("not connected to a room")]
    NotConnected,

    #[error("no remote participant in the room")]
    NoRemotePeer,

    #[error("both participants have the same role")]
    RoleConflict,

    #[error("a call is already in progress")]
    CallInProgress,

    #[error(transparent)]
    Transport(#[from] ConnectError),

    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    #[error("room coordinator stopped")]
    Closed,
}
