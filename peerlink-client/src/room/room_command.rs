use crate::room::RoomError;
use tokio::sync::oneshot;

/// Commands accepted by the room coordinator's event loop.
#[derive(Debug)]
pub enum RoomCommand {
    /// Open the relay connection. No-op while connecting or connected.
    Connect {
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Close the relay connection and clear the remote participant.
    Disconnect,

    /// Start a call as caller. Refused unless connected, a remote
    /// participant exists, and the roles differ.
    StartCall {
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Forward a hangup to the active call, if any.
    EndCall,

    /// Disconnect and clear the persisted identity; stops the coordinator.
    Logout,
}
