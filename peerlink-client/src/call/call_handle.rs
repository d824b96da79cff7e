use crate::call::CallPhase;
use crate::negotiation::TrackInfo;
use peerlink_core::Role;
use std::fmt;
use tokio::sync::{mpsc, watch};

#[derive(Debug)]
pub enum CallCommand {
    End,
}

/// Embedder's view of one running call: observe phases and remote
/// tracks, end the call. Dropping the handle does not end the call.
pub struct CallHandle {
    peer_username: Option<String>,
    role: Role,
    cmd_tx: mpsc::UnboundedSender<CallCommand>,
    phase_rx: watch::Receiver<CallPhase>,
    track_rx: mpsc::UnboundedReceiver<TrackInfo>,
}

impl CallHandle {
    pub(crate) fn new(
        peer_username: Option<String>,
        role: Role,
        cmd_tx: mpsc::UnboundedSender<CallCommand>,
        phase_rx: watch::Receiver<CallPhase>,
        track_rx: mpsc::UnboundedReceiver<TrackInfo>,
    ) -> Self {
        Self {
            peer_username,
            role,
            cmd_tx,
            phase_rx,
            track_rx,
        }
    }

    pub fn peer_username(&self) -> Option<&str> {
        self.peer_username.as_deref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Always permitted; a second request after the call finished is a no-op.
    pub fn end_call(&self) {
        let _ = self.cmd_tx.send(CallCommand::End);
    }

    pub fn phase(&self) -> CallPhase {
        self.phase_rx.borrow().clone()
    }

    pub fn phase_watch(&self) -> watch::Receiver<CallPhase> {
        self.phase_rx.clone()
    }

    /// Next remote media track, or `None` once the call is over.
    pub async fn remote_track(&mut self) -> Option<TrackInfo> {
        self.track_rx.recv().await
    }

    pub(crate) fn command_sender(&self) -> mpsc::UnboundedSender<CallCommand> {
        self.cmd_tx.clone()
    }
}

impl fmt::Debug for CallHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallHandle")
            .field("peer_username", &self.peer_username)
            .field("role", &self.role)
            .field("phase", &*self.phase_rx.borrow())
            .finish()
    }
}
