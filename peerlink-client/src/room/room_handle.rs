use crate::room::{RoomCommand, RoomConnectionState, RoomError, RoomNotification};
use peerlink_core::Participant;
use tokio::sync::{mpsc, oneshot, watch};

/// Embedder's view of the room coordinator. Commands are serialized
/// through the coordinator's event loop; state is observed via watches.
pub struct RoomHandle {
    cmd_tx: mpsc::UnboundedSender<RoomCommand>,
    state_rx: watch::Receiver<RoomConnectionState>,
    remote_rx: watch::Receiver<Option<Participant>>,
    notify_rx: mpsc::UnboundedReceiver<RoomNotification>,
}

impl RoomHandle {
    pub(crate) fn new(
        cmd_tx: mpsc::UnboundedSender<RoomCommand>,
        state_rx: watch::Receiver<RoomConnectionState>,
        remote_rx: watch::Receiver<Option<Participant>>,
        notify_rx: mpsc::UnboundedReceiver<RoomNotification>,
    ) -> Self {
        Self {
            cmd_tx,
            state_rx,
            remote_rx,
            notify_rx,
        }
    }

    pub async fn connect(&self) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(RoomCommand::Connect { reply })
            .map_err(|_| RoomError::Closed)?;
        rx.await.map_err(|_| RoomError::Closed)?
    }

    pub fn disconnect(&self) {
        let _ = self.cmd_tx.send(RoomCommand::Disconnect);
    }

    /// Caller-side call start. The `CallHandle` arrives as a
    /// `RoomNotification::CallStarted`.
    pub async fn start_call(&self) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(RoomCommand::StartCall { reply })
            .map_err(|_| RoomError::Closed)?;
        rx.await.map_err(|_| RoomError::Closed)?
    }

    pub fn end_call(&self) {
        let _ = self.cmd_tx.send(RoomCommand::EndCall);
    }

    pub fn logout(&self) {
        let _ = self.cmd_tx.send(RoomCommand::Logout);
    }

    pub fn state(&self) -> RoomConnectionState {
        self.state_rx.borrow().clone()
    }

    pub fn state_watch(&self) -> watch::Receiver<RoomConnectionState> {
        self.state_rx.clone()
    }

    pub fn remote_peer(&self) -> Option<Participant> {
        self.remote_rx.borrow().clone()
    }

    pub fn remote_peer_watch(&self) -> watch::Receiver<Option<Participant>> {
        self.remote_rx.clone()
    }

    /// Next room notification, or `None` once the coordinator stopped.
    pub async fn notification(&mut self) -> Option<RoomNotification> {
        self.notify_rx.recv().await
    }
}
