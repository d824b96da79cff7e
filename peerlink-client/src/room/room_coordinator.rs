use crate::call::{CallCommand, CallConfig, CallOrchestrator, CallOutcome};
use crate::identity::IdentityStore;
use crate::negotiation::{MediaEngine, SessionNegotiator};
use crate::room::{
    RoomCommand, RoomConnectionState, RoomError, RoomHandle, RoomNotification,
};
use crate::transport::{EventStream, InboundEvent, SignalingTransport};
use peerlink_core::{ConnectParams, Participant, Role, RoomId, SessionDescription};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

struct ActiveCall {
    end_tx: mpsc::UnboundedSender<CallCommand>,
}

/// Owns room membership and connection lifecycle. All mutations are
/// serialized through `run()`; the embedder drives it via `RoomHandle`.
pub struct RoomCoordinator {
    room_id: RoomId,
    local: Participant,
    transport: Arc<dyn SignalingTransport>,
    engine: Arc<dyn MediaEngine>,
    identity: Arc<dyn IdentityStore>,
    call_config: CallConfig,

    command_rx: mpsc::UnboundedReceiver<RoomCommand>,
    state_tx: watch::Sender<RoomConnectionState>,
    remote_tx: watch::Sender<Option<Participant>>,
    notify_tx: mpsc::UnboundedSender<RoomNotification>,

    /// Live subscription to the relay, present only while connected.
    transport_rx: Option<EventStream>,
    active_call: Option<ActiveCall>,
    call_done_tx: mpsc::UnboundedSender<CallOutcome>,
    call_done_rx: mpsc::UnboundedReceiver<CallOutcome>,
}

impl RoomCoordinator {
    pub fn new(
        room_id: RoomId,
        username: impl Into<String>,
        role: Role,
        transport: Arc<dyn SignalingTransport>,
        engine: Arc<dyn MediaEngine>,
        identity: Arc<dyn IdentityStore>,
        call_config: CallConfig,
    ) -> (Self, RoomHandle) {
        let (cmd_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(RoomConnectionState::Disconnected);
        let (remote_tx, remote_rx) = watch::channel(None);
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        let (call_done_tx, call_done_rx) = mpsc::unbounded_channel();

        let coordinator = Self {
            room_id,
            local: Participant::new(username, role),
            transport,
            engine,
            identity,
            call_config,
            command_rx,
            state_tx,
            remote_tx,
            notify_tx,
            transport_rx: None,
            active_call: None,
            call_done_tx,
            call_done_rx,
        };

        let handle = RoomHandle::new(cmd_tx, state_rx, remote_rx, notify_rx);
        (coordinator, handle)
    }

    pub async fn run(mut self) {
        info!(room = %self.room_id, user = %self.local.username, "Room coordinator started");

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => {
                        // Logout is the one command that stops the loop.
                        if self.handle_command(cmd).await {
                            break;
                        }
                    }
                    None => {
                        debug!("Command channel closed; shutting down room coordinator");
                        break;
                    }
                },

                evt = recv_subscribed(&mut self.transport_rx), if self.transport_rx.is_some() => {
                    match evt {
                        Some(event) => self.handle_transport_event(event).await,
                        None => {
                            debug!("Relay event stream ended");
                            self.transport_rx = None;
                        }
                    }
                }

                outcome = self.call_done_rx.recv() => {
                    if let Some(outcome) = outcome {
                        self.finish_call(outcome);
                    }
                }
            }
        }

        info!("Room coordinator finished");
    }

    /// Returns true when the coordinator should stop.
    async fn handle_command(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Connect { reply } => {
                let result = self.handle_connect().await;
                let _ = reply.send(result);
            }
            RoomCommand::Disconnect => self.handle_disconnect().await,
            RoomCommand::StartCall { reply } => {
                let result = self.handle_start_call().await;
                let _ = reply.send(result);
            }
            RoomCommand::EndCall => {
                if let Some(call) = &self.active_call {
                    let _ = call.end_tx.send(CallCommand::End);
                }
            }
            RoomCommand::Logout => {
                self.handle_logout().await;
                return true;
            }
        }
        false
    }

    async fn handle_connect(&mut self) -> Result<(), RoomError> {
        match *self.state_tx.borrow() {
            RoomConnectionState::Connecting | RoomConnectionState::Connected => {
                debug!("Already connecting or connected; ignoring connect");
                return Ok(());
            }
            _ => {}
        }

        self.state_tx.send_replace(RoomConnectionState::Connecting);

        let params = ConnectParams {
            room_id: self.room_id,
            username: self.local.username.clone(),
            role: self.local.role,
        };

        match self.transport.connect(params).await {
            Ok(()) => {
                self.transport_rx = Some(self.transport.events());
                self.state_tx.send_replace(RoomConnectionState::Connected);
                Ok(())
            }
            Err(e) => {
                warn!("Relay connect failed: {e}");
                self.state_tx
                    .send_replace(RoomConnectionState::Failed(e.to_string()));
                Err(e.into())
            }
        }
    }

    async fn handle_disconnect(&mut self) {
        self.transport_rx = None;
        self.transport.disconnect().await;
        self.remote_tx.send_replace(None);
        self.state_tx.send_replace(RoomConnectionState::Disconnected);
    }

    async fn handle_logout(&mut self) {
        self.handle_disconnect().await;
        if let Err(e) = self.identity.clear() {
            warn!("Failed to clear persisted identity: {e}");
        }
    }

    async fn handle_start_call(&mut self) -> Result<(), RoomError> {
        if *self.state_tx.borrow() != RoomConnectionState::Connected {
            return Err(RoomError::NotConnected);
        }
        let peer = self
            .remote_tx
            .borrow()
            .clone()
            .ok_or(RoomError::NoRemotePeer)?;
        if peer.role == self.local.role {
            return Err(RoomError::RoleConflict);
        }
        self.start_call(Some(peer), None).await
    }

    async fn handle_transport_event(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::Connected => {
                self.state_tx.send_replace(RoomConnectionState::Connected);
            }

            InboundEvent::Disconnected => {
                self.state_tx.send_replace(RoomConnectionState::Disconnected);
                self.remote_tx.send_replace(None);
            }

            InboundEvent::Error(message) => {
                warn!("Relay error: {message}");
                self.state_tx
                    .send_replace(RoomConnectionState::Failed(message));
            }

            InboundEvent::ParticipantJoined(participant) => {
                let existing = self.remote_tx.borrow().clone();
                if let Some(existing) = existing {
                    // A third member in a 2-party room. Last writer wins,
                    // but the embedder is told instead of us guessing.
                    warn!(
                        existing = %existing.username,
                        joined = %participant.username,
                        "Second remote participant joined a 2-party room"
                    );
                    self.notify(RoomNotification::ProtocolViolation(format!(
                        "participant '{}' joined while '{}' was already present",
                        participant.username, existing.username
                    )));
                }
                self.remote_tx.send_replace(Some(participant.clone()));
                self.notify(RoomNotification::PeerJoined(participant));
            }

            InboundEvent::ParticipantLeft(participant) => {
                let matches = self
                    .remote_tx
                    .borrow()
                    .as_ref()
                    .is_some_and(|r| r.username == participant.username);
                if matches {
                    self.remote_tx.send_replace(None);
                    self.notify(RoomNotification::PeerLeft(participant));
                }
            }

            InboundEvent::OfferReceived(offer) => {
                self.handle_incoming_offer(offer).await;
            }

            // The active call consumes these on its own subscription.
            InboundEvent::AnswerReceived(_) | InboundEvent::CandidateReceived(_) => {}
        }
    }

    async fn handle_incoming_offer(&mut self, offer: SessionDescription) {
        if self.local.role != Role::Callee {
            // A caller gets no unsolicited offers in a 2-party room.
            debug!("Ignoring offer received in caller role");
            return;
        }
        if self.active_call.is_some() {
            debug!("Offer received during an active call; ignoring");
            return;
        }
        let peer = self.remote_tx.borrow().clone();
        if let Err(e) = self.start_call(peer, Some(offer)).await {
            warn!("Failed to start call from incoming offer: {e}");
            self.notify(RoomNotification::CallEnded(CallOutcome::Failed(
                e.to_string(),
            )));
        }
    }

    /// Open a negotiation session and spawn the call orchestrator. At
    /// most one active call per client process.
    async fn start_call(
        &mut self,
        peer: Option<Participant>,
        pending_offer: Option<SessionDescription>,
    ) -> Result<(), RoomError> {
        if self.active_call.is_some() {
            return Err(RoomError::CallInProgress);
        }

        let (negotiator, engine_rx) = SessionNegotiator::open(self.engine.as_ref()).await?;
        let transport_rx = self.transport.events();

        let (orchestrator, handle) = CallOrchestrator::new(
            self.local.role,
            peer,
            pending_offer,
            negotiator,
            engine_rx,
            self.transport.clone(),
            transport_rx,
            self.call_config.clone(),
            self.call_done_tx.clone(),
        );

        self.active_call = Some(ActiveCall {
            end_tx: handle.command_sender(),
        });
        tokio::spawn(orchestrator.run());
        self.notify(RoomNotification::CallStarted(handle));
        Ok(())
    }

    fn finish_call(&mut self, outcome: CallOutcome) {
        if self.active_call.take().is_some() {
            self.notify(RoomNotification::CallEnded(outcome));
        }
    }

    fn notify(&self, notification: RoomNotification) {
        let _ = self.notify_tx.send(notification);
    }
}

async fn recv_subscribed(rx: &mut Option<EventStream>) -> Option<InboundEvent> {
    match rx {
        Some(stream) => stream.recv().await,
        None => std::future::pending().await,
    }
}
