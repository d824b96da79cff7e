use crate::call::{CallCommand, CallConfig, CallHandle, CallOutcome, CallPhase};
use crate::negotiation::{
    EngineEvent, IceConnectionState, NegotiationError, SessionNegotiator, TrackInfo,
};
use crate::transport::{EventStream, InboundEvent, OutboundEvent, SignalingTransport};
use peerlink_core::{IceCandidate, Participant, Role, SessionDescription};
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::Sleep;
use tracing::{debug, info, warn};

type LeaveDeadline = Option<Pin<Box<Sleep>>>;

/// Runs one call attempt end-to-end: sequences the offer/answer exchange,
/// relays candidates in both directions, and maps engine connectivity
/// into call phases. One orchestrator per call; terminal phases are
/// `Ended` and `Failed`.
pub struct CallOrchestrator {
    role: Role,
    peer_username: Option<String>,
    pending_offer: Option<SessionDescription>,
    negotiator: SessionNegotiator,
    engine_rx: mpsc::UnboundedReceiver<EngineEvent>,
    transport: Arc<dyn SignalingTransport>,
    transport_rx: EventStream,
    cmd_rx: mpsc::UnboundedReceiver<CallCommand>,
    phase_tx: watch::Sender<CallPhase>,
    track_tx: mpsc::UnboundedSender<TrackInfo>,
    config: CallConfig,
    /// Remote candidates that arrived before the remote description;
    /// flushed in arrival order the moment it is set.
    buffered_candidates: Vec<IceCandidate>,
    remote_description_set: bool,
    done_tx: mpsc::UnboundedSender<CallOutcome>,
}

impl CallOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        role: Role,
        peer: Option<Participant>,
        pending_offer: Option<SessionDescription>,
        negotiator: SessionNegotiator,
        engine_rx: mpsc::UnboundedReceiver<EngineEvent>,
        transport: Arc<dyn SignalingTransport>,
        transport_rx: EventStream,
        config: CallConfig,
        done_tx: mpsc::UnboundedSender<CallOutcome>,
    ) -> (Self, CallHandle) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (phase_tx, phase_rx) = watch::channel(CallPhase::Idle);
        let (track_tx, track_rx) = mpsc::unbounded_channel();
        let peer_username = peer.map(|p| p.username);

        let handle = CallHandle::new(
            peer_username.clone(),
            role,
            cmd_tx,
            phase_rx,
            track_rx,
        );

        let orchestrator = Self {
            role,
            peer_username,
            pending_offer,
            negotiator,
            engine_rx,
            transport,
            transport_rx,
            cmd_rx,
            phase_tx,
            track_tx,
            config,
            buffered_candidates: Vec::new(),
            remote_description_set: false,
            done_tx,
        };

        (orchestrator, handle)
    }

    pub async fn run(mut self) {
        info!(role = ?self.role, peer = ?self.peer_username, "Call started");

        if let Err(e) = self.negotiator.start_capture().await {
            warn!("Failed to start local capture: {e}");
        }

        let outcome = self.drive().await;

        // Cleanup happens exactly once, whatever path ended the call.
        self.negotiator.close().await;
        self.phase_tx.send_replace(match &outcome {
            CallOutcome::Ended => CallPhase::Ended,
            CallOutcome::Failed(reason) => CallPhase::Failed(reason.clone()),
        });
        info!(outcome = ?outcome, "Call finished");
        let _ = self.done_tx.send(outcome);
    }

    async fn drive(&mut self) -> CallOutcome {
        match self.role {
            Role::Caller => {
                if let Err(e) = self.start_as_caller().await {
                    return CallOutcome::Failed(e.to_string());
                }
            }
            Role::Callee => match self.pending_offer.take() {
                Some(offer) => {
                    if let Err(e) = self.apply_remote_offer(offer).await {
                        return CallOutcome::Failed(e.to_string());
                    }
                }
                None => self.set_phase(CallPhase::WaitingForOffer),
            },
        }

        let mut leave_deadline: LeaveDeadline = None;

        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(CallCommand::End) | None => {
                        info!("Call ended by user");
                        return CallOutcome::Ended;
                    }
                },

                evt = self.transport_rx.recv() => match evt {
                    Some(event) => {
                        if let Some(outcome) =
                            self.handle_transport_event(event, &mut leave_deadline).await
                        {
                            return outcome;
                        }
                    }
                    None => {
                        info!("Signaling stream ended mid-call");
                        return CallOutcome::Ended;
                    }
                },

                evt = self.engine_rx.recv() => match evt {
                    Some(event) => {
                        if let Some(outcome) = self.handle_engine_event(event).await {
                            return outcome;
                        }
                    }
                    None => {
                        warn!("Engine event stream ended");
                        return CallOutcome::Ended;
                    }
                },

                _ = wait_deadline(&mut leave_deadline), if leave_deadline.is_some() => {
                    info!("Peer-left grace period elapsed");
                    return CallOutcome::Ended;
                }
            }
        }
    }

    async fn start_as_caller(&mut self) -> Result<(), NegotiationError> {
        self.set_phase(CallPhase::CreatingOffer);
        let offer = self.negotiator.create_offer().await?;
        self.set_phase(CallPhase::OfferSent);
        self.transport.send(OutboundEvent::Offer(offer)).await;
        self.set_phase(CallPhase::WaitingForAnswer);
        Ok(())
    }

    async fn apply_remote_offer(
        &mut self,
        offer: SessionDescription,
    ) -> Result<(), NegotiationError> {
        self.set_phase(CallPhase::ApplyingOffer);
        self.negotiator.set_remote_description(offer).await?;
        self.flush_buffered_candidates().await;
        self.set_phase(CallPhase::CreatingAnswer);
        let answer = self.negotiator.create_answer().await?;
        self.set_phase(CallPhase::AnswerSent);
        self.transport.send(OutboundEvent::Answer(answer)).await;
        self.set_phase(CallPhase::Negotiating);
        Ok(())
    }

    async fn apply_remote_answer(
        &mut self,
        answer: SessionDescription,
    ) -> Result<(), NegotiationError> {
        self.set_phase(CallPhase::ApplyingAnswer);
        self.negotiator.set_remote_description(answer).await?;
        self.flush_buffered_candidates().await;
        self.set_phase(CallPhase::Negotiating);
        Ok(())
    }

    async fn handle_transport_event(
        &mut self,
        event: InboundEvent,
        leave_deadline: &mut LeaveDeadline,
    ) -> Option<CallOutcome> {
        match event {
            InboundEvent::OfferReceived(offer) => {
                if self.role != Role::Callee || self.remote_description_set {
                    debug!("Ignoring out-of-phase offer");
                    return None;
                }
                if let Err(e) = self.apply_remote_offer(offer).await {
                    return Some(CallOutcome::Failed(e.to_string()));
                }
                None
            }

            InboundEvent::AnswerReceived(answer) => {
                if self.role != Role::Caller || self.remote_description_set {
                    debug!("Ignoring out-of-phase answer");
                    return None;
                }
                if let Err(e) = self.apply_remote_answer(answer).await {
                    return Some(CallOutcome::Failed(e.to_string()));
                }
                None
            }

            InboundEvent::CandidateReceived(candidate) => {
                if self.remote_description_set {
                    // Lost candidates are non-fatal; connectivity may
                    // still establish over the remaining paths.
                    if let Err(e) = self.negotiator.add_candidate(candidate).await {
                        warn!("Failed to add remote candidate: {e}");
                    }
                } else {
                    self.buffered_candidates.push(candidate);
                }
                None
            }

            InboundEvent::ParticipantLeft(participant) => {
                if self.peer_matches(&participant) && leave_deadline.is_none() {
                    info!(peer = %participant.username, "Peer left; ending call after grace period");
                    self.set_phase(CallPhase::PeerDisconnected);
                    *leave_deadline = Some(Box::pin(tokio::time::sleep(self.config.leave_grace)));
                }
                None
            }

            InboundEvent::Connected
            | InboundEvent::Disconnected
            | InboundEvent::Error(_)
            | InboundEvent::ParticipantJoined(_) => {
                debug!("Room-level event during call; handled by the coordinator");
                None
            }
        }
    }

    async fn handle_engine_event(&mut self, event: EngineEvent) -> Option<CallOutcome> {
        match event {
            // Trickle ICE: relay immediately, independent of phase.
            EngineEvent::CandidateGenerated(candidate) => {
                self.transport.send(OutboundEvent::Candidate(candidate)).await;
                None
            }

            EngineEvent::ConnectionStateChanged(state) => match state {
                IceConnectionState::Connected | IceConnectionState::Completed => {
                    self.set_phase(CallPhase::Connected);
                    None
                }
                IceConnectionState::Failed => {
                    Some(CallOutcome::Failed("ICE connection failed".to_string()))
                }
                IceConnectionState::Disconnected => {
                    if self.config.end_on_ice_disconnect {
                        info!("ICE disconnected; ending call");
                        Some(CallOutcome::Ended)
                    } else {
                        debug!("ICE disconnected; waiting for recovery");
                        None
                    }
                }
                IceConnectionState::New | IceConnectionState::Checking => {
                    self.set_phase(CallPhase::Negotiating);
                    None
                }
                IceConnectionState::Closed => {
                    debug!("ICE state {state:?}");
                    None
                }
            },

            EngineEvent::RemoteTrackReceived(track) => {
                let _ = self.track_tx.send(track);
                None
            }
        }
    }

    async fn flush_buffered_candidates(&mut self) {
        self.remote_description_set = true;
        for candidate in std::mem::take(&mut self.buffered_candidates) {
            if let Err(e) = self.negotiator.add_candidate(candidate).await {
                warn!("Failed to apply buffered candidate: {e}");
            }
        }
    }

    fn peer_matches(&self, participant: &Participant) -> bool {
        // A callee started from a pending offer may not know the peer's
        // name yet; the room holds at most one other member, so any
        // leave is theirs.
        match &self.peer_username {
            Some(name) => *name == participant.username,
            None => true,
        }
    }

    fn set_phase(&self, phase: CallPhase) {
        debug!("Call phase: {phase}");
        self.phase_tx.send_replace(phase);
    }
}

async fn wait_deadline(deadline: &mut LeaveDeadline) {
    match deadline.as_mut() {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}
