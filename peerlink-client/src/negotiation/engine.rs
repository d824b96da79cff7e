use crate::negotiation::NegotiationError;
use async_trait::async_trait;
use peerlink_core::{IceCandidate, SessionDescription};
use tokio::sync::mpsc;

/// Engine-level ICE connectivity states, mapped to user-facing call
/// phases by the call orchestrator.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IceConnectionState {
    New,
    Checking,
    Connected,
    Completed,
    Failed,
    Disconnected,
    Closed,
}

/// Opaque handle to a remote media track surfaced by the engine.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TrackInfo {
    pub id: String,
    pub kind: String,
}

/// Locally observed engine events for one peer-connection session.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    CandidateGenerated(IceCandidate),
    ConnectionStateChanged(IceConnectionState),
    RemoteTrackReceived(TrackInfo),
}

/// Factory seam to the media engine. Each call opens a fresh session;
/// sessions are never reused across calls.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    async fn open_session(
        &self,
    ) -> Result<(Box<dyn PeerSession>, mpsc::UnboundedReceiver<EngineEvent>), NegotiationError>;
}

/// One underlying peer connection. All operations are suspension points
/// and must be serialized by the owning coordinator.
#[async_trait]
pub trait PeerSession: Send + Sync {
    /// Generate a local offer and atomically commit it as the local
    /// description.
    async fn create_offer(&self) -> Result<SessionDescription, NegotiationError>;

    /// Symmetric to `create_offer`; valid only after a remote offer has
    /// been applied.
    async fn create_answer(&self) -> Result<SessionDescription, NegotiationError>;

    async fn set_remote_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), NegotiationError>;

    /// Apply one remote candidate. Callers must not invoke this before a
    /// remote description exists.
    async fn add_candidate(&self, candidate: IceCandidate) -> Result<(), NegotiationError>;

    /// Begin local capture. Calling while already capturing is a no-op.
    async fn start_capture(&self) -> Result<(), NegotiationError>;

    /// Release the peer connection. Ends the engine event stream.
    async fn close(&self);
}
