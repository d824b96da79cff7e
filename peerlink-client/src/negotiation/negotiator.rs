use crate::negotiation::{EngineEvent, MediaEngine, NegotiationError, PeerSession};
use peerlink_core::{IceCandidate, SessionDescription};
use tokio::sync::mpsc;
use tracing::debug;

/// Drives offer/answer creation and candidate application against one
/// engine session. Lives for exactly one call attempt: created when the
/// call starts, closed when it ends. Buffering of early remote candidates
/// belongs to the call orchestrator, not here.
pub struct SessionNegotiator {
    session: Box<dyn PeerSession>,
    closed: bool,
}

impl SessionNegotiator {
    /// Open a fresh engine session. The returned receiver is the
    /// single-consumer stream of engine events for this call.
    pub async fn open(
        engine: &dyn MediaEngine,
    ) -> Result<(Self, mpsc::UnboundedReceiver<EngineEvent>), NegotiationError> {
        let (session, events) = engine.open_session().await?;
        Ok((
            Self {
                session,
                closed: false,
            },
            events,
        ))
    }

    pub async fn create_offer(&self) -> Result<SessionDescription, NegotiationError> {
        self.live()?;
        self.session.create_offer().await
    }

    pub async fn create_answer(&self) -> Result<SessionDescription, NegotiationError> {
        self.live()?;
        self.session.create_answer().await
    }

    pub async fn set_remote_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), NegotiationError> {
        self.live()?;
        self.session.set_remote_description(desc).await
    }

    pub async fn add_candidate(&self, candidate: IceCandidate) -> Result<(), NegotiationError> {
        self.live()?;
        self.session.add_candidate(candidate).await
    }

    pub async fn start_capture(&self) -> Result<(), NegotiationError> {
        self.live()?;
        self.session.start_capture().await
    }

    /// Safe to call any number of times; the underlying session is
    /// released (and its event stream ended) exactly once.
    pub async fn close(&mut self) {
        if self.closed {
            debug!("Negotiator already closed");
            return;
        }
        self.closed = true;
        self.session.close().await;
    }

    fn live(&self) -> Result<(), NegotiationError> {
        if self.closed {
            return Err(NegotiationError::EngineUnavailable);
        }
        Ok(())
    }
}
