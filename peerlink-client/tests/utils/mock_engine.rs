use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use peerlink_client::{EngineEvent, MediaEngine, NegotiationError, PeerSession};
use peerlink_core::{IceCandidate, SessionDescription};

/// One recorded operation on a [`MockPeerSession`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOp {
    CreateOffer,
    CreateAnswer,
    SetRemoteDescription(SessionDescription),
    AddCandidate(IceCandidate),
    StartCapture,
    Close,
}

/// Mock peer session that records every operation and lets tests emit
/// engine events into the session's event stream.
pub struct MockPeerSession {
    ops: Mutex<Vec<SessionOp>>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
    close_count: AtomicUsize,
    fail_offer: bool,
}

impl MockPeerSession {
    /// Operations recorded so far, in call order.
    pub fn ops(&self) -> Vec<SessionOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }

    /// Emit one engine event, as if the underlying engine had produced it.
    pub fn emit(&self, event: EngineEvent) {
        tracing::debug!("[MockSession] emit {:?}", event);
        let _ = self.event_tx.send(event);
    }

    fn record(&self, op: SessionOp) {
        self.ops.lock().unwrap().push(op);
    }
}

/// The boxed handle actually given to the crate; keeps the session
/// inspectable from the test afterwards.
struct MockSessionHandle(Arc<MockPeerSession>);

#[async_trait]
impl PeerSession for MockSessionHandle {
    async fn create_offer(&self) -> Result<SessionDescription, NegotiationError> {
        self.0.record(SessionOp::CreateOffer);
        if self.0.fail_offer {
            return Err(NegotiationError::DescriptionGenerationFailed);
        }
        Ok(SessionDescription::offer("mock-offer-sdp"))
    }

    async fn create_answer(&self) -> Result<SessionDescription, NegotiationError> {
        self.0.record(SessionOp::CreateAnswer);
        Ok(SessionDescription::answer("mock-answer-sdp"))
    }

    async fn set_remote_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), NegotiationError> {
        self.0.record(SessionOp::SetRemoteDescription(desc));
        Ok(())
    }

    async fn add_candidate(&self, candidate: IceCandidate) -> Result<(), NegotiationError> {
        self.0.record(SessionOp::AddCandidate(candidate));
        Ok(())
    }

    async fn start_capture(&self) -> Result<(), NegotiationError> {
        self.0.record(SessionOp::StartCapture);
        Ok(())
    }

    async fn close(&self) {
        self.0.record(SessionOp::Close);
        self.0.close_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Mock MediaEngine: hands out [`MockPeerSession`]s and keeps them for
/// inspection.
pub struct MockMediaEngine {
    sessions: Mutex<Vec<Arc<MockPeerSession>>>,
    fail_offer: AtomicBool,
}

impl MockMediaEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sessions: Mutex::new(Vec::new()),
            fail_offer: AtomicBool::new(false),
        })
    }

    /// Make offers fail on every session opened after this call.
    pub fn fail_offers(&self) {
        self.fail_offer.store(true, Ordering::SeqCst);
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// The most recently opened session. Panics if none was opened.
    pub fn last_session(&self) -> Arc<MockPeerSession> {
        self.sessions
            .lock()
            .unwrap()
            .last()
            .expect("no session was opened")
            .clone()
    }
}

#[async_trait]
impl MediaEngine for MockMediaEngine {
    async fn open_session(
        &self,
    ) -> Result<(Box<dyn PeerSession>, mpsc::UnboundedReceiver<EngineEvent>), NegotiationError>
    {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let session = Arc::new(MockPeerSession {
            ops: Mutex::new(Vec::new()),
            event_tx,
            close_count: AtomicUsize::new(0),
            fail_offer: self.fail_offer.load(Ordering::SeqCst),
        });
        self.sessions.lock().unwrap().push(session.clone());
        Ok((Box::new(MockSessionHandle(session)), event_rx))
    }
}
