use crate::transport::{ConnectError, InboundEvent, OutboundEvent};
use async_trait::async_trait;
use peerlink_core::ConnectParams;
use tokio::sync::mpsc;

/// One subscriber's view of the relay channel. Replay-none: events observed
/// before subscription are never delivered. The stream ends when the
/// transport disconnects.
pub type EventStream = mpsc::UnboundedReceiver<InboundEvent>;

/// Seam to the relay. `send` must be safe for concurrent fire-and-forget
/// use from the room coordinator and an active call at the same time.
#[async_trait]
pub trait SignalingTransport: Send + Sync {
    /// Attach to a room. Tears down any prior connection first; never
    /// multiplexes two connections.
    async fn connect(&self, params: ConnectParams) -> Result<(), ConnectError>;

    /// Idempotent. Ends every live event stream so listeners terminate.
    async fn disconnect(&self);

    /// Fan-out subscription covering events from this moment forward.
    fn events(&self) -> EventStream;

    /// Fire-and-forget send; failures are logged, not surfaced.
    async fn send(&self, event: OutboundEvent);
}
