use crate::transport::{
    ConnectError, EventStream, InboundEvent, OutboundEvent, SignalingTransport, Subscribers,
};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use peerlink_core::{ConnectParams, SignalMessage};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct WsTransportConfig {
    /// Relay endpoint, e.g. `ws://127.0.0.1:3000/socket`.
    pub url: String,
    pub connect_timeout: Duration,
}

impl Default for WsTransportConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:3000/socket".to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

struct ActiveConnection {
    out_tx: mpsc::UnboundedSender<SignalMessage>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

/// WebSocket client to the relay. One live connection at most; a second
/// `connect` tears the first one down rather than multiplexing.
pub struct WsSignalingTransport {
    config: WsTransportConfig,
    subscribers: Subscribers,
    conn: Mutex<Option<ActiveConnection>>,
}

impl WsSignalingTransport {
    pub fn new(config: WsTransportConfig) -> Self {
        Self {
            config,
            subscribers: Subscribers::new(),
            conn: Mutex::new(None),
        }
    }

    fn room_url(&self, params: &ConnectParams) -> Result<Url, ConnectError> {
        let mut url = Url::parse(&self.config.url)?;
        url.query_pairs_mut()
            .append_pair("roomId", &params.room_id.to_string())
            .append_pair("username", &params.username)
            .append_pair("isCaller", if params.role.is_caller() { "true" } else { "false" });
        Ok(url)
    }

    fn teardown(&self, conn: ActiveConnection) {
        conn.reader.abort();
        conn.writer.abort();
        self.subscribers.broadcast(InboundEvent::Disconnected);
        self.subscribers.finish_all();
    }
}

#[async_trait]
impl SignalingTransport for WsSignalingTransport {
    async fn connect(&self, params: ConnectParams) -> Result<(), ConnectError> {
        let mut conn = self.conn.lock().await;
        if let Some(prior) = conn.take() {
            info!("Tearing down prior relay connection before reconnect");
            self.teardown(prior);
        }

        let url = self.room_url(&params)?;
        info!(room = %params.room_id, username = %params.username, "Connecting to relay");

        let (socket, _) =
            tokio::time::timeout(self.config.connect_timeout, connect_async(url.as_str()))
                .await
                .map_err(|_| ConnectError::Timeout(self.config.connect_timeout))??;

        let (mut sink, mut stream) = socket.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<SignalMessage>();

        let writer = tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                match serde_json::to_string(&msg) {
                    Ok(json) => {
                        if let Err(e) = sink.send(Message::Text(json)).await {
                            warn!("Relay send failed: {e}");
                            break;
                        }
                    }
                    Err(e) => warn!("Failed to serialize signal message: {e}"),
                }
            }
        });

        let subscribers = self.subscribers.clone();
        let reader = tokio::spawn(async move {
            while let Some(msg) = stream.next().await {
                match msg {
                    Ok(Message::Text(text)) => match serde_json::from_str::<SignalMessage>(&text) {
                        Ok(signal) => subscribers.broadcast(InboundEvent::from(signal)),
                        // Malformed payloads are dropped, never fatal.
                        Err(e) => warn!("Invalid signal payload: {e}"),
                    },
                    Ok(Message::Close(_)) => {
                        info!("Relay closed the connection");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Relay stream error: {e}");
                        break;
                    }
                }
            }
            subscribers.broadcast(InboundEvent::Disconnected);
            subscribers.finish_all();
        });

        *conn = Some(ActiveConnection {
            out_tx,
            reader,
            writer,
        });

        self.subscribers.broadcast(InboundEvent::Connected);
        Ok(())
    }

    async fn disconnect(&self) {
        let mut conn = self.conn.lock().await;
        let Some(active) = conn.take() else {
            return;
        };
        info!("Disconnecting from relay");
        self.teardown(active);
    }

    fn events(&self) -> EventStream {
        self.subscribers.subscribe()
    }

    async fn send(&self, event: OutboundEvent) {
        let conn = self.conn.lock().await;
        match conn.as_ref() {
            Some(active) => {
                let msg = SignalMessage::from(event);
                if active.out_tx.send(msg).is_err() {
                    warn!("Relay writer is gone; dropping outbound event");
                }
            }
            None => debug!("send while disconnected; dropping outbound event"),
        }
    }
}
