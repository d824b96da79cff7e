use crate::transport::{EventStream, InboundEvent};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Broadcast list behind a lock: registration can race with delivery, so
/// both go through the same mutex.
#[derive(Clone, Default)]
pub struct Subscribers {
    inner: Arc<Mutex<Vec<mpsc::UnboundedSender<InboundEvent>>>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> EventStream {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut list) = self.inner.lock() {
            list.push(tx);
        }
        rx
    }

    /// Deliver one event to every live subscriber, pruning dropped ones.
    pub fn broadcast(&self, event: InboundEvent) {
        if let Ok(mut list) = self.inner.lock() {
            list.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }

    /// Signal end-of-stream to every subscriber. Each receiver sees `None`
    /// exactly once; a finished stream is never revived.
    pub fn finish_all(&self) {
        if let Ok(mut list) = self.inner.lock() {
            list.clear();
        }
    }
}
