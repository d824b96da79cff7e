use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CallConfig {
    /// How long to keep processing in-flight signaling after the peer
    /// leaves before tearing the call down. A policy choice, not a
    /// protocol requirement.
    pub leave_grace: Duration,
    /// Whether an ICE `Disconnected` state ends the call like a hangup
    /// (the behavior observed in production) or only `Failed` does.
    pub end_on_ice_disconnect: bool,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            leave_grace: Duration::from_secs(1),
            end_on_ice_disconnect: true,
        }
    }
}
