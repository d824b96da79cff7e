use thiserror::Error;

#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("media engine not initialized or already closed")]
    EngineUnavailable,

    #[error("engine produced no session description")]
    DescriptionGenerationFailed,

    #[error("description kind not applicable here")]
    UnsupportedDescription,

    #[error("engine error: {0}")]
    Engine(String),
}

impl From<webrtc::Error> for NegotiationError {
    fn from(e: webrtc::Error) -> Self {
        NegotiationError::Engine(e.to_string())
    }
}
