use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("relay rejected the connection: {0}")]
    Rejected(String),

    #[error("relay unreachable: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("invalid relay url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("connect timed out after {0:?}")]
    Timeout(std::time::Duration),
}
