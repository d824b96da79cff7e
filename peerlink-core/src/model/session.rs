use serde::{Deserialize, Serialize};

/// SDP description kind, spelled on the wire the way the relay expects.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
pub enum SdpType {
    #[serde(rename = "offer")]
    Offer,
    #[serde(rename = "answer")]
    Answer,
    #[serde(rename = "pranswer")]
    ProvisionalAnswer,
    #[serde(rename = "rollback")]
    Rollback,
}

/// Session description exchanged during negotiation. The `sdp` payload is
/// opaque: it is relayed unmodified and only `kind` drives protocol branching.
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpType,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpType::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpType::Answer,
            sdp: sdp.into(),
        }
    }
}

/// One discovered network path, opaque to everything but the media engine.
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(rename = "sdpMid")]
    pub sdp_mid: Option<String>,
    #[serde(rename = "sdpMLineIndex")]
    pub sdp_m_line_index: u16,
}
