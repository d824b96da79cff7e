use std::fmt;

/// Call-level state, one watch update per transition. The `Display`
/// strings are for humans; only the variant identity is contractual.
#[derive(Debug, Clone, PartialEq)]
pub enum CallPhase {
    Idle,
    CreatingOffer,
    OfferSent,
    WaitingForAnswer,
    ApplyingAnswer,
    WaitingForOffer,
    ApplyingOffer,
    CreatingAnswer,
    AnswerSent,
    Negotiating,
    Connected,
    PeerDisconnected,
    Ended,
    Failed(String),
}

impl CallPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallPhase::Ended | CallPhase::Failed(_))
    }
}

impl fmt::Display for CallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallPhase::Idle => write!(f, "Starting..."),
            CallPhase::CreatingOffer => write!(f, "Creating offer..."),
            CallPhase::OfferSent => write!(f, "Offer sent"),
            CallPhase::WaitingForAnswer => write!(f, "Waiting for answer..."),
            CallPhase::ApplyingAnswer => write!(f, "Answer received, setting up..."),
            CallPhase::WaitingForOffer => write!(f, "Waiting for offer..."),
            CallPhase::ApplyingOffer => write!(f, "Offer received, connecting..."),
            CallPhase::CreatingAnswer => write!(f, "Creating answer..."),
            CallPhase::AnswerSent => write!(f, "Answer sent"),
            CallPhase::Negotiating => write!(f, "Connecting..."),
            CallPhase::Connected => write!(f, "Connected"),
            CallPhase::PeerDisconnected => write!(f, "Peer disconnected"),
            CallPhase::Ended => write!(f, "Call ended"),
            CallPhase::Failed(reason) => write!(f, "Error: {reason}"),
        }
    }
}

/// How a finished call reported back to the room coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    Ended,
    Failed(String),
}
