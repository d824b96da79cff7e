use peerlink_core::{IceCandidate, Participant, SessionDescription, SignalMessage};

/// Events observed on the relay channel, in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Connected,
    Disconnected,
    Error(String),
    ParticipantJoined(Participant),
    ParticipantLeft(Participant),
    OfferReceived(SessionDescription),
    AnswerReceived(SessionDescription),
    CandidateReceived(IceCandidate),
}

/// Client-originated relay messages. Fire-and-forget; the transport gives
/// no delivery guarantee beyond its own retries.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    Offer(SessionDescription),
    Answer(SessionDescription),
    Candidate(IceCandidate),
}

impl From<OutboundEvent> for SignalMessage {
    fn from(event: OutboundEvent) -> Self {
        match event {
            OutboundEvent::Offer(desc) => SignalMessage::Offer(desc),
            OutboundEvent::Answer(desc) => SignalMessage::Answer(desc),
            OutboundEvent::Candidate(candidate) => SignalMessage::Candidate(candidate),
        }
    }
}

impl From<SignalMessage> for InboundEvent {
    fn from(msg: SignalMessage) -> Self {
        match msg {
            SignalMessage::RoomUserJoined {
                username,
                is_caller,
            } => InboundEvent::ParticipantJoined(Participant::new(username, is_caller.into())),
            SignalMessage::RoomUserLeft {
                username,
                is_caller,
            } => InboundEvent::ParticipantLeft(Participant::new(username, is_caller.into())),
            SignalMessage::Offer(desc) => InboundEvent::OfferReceived(desc),
            SignalMessage::Answer(desc) => InboundEvent::AnswerReceived(desc),
            SignalMessage::Candidate(candidate) => InboundEvent::CandidateReceived(candidate),
            SignalMessage::Error { message } => InboundEvent::Error(message),
        }
    }
}
