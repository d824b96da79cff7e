mod engine;
mod negotiation_error;
mod negotiator;
mod webrtc_session;

pub use engine::*;
pub use negotiation_error::*;
pub use negotiator::*;
pub use webrtc_session::*;
