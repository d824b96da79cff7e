mod signaling_transport;
mod subscribers;
mod transport_error;
mod transport_event;
mod ws_transport;

pub use signaling_transport::*;
pub use subscribers::*;
pub use transport_error::*;
pub use transport_event::*;
pub use ws_transport::*;
