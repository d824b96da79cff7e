mod room_command;
mod room_coordinator;
mod room_error;
mod room_handle;
mod room_state;

pub use room_command::*;
pub use room_coordinator::*;
pub use room_error::*;
pub use room_handle::*;
pub use room_state::*;
