mod call_config;
mod call_handle;
mod call_orchestrator;
mod call_phase;

pub use call_config::*;
pub use call_handle::*;
pub use call_orchestrator::*;
pub use call_phase::*;
