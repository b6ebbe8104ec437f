mod runner;
mod state;
mod system;
mod types;

pub use crossbeam_channel::Receiver;
pub use state::FrameSnapshot;
pub use system::EntertainmentSystem;
pub use types::{RuntimeConfig, RuntimeError, RuntimeEvent};
