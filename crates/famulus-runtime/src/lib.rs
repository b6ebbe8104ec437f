pub mod runtime;

pub use runtime::{
    EntertainmentSystem, FrameSnapshot, Receiver, RuntimeConfig, RuntimeError, RuntimeEvent,
};
