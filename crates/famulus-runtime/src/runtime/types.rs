use famulus_core::error::Error as CartridgeError;

pub(crate) const DEFAULT_EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Bound of the event channel. Events are dropped while it is full.
    pub event_capacity: usize,
    /// Emit [`RuntimeEvent::InstructionStepped`] for every instruction the
    /// worker thread runs, not just for manual steps.
    pub trace_instructions: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
            trace_instructions: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// The PPU entered vblank; the snapshot holds the finished frame.
    FrameReady { frame: u64 },
    InstructionStepped { pc: u16, cycles: u64 },
    /// The worker thread left its loop.
    Stopped { frame: u64 },
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("failed to load cartridge: {0}")]
    Cartridge(#[from] CartridgeError),
    #[error("failed to spawn the emulation thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("the emulation thread panicked; the console was power-cycled")]
    WorkerPanicked,
    #[error("the console is running; stop it first")]
    Running,
}
