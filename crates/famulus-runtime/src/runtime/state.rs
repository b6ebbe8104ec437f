use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use famulus_core::{CpuSnapshot, Nes, ppu::buffer::FRAME_LEN};
use parking_lot::Mutex;

/// Last published frame and the CPU registers at that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub cpu: CpuSnapshot,
    /// 256x240 palette indices.
    pub pixels: Vec<u8>,
}

impl Default for FrameSnapshot {
    fn default() -> Self {
        Self {
            frame: 0,
            cpu: CpuSnapshot::default(),
            pixels: vec![0; FRAME_LEN],
        }
    }
}

/// Shared between the owner and the worker thread.
pub(crate) struct SharedState {
    pub(crate) stop: AtomicBool,
    pub(crate) pad_masks: [AtomicU8; 2],
    pub(crate) snapshot: Mutex<FrameSnapshot>,
}

impl SharedState {
    pub(crate) fn new() -> Self {
        Self {
            stop: AtomicBool::new(false),
            pad_masks: std::array::from_fn(|_| AtomicU8::new(0)),
            snapshot: Mutex::new(FrameSnapshot::default()),
        }
    }

    pub(crate) fn apply_pads(&self, nes: &mut Nes) {
        for (port, mask) in self.pad_masks.iter().enumerate() {
            nes.set_buttons(port, mask.load(Ordering::Acquire));
        }
    }

    pub(crate) fn publish_frame(&self, nes: &Nes) {
        let mut snapshot = self.snapshot.lock();
        snapshot.frame = nes.frame_count();
        snapshot.cpu = nes.cpu_snapshot();
        snapshot.pixels.copy_from_slice(nes.render_buffer());
    }

    pub(crate) fn publish_cpu(&self, nes: &Nes) {
        self.snapshot.lock().cpu = nes.cpu_snapshot();
    }
}
