//! CPU-visible PPU register file and the internal `v/t/x/w` latches.

mod control;
mod mask;
mod status;
mod vram_addr;
mod vram_registers;

pub(crate) use control::Control;
pub(crate) use mask::Mask;
pub(crate) use status::Status;
pub use vram_addr::VramAddr;
pub(crate) use vram_registers::VramRegisters;

use crate::mem_block::ppu::OamRam;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Registers {
    pub(crate) control: Control,
    pub(crate) mask: Mask,
    pub(crate) status: Status,
    pub(crate) oam_addr: u8,
    /// Primary OAM: 64 sprites of 4 bytes.
    pub(crate) oam: OamRam,
    pub(crate) vram: VramRegisters,
    /// Delayed `$2007` read buffer.
    pub(crate) read_buffer: u8,
    /// Last value seen on the CPU/PPU data lines. Write-only registers and the
    /// undriven low bits of `$2002` read back from here.
    pub(crate) io_latch: u8,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    pub(crate) fn new() -> Self {
        Self {
            control: Control::default(),
            mask: Mask::default(),
            status: Status::default(),
            oam_addr: 0,
            oam: OamRam::new(),
            vram: VramRegisters::default(),
            read_buffer: 0,
            io_latch: 0,
        }
    }

    /// Reset button: PPUCTRL, PPUMASK, the scroll latches and the read buffer
    /// clear. OAM, status and `v` survive.
    pub(crate) fn soft_reset(&mut self) {
        self.control = Control::empty();
        self.mask = Mask::empty();
        self.vram.t = VramAddr::default();
        self.vram.x = 0;
        self.vram.w = false;
        self.read_buffer = 0;
    }

    /// PPUCTRL also feeds the nametable select into `t`.
    pub(crate) fn write_control(&mut self, value: u8) {
        self.control = Control::from_bits_retain(value);
        self.vram.t.set_nametable(self.control.nametable_index());
    }
}
