use super::VramAddr;

/// `v`, `t`, fine X and the shared `$2005`/`$2006` write toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct VramRegisters {
    pub(crate) v: VramAddr,
    pub(crate) t: VramAddr,
    /// Fine X scroll (0..=7).
    pub(crate) x: u8,
    /// `false` before the first write of a pair.
    pub(crate) w: bool,
}

impl VramRegisters {
    /// PPUSCROLL: X on the first write, Y on the second.
    pub(crate) fn write_scroll(&mut self, value: u8) {
        if self.w {
            self.t.set_coarse_y(value >> 3);
            self.t.set_fine_y(value & 0b111);
        } else {
            self.t.set_coarse_x(value >> 3);
            self.x = value & 0b111;
        }
        self.w = !self.w;
    }

    /// PPUADDR: high six bits first, then the low byte. The second write
    /// copies `t` into `v`.
    pub(crate) fn write_addr(&mut self, value: u8) {
        if self.w {
            self.t.set_raw((self.t.raw() & 0x7F00) | u16::from(value));
            self.v = self.t;
        } else {
            // Bit 14 is cleared by the first write.
            self.t.set_raw((u16::from(value & 0x3F) << 8) | (self.t.raw() & 0x00FF));
        }
        self.w = !self.w;
    }

    pub(crate) fn reset_latch(&mut self) {
        self.w = false;
    }
}
