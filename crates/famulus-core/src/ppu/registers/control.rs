use bitflags::bitflags;

use crate::memory::ppu as ppu_mem;

bitflags! {
    /// PPUCTRL (`$2000`).
    ///
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// V P H B S I N N
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub(crate) struct Control: u8 {
        /// Base nametable; copied into `t` bits 10-11 on write.
        const NAMETABLE = 0b0000_0011;
        /// PPUDATA steps by 32 (down a row) instead of 1.
        const INCREMENT_32 = 0b0000_0100;
        /// 8x8 sprites use the pattern table at `$1000`.
        const SPRITE_TABLE = 0b0000_1000;
        /// Background uses the pattern table at `$1000`.
        const BACKGROUND_TABLE = 0b0001_0000;
        const SPRITE_SIZE_16 = 0b0010_0000;
        /// EXT pin direction. Unused on a stock console.
        const MASTER_SLAVE = 0b0100_0000;
        /// Raise NMI when vblank starts.
        const GENERATE_NMI = 0b1000_0000;
    }
}

impl Control {
    pub(crate) fn nametable_index(self) -> u8 {
        self.bits() & Control::NAMETABLE.bits()
    }

    pub(crate) fn vram_increment(self) -> u16 {
        if self.contains(Control::INCREMENT_32) {
            32
        } else {
            1
        }
    }

    /// Pattern table for 8x8 sprites. 8x16 sprites pick theirs from the tile index.
    pub(crate) fn sprite_pattern_table(self) -> u16 {
        if self.contains(Control::SPRITE_TABLE) {
            ppu_mem::PATTERN_TABLE_1
        } else {
            ppu_mem::PATTERN_TABLE_0
        }
    }

    pub(crate) fn background_pattern_table(self) -> u16 {
        if self.contains(Control::BACKGROUND_TABLE) {
            ppu_mem::PATTERN_TABLE_1
        } else {
            ppu_mem::PATTERN_TABLE_0
        }
    }

    pub(crate) fn sprite_height(self) -> i16 {
        if self.contains(Control::SPRITE_SIZE_16) {
            16
        } else {
            8
        }
    }

    pub(crate) fn nmi_enabled(self) -> bool {
        self.contains(Control::GENERATE_NMI)
    }
}
