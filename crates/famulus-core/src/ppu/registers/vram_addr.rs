use bitflags::bitflags;

use crate::memory::ppu as ppu_mem;

// 14 13 12 11 10 9 8 7 6 5 4 3 2 1 0
//  y  y  y  N  N Y Y Y Y Y X X X X X
bitflags! {
    /// Fields of the 15-bit `v`/`t` scroll address.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct VramAddrMask: u16 {
        const COARSE_X = 0x001F;
        const COARSE_Y = 0x03E0;
        const NAMETABLE_X = 0x0400;
        const NAMETABLE_Y = 0x0800;
        const FINE_Y = 0x7000;

        const NAMETABLE = Self::NAMETABLE_X.bits() | Self::NAMETABLE_Y.bits();
        /// Bits copied from `t` at dot 257.
        const HORIZONTAL = Self::COARSE_X.bits() | Self::NAMETABLE_X.bits();
        /// Bits copied from `t` during dots 280-304 of the pre-render line.
        const VERTICAL = Self::COARSE_Y.bits() | Self::NAMETABLE_Y.bits() | Self::FINE_Y.bits();
        const ALL = 0x7FFF;
    }
}

const COARSE_Y_SHIFT: u16 = 5;
const NAMETABLE_SHIFT: u16 = 10;
const FINE_Y_SHIFT: u16 = 12;

/// Loopy scroll address (`v` or `t`).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct VramAddr(u16);

impl VramAddr {
    pub fn new(raw: u16) -> Self {
        Self(raw & VramAddrMask::ALL.bits())
    }

    #[inline]
    pub fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn set_raw(&mut self, raw: u16) {
        self.0 = raw & VramAddrMask::ALL.bits();
    }

    #[inline]
    pub fn coarse_x(self) -> u8 {
        (self.0 & VramAddrMask::COARSE_X.bits()) as u8
    }

    #[inline]
    pub fn set_coarse_x(&mut self, cx: u8) {
        self.0 = (self.0 & !VramAddrMask::COARSE_X.bits()) | u16::from(cx & 0x1F);
    }

    #[inline]
    pub fn coarse_y(self) -> u8 {
        ((self.0 & VramAddrMask::COARSE_Y.bits()) >> COARSE_Y_SHIFT) as u8
    }

    #[inline]
    pub fn set_coarse_y(&mut self, cy: u8) {
        self.0 = (self.0 & !VramAddrMask::COARSE_Y.bits()) | (u16::from(cy & 0x1F) << COARSE_Y_SHIFT);
    }

    #[inline]
    pub fn set_nametable(&mut self, nt: u8) {
        self.0 = (self.0 & !VramAddrMask::NAMETABLE.bits()) | (u16::from(nt & 0b11) << NAMETABLE_SHIFT);
    }

    #[inline]
    pub fn fine_y(self) -> u8 {
        ((self.0 & VramAddrMask::FINE_Y.bits()) >> FINE_Y_SHIFT) as u8
    }

    #[inline]
    pub fn set_fine_y(&mut self, fy: u8) {
        self.0 = (self.0 & !VramAddrMask::FINE_Y.bits()) | (u16::from(fy & 0b111) << FINE_Y_SHIFT);
    }

    /// PPUDATA step. The full 15 bits wrap; only the bus address is mirrored.
    #[inline]
    pub fn increment(&mut self, step: u16) {
        self.0 = self.0.wrapping_add(step) & VramAddrMask::ALL.bits();
    }

    /// Address presented on the 14-bit PPU bus.
    #[inline]
    pub fn bus_addr(self) -> u16 {
        self.0 & ppu_mem::VRAM_MIRROR_MASK
    }

    /// Nametable byte for the tile `v` points at.
    pub fn tile_addr(self) -> u16 {
        ppu_mem::NAMETABLE_BASE | (self.0 & 0x0FFF)
    }

    /// Attribute byte covering the tile `v` points at.
    pub fn attribute_addr(self) -> u16 {
        ppu_mem::NAMETABLE_BASE
            | ppu_mem::ATTRIBUTE_OFFSET
            | (self.0 & VramAddrMask::NAMETABLE.bits())
            | (u16::from(self.coarse_y() >> 2) << 3)
            | u16::from(self.coarse_x() >> 2)
    }

    /// Bit offset of this tile's 2-bit palette inside its attribute byte.
    pub fn attribute_shift(self) -> u8 {
        ((self.coarse_y() & 0b10) << 1) | (self.coarse_x() & 0b10)
    }

    /// Coarse X step, spilling into the horizontal nametable bit.
    pub fn increment_x(&mut self) {
        if self.coarse_x() == 31 {
            self.set_coarse_x(0);
            self.0 ^= VramAddrMask::NAMETABLE_X.bits();
        } else {
            self.0 += 1;
        }
    }

    /// Fine Y step. Row 29 wraps into the next nametable; rows 30-31 (the
    /// attribute area) wrap to 0 without switching.
    pub fn increment_y(&mut self) {
        let fine_y = self.fine_y();
        if fine_y < 7 {
            self.set_fine_y(fine_y + 1);
            return;
        }
        self.set_fine_y(0);
        match self.coarse_y() {
            29 => {
                self.set_coarse_y(0);
                self.0 ^= VramAddrMask::NAMETABLE_Y.bits();
            }
            31 => self.set_coarse_y(0),
            cy => self.set_coarse_y(cy + 1),
        }
    }

    pub fn copy_horizontal(&mut self, t: VramAddr) {
        let mask = VramAddrMask::HORIZONTAL.bits();
        self.0 = (self.0 & !mask) | (t.0 & mask);
    }

    pub fn copy_vertical(&mut self, t: VramAddr) {
        let mask = VramAddrMask::VERTICAL.bits();
        self.0 = (self.0 & !mask) | (t.0 & mask);
    }
}

impl core::fmt::Debug for VramAddr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VramAddr")
            .field("raw", &format_args!("{:#06X}", self.0))
            .field("fine_y", &self.fine_y())
            .field("coarse_y", &self.coarse_y())
            .field("coarse_x", &self.coarse_x())
            .finish()
    }
}

impl From<u16> for VramAddr {
    fn from(raw: u16) -> Self {
        VramAddr::new(raw)
    }
}
