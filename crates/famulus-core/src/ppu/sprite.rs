use bitflags::bitflags;

bitflags! {
    /// OAM byte 2.
    ///
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// V H P . . . p p
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub(crate) struct SpriteAttributes: u8 {
        const PALETTE = 0b0000_0011;
        /// Behind opaque background pixels.
        const PRIORITY_BEHIND_BACKGROUND = 0b0010_0000;
        const FLIP_HORIZONTAL = 0b0100_0000;
        const FLIP_VERTICAL = 0b1000_0000;
    }
}

/// Bits 2-4 of the attribute byte do not exist in OAM and read back as 0.
pub(crate) const ATTRIBUTE_READ_MASK: u8 = 0xE3;

/// One OAM entry as copied into secondary OAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct Sprite {
    /// Top row minus one.
    pub(crate) y: u8,
    pub(crate) tile: u8,
    pub(crate) attributes: SpriteAttributes,
    pub(crate) x: u8,
}

impl Sprite {
    pub(crate) const BYTES: usize = 4;

    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            y: bytes[0],
            tile: bytes[1],
            attributes: SpriteAttributes::from_bits_retain(bytes[2]),
            x: bytes[3],
        }
    }

    /// Row of the sprite drawn on the scanline after `scanline`, if any.
    pub(crate) fn row_on_next_line(y: u8, scanline: i16, height: i16) -> Option<i16> {
        let row = scanline - i16::from(y);
        (0..height).contains(&row).then_some(row)
    }

    /// Pattern address of `row` (0..height, before flipping) for this sprite.
    pub(crate) fn pattern_addr(&self, row: i16, height: i16, table_8x8: u16) -> u16 {
        let row = if self.attributes.contains(SpriteAttributes::FLIP_VERTICAL) {
            height - 1 - row
        } else {
            row
        } as u16;

        if height == 16 {
            // Tile bit 0 picks the table; the pair is `tile & $FE` and the next one.
            let table = u16::from(self.tile & 1) << 12;
            let tile = u16::from(self.tile & 0xFE) + (row >> 3);
            table | (tile << 4) | (row & 7)
        } else {
            table_8x8 | (u16::from(self.tile) << 4) | row
        }
    }
}
