use super::sprite::SpriteAttributes;
use crate::mem_block::MemBlock;

pub(crate) const SPRITES_PER_LINE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
struct SpriteSlot {
    /// Bitplanes, already reversed for horizontally flipped sprites so the
    /// MSB is always the next pixel.
    pattern_low: u8,
    pattern_high: u8,
    attributes: SpriteAttributes,
    /// Dots left before the sprite starts shifting out.
    x_counter: u8,
    sprite0: bool,
}

/// What the sprite layer offers for the current dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub(crate) struct SpritePixel {
    pub(crate) palette: u8,
    /// 0 is transparent.
    pub(crate) color: u8,
    pub(crate) behind_background: bool,
    pub(crate) sprite0: bool,
}

impl SpritePixel {
    pub(crate) fn is_opaque(&self) -> bool {
        self.color != 0
    }
}

/// One fetched sprite row handed from the fetch phase to the shifters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct SpriteRow {
    pub(crate) attributes: SpriteAttributes,
    pub(crate) x: u8,
    pub(crate) pattern_low: u8,
    pub(crate) pattern_high: u8,
}

/// The eight sprite output units of the current scanline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub(crate) struct SpritePipeline {
    slots: MemBlock<SpriteSlot, SPRITES_PER_LINE>,
    active: usize,
}

impl SpritePipeline {
    pub(crate) fn clear(&mut self) {
        self.slots.fill(SpriteSlot::default());
        self.active = 0;
    }

    /// Loads the rows fetched during dots 257-320. `sprite0` marks slot 0 as
    /// OAM sprite 0.
    pub(crate) fn load(&mut self, rows: &[SpriteRow], sprite0: bool) {
        self.clear();
        self.active = rows.len().min(SPRITES_PER_LINE);
        for (i, (slot, row)) in self.slots.iter_mut().zip(rows).enumerate() {
            let (low, high) = if row.attributes.contains(SpriteAttributes::FLIP_HORIZONTAL) {
                (row.pattern_low.reverse_bits(), row.pattern_high.reverse_bits())
            } else {
                (row.pattern_low, row.pattern_high)
            };
            *slot = SpriteSlot {
                pattern_low: low,
                pattern_high: high,
                attributes: row.attributes,
                x_counter: row.x,
                sprite0: sprite0 && i == 0,
            };
        }
    }

    /// Clocks every unit once and returns the first opaque pixel in OAM order.
    pub(crate) fn sample_and_shift(&mut self) -> SpritePixel {
        let mut chosen: Option<SpritePixel> = None;

        for slot in self.slots.iter_mut().take(self.active) {
            if slot.x_counter > 0 {
                slot.x_counter -= 1;
                continue;
            }

            let color = ((slot.pattern_high >> 7) << 1) | (slot.pattern_low >> 7);
            if chosen.is_none() && color != 0 {
                chosen = Some(SpritePixel {
                    palette: (slot.attributes & SpriteAttributes::PALETTE).bits(),
                    color,
                    behind_background: slot
                        .attributes
                        .contains(SpriteAttributes::PRIORITY_BEHIND_BACKGROUND),
                    sprite0: slot.sprite0,
                });
            }

            slot.pattern_low <<= 1;
            slot.pattern_high <<= 1;
        }

        chosen.unwrap_or_default()
    }
}
