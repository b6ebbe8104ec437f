//! Palette RAM addressing and the 2C02 master palette.

use crate::memory::ppu as ppu_mem;

/// 24-bit display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// NTSC 2C02 colours indexed by the 6-bit value stored in palette RAM.
#[rustfmt::skip]
pub static NES_PALETTE: [Color; 64] = [
    Color::new(0x54, 0x54, 0x54), Color::new(0x00, 0x1E, 0x74), Color::new(0x08, 0x10, 0x90), Color::new(0x30, 0x00, 0x88),
    Color::new(0x44, 0x00, 0x64), Color::new(0x5C, 0x00, 0x30), Color::new(0x54, 0x04, 0x00), Color::new(0x3C, 0x18, 0x00),
    Color::new(0x20, 0x2A, 0x00), Color::new(0x08, 0x3A, 0x00), Color::new(0x00, 0x40, 0x00), Color::new(0x00, 0x3C, 0x00),
    Color::new(0x00, 0x32, 0x3C), Color::new(0x00, 0x00, 0x00), Color::new(0x00, 0x00, 0x00), Color::new(0x00, 0x00, 0x00),
    Color::new(0x98, 0x96, 0x98), Color::new(0x08, 0x4C, 0xC4), Color::new(0x30, 0x32, 0xEC), Color::new(0x5C, 0x1E, 0xE4),
    Color::new(0x88, 0x14, 0xB0), Color::new(0xA0, 0x14, 0x64), Color::new(0x98, 0x22, 0x20), Color::new(0x78, 0x3C, 0x00),
    Color::new(0x54, 0x5A, 0x00), Color::new(0x28, 0x72, 0x00), Color::new(0x08, 0x7C, 0x00), Color::new(0x00, 0x76, 0x28),
    Color::new(0x00, 0x66, 0x78), Color::new(0x00, 0x00, 0x00), Color::new(0x00, 0x00, 0x00), Color::new(0x00, 0x00, 0x00),
    Color::new(0xEC, 0xEE, 0xEC), Color::new(0x4C, 0x9A, 0xEC), Color::new(0x78, 0x7C, 0xEC), Color::new(0xB0, 0x62, 0xEC),
    Color::new(0xE4, 0x54, 0xEC), Color::new(0xEC, 0x58, 0xB4), Color::new(0xEC, 0x6A, 0x64), Color::new(0xD4, 0x88, 0x20),
    Color::new(0xA0, 0xAA, 0x00), Color::new(0x74, 0xC4, 0x00), Color::new(0x4C, 0xD0, 0x20), Color::new(0x38, 0xCC, 0x6C),
    Color::new(0x38, 0xB4, 0xCC), Color::new(0x3C, 0x3C, 0x3C), Color::new(0x00, 0x00, 0x00), Color::new(0x00, 0x00, 0x00),
    Color::new(0xEC, 0xEE, 0xEC), Color::new(0xA8, 0xCC, 0xEC), Color::new(0xBC, 0xBC, 0xEC), Color::new(0xD4, 0xB2, 0xEC),
    Color::new(0xEC, 0xAE, 0xEC), Color::new(0xEC, 0xAE, 0xD4), Color::new(0xEC, 0xB4, 0xB0), Color::new(0xE4, 0xC4, 0x90),
    Color::new(0xCC, 0xD2, 0x78), Color::new(0xB4, 0xDE, 0x78), Color::new(0xA8, 0xE2, 0x90), Color::new(0x98, 0xE2, 0xB4),
    Color::new(0xA0, 0xD6, 0xE4), Color::new(0xA0, 0xA2, 0xA0), Color::new(0x00, 0x00, 0x00), Color::new(0x00, 0x00, 0x00),
];

/// Looks up a palette index; bits 6-7 are ignored.
pub fn color_of(index: u8) -> Color {
    NES_PALETTE[usize::from(index & 0x3F)]
}

/// Expands a frame of palette indices into packed RGB24.
pub fn to_rgb24(indices: &[u8]) -> Vec<u8> {
    indices
        .iter()
        .flat_map(|&index| {
            let Color { r, g, b } = color_of(index);
            [r, g, b]
        })
        .collect()
}

/// Slot inside the 32-byte palette RAM for a `$3F00-$3FFF` address.
///
/// Entry 0 of every sprite palette is shared with the matching background
/// palette, so `$3F10/$3F14/$3F18/$3F1C` fold onto `$3F00/$3F04/$3F08/$3F0C`.
pub(crate) fn palette_slot(addr: u16) -> usize {
    // $3F00 is 32-byte aligned, so the low bits are the slot.
    let slot = usize::from(addr) % ppu_mem::PALETTE_RAM_SIZE;
    if slot & 0x13 == 0x10 { slot & 0x0F } else { slot }
}
