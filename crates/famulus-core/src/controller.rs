//! Standard joypad behind `$4016/$4017`.
//!
//! Writing bit 0 high to `$4016` holds both pads in parallel-load mode; the
//! falling edge freezes the buttons into an 8-bit shift register that the CPU
//! then reads one bit at a time, A first.

use crate::rng::SplitMix64;

/// Shift-register order of the pad buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A = 0,
    B = 1,
    Select = 2,
    Start = 3,
    Up = 4,
    Down = 5,
    Left = 6,
    Right = 7,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
    ];

    #[inline]
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// Bit 6 is open bus on the console and reads back as the high address byte.
const OPEN_BUS_BITS: u8 = 0x40;
/// D3/D4 are the expansion port lines; nothing is plugged in, so they float.
const EXPANSION_NOISE_MASK: u8 = 0b0001_1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controller {
    strobe: bool,
    shift: u8,
    buttons: u8,
    noise: SplitMix64,
}

impl Controller {
    /// A released pad. `seed` drives the floating expansion lines, so pads
    /// sharing a seed float identically.
    pub fn with_noise_seed(seed: u64) -> Self {
        Self {
            strobe: false,
            shift: 0,
            buttons: 0,
            noise: SplitMix64::new(seed),
        }
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        if pressed {
            self.buttons |= button.mask();
        } else {
            self.buttons &= !button.mask();
        }
        if self.strobe {
            self.shift = self.buttons;
        }
    }

    /// Replaces all eight buttons at once (bit layout of [`Button`]).
    pub fn set_buttons(&mut self, mask: u8) {
        self.buttons = mask;
        if self.strobe {
            self.shift = self.buttons;
        }
    }

    pub fn buttons(&self) -> u8 {
        self.buttons
    }

    /// `$4016` write. Only bit 0 is wired.
    pub fn write_strobe(&mut self, data: u8) {
        self.strobe = data & 0x01 != 0;
        if self.strobe {
            self.shift = self.buttons;
        }
    }

    /// Serial read: next button in bit 0, floating lines above it.
    pub fn read(&mut self) -> u8 {
        let bit = self.peek_bit();
        if !self.strobe {
            // An empty register reads as 1s on official pads.
            self.shift = (self.shift >> 1) | 0x80;
        }
        bit | OPEN_BUS_BITS | (self.noise.next_u8() & EXPANSION_NOISE_MASK)
    }

    /// What a read would return apart from the floating expansion lines.
    pub fn peek(&self) -> u8 {
        self.peek_bit() | OPEN_BUS_BITS
    }

    /// Bit 0 of the next read, without shifting.
    pub fn peek_bit(&self) -> u8 {
        if self.strobe {
            self.buttons & 0x01
        } else {
            self.shift & 0x01
        }
    }
}
