/// 16-bit shifter: the high byte is the tile being drawn, the low byte the
/// next tile waiting to be shifted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
struct Shift16(u16);

impl Shift16 {
    #[inline]
    fn reload_low(&mut self, byte: u8) {
        self.0 = (self.0 & 0xFF00) | u16::from(byte);
    }

    /// Bit `15 - fine_x`. Fine X selects a tap instead of delaying the shift.
    #[inline]
    fn tap(self, fine_x: u8) -> u8 {
        ((self.0 >> (15 - (fine_x & 0b111))) & 1) as u8
    }

    #[inline]
    fn shift(&mut self) {
        self.0 <<= 1;
    }
}

/// Latches filled by the 8-dot fetch cycle before they reach the shifters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct TileLatch {
    pub(crate) tile: u8,
    /// Already reduced to the tile's 2-bit palette.
    pub(crate) palette: u8,
    pub(crate) pattern_low: u8,
    pub(crate) pattern_high: u8,
}

/// Background shifters: two pattern bitplanes and two palette bits, each
/// palette bit replicated across the tile's eight pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct BgPipeline {
    pattern: [Shift16; 2],
    palette: [Shift16; 2],
}

impl BgPipeline {
    /// Moves the latched tile into the low byte of every shifter.
    pub(crate) fn reload(&mut self, latch: &TileLatch) {
        self.pattern[0].reload_low(latch.pattern_low);
        self.pattern[1].reload_low(latch.pattern_high);
        for (bit, shifter) in self.palette.iter_mut().enumerate() {
            let fill = if latch.palette & (1 << bit) != 0 { 0xFF } else { 0x00 };
            shifter.reload_low(fill);
        }
    }

    /// `(palette, pattern)` of the current pixel, both 0..=3.
    pub(crate) fn sample(&self, fine_x: u8) -> (u8, u8) {
        let pattern = (self.pattern[1].tap(fine_x) << 1) | self.pattern[0].tap(fine_x);
        let palette = (self.palette[1].tap(fine_x) << 1) | self.palette[0].tap(fine_x);
        (palette, pattern)
    }

    pub(crate) fn shift(&mut self) {
        for shifter in self.pattern.iter_mut().chain(self.palette.iter_mut()) {
            shifter.shift();
        }
    }
}
