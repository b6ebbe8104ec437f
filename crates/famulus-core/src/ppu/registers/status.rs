use bitflags::bitflags;

bitflags! {
    /// PPUSTATUS (`$2002`). The low five bits are not driven and read back
    /// from the I/O latch.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub(crate) struct Status: u8 {
        const SPRITE_OVERFLOW = 0b0010_0000;
        const SPRITE_ZERO_HIT = 0b0100_0000;
        /// Cleared by reading `$2002` and on the pre-render line.
        const VERTICAL_BLANK = 0b1000_0000;
    }
}
