use bitflags::bitflags;

bitflags! {
    /// PPUMASK (`$2001`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub(crate) struct Mask: u8 {
        /// Output only the grey column of the palette (`index & $30`).
        const GREYSCALE = 0b0000_0001;
        const SHOW_BACKGROUND_LEFT = 0b0000_0010;
        const SHOW_SPRITES_LEFT = 0b0000_0100;
        const SHOW_BACKGROUND = 0b0000_1000;
        const SHOW_SPRITES = 0b0001_0000;
        const EMPHASIZE_RED = 0b0010_0000;
        const EMPHASIZE_GREEN = 0b0100_0000;
        const EMPHASIZE_BLUE = 0b1000_0000;
    }
}

impl Mask {
    /// Either layer on. Scroll counters and sprite evaluation only run then.
    pub(crate) fn rendering_enabled(self) -> bool {
        self.intersects(Mask::SHOW_BACKGROUND | Mask::SHOW_SPRITES)
    }

    pub(crate) fn background_visible_at(self, x: usize) -> bool {
        self.contains(Mask::SHOW_BACKGROUND) && (x >= 8 || self.contains(Mask::SHOW_BACKGROUND_LEFT))
    }

    pub(crate) fn sprites_visible_at(self, x: usize) -> bool {
        self.contains(Mask::SHOW_SPRITES) && (x >= 8 || self.contains(Mask::SHOW_SPRITES_LEFT))
    }
}
