/// Phases of the secondary-OAM evaluation state machine (dots 65-256).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) enum SpriteEvalPhase {
    /// Reading byte 0 (Y) of sprite `n`.
    #[default]
    ScanY,
    /// Copying bytes 1-3 of an in-range sprite.
    CopyRest,
    /// Eight sprites found. The hardware keeps scanning but increments `n`
    /// and `m` together, so it tests tile, attribute and X bytes as if they
    /// were Y coordinates.
    OverflowScan,
    /// All 64 sprites visited.
    Done,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) struct SpriteEvalState {
    pub(crate) phase: SpriteEvalPhase,
    /// Sprite index in primary OAM (0..64).
    pub(crate) n: u8,
    /// Byte index inside sprite `n`.
    pub(crate) m: u8,
    /// Next byte of secondary OAM to write.
    pub(crate) secondary_index: usize,
    /// Sprites copied so far.
    pub(crate) found: usize,
    /// Value read on the previous (odd) dot.
    pub(crate) latch: u8,
    /// Sprite 0 is among the sprites for the next line.
    pub(crate) sprite0_found: bool,
}

impl SpriteEvalState {
    pub(crate) fn oam_index(&self) -> usize {
        usize::from(self.n) * 4 + usize::from(self.m)
    }

    /// Moves to the next sprite; `Done` once all 64 were visited.
    pub(crate) fn next_sprite(&mut self) {
        self.m = 0;
        self.n += 1;
        if self.n >= 64 {
            self.n = 0;
            self.phase = SpriteEvalPhase::Done;
        }
    }
}
