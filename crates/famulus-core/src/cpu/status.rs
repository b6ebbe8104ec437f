use bitflags::bitflags;

bitflags! {
    /// Processor status register `P`.
    ///
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// N V _ B D I Z C
    /// ```
    ///
    /// `B` and bit 5 have no storage in the chip; they only exist in the copy
    /// pushed to the stack. The register kept here always has bit 5 set and
    /// `B` clear.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Status: u8 {
        const CARRY     = 0b0000_0001;
        const ZERO      = 0b0000_0010;
        /// Masks IRQ (not NMI).
        const INTERRUPT = 0b0000_0100;
        /// Settable, but the 2A03 has no decimal adder.
        const DECIMAL   = 0b0000_1000;
        const BREAK     = 0b0001_0000;
        const UNUSED    = 0b0010_0000;
        const OVERFLOW  = 0b0100_0000;
        const NEGATIVE  = 0b1000_0000;
    }
}

impl Status {
    /// Value after the reset sequence: `I` set, bit 5 set.
    pub const fn power_up() -> Self {
        Self::INTERRUPT.union(Self::UNUSED)
    }

    /// Updates `Z` and `N` from a result byte.
    #[inline]
    pub fn set_zn(&mut self, value: u8) {
        self.set(Status::ZERO, value == 0);
        self.set(Status::NEGATIVE, value & 0x80 != 0);
    }

    /// Byte pushed by PHP/BRK (`brk = true`) or by NMI (`brk = false`).
    #[inline]
    pub fn to_stack(self, brk: bool) -> u8 {
        let mut pushed = self | Status::UNUSED;
        pushed.set(Status::BREAK, brk);
        pushed.bits()
    }

    /// Register value restored by PLP/RTI.
    #[inline]
    pub fn from_stack(byte: u8) -> Self {
        (Status::from_bits_truncate(byte) - Status::BREAK) | Status::UNUSED
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::power_up()
    }
}
