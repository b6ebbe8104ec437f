use std::fmt::Display;

use crate::{bus::Bus, cpu::Cpu};

/// 6502 addressing modes.
///
/// The mode decides how many operand bytes follow the opcode and which bus
/// cycles are spent turning them into an effective address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Addressing {
    /// No operand (`CLC`, `TAX`, `RTS`).
    Implied,
    /// Operates on `A` (`ASL A`).
    Accumulator,
    /// Operand byte follows the opcode (`LDA #$42`).
    Immediate,
    /// `$00nn`.
    ZeroPage,
    /// `($nn + X) & $FF`; never leaves the zero page.
    ZeroPageX,
    /// `($nn + Y) & $FF`; only LDX/STX use it.
    ZeroPageY,
    /// Full 16-bit address.
    Absolute,
    /// `$nnnn + X`. Reads pay an extra cycle on a page cross; writes and
    /// read-modify-write forms always pay it.
    AbsoluteX,
    /// `$nnnn + Y`, same timing rules as [`Addressing::AbsoluteX`].
    AbsoluteY,
    /// `JMP ($nnnn)`. The pointer's high byte never carries into the next
    /// page, so `JMP ($10FF)` reads `$10FF` and `$1000`.
    Indirect,
    /// `($nn,X)`: pointer taken from the zero page after adding X.
    IndirectX,
    /// `($nn),Y`: pointer taken from the zero page, then Y is added.
    IndirectY,
    /// Signed 8-bit branch offset.
    Relative,
}

impl Addressing {
    /// Operand bytes that follow the opcode.
    pub const fn operand_len(self) -> u16 {
        match self {
            Addressing::Implied | Addressing::Accumulator => 0,
            Addressing::Immediate
            | Addressing::ZeroPage
            | Addressing::ZeroPageX
            | Addressing::ZeroPageY
            | Addressing::IndirectX
            | Addressing::IndirectY
            | Addressing::Relative => 1,
            Addressing::Absolute
            | Addressing::AbsoluteX
            | Addressing::AbsoluteY
            | Addressing::Indirect => 2,
        }
    }
}

impl Display for Addressing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Addressing::Implied => "",
            Addressing::Accumulator => "A",
            Addressing::Immediate => "#imm",
            Addressing::ZeroPage => "zp",
            Addressing::ZeroPageX => "zp,X",
            Addressing::ZeroPageY => "zp,Y",
            Addressing::Absolute => "abs",
            Addressing::AbsoluteX => "abs,X",
            Addressing::AbsoluteY => "abs,Y",
            Addressing::Indirect => "(abs)",
            Addressing::IndirectX => "(zp,X)",
            Addressing::IndirectY => "(zp),Y",
            Addressing::Relative => "rel",
        };
        f.write_str(text)
    }
}

/// What the instruction does with the effective address. Decides whether the
/// indexed page fix-up cycle is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Read,
    Write,
    ReadModifyWrite,
}

impl Cpu {
    /// Spends the bus cycles of `mode` and returns the effective address.
    ///
    /// Immediate mode yields the operand's own address so every read goes
    /// through a single path. Implied, accumulator and relative modes have no
    /// effective address and return `PC` without touching the bus.
    pub(crate) fn effective_address(
        &mut self,
        bus: &mut impl Bus,
        mode: Addressing,
        access: Access,
    ) -> u16 {
        match mode {
            Addressing::Immediate => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                addr
            }
            Addressing::ZeroPage => u16::from(self.fetch_byte(bus)),
            Addressing::ZeroPageX => {
                let index = self.x;
                self.zero_page_indexed(bus, index)
            }
            Addressing::ZeroPageY => {
                let index = self.y;
                self.zero_page_indexed(bus, index)
            }
            Addressing::Absolute => self.fetch_word(bus),
            Addressing::AbsoluteX => {
                let base = self.fetch_word(bus);
                let index = self.x;
                Self::index_with_fixup(bus, base, index, access)
            }
            Addressing::AbsoluteY => {
                let base = self.fetch_word(bus);
                let index = self.y;
                Self::index_with_fixup(bus, base, index, access)
            }
            Addressing::Indirect => {
                let ptr = self.fetch_word(bus);
                let lo = bus.read(ptr);
                let hi = bus.read((ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF));
                u16::from_le_bytes([lo, hi])
            }
            Addressing::IndirectX => {
                let zp = self.fetch_byte(bus);
                // Index is added while the unindexed pointer is read and discarded.
                bus.read(u16::from(zp));
                Self::zero_page_word(bus, zp.wrapping_add(self.x))
            }
            Addressing::IndirectY => {
                let zp = self.fetch_byte(bus);
                let base = Self::zero_page_word(bus, zp);
                let index = self.y;
                Self::index_with_fixup(bus, base, index, access)
            }
            Addressing::Implied | Addressing::Accumulator | Addressing::Relative => self.pc,
        }
    }

    fn zero_page_indexed(&mut self, bus: &mut impl Bus, index: u8) -> u16 {
        let base = self.fetch_byte(bus);
        bus.read(u16::from(base));
        u16::from(base.wrapping_add(index))
    }

    /// Pointer fetch that wraps inside the zero page (`$FF` pairs with `$00`).
    fn zero_page_word(bus: &mut impl Bus, ptr: u8) -> u16 {
        let lo = bus.read(u16::from(ptr));
        let hi = bus.read(u16::from(ptr.wrapping_add(1)));
        u16::from_le_bytes([lo, hi])
    }

    /// Adds an index register. The chip first reads from the address with
    /// the un-carried high byte; that read is skipped only for reads that
    /// stay in the same page.
    fn index_with_fixup(bus: &mut impl Bus, base: u16, index: u8, access: Access) -> u16 {
        let addr = base.wrapping_add(u16::from(index));
        let crossed = (base ^ addr) & 0xFF00 != 0;
        if crossed || access != Access::Read {
            bus.read((base & 0xFF00) | (addr & 0x00FF));
        }
        addr
    }

    /// Reads the operand of a read-class instruction.
    pub(crate) fn read_operand(&mut self, bus: &mut impl Bus, mode: Addressing) -> u8 {
        let addr = self.effective_address(bus, mode, Access::Read);
        bus.read(addr)
    }

    /// Stores `value` at the effective address of a write-class instruction.
    pub(crate) fn store_operand(&mut self, bus: &mut impl Bus, mode: Addressing, value: u8) {
        let addr = self.effective_address(bus, mode, Access::Write);
        bus.write(addr, value);
    }

    /// Read-modify-write: read, write the old value back, then write the result.
    /// The accumulator form costs a single idle cycle instead.
    pub(crate) fn modify_operand(
        &mut self,
        bus: &mut impl Bus,
        mode: Addressing,
        op: impl FnOnce(&mut Self, u8) -> u8,
    ) {
        if mode == Addressing::Accumulator {
            self.idle(bus);
            let value = self.a;
            self.a = op(self, value);
            return;
        }

        let addr = self.effective_address(bus, mode, Access::ReadModifyWrite);
        let old = bus.read(addr);
        bus.write(addr, old);
        let new = op(self, old);
        bus.write(addr, new);
    }
}
