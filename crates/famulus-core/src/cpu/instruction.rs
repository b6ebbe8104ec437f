use std::fmt::Display;

use crate::cpu::{addressing::Addressing, mnemonic::Mnemonic};

/// One decoded opcode: what it does and how it finds its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub addressing: Addressing,
}

impl Instruction {
    /// Opcode byte plus operand bytes.
    pub const fn byte_len(&self) -> u16 {
        match self.mnemonic {
            Mnemonic::Illegal => 1,
            _ => 1 + self.addressing.operand_len(),
        }
    }

    pub const fn is_documented(&self) -> bool {
        !matches!(self.mnemonic, Mnemonic::Illegal)
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.addressing {
            Addressing::Implied => write!(f, "{}", self.mnemonic),
            mode => write!(f, "{} {}", self.mnemonic, mode),
        }
    }
}

macro_rules! op {
    ($mnemonic:ident, $mode:ident) => {
        Instruction {
            mnemonic: Mnemonic::$mnemonic,
            addressing: Addressing::$mode,
        }
    };
}

const ILL: Instruction = op!(Illegal, Implied);

/// Decode table indexed by opcode byte.
#[rustfmt::skip]
pub static LOOKUP_TABLE: [Instruction; 256] = [
    // 0x00
    op!(BRK, Implied), op!(ORA, IndirectX), ILL, ILL,
    ILL, op!(ORA, ZeroPage), op!(ASL, ZeroPage), ILL,
    op!(PHP, Implied), op!(ORA, Immediate), op!(ASL, Accumulator), ILL,
    ILL, op!(ORA, Absolute), op!(ASL, Absolute), ILL,
    // 0x10
    op!(BPL, Relative), op!(ORA, IndirectY), ILL, ILL,
    ILL, op!(ORA, ZeroPageX), op!(ASL, ZeroPageX), ILL,
    op!(CLC, Implied), op!(ORA, AbsoluteY), ILL, ILL,
    ILL, op!(ORA, AbsoluteX), op!(ASL, AbsoluteX), ILL,
    // 0x20
    op!(JSR, Absolute), op!(AND, IndirectX), ILL, ILL,
    op!(BIT, ZeroPage), op!(AND, ZeroPage), op!(ROL, ZeroPage), ILL,
    op!(PLP, Implied), op!(AND, Immediate), op!(ROL, Accumulator), ILL,
    op!(BIT, Absolute), op!(AND, Absolute), op!(ROL, Absolute), ILL,
    // 0x30
    op!(BMI, Relative), op!(AND, IndirectY), ILL, ILL,
    ILL, op!(AND, ZeroPageX), op!(ROL, ZeroPageX), ILL,
    op!(SEC, Implied), op!(AND, AbsoluteY), ILL, ILL,
    ILL, op!(AND, AbsoluteX), op!(ROL, AbsoluteX), ILL,
    // 0x40
    op!(RTI, Implied), op!(EOR, IndirectX), ILL, ILL,
    ILL, op!(EOR, ZeroPage), op!(LSR, ZeroPage), ILL,
    op!(PHA, Implied), op!(EOR, Immediate), op!(LSR, Accumulator), ILL,
    op!(JMP, Absolute), op!(EOR, Absolute), op!(LSR, Absolute), ILL,
    // 0x50
    op!(BVC, Relative), op!(EOR, IndirectY), ILL, ILL,
    ILL, op!(EOR, ZeroPageX), op!(LSR, ZeroPageX), ILL,
    op!(CLI, Implied), op!(EOR, AbsoluteY), ILL, ILL,
    ILL, op!(EOR, AbsoluteX), op!(LSR, AbsoluteX), ILL,
    // 0x60
    op!(RTS, Implied), op!(ADC, IndirectX), ILL, ILL,
    ILL, op!(ADC, ZeroPage), op!(ROR, ZeroPage), ILL,
    op!(PLA, Implied), op!(ADC, Immediate), op!(ROR, Accumulator), ILL,
    op!(JMP, Indirect), op!(ADC, Absolute), op!(ROR, Absolute), ILL,
    // 0x70
    op!(BVS, Relative), op!(ADC, IndirectY), ILL, ILL,
    ILL, op!(ADC, ZeroPageX), op!(ROR, ZeroPageX), ILL,
    op!(SEI, Implied), op!(ADC, AbsoluteY), ILL, ILL,
    ILL, op!(ADC, AbsoluteX), op!(ROR, AbsoluteX), ILL,
    // 0x80
    ILL, op!(STA, IndirectX), ILL, ILL,
    op!(STY, ZeroPage), op!(STA, ZeroPage), op!(STX, ZeroPage), ILL,
    op!(DEY, Implied), ILL, op!(TXA, Implied), ILL,
    op!(STY, Absolute), op!(STA, Absolute), op!(STX, Absolute), ILL,
    // 0x90
    op!(BCC, Relative), op!(STA, IndirectY), ILL, ILL,
    op!(STY, ZeroPageX), op!(STA, ZeroPageX), op!(STX, ZeroPageY), ILL,
    op!(TYA, Implied), op!(STA, AbsoluteY), op!(TXS, Implied), ILL,
    ILL, op!(STA, AbsoluteX), ILL, ILL,
    // 0xA0
    op!(LDY, Immediate), op!(LDA, IndirectX), op!(LDX, Immediate), ILL,
    op!(LDY, ZeroPage), op!(LDA, ZeroPage), op!(LDX, ZeroPage), ILL,
    op!(TAY, Implied), op!(LDA, Immediate), op!(TAX, Implied), ILL,
    op!(LDY, Absolute), op!(LDA, Absolute), op!(LDX, Absolute), ILL,
    // 0xB0
    op!(BCS, Relative), op!(LDA, IndirectY), ILL, ILL,
    op!(LDY, ZeroPageX), op!(LDA, ZeroPageX), op!(LDX, ZeroPageY), ILL,
    op!(CLV, Implied), op!(LDA, AbsoluteY), op!(TSX, Implied), ILL,
    op!(LDY, AbsoluteX), op!(LDA, AbsoluteX), op!(LDX, AbsoluteY), ILL,
    // 0xC0
    op!(CPY, Immediate), op!(CMP, IndirectX), ILL, ILL,
    op!(CPY, ZeroPage), op!(CMP, ZeroPage), op!(DEC, ZeroPage), ILL,
    op!(INY, Implied), op!(CMP, Immediate), op!(DEX, Implied), ILL,
    op!(CPY, Absolute), op!(CMP, Absolute), op!(DEC, Absolute), ILL,
    // 0xD0
    op!(BNE, Relative), op!(CMP, IndirectY), ILL, ILL,
    ILL, op!(CMP, ZeroPageX), op!(DEC, ZeroPageX), ILL,
    op!(CLD, Implied), op!(CMP, AbsoluteY), ILL, ILL,
    ILL, op!(CMP, AbsoluteX), op!(DEC, AbsoluteX), ILL,
    // 0xE0
    op!(CPX, Immediate), op!(SBC, IndirectX), ILL, ILL,
    op!(CPX, ZeroPage), op!(SBC, ZeroPage), op!(INC, ZeroPage), ILL,
    op!(INX, Implied), op!(SBC, Immediate), op!(NOP, Implied), ILL,
    op!(CPX, Absolute), op!(SBC, Absolute), op!(INC, Absolute), ILL,
    // 0xF0
    op!(BEQ, Relative), op!(SBC, IndirectY), ILL, ILL,
    ILL, op!(SBC, ZeroPageX), op!(INC, ZeroPageX), ILL,
    op!(SED, Implied), op!(SBC, AbsoluteY), ILL, ILL,
    ILL, op!(SBC, AbsoluteX), op!(INC, AbsoluteX), ILL,
];
