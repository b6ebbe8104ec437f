use std::fmt::Display;

use crate::{
    bus::Bus,
    cpu::{Cpu, instruction::Instruction},
};

mod arith;
mod bra;
mod ctrl;
mod flags;
mod inc;
mod load;
mod logic;
mod shift;
mod stack;
mod trans;

/// Documented 6502 operations, grouped the way the handler modules are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    // load / store
    LDA,
    LDX,
    LDY,
    STA,
    STX,
    STY,
    // register transfers
    TAX,
    TAY,
    TSX,
    TXA,
    TXS,
    TYA,
    // stack
    PHA,
    PHP,
    PLA,
    PLP,
    // arithmetic and compares
    ADC,
    SBC,
    CMP,
    CPX,
    CPY,
    // logic
    AND,
    BIT,
    EOR,
    ORA,
    // shifts and rotates
    ASL,
    LSR,
    ROL,
    ROR,
    // increments and decrements
    DEC,
    DEX,
    DEY,
    INC,
    INX,
    INY,
    // branches
    BCC,
    BCS,
    BEQ,
    BMI,
    BNE,
    BPL,
    BVC,
    BVS,
    // jumps, calls, interrupts
    BRK,
    JMP,
    JSR,
    NOP,
    RTI,
    RTS,
    // flags
    CLC,
    CLD,
    CLI,
    CLV,
    SEC,
    SED,
    SEI,
    /// Any undocumented opcode. Executes as a one-cycle no-op.
    Illegal,
}

impl Display for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mnemonic::Illegal => f.write_str("???"),
            other => write!(f, "{other:?}"),
        }
    }
}

impl Cpu {
    /// Runs the operation part of an instruction whose opcode was already fetched.
    pub(crate) fn execute(&mut self, bus: &mut impl Bus, instruction: Instruction) {
        let mode = instruction.addressing;
        match instruction.mnemonic {
            Mnemonic::LDA => self.lda(bus, mode),
            Mnemonic::LDX => self.ldx(bus, mode),
            Mnemonic::LDY => self.ldy(bus, mode),
            Mnemonic::STA => self.sta(bus, mode),
            Mnemonic::STX => self.stx(bus, mode),
            Mnemonic::STY => self.sty(bus, mode),

            Mnemonic::TAX => self.tax(bus),
            Mnemonic::TAY => self.tay(bus),
            Mnemonic::TSX => self.tsx(bus),
            Mnemonic::TXA => self.txa(bus),
            Mnemonic::TXS => self.txs(bus),
            Mnemonic::TYA => self.tya(bus),

            Mnemonic::PHA => self.pha(bus),
            Mnemonic::PHP => self.php(bus),
            Mnemonic::PLA => self.pla(bus),
            Mnemonic::PLP => self.plp(bus),

            Mnemonic::ADC => self.adc(bus, mode),
            Mnemonic::SBC => self.sbc(bus, mode),
            Mnemonic::CMP => self.cmp(bus, mode),
            Mnemonic::CPX => self.cpx(bus, mode),
            Mnemonic::CPY => self.cpy(bus, mode),

            Mnemonic::AND => self.and(bus, mode),
            Mnemonic::BIT => self.bit(bus, mode),
            Mnemonic::EOR => self.eor(bus, mode),
            Mnemonic::ORA => self.ora(bus, mode),

            Mnemonic::ASL => self.asl(bus, mode),
            Mnemonic::LSR => self.lsr(bus, mode),
            Mnemonic::ROL => self.rol(bus, mode),
            Mnemonic::ROR => self.ror(bus, mode),

            Mnemonic::DEC => self.dec(bus, mode),
            Mnemonic::DEX => self.dex(bus),
            Mnemonic::DEY => self.dey(bus),
            Mnemonic::INC => self.inc(bus, mode),
            Mnemonic::INX => self.inx(bus),
            Mnemonic::INY => self.iny(bus),

            Mnemonic::BCC => self.bcc(bus),
            Mnemonic::BCS => self.bcs(bus),
            Mnemonic::BEQ => self.beq(bus),
            Mnemonic::BMI => self.bmi(bus),
            Mnemonic::BNE => self.bne(bus),
            Mnemonic::BPL => self.bpl(bus),
            Mnemonic::BVC => self.bvc(bus),
            Mnemonic::BVS => self.bvs(bus),

            Mnemonic::BRK => self.brk(bus),
            Mnemonic::JMP => self.jmp(bus, mode),
            Mnemonic::JSR => self.jsr(bus),
            Mnemonic::NOP => self.idle(bus),
            Mnemonic::RTI => self.rti(bus),
            Mnemonic::RTS => self.rts(bus),

            Mnemonic::CLC => self.clc(bus),
            Mnemonic::CLD => self.cld(bus),
            Mnemonic::CLI => self.cli(bus),
            Mnemonic::CLV => self.clv(bus),
            Mnemonic::SEC => self.sec(bus),
            Mnemonic::SED => self.sed(bus),
            Mnemonic::SEI => self.sei(bus),

            Mnemonic::Illegal => {
                tracing::trace!(pc = self.pc.wrapping_sub(1), "undocumented opcode skipped");
            }
        }
    }
}
