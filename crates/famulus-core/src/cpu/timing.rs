//! Published cycle counts, used to check the interpreter's bus traffic.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    bus::mock::MockBus,
    cpu::{Cpu, addressing::Addressing, instruction::LOOKUP_TABLE, mnemonic::Mnemonic, status::Status},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timing {
    Fixed(u8),
    /// +1 when an indexed read crosses a page.
    PageCross(u8),
    /// +1 when taken, +1 more across a page.
    Branch(u8),
}

const fn f(cycles: u8) -> Timing {
    Timing::Fixed(cycles)
}

const fn p(cycles: u8) -> Timing {
    Timing::PageCross(cycles)
}

const fn b(cycles: u8) -> Timing {
    Timing::Branch(cycles)
}

impl Timing {
    fn total(self, page_crossed: bool, branch_taken: bool) -> u64 {
        match self {
            Timing::Fixed(c) => u64::from(c),
            Timing::PageCross(c) => u64::from(c) + u64::from(page_crossed),
            Timing::Branch(c) if branch_taken => u64::from(c) + 1 + u64::from(page_crossed),
            Timing::Branch(c) => u64::from(c),
        }
    }
}

/// Undocumented opcodes are one-cycle no-ops here.
#[rustfmt::skip]
static CYCLE_TABLE: [Timing; 256] = [
    f(7), f(6), f(1), f(1), f(1), f(3), f(5), f(1), f(3), f(2), f(2), f(1), f(1), f(4), f(6), f(1),
    b(2), p(5), f(1), f(1), f(1), f(4), f(6), f(1), f(2), p(4), f(1), f(1), f(1), p(4), f(7), f(1),
    f(6), f(6), f(1), f(1), f(3), f(3), f(5), f(1), f(4), f(2), f(2), f(1), f(4), f(4), f(6), f(1),
    b(2), p(5), f(1), f(1), f(1), f(4), f(6), f(1), f(2), p(4), f(1), f(1), f(1), p(4), f(7), f(1),
    f(6), f(6), f(1), f(1), f(1), f(3), f(5), f(1), f(3), f(2), f(2), f(1), f(3), f(4), f(6), f(1),
    b(2), p(5), f(1), f(1), f(1), f(4), f(6), f(1), f(2), p(4), f(1), f(1), f(1), p(4), f(7), f(1),
    f(6), f(6), f(1), f(1), f(1), f(3), f(5), f(1), f(4), f(2), f(2), f(1), f(5), f(4), f(6), f(1),
    b(2), p(5), f(1), f(1), f(1), f(4), f(6), f(1), f(2), p(4), f(1), f(1), f(1), p(4), f(7), f(1),
    f(1), f(6), f(1), f(1), f(3), f(3), f(3), f(1), f(2), f(1), f(2), f(1), f(4), f(4), f(4), f(1),
    b(2), f(6), f(1), f(1), f(4), f(4), f(4), f(1), f(2), f(5), f(2), f(1), f(1), f(5), f(1), f(1),
    f(2), f(6), f(2), f(1), f(3), f(3), f(3), f(1), f(2), f(2), f(2), f(1), f(4), f(4), f(4), f(1),
    b(2), p(5), f(1), f(1), f(4), f(4), f(4), f(1), f(2), p(4), f(2), f(1), p(4), p(4), p(4), f(1),
    f(2), f(6), f(1), f(1), f(3), f(3), f(5), f(1), f(2), f(2), f(2), f(1), f(4), f(4), f(6), f(1),
    b(2), p(5), f(1), f(1), f(1), f(4), f(6), f(1), f(2), p(4), f(1), f(1), f(1), p(4), f(7), f(1),
    f(2), f(6), f(1), f(1), f(3), f(3), f(5), f(1), f(2), f(2), f(2), f(1), f(4), f(4), f(6), f(1),
    b(2), p(5), f(1), f(1), f(1), f(4), f(6), f(1), f(2), p(4), f(1), f(1), f(1), p(4), f(7), f(1),
];

fn branch_taken(mnemonic: Mnemonic, p: Status) -> bool {
    match mnemonic {
        Mnemonic::BPL => !p.contains(Status::NEGATIVE),
        Mnemonic::BMI => p.contains(Status::NEGATIVE),
        Mnemonic::BVC => !p.contains(Status::OVERFLOW),
        Mnemonic::BVS => p.contains(Status::OVERFLOW),
        Mnemonic::BCC => !p.contains(Status::CARRY),
        Mnemonic::BCS => p.contains(Status::CARRY),
        Mnemonic::BNE => !p.contains(Status::ZERO),
        Mnemonic::BEQ => p.contains(Status::ZERO),
        _ => false,
    }
}

/// Lays out one instruction at `origin` and returns the expected cycle count.
///
/// With `cross` set, index registers hold `$FF` and every base address sits
/// at `$xx80` so indexed forms always carry into the next page; branches
/// jump far enough forward to leave the page.
fn arrange(bus: &mut MockBus, cpu: &mut Cpu, opcode: u8, cross: bool) -> u64 {
    let instruction = LOOKUP_TABLE[opcode as usize];
    let origin = cpu.pc;
    let index = if cross { 0xFF } else { 0x00 };
    cpu.x = index;
    cpu.y = index;

    let base: u16 = if cross { 0x0380 } else { 0x0310 };
    let [base_lo, base_hi] = base.to_le_bytes();
    // Zero-page pointer used by (zp,X) and (zp),Y. With X=$FF, ($11,X) reads $10.
    bus.mem[0x0010] = base_lo;
    bus.mem[0x0011] = base_hi;

    let operand: &[u8] = match instruction.addressing {
        Addressing::Implied | Addressing::Accumulator => &[],
        Addressing::Immediate => &[0x42],
        Addressing::ZeroPage | Addressing::ZeroPageX | Addressing::ZeroPageY => &[0x20],
        Addressing::IndirectX => &[if cross { 0x11 } else { 0x10 }],
        Addressing::IndirectY => &[0x10],
        Addressing::Relative => &[if cross { 0x7F } else { 0x04 }],
        Addressing::Absolute | Addressing::AbsoluteX | Addressing::AbsoluteY | Addressing::Indirect => {
            &[base_lo, base_hi]
        }
    };
    let mut program = vec![opcode];
    program.extend_from_slice(operand);
    bus.load(origin, &program);

    let crossed = match instruction.addressing {
        Addressing::AbsoluteX | Addressing::AbsoluteY | Addressing::IndirectY => cross,
        Addressing::Relative => {
            let next = origin.wrapping_add(2);
            let target = next.wrapping_add(u16::from(operand[0]));
            (next ^ target) & 0xFF00 != 0
        }
        _ => false,
    };
    let taken = branch_taken(instruction.mnemonic, cpu.p);
    CYCLE_TABLE[opcode as usize].total(crossed, taken)
}

fn check_all_opcodes(cross: bool, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..crate::tests::TEST_COUNT {
        for opcode in 0..=0xFFu8 {
            let mut bus = MockBus::new();
            let origin = if cross { 0x04F0 } else { 0x0400 };
            let mut cpu = bus.cpu_at(origin);
            cpu.a = rng.random();
            cpu.p = Status::from_stack(rng.random());
            bus.mem[0x0020] = rng.random();

            let expected = arrange(&mut bus, &mut cpu, opcode, cross);
            let spent = cpu.step(&mut bus);
            assert_eq!(
                spent, expected,
                "opcode {opcode:02X} ({}) cross={cross}",
                LOOKUP_TABLE[opcode as usize]
            );
        }
    }
}

#[test]
fn cycles_without_page_crossing() {
    check_all_opcodes(false, 0x5EED);
}

#[test]
fn cycles_with_page_crossing() {
    check_all_opcodes(true, 0xC0FFEE);
}
