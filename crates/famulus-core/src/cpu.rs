//! Ricoh 2A03 CPU core (a 6502 without decimal mode).
//!
//! The interpreter runs a whole instruction per [`Cpu::step`], but every bus
//! access, including dummy reads and internal cycles, goes through [`Bus`]
//! one cycle at a time. The bus advances the PPU on each of those calls, so
//! mid-instruction timing (a `$2002` read landing on a particular dot, for
//! instance) matches the hardware.

use crate::{
    bus::{Bus, STACK_ADDR},
    memory::{cpu as cpu_mem, ppu::Register as PpuRegister},
};

pub mod addressing;
pub mod instruction;
pub mod mnemonic;
pub mod status;

#[cfg(test)]
mod timing;

use instruction::{Instruction, LOOKUP_TABLE};
use status::Status;

/// Interrupt waiting to pre-empt the next opcode fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interrupt {
    Nmi,
    Reset,
}

impl Interrupt {
    fn vector(self) -> u16 {
        match self {
            Interrupt::Nmi => cpu_mem::NMI_VECTOR,
            Interrupt::Reset => cpu_mem::RESET_VECTOR,
        }
    }
}

/// Register file copy for debuggers and front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CpuSnapshot {
    pub pc: u16,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub s: u8,
    pub p: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cpu {
    pub(crate) a: u8,
    pub(crate) x: u8,
    pub(crate) y: u8,
    /// Offset into page 1.
    pub(crate) s: u8,
    pub(crate) p: Status,
    pub(crate) pc: u16,
    pending: Option<Interrupt>,
}

impl Cpu {
    /// Power-on register state. Call [`Cpu::reset`] before stepping.
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0,
            p: Status::power_up(),
            pc: 0,
            pending: None,
        }
    }

    /// Runs the 7-cycle reset sequence immediately and returns its cycles.
    ///
    /// The three stack cycles are reads, so `S` drops by 3 without touching
    /// memory: `$00` after power-on becomes `$FD`.
    pub fn reset(&mut self, bus: &mut impl Bus) -> u64 {
        let start = bus.cycles();
        self.pending = None;
        self.service_interrupt(bus, Interrupt::Reset);
        tracing::debug!(pc = format_args!("{:#06X}", self.pc), "cpu reset");
        bus.cycles() - start
    }

    /// Latches an NMI. A pending reset keeps priority.
    pub fn signal_nmi(&mut self) {
        if self.pending != Some(Interrupt::Reset) {
            self.pending = Some(Interrupt::Nmi);
        }
    }

    /// Requests a reset at the next instruction boundary.
    #[cfg(test)]
    pub(crate) fn signal_reset(&mut self) {
        self.pending = Some(Interrupt::Reset);
    }

    pub fn pending_interrupt(&self) -> Option<Interrupt> {
        self.pending
    }

    /// Executes one instruction, or services a pending interrupt instead, and
    /// then any OAM DMA the instruction started. Returns the CPU cycles spent.
    pub fn step(&mut self, bus: &mut impl Bus) -> u64 {
        let start = bus.cycles();

        if bus.take_nmi() {
            self.signal_nmi();
        }

        match self.pending.take() {
            Some(interrupt) => self.service_interrupt(bus, interrupt),
            None => {
                let pc = self.pc;
                let opcode = self.fetch_byte(bus);
                let instruction = LOOKUP_TABLE[opcode as usize];
                if tracing::enabled!(target: TRACE_TARGET, tracing::Level::TRACE) {
                    let bytes = instruction_bytes(&*bus, pc, instruction);
                    tracing::trace!(
                        target: TRACE_TARGET,
                        "{pc:04X}  {bytes:<8}  {:<12} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
                        instruction.to_string(),
                        self.a,
                        self.x,
                        self.y,
                        self.p.bits(),
                        self.s,
                        start,
                    );
                }
                self.execute(bus, instruction);
            }
        }

        if let Some(page) = bus.take_oam_dma_request() {
            self.run_oam_dma(bus, page);
        }

        bus.cycles() - start
    }

    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            pc: self.pc,
            a: self.a,
            x: self.x,
            y: self.y,
            s: self.s,
            p: self.p.bits(),
        }
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn status(&self) -> Status {
        self.p
    }

    /// 2 internal cycles, 3 stack cycles, 2 vector reads.
    fn service_interrupt(&mut self, bus: &mut impl Bus, interrupt: Interrupt) {
        bus.read(self.pc);
        bus.read(self.pc);

        match interrupt {
            Interrupt::Nmi => {
                let [lo, hi] = self.pc.to_le_bytes();
                self.push(bus, hi);
                self.push(bus, lo);
                let status = self.p.to_stack(false);
                self.push(bus, status);
                tracing::trace!(return_pc = format_args!("{:#06X}", self.pc), "servicing NMI");
            }
            Interrupt::Reset => {
                for _ in 0..3 {
                    self.peek_stack(bus);
                    self.s = self.s.wrapping_sub(1);
                }
            }
        }

        self.p.insert(Status::INTERRUPT);
        self.pc = Self::read_vector(bus, interrupt.vector());
    }

    /// Copies page `$XX00-$XXFF` into OAM through `$2004`.
    ///
    /// One halt cycle, one more if the transfer would start on an odd
    /// cycle, then alternating reads and writes: 513 or 514 cycles.
    fn run_oam_dma(&mut self, bus: &mut impl Bus, page: u8) {
        let start = bus.cycles();
        bus.internal_cycle();
        if bus.cycles() & 1 == 1 {
            bus.internal_cycle();
        }

        let base = u16::from(page) << 8;
        for offset in 0..=0xFF {
            let value = bus.read(base | offset);
            bus.write(PpuRegister::OamData as u16, value);
        }
        tracing::trace!(
            page = format_args!("{page:#04X}"),
            cycles = bus.cycles() - start,
            "OAM DMA"
        );
    }

    #[inline]
    pub(crate) fn fetch_byte(&mut self, bus: &mut impl Bus) -> u8 {
        let value = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    #[inline]
    pub(crate) fn fetch_word(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = self.fetch_byte(bus);
        let hi = self.fetch_byte(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Second cycle of single-byte instructions: the next byte is read and dropped.
    #[inline]
    pub(crate) fn idle(&mut self, bus: &mut impl Bus) {
        bus.read(self.pc);
    }

    #[inline]
    pub(crate) fn push(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write(STACK_ADDR | u16::from(self.s), value);
        self.s = self.s.wrapping_sub(1);
    }

    #[inline]
    pub(crate) fn pull(&mut self, bus: &mut impl Bus) -> u8 {
        self.s = self.s.wrapping_add(1);
        bus.read(STACK_ADDR | u16::from(self.s))
    }

    /// Dummy read of the current stack slot.
    #[inline]
    pub(crate) fn peek_stack(&mut self, bus: &mut impl Bus) {
        bus.read(STACK_ADDR | u16::from(self.s));
    }

    pub(crate) fn read_vector(bus: &mut impl Bus, vector: u16) -> u16 {
        let lo = bus.read(vector);
        let hi = bus.read(vector.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }
}

/// `tracing` target of the per-instruction log.
const TRACE_TARGET: &str = "famulus::trace";

/// Opcode and operand bytes at `pc` as space-separated hex, e.g. `4C 00 80`.
fn instruction_bytes(bus: &impl Bus, pc: u16, instruction: Instruction) -> String {
    (0..instruction.byte_len())
        .map(|offset| format!("{:02X}", bus.peek(pc.wrapping_add(offset))))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::MockBus;

    #[test]
    fn reset_loads_vector_and_takes_seven_cycles() {
        let mut bus = MockBus::new();
        bus.set_vector(cpu_mem::RESET_VECTOR, 0xC123);
        let mut cpu = Cpu::new();

        assert_eq!(cpu.reset(&mut bus), 7);
        assert_eq!(cpu.pc, 0xC123);
        assert_eq!(cpu.s, 0xFD);
        assert!(cpu.p.contains(Status::INTERRUPT));
        assert!(bus.writes.is_empty());
    }

    #[test]
    fn nmi_pushes_pc_then_status_without_break() {
        let mut bus = MockBus::with_program(0x8000, &[0xEA]);
        bus.set_vector(cpu_mem::NMI_VECTOR, 0x9000);
        let mut cpu = bus.cpu_at(0x8000);
        cpu.p = Status::UNUSED | Status::CARRY | Status::NEGATIVE;
        cpu.signal_nmi();

        assert_eq!(cpu.step(&mut bus), 7);
        assert_eq!(cpu.pc, 0x9000);
        assert_eq!(
            bus.writes,
            vec![(0x01FD, 0x80), (0x01FC, 0x00), (0x01FB, 0b1010_0001)]
        );
        assert!(cpu.p.contains(Status::INTERRUPT));
        assert_eq!(cpu.s, 0xFA);
    }

    #[test]
    fn nmi_from_bus_preempts_the_next_fetch() {
        let mut bus = MockBus::with_program(0x8000, &[0xA9, 0x01]);
        bus.set_vector(cpu_mem::NMI_VECTOR, 0x9000);
        bus.nmi = true;
        let mut cpu = bus.cpu_at(0x8000);
        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x9000);
        assert_eq!(cpu.a, 0);
        assert!(!bus.nmi);
    }

    #[test]
    fn nmi_does_not_replace_pending_reset() {
        let mut cpu = Cpu::new();
        cpu.signal_reset();
        cpu.signal_nmi();
        assert_eq!(cpu.pending_interrupt(), Some(Interrupt::Reset));
    }

    #[test]
    fn trace_bytes_cover_the_whole_instruction() {
        let bus = MockBus::with_program(0x8000, &[0x4C, 0x00, 0x80, 0xA9, 0x07, 0xEA, 0x02]);
        let bytes = |pc: u16| {
            let opcode = bus.mem[usize::from(pc)];
            instruction_bytes(&bus, pc, LOOKUP_TABLE[usize::from(opcode)])
        };
        assert_eq!(bytes(0x8000), "4C 00 80");
        assert_eq!(bytes(0x8003), "A9 07");
        assert_eq!(bytes(0x8005), "EA");
        assert_eq!(bytes(0x8006), "02");
    }

    #[test]
    fn undocumented_opcode_only_costs_the_fetch() {
        let mut bus = MockBus::with_program(0x0200, &[0x02, 0xA9, 0x07]);
        let mut cpu = bus.cpu_at(0x0200);
        assert_eq!(cpu.step(&mut bus), 1);
        assert_eq!(cpu.pc, 0x0201);
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x07);
    }

    #[test]
    fn oam_dma_copies_a_page_in_513_or_514_cycles() {
        // STA $4014 with A=$03
        let mut bus = MockBus::with_program(0x0200, &[0x8D, 0x14, 0x40]);
        for i in 0..256u16 {
            bus.mem[0x0300 + i as usize] = i as u8;
        }
        bus.dma_on_4014 = true;
        let mut cpu = bus.cpu_at(0x0200);
        cpu.a = 0x03;

        let spent = cpu.step(&mut bus);
        let dma = spent - 4;
        assert!(dma == 513 || dma == 514, "dma took {dma}");
        let oam_writes: Vec<u8> = bus
            .writes
            .iter()
            .filter(|(addr, _)| *addr == 0x2004)
            .map(|&(_, v)| v)
            .collect();
        assert_eq!(oam_writes.len(), 256);
        assert!(oam_writes.iter().enumerate().all(|(i, &v)| v == i as u8));
    }

    #[test]
    fn dma_alignment_depends_on_cycle_parity() {
        let run = |extra_cycles: u64| {
            let mut bus = MockBus::with_program(0x0200, &[0x8D, 0x14, 0x40]);
            bus.dma_on_4014 = true;
            bus.cycles = extra_cycles;
            let mut cpu = bus.cpu_at(0x0200);
            cpu.step(&mut bus) - 4
        };
        let even = run(0);
        let odd = run(1);
        assert_ne!(even, odd);
        assert_eq!(even + odd, 513 + 514);
    }
}
