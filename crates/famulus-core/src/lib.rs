use std::path::Path;

use crate::{
    bus::{
        OpenBus,
        cpu::{CpuBus, CpuPeek},
    },
    cartridge::Cartridge,
    controller::{Button, Controller},
    cpu::Cpu,
    error::Error,
    mem_block::{cpu as cpu_ram, ppu::Ciram},
    ppu::Ppu,
};

pub mod bus;
pub mod cartridge;
pub mod controller;
pub mod cpu;
pub mod error;
pub mod mem_block;
pub mod memory;
pub mod ppu;
pub mod reset_kind;
pub mod rng;

pub use cartridge::{load_cartridge, load_cartridge_from_file};
pub use cpu::CpuSnapshot;
pub use reset_kind::ResetKind;

/// Per-port seeds for the floating controller lines.
const PAD_NOISE_SEEDS: [u64; 2] = [0x243F_6A88_85A3_08D3, 0x1319_8A2E_0370_7344];

/// Instruction-boundary report from [`Nes::step_instruction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StepResult {
    /// CPU cycles spent, OAM DMA included.
    pub cycles: u64,
    /// Program counter of the next instruction.
    pub pc: u16,
    /// The PPU entered vblank during the step.
    pub frame_completed: bool,
}

/// The console: CPU, PPU, memories and the two pad ports.
///
/// The CPU reaches everything else through a [`CpuBus`] assembled from
/// borrows of these fields for each step.
#[derive(Debug)]
pub struct Nes {
    cpu: Cpu,
    ppu: Ppu,
    ram: cpu_ram::Ram,
    ciram: Ciram,
    cartridge: Option<Cartridge>,
    controllers: [Controller; 2],
    open_bus: OpenBus,
    /// Page written to `$4014`, waiting for the CPU to run the DMA.
    oam_dma_request: Option<u8>,
    /// CPU cycles since power-on.
    cycles: u64,
    last_write: Option<u16>,
}

impl Nes {
    /// A powered-on console with an empty cartridge slot.
    pub fn new() -> Self {
        let mut nes = Self {
            cpu: Cpu::new(),
            ppu: Ppu::new(),
            ram: cpu_ram::Ram::new(),
            ciram: Ciram::new(),
            cartridge: None,
            controllers: PAD_NOISE_SEEDS.map(Controller::with_noise_seed),
            open_bus: OpenBus::new(),
            oam_dma_request: None,
            cycles: 0,
            last_write: None,
        };
        nes.reset(ResetKind::PowerOn);
        nes
    }

    pub fn with_cartridge(cartridge: Cartridge) -> Self {
        let mut nes = Self::new();
        nes.insert_cartridge(cartridge);
        nes
    }

    /// Parses an iNES image and inserts it.
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let cartridge = cartridge::load_cartridge(bytes)?;
        self.insert_cartridge(cartridge);
        Ok(())
    }

    pub fn load_rom_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let cartridge = cartridge::load_cartridge_from_file(path)?;
        self.insert_cartridge(cartridge);
        Ok(())
    }

    /// Inserting a cartridge power-cycles the console.
    pub fn insert_cartridge(&mut self, cartridge: Cartridge) {
        self.cartridge = Some(cartridge);
        self.reset(ResetKind::PowerOn);
    }

    /// Removes the cartridge and power-cycles the empty console.
    pub fn eject_cartridge(&mut self) -> Option<Cartridge> {
        let cartridge = self.cartridge.take();
        self.reset(ResetKind::PowerOn);
        cartridge
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    /// Runs the CPU reset sequence after resetting the rest of the machine.
    ///
    /// A power-on reset also clears RAM, CIRAM and the cycle counter. A soft
    /// reset keeps memory, and the CPU keeps its registers apart from `PC`,
    /// `I` and a stack pointer lowered by three.
    pub fn reset(&mut self, kind: ResetKind) {
        match kind {
            ResetKind::PowerOn => {
                self.cpu = Cpu::new();
                self.ram.fill(0);
                self.ciram.fill(0);
                self.open_bus.reset();
                self.cycles = 0;
                self.last_write = None;
            }
            ResetKind::Soft => {}
        }
        self.ppu.reset(kind);
        self.oam_dma_request = None;

        let cycles = self.with_bus(|cpu, bus| cpu.reset(bus));
        tracing::debug!(?kind, cycles, pc = format_args!("{:#06X}", self.cpu.pc()), "console reset");
    }

    /// Executes one instruction (or services an interrupt) on the CPU while
    /// the PPU runs alongside it.
    pub fn step_instruction(&mut self) -> StepResult {
        let frame = self.ppu.frame_count();
        let cycles = self.with_bus(|cpu, bus| cpu.step(bus));
        StepResult {
            cycles,
            pc: self.cpu.pc(),
            frame_completed: self.ppu.frame_count() != frame,
        }
    }

    /// Steps instructions until the PPU completes a frame. Returns the CPU
    /// cycles spent.
    pub fn run_frame(&mut self) -> u64 {
        let mut cycles = 0;
        loop {
            let step = self.step_instruction();
            cycles += step.cycles;
            if step.frame_completed {
                return cycles;
            }
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.ppu.frame_count()
    }

    /// Last completed frame: 256x240 palette indices, row-major.
    pub fn render_buffer(&self) -> &[u8] {
        self.ppu.render_buffer()
    }

    pub fn cpu_snapshot(&self) -> CpuSnapshot {
        self.cpu.snapshot()
    }

    /// Reads CPU address space without side effects or elapsed time.
    pub fn peek_cpu_byte(&self, addr: u16) -> u8 {
        CpuPeek {
            ram: &self.ram,
            ppu: &self.ppu,
            cartridge: self.cartridge.as_ref(),
            controllers: &self.controllers,
            open_bus: &self.open_bus,
            now: self.cycles,
        }
        .peek(addr)
    }

    /// Address of the most recent CPU write, if any since power-on.
    pub fn last_write_addr(&self) -> Option<u16> {
        self.last_write
    }

    pub fn cpu_cycles(&self) -> u64 {
        self.cycles
    }

    /// `(scanline, dot)` of the next PPU dot.
    pub fn ppu_position(&self) -> (i16, u16) {
        self.ppu.position()
    }

    /// Updates one button on pad `port` (0 or 1). Other ports are ignored.
    pub fn set_button(&mut self, port: usize, button: Button, pressed: bool) {
        if let Some(pad) = self.controllers.get_mut(port) {
            pad.set_button(button, pressed);
        }
    }

    pub fn set_buttons(&mut self, port: usize, mask: u8) {
        if let Some(pad) = self.controllers.get_mut(port) {
            pad.set_buttons(mask);
        }
    }

    pub fn buttons(&self, port: usize) -> u8 {
        self.controllers.get(port).map_or(0, Controller::buttons)
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn ram(&self) -> &[u8] {
        &self.ram[..]
    }

    fn with_bus<R>(&mut self, f: impl FnOnce(&mut Cpu, &mut CpuBus<'_>) -> R) -> R {
        let mut bus = CpuBus::new(
            &mut self.ram,
            &mut self.ppu,
            &mut self.ciram,
            self.cartridge.as_mut(),
            &mut self.controllers,
            &mut self.open_bus,
            &mut self.oam_dma_request,
            &mut self.cycles,
            &mut self.last_write,
        );
        f(&mut self.cpu, &mut bus)
    }
}

impl Default for Nes {
    fn default() -> Self {
        Self::new()
    }
}
