use crate::{
    bus::{Bus, OpenBus},
    cartridge::Cartridge,
    controller::Controller,
    mem_block::{cpu as cpu_ram, ppu::Ciram},
    memory::cpu as cpu_mem,
    ppu::{PPU_DOTS_PER_CPU_CYCLE, Ppu, PpuBus},
};

/// CPU-visible bus. Borrows the hardware from the owning [`crate::Nes`] for
/// the duration of one CPU step and runs the PPU in lockstep with it.
#[derive(Debug)]
pub struct CpuBus<'a> {
    ram: &'a mut cpu_ram::Ram,
    ppu: &'a mut Ppu,
    ciram: &'a mut Ciram,
    cartridge: Option<&'a mut Cartridge>,
    controllers: &'a mut [Controller; 2],
    open_bus: &'a mut OpenBus,
    oam_dma_request: &'a mut Option<u8>,
    /// CPU cycles since power-on.
    cycles: &'a mut u64,
    last_write: &'a mut Option<u16>,
}

impl<'a> CpuBus<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        ram: &'a mut cpu_ram::Ram,
        ppu: &'a mut Ppu,
        ciram: &'a mut Ciram,
        cartridge: Option<&'a mut Cartridge>,
        controllers: &'a mut [Controller; 2],
        open_bus: &'a mut OpenBus,
        oam_dma_request: &'a mut Option<u8>,
        cycles: &'a mut u64,
        last_write: &'a mut Option<u16>,
    ) -> Self {
        Self {
            ram,
            ppu,
            ciram,
            cartridge,
            controllers,
            open_bus,
            oam_dma_request,
            cycles,
            last_write,
        }
    }

    pub fn ppu(&self) -> &Ppu {
        self.ppu
    }

    pub fn ram(&self) -> &[u8] {
        &self.ram[..]
    }

    /// One CPU cycle: the PPU runs three dots.
    fn tick_cpu(&mut self) {
        *self.cycles = self.cycles.wrapping_add(1);
        let mut ppu_bus = PpuBus::new(self.ciram, self.cartridge.as_deref_mut());
        for _ in 0..PPU_DOTS_PER_CPU_CYCLE {
            self.ppu.clock(&mut ppu_bus);
        }
    }

    /// Address decode for reads, without advancing time.
    pub fn cpu_read(&mut self, addr: u16) -> u8 {
        let now = *self.cycles;
        let mut driven = true;
        let value = match addr {
            cpu_mem::INTERNAL_RAM_START..=cpu_mem::INTERNAL_RAM_MIRROR_END => {
                self.ram[usize::from(addr & cpu_mem::INTERNAL_RAM_MASK)]
            }
            cpu_mem::PPU_REGISTER_BASE..=cpu_mem::PPU_REGISTER_END => {
                let mut ppu_bus = PpuBus::new(self.ciram, self.cartridge.as_deref_mut());
                self.ppu.cpu_read(addr, &mut ppu_bus)
            }
            cpu_mem::CONTROLLER_PORT_1 => self.controllers[0].read(),
            cpu_mem::CONTROLLER_PORT_2 => self.controllers[1].read(),
            cpu_mem::IO_REGISTER_BASE..=cpu_mem::IO_REGISTER_END => {
                driven = false;
                self.open_bus.sample(now)
            }
            cpu_mem::CARTRIDGE_SPACE_BASE..=cpu_mem::CPU_ADDR_END => {
                match self.cartridge.as_deref().and_then(|cart| cart.cpu_read(addr)) {
                    Some(value) => value,
                    None => {
                        driven = false;
                        self.open_bus.sample(now)
                    }
                }
            }
        };

        if driven {
            self.open_bus.latch(value, now);
        }
        value
    }

    /// Address decode for writes, without advancing time.
    pub fn cpu_write(&mut self, addr: u16, data: u8) {
        *self.last_write = Some(addr);
        self.open_bus.latch(data, *self.cycles);

        match addr {
            cpu_mem::INTERNAL_RAM_START..=cpu_mem::INTERNAL_RAM_MIRROR_END => {
                self.ram[usize::from(addr & cpu_mem::INTERNAL_RAM_MASK)] = data;
            }
            cpu_mem::PPU_REGISTER_BASE..=cpu_mem::PPU_REGISTER_END => {
                let mut ppu_bus = PpuBus::new(self.ciram, self.cartridge.as_deref_mut());
                self.ppu.cpu_write(addr, data, &mut ppu_bus);
            }
            cpu_mem::OAM_DMA => *self.oam_dma_request = Some(data),
            cpu_mem::CONTROLLER_PORT_1 => {
                for pad in self.controllers.iter_mut() {
                    pad.write_strobe(data);
                }
            }
            // APU registers and the rest of the I/O block are not wired.
            cpu_mem::IO_REGISTER_BASE..=cpu_mem::IO_REGISTER_END => {}
            // NROM has no registers; PRG ROM ignores writes.
            cpu_mem::CARTRIDGE_SPACE_BASE..=cpu_mem::CPU_ADDR_END => {}
        }
    }

    /// PPU address space read through the PPU, palette included.
    pub fn ppu_read(&mut self, addr: u16) -> u8 {
        let ppu_bus = PpuBus::new(self.ciram, self.cartridge.as_deref_mut());
        self.ppu.read_vram(addr, &ppu_bus)
    }

    pub fn ppu_write(&mut self, addr: u16, value: u8) {
        let mut ppu_bus = PpuBus::new(self.ciram, self.cartridge.as_deref_mut());
        self.ppu.write_vram(addr, value, &mut ppu_bus);
    }
}

/// Shared-borrow view of the CPU address space for debuggers.
///
/// Decodes like [`CpuBus::cpu_read`] but touches nothing: register reads
/// keep their latches, pads keep their shift position, and the open-bus
/// latch is only sampled.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CpuPeek<'a> {
    pub(crate) ram: &'a cpu_ram::Ram,
    pub(crate) ppu: &'a Ppu,
    pub(crate) cartridge: Option<&'a Cartridge>,
    pub(crate) controllers: &'a [Controller; 2],
    pub(crate) open_bus: &'a OpenBus,
    pub(crate) now: u64,
}

impl CpuPeek<'_> {
    pub(crate) fn peek(&self, addr: u16) -> u8 {
        match addr {
            cpu_mem::INTERNAL_RAM_START..=cpu_mem::INTERNAL_RAM_MIRROR_END => {
                self.ram[usize::from(addr & cpu_mem::INTERNAL_RAM_MASK)]
            }
            cpu_mem::PPU_REGISTER_BASE..=cpu_mem::PPU_REGISTER_END => {
                self.ppu.peek_register(addr)
            }
            cpu_mem::CONTROLLER_PORT_1 => self.controllers[0].peek(),
            cpu_mem::CONTROLLER_PORT_2 => self.controllers[1].peek(),
            cpu_mem::IO_REGISTER_BASE..=cpu_mem::IO_REGISTER_END => self.open_bus.sample(self.now),
            cpu_mem::CARTRIDGE_SPACE_BASE..=cpu_mem::CPU_ADDR_END => self
                .cartridge
                .and_then(|cart| cart.cpu_read(addr))
                .unwrap_or_else(|| self.open_bus.sample(self.now)),
        }
    }
}

impl Bus for CpuBus<'_> {
    fn read(&mut self, addr: u16) -> u8 {
        self.tick_cpu();
        self.cpu_read(addr)
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.tick_cpu();
        self.cpu_write(addr, data);
    }

    fn internal_cycle(&mut self) {
        self.tick_cpu();
    }

    fn peek(&self, addr: u16) -> u8 {
        CpuPeek {
            ram: self.ram,
            ppu: self.ppu,
            cartridge: self.cartridge.as_deref(),
            controllers: self.controllers,
            open_bus: self.open_bus,
            now: *self.cycles,
        }
        .peek(addr)
    }

    fn take_nmi(&mut self) -> bool {
        self.ppu.take_nmi()
    }

    fn take_oam_dma_request(&mut self) -> Option<u8> {
        self.oam_dma_request.take()
    }

    fn cycles(&self) -> u64 {
        *self.cycles
    }
}
