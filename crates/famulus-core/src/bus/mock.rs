use crate::{
    bus::Bus,
    cpu::{Cpu, status::Status},
    memory::cpu as cpu_mem,
};

/// Flat 64 KiB bus that counts cycles and records every write.
#[derive(Debug)]
pub struct MockBus {
    pub mem: Box<[u8]>,
    pub writes: Vec<(u16, u8)>,
    pub cycles: u64,
    /// NMI edge handed to the CPU on its next step.
    pub nmi: bool,
    /// Treat `$4014` writes as OAM DMA requests.
    pub dma_on_4014: bool,
    dma_page: Option<u8>,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            mem: vec![0; 0x1_0000].into_boxed_slice(),
            writes: Vec::new(),
            cycles: 0,
            nmi: false,
            dma_on_4014: false,
            dma_page: None,
        }
    }

    pub fn with_program(origin: u16, program: &[u8]) -> Self {
        let mut bus = Self::new();
        bus.load(origin, program);
        bus
    }

    pub fn load(&mut self, addr: u16, bytes: &[u8]) {
        let start = usize::from(addr);
        self.mem[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub fn set_vector(&mut self, vector: u16, target: u16) {
        self.load(vector, &target.to_le_bytes());
    }

    /// A CPU past its reset sequence, about to fetch from `pc`.
    pub fn cpu_at(&self, pc: u16) -> Cpu {
        let mut cpu = Cpu::new();
        cpu.s = 0xFD;
        cpu.p = Status::power_up();
        cpu.pc = pc;
        cpu
    }
}

impl Default for MockBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for MockBus {
    fn read(&mut self, addr: u16) -> u8 {
        self.cycles += 1;
        self.mem[usize::from(addr)]
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.cycles += 1;
        self.writes.push((addr, data));
        if self.dma_on_4014 && addr == cpu_mem::OAM_DMA {
            self.dma_page = Some(data);
        }
        self.mem[usize::from(addr)] = data;
    }

    fn internal_cycle(&mut self) {
        self.cycles += 1;
    }

    fn peek(&self, addr: u16) -> u8 {
        self.mem[usize::from(addr)]
    }

    fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi)
    }

    fn take_oam_dma_request(&mut self) -> Option<u8> {
        self.dma_page.take()
    }

    fn cycles(&self) -> u64 {
        self.cycles
    }
}
