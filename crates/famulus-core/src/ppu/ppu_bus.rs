use crate::{
    cartridge::{Cartridge, header::Mirroring},
    mem_block::ppu::Ciram,
    memory::ppu as ppu_mem,
};

/// The PPU's view of its address space below the palette: CHR on the
/// cartridge and nametables in CIRAM.
///
/// Built by the CPU bus for each PPU call so the borrows stay short.
#[derive(Debug)]
pub struct PpuBus<'a> {
    ciram: &'a mut Ciram,
    cartridge: Option<&'a mut Cartridge>,
}

impl<'a> PpuBus<'a> {
    pub fn new(ciram: &'a mut Ciram, cartridge: Option<&'a mut Cartridge>) -> Self {
        Self { ciram, cartridge }
    }

    fn mirroring(&self) -> Mirroring {
        self.cartridge
            .as_deref()
            .map(Cartridge::mirroring)
            .unwrap_or_default()
    }

    /// Reads `$0000-$3EFF`. CHR reads with no cartridge return 0.
    pub fn read(&self, addr: u16) -> u8 {
        let addr = addr & ppu_mem::VRAM_MIRROR_MASK;
        if addr < ppu_mem::NAMETABLE_BASE {
            self.cartridge
                .as_deref()
                .map_or(0, |cart| cart.ppu_read(addr))
        } else {
            self.ciram[self.mirroring().ciram_offset(addr)]
        }
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        let addr = addr & ppu_mem::VRAM_MIRROR_MASK;
        if addr < ppu_mem::NAMETABLE_BASE {
            if let Some(cart) = self.cartridge.as_deref_mut() {
                cart.ppu_write(addr, data);
            }
        } else {
            let offset = self.mirroring().ciram_offset(addr);
            self.ciram[offset] = data;
        }
    }
}
