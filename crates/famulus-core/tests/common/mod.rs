#![allow(dead_code)]

use anyhow::Result;
use famulus_core::Nes;

pub const PRG_BANK_SIZE: usize = 0x4000;
pub const CHR_BANK_SIZE: usize = 0x2000;
pub const PRG_START: u16 = 0x8000;

/// Builds single-bank NROM images in memory.
///
/// PRG is a 16 KiB bank filled with `NOP`, visible at both `$8000` and
/// `$C000`. All three vectors default to `$8000`.
#[derive(Debug, Clone)]
pub struct RomBuilder {
    prg: Vec<u8>,
    chr: Option<Vec<u8>>,
    flags6: u8,
    reset: u16,
    nmi: u16,
}

impl RomBuilder {
    pub fn new() -> Self {
        Self {
            prg: vec![0xEA; PRG_BANK_SIZE],
            chr: Some(vec![0; CHR_BANK_SIZE]),
            flags6: 0,
            reset: PRG_START,
            nmi: PRG_START,
        }
    }

    /// Places `bytes` at CPU address `addr` (`$8000-$FFF9`).
    pub fn code(mut self, addr: u16, bytes: &[u8]) -> Self {
        let offset = usize::from(addr - PRG_START) % PRG_BANK_SIZE;
        self.prg[offset..offset + bytes.len()].copy_from_slice(bytes);
        self
    }

    pub fn reset_vector(mut self, addr: u16) -> Self {
        self.reset = addr;
        self
    }

    pub fn nmi_vector(mut self, addr: u16) -> Self {
        self.nmi = addr;
        self
    }

    /// No CHR banks: the board carries 8 KiB of CHR RAM.
    pub fn chr_ram(mut self) -> Self {
        self.chr = None;
        self
    }

    pub fn vertical_mirroring(mut self) -> Self {
        self.flags6 |= 0x01;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut prg = self.prg.clone();
        let vectors = [self.nmi, self.reset, self.reset];
        for (i, vector) in vectors.iter().enumerate() {
            let at = PRG_BANK_SIZE - 6 + i * 2;
            prg[at..at + 2].copy_from_slice(&vector.to_le_bytes());
        }

        let chr_banks = u8::from(self.chr.is_some());
        let mut image = vec![b'N', b'E', b'S', 0x1A, 1, chr_banks, self.flags6, 0];
        image.resize(16, 0);
        image.extend_from_slice(&prg);
        if let Some(chr) = &self.chr {
            image.extend_from_slice(chr);
        }
        image
    }

    /// A console with this image inserted and reset.
    pub fn boot(&self) -> Result<Nes> {
        let mut nes = Nes::new();
        nes.load_rom(&self.build())?;
        Ok(nes)
    }
}

impl Default for RomBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `LDA #value`
pub fn lda(value: u8) -> [u8; 2] {
    [0xA9, value]
}

/// `STA addr`
pub fn sta(addr: u16) -> [u8; 3] {
    let [lo, hi] = addr.to_le_bytes();
    [0x8D, lo, hi]
}

/// `JMP addr`
pub fn jmp(addr: u16) -> [u8; 3] {
    let [lo, hi] = addr.to_le_bytes();
    [0x4C, lo, hi]
}

/// Straight-line program builder.
#[derive(Debug, Default, Clone)]
pub struct Program {
    bytes: Vec<u8>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// `LDA #value; STA addr`
    pub fn store(self, addr: u16, value: u8) -> Self {
        self.raw(&lda(value)).raw(&sta(addr))
    }

    /// Points PPUADDR at `addr` and writes `data` through PPUDATA.
    pub fn ppu_write(mut self, addr: u16, data: &[u8]) -> Self {
        let [lo, hi] = addr.to_le_bytes();
        self = self.store(0x2006, hi).store(0x2006, lo);
        for &byte in data {
            self = self.store(0x2007, byte);
        }
        self
    }

    /// Ends with a jump to itself; returns the bytes and the loop address.
    pub fn halt(self, origin: u16) -> (Vec<u8>, u16) {
        let at = origin + self.bytes.len() as u16;
        let bytes = self.raw(&jmp(at)).bytes;
        (bytes, at)
    }
}
