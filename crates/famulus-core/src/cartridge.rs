//! NROM cartridges.
//!
//! NROM has no banking hardware: PRG ROM answers at `$8000-$FFFF` (a single
//! 16 KiB bank shows up twice) and 8 KiB of CHR sits under the PPU at
//! `$0000-$1FFF`. Boards without CHR ROM carry CHR RAM instead.

use std::{fs, path::Path};

use crate::{
    cartridge::header::{Header, Mirroring, NES_HEADER_LEN},
    error::Error,
    memory::{cpu as cpu_mem, ppu as ppu_mem},
};

pub mod header;

pub const TRAINER_SIZE: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Chr {
    Rom(Box<[u8]>),
    Ram(Box<[u8]>),
}

impl Chr {
    fn bytes(&self) -> &[u8] {
        match self {
            Self::Rom(bytes) | Self::Ram(bytes) => bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cartridge {
    header: Header,
    prg_rom: Box<[u8]>,
    chr: Chr,
}

impl Cartridge {
    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn mirroring(&self) -> Mirroring {
        self.header.mirroring
    }

    /// CPU read in the cartridge window. `None` leaves the data bus floating.
    pub fn cpu_read(&self, addr: u16) -> Option<u8> {
        if addr < cpu_mem::PRG_ROM_START {
            return None;
        }
        // 16 KiB images fold the upper bank onto the lower one.
        let idx = usize::from(addr - cpu_mem::PRG_ROM_START) % self.prg_rom.len();
        Some(self.prg_rom[idx])
    }

    pub fn ppu_read(&self, addr: u16) -> u8 {
        let chr = self.chr.bytes();
        chr[usize::from(addr) % chr.len()]
    }

    /// Only CHR RAM boards accept pattern writes.
    pub fn ppu_write(&mut self, addr: u16, data: u8) {
        if let Chr::Ram(ram) = &mut self.chr {
            let idx = usize::from(addr) % ram.len();
            ram[idx] = data;
        }
    }

    pub fn has_chr_ram(&self) -> bool {
        matches!(self.chr, Chr::Ram(_))
    }
}

/// Builds a cartridge from a complete iNES image.
pub fn load_cartridge(bytes: &[u8]) -> Result<Cartridge, Error> {
    let header = Header::parse(bytes)?;

    if header.mapper != 0 {
        return Err(Error::UnsupportedMapper(header.mapper));
    }
    if !matches!(header.prg_banks, 1 | 2) {
        return Err(Error::UnsupportedPrgBanks(header.prg_banks));
    }

    let trainer_len = if header.trainer_present {
        TRAINER_SIZE
    } else {
        0
    };
    let prg_start = NES_HEADER_LEN + trainer_len;
    let chr_start = prg_start + header.prg_rom_size();
    let expected = chr_start + header.chr_rom_size();
    if bytes.len() != expected {
        return Err(Error::LengthMismatch {
            expected,
            actual: bytes.len(),
        });
    }

    let prg_rom: Box<[u8]> = bytes[prg_start..chr_start].into();
    let chr = if header.chr_banks == 0 {
        Chr::Ram(vec![0; ppu_mem::CHR_SIZE].into_boxed_slice())
    } else {
        Chr::Rom(bytes[chr_start..expected].into())
    };

    tracing::info!(
        prg_kib = prg_rom.len() / 1024,
        chr_kib = chr.bytes().len() / 1024,
        chr_ram = matches!(chr, Chr::Ram(_)),
        mirroring = ?header.mirroring,
        "loaded NROM cartridge"
    );

    Ok(Cartridge {
        header,
        prg_rom,
        chr,
    })
}

/// Reads an image from disk and hands it to [`load_cartridge`].
pub fn load_cartridge_from_file<P>(path: P) -> Result<Cartridge, Error>
where
    P: AsRef<Path>,
{
    let bytes = fs::read(path)?;
    load_cartridge(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::header::{CHR_BANK_SIZE, PRG_BANK_SIZE};

    fn base_header(prg_banks: u8, chr_banks: u8, flags6: u8) -> Vec<u8> {
        vec![
            b'N', b'E', b'S', 0x1A, prg_banks, chr_banks, flags6, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        ]
    }

    #[test]
    fn single_bank_is_mirrored_into_upper_half() {
        let mut rom = base_header(1, 1, 0);
        let mut prg = vec![0xEA; PRG_BANK_SIZE];
        prg[0] = 0x11;
        prg[PRG_BANK_SIZE - 1] = 0x22;
        rom.extend(prg);
        rom.extend(vec![0x55; CHR_BANK_SIZE]);

        let cart = load_cartridge(&rom).expect("valid image");
        assert_eq!(cart.cpu_read(0x8000), Some(0x11));
        assert_eq!(cart.cpu_read(0xC000), Some(0x11));
        assert_eq!(cart.cpu_read(0xBFFF), Some(0x22));
        assert_eq!(cart.cpu_read(0xFFFF), Some(0x22));
        assert_eq!(cart.cpu_read(0x6000), None);
        assert_eq!(cart.ppu_read(0x1FFF), 0x55);
        assert_eq!(cart.mirroring(), Mirroring::Horizontal);
    }

    #[test]
    fn two_banks_map_linearly() {
        let mut rom = base_header(2, 1, 1);
        rom.extend(vec![0xAA; PRG_BANK_SIZE]);
        rom.extend(vec![0xBB; PRG_BANK_SIZE]);
        rom.extend(vec![0; CHR_BANK_SIZE]);

        let cart = load_cartridge(&rom).expect("valid image");
        assert_eq!(cart.cpu_read(0x8000), Some(0xAA));
        assert_eq!(cart.cpu_read(0xC000), Some(0xBB));
        assert_eq!(cart.mirroring(), Mirroring::Vertical);
    }

    #[test]
    fn trainer_is_skipped() {
        let mut rom = base_header(1, 1, 0b0000_0100);
        rom.extend(vec![0xFE; TRAINER_SIZE]);
        rom.extend(vec![0xAA; PRG_BANK_SIZE]);
        rom.extend(vec![0x00; CHR_BANK_SIZE]);

        let cart = load_cartridge(&rom).expect("valid image");
        assert!(cart.header().trainer_present);
        assert_eq!(cart.cpu_read(0x8000), Some(0xAA));
    }

    #[test]
    fn chr_ram_accepts_writes_and_rom_does_not() {
        let mut rom = base_header(1, 0, 0);
        rom.extend(vec![0; PRG_BANK_SIZE]);
        let mut cart = load_cartridge(&rom).expect("valid image");
        assert!(cart.has_chr_ram());
        cart.ppu_write(0x0123, 0x5A);
        assert_eq!(cart.ppu_read(0x0123), 0x5A);

        let mut rom = base_header(1, 1, 0);
        rom.extend(vec![0; PRG_BANK_SIZE]);
        rom.extend(vec![0x77; CHR_BANK_SIZE]);
        let mut cart = load_cartridge(&rom).expect("valid image");
        cart.ppu_write(0x0123, 0x5A);
        assert_eq!(cart.ppu_read(0x0123), 0x77);
    }

    #[test]
    fn truncated_image_is_rejected() {
        let mut rom = base_header(1, 1, 0);
        rom.extend(vec![0; 1024]);
        assert!(matches!(
            load_cartridge(&rom),
            Err(Error::LengthMismatch {
                expected,
                actual,
            }) if expected == NES_HEADER_LEN + PRG_BANK_SIZE + CHR_BANK_SIZE && actual == NES_HEADER_LEN + 1024
        ));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut rom = base_header(1, 1, 0);
        rom.extend(vec![0; PRG_BANK_SIZE + CHR_BANK_SIZE + 1]);
        assert!(matches!(
            load_cartridge(&rom),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn other_mappers_are_rejected() {
        let mut rom = base_header(1, 1, 0x10);
        rom.extend(vec![0; PRG_BANK_SIZE + CHR_BANK_SIZE]);
        assert!(matches!(
            load_cartridge(&rom),
            Err(Error::UnsupportedMapper(1))
        ));
    }

    #[test]
    fn bank_counts_outside_nrom_are_rejected() {
        for banks in [0u8, 3] {
            let mut rom = base_header(banks, 1, 0);
            rom.extend(vec![0; usize::from(banks) * PRG_BANK_SIZE + CHR_BANK_SIZE]);
            assert!(matches!(
                load_cartridge(&rom),
                Err(Error::UnsupportedPrgBanks(b)) if b == banks
            ));
        }
    }
}
