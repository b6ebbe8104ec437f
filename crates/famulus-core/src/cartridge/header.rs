//! iNES header parsing.
//!
//! Only the fields NROM boards care about are decoded: section sizes, the
//! trainer flag, nametable layout and the mapper number used to refuse
//! everything that is not mapper 0.

use bitflags::bitflags;

use crate::error::Error;

const NES_MAGIC: &[u8; 4] = b"NES\x1A";

/// Size of the fixed iNES header in bytes.
pub const NES_HEADER_LEN: usize = 16;
/// One PRG bank as counted by byte 4.
pub const PRG_BANK_SIZE: usize = 16 * 1024;
/// One CHR bank as counted by byte 5.
pub const CHR_BANK_SIZE: usize = 8 * 1024;

bitflags! {
    /// Header byte 6.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags6: u8 {
        /// 0 = horizontal arrangement, 1 = vertical.
        const VERTICAL_MIRRORING = 0b0000_0001;
        const BATTERY            = 0b0000_0010;
        /// 512-byte trainer sits between header and PRG.
        const TRAINER            = 0b0000_0100;
        const FOUR_SCREEN        = 0b0000_1000;
        const MAPPER_LOW         = 0b1111_0000;
    }
}

bitflags! {
    /// Header byte 7.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags7: u8 {
        const NES2_IDENTIFIER = 0b0000_1100;
        const MAPPER_HIGH     = 0b1111_0000;
    }
}

/// How the four logical nametables fold onto nametable RAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mirroring {
    /// `$2000 = $2400`, `$2800 = $2C00` (vertical scrolling games).
    Horizontal,
    /// `$2000 = $2800`, `$2400 = $2C00` (horizontal scrolling games).
    #[default]
    Vertical,
    /// Four distinct nametables backed by extra cartridge RAM.
    FourScreen,
}

impl Mirroring {
    /// Maps a PPU address in `$2000-$3EFF` to an offset into nametable RAM.
    pub fn ciram_offset(self, addr: u16) -> usize {
        let relative = (addr - 0x2000) & 0x0FFF;
        let table = relative / 0x0400;
        let offset = relative & 0x03FF;
        let physical = match self {
            Self::Horizontal => table >> 1,
            Self::Vertical => table & 1,
            Self::FourScreen => table,
        };
        usize::from(physical * 0x0400 + offset)
    }
}

/// Decoded iNES header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
    pub prg_banks: u8,
    pub chr_banks: u8,
    pub mapper: u16,
    pub mirroring: Mirroring,
    pub trainer_present: bool,
    pub battery_backed: bool,
}

impl Header {
    /// Parses the first [`NES_HEADER_LEN`] bytes of an image.
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        let raw: &[u8; NES_HEADER_LEN] = bytes
            .get(..NES_HEADER_LEN)
            .and_then(|slice| slice.try_into().ok())
            .ok_or(Error::TooShort {
                actual: bytes.len(),
            })?;

        if &raw[..4] != NES_MAGIC {
            return Err(Error::InvalidMagic);
        }

        let flags6 = Flags6::from_bits_truncate(raw[6]);
        let flags7 = Flags7::from_bits_truncate(raw[7]);

        let mirroring = if flags6.contains(Flags6::FOUR_SCREEN) {
            Mirroring::FourScreen
        } else if flags6.contains(Flags6::VERTICAL_MIRRORING) {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        // Old dumps sometimes carry ripper tags in bytes 7..16; byte 7 is only
        // trusted when the padding is clean or the header is NES 2.0.
        let nes2 = (flags7 & Flags7::NES2_IDENTIFIER).bits() == 0b0000_1000;
        let padding_clean = raw[12..].iter().all(|&b| b == 0);
        let mapper_high = if nes2 || padding_clean {
            (flags7 & Flags7::MAPPER_HIGH).bits()
        } else {
            0
        };
        let mapper = u16::from(mapper_high | ((flags6 & Flags6::MAPPER_LOW).bits() >> 4));

        Ok(Self {
            prg_banks: raw[4],
            chr_banks: raw[5],
            mapper,
            mirroring,
            trainer_present: flags6.contains(Flags6::TRAINER),
            battery_backed: flags6.contains(Flags6::BATTERY),
        })
    }

    pub fn prg_rom_size(&self) -> usize {
        usize::from(self.prg_banks) * PRG_BANK_SIZE
    }

    /// Zero means the board carries CHR RAM instead.
    pub fn chr_rom_size(&self) -> usize {
        usize::from(self.chr_banks) * CHR_BANK_SIZE
    }
}
