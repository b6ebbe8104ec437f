use std::fmt;

use crate::cartridge::header::NES_HEADER_LEN;

/// Reasons a ROM image is refused. Loading never yields a partial cartridge.
#[derive(Debug)]
pub enum Error {
    /// Fewer bytes than the 16-byte header.
    TooShort { actual: usize },
    /// The image does not start with `NES<EOF>`.
    InvalidMagic,
    /// Only mapper 0 (NROM) boards are emulated.
    UnsupportedMapper(u16),
    /// NROM carries one or two 16 KiB PRG banks.
    UnsupportedPrgBanks(u8),
    /// Image size disagrees with header + trainer + PRG + CHR.
    LengthMismatch { expected: usize, actual: usize },
    /// Reading the image from disk failed.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { actual } => {
                write!(f, "header expected {NES_HEADER_LEN} bytes, got {actual}")
            }
            Self::InvalidMagic => write!(f, "missing NES magic bytes"),
            Self::UnsupportedMapper(mapper) => write!(f, "mapper {mapper} is not supported"),
            Self::UnsupportedPrgBanks(banks) => {
                write!(f, "NROM expects 1 or 2 PRG banks, header declares {banks}")
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "image should be {expected} bytes long, got {actual}")
            }
            Self::Io(err) => write!(f, "i/o error while reading cartridge: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
