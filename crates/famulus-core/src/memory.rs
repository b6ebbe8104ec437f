//! Address map of the console.
//!
//! Every hard-wired address used by the bus, CPU and PPU lives here so the
//! decoding tables can be read side by side with the hardware documentation.

/// CPU-side address space.
pub mod cpu {
    /// Page 1 holds the hardware stack.
    pub const STACK_PAGE_START: u16 = 0x0100;

    /// NMI vector (`$FFFA/$FFFB`).
    pub const NMI_VECTOR: u16 = 0xFFFA;
    /// Reset vector (`$FFFC/$FFFD`).
    pub const RESET_VECTOR: u16 = 0xFFFC;
    /// IRQ/BRK vector (`$FFFE/$FFFF`).
    pub const IRQ_VECTOR: u16 = 0xFFFE;

    pub const INTERNAL_RAM_START: u16 = 0x0000;
    /// Size of the console's work RAM.
    pub const INTERNAL_RAM_SIZE: usize = 0x0800;
    /// Work RAM repeats every 2 KiB up to here.
    pub const INTERNAL_RAM_MIRROR_END: u16 = 0x1FFF;
    pub const INTERNAL_RAM_MASK: u16 = (INTERNAL_RAM_SIZE as u16) - 1;

    /// PPU registers repeat every 8 bytes in `$2000-$3FFF`.
    pub const PPU_REGISTER_BASE: u16 = 0x2000;
    pub const PPU_REGISTER_END: u16 = 0x3FFF;

    /// APU and I/O registers. Only DMA and the controller ports are wired.
    pub const IO_REGISTER_BASE: u16 = 0x4000;
    pub const IO_REGISTER_END: u16 = 0x401F;

    /// Writing a page number here copies that page into OAM.
    pub const OAM_DMA: u16 = 0x4014;
    /// Controller 1 data / strobe for both ports.
    pub const CONTROLLER_PORT_1: u16 = 0x4016;
    /// Controller 2 data.
    pub const CONTROLLER_PORT_2: u16 = 0x4017;

    /// Everything from here up is decoded by the cartridge.
    pub const CARTRIDGE_SPACE_BASE: u16 = 0x4020;
    /// NROM only answers in the PRG ROM window.
    pub const PRG_ROM_START: u16 = 0x8000;
    pub const CPU_ADDR_END: u16 = 0xFFFF;
}

/// PPU-side address space and register select.
pub mod ppu {
    pub const REGISTER_SELECT_MASK: u16 = 0x0007;

    /// Four-screen boards add another 2 KiB on the cartridge; we size CIRAM
    /// for the worst case and only address the first half otherwise.
    pub const CIRAM_FOUR_SCREEN_SIZE: usize = 0x1000;

    /// The PPU bus is 14 bits wide.
    pub const VRAM_MIRROR_MASK: u16 = 0x3FFF;

    pub const PATTERN_TABLE_0: u16 = 0x0000;
    pub const PATTERN_TABLE_1: u16 = 0x1000;
    /// Both pattern tables together (`$0000-$1FFF`).
    pub const CHR_SIZE: usize = 0x2000;

    pub const NAMETABLE_BASE: u16 = 0x2000;
    /// Attribute table offset inside a nametable.
    pub const ATTRIBUTE_OFFSET: u16 = 0x03C0;

    pub const PALETTE_BASE: u16 = 0x3F00;
    pub const PALETTE_RAM_SIZE: usize = 0x20;

    pub const OAM_RAM_SIZE: usize = 0x100;
    pub const SECONDARY_OAM_RAM_SIZE: usize = 0x20;

    /// CPU-visible PPU registers, by their canonical address.
    #[repr(u16)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Register {
        /// PPUCTRL
        Control = 0x2000,
        /// PPUMASK
        Mask = 0x2001,
        /// PPUSTATUS
        Status = 0x2002,
        /// OAMADDR
        OamAddr = 0x2003,
        /// OAMDATA
        OamData = 0x2004,
        /// PPUSCROLL
        Scroll = 0x2005,
        /// PPUADDR
        Addr = 0x2006,
        /// PPUDATA
        Data = 0x2007,
    }

    impl Register {
        /// Folds any mirror in `$2000-$3FFF` onto its register.
        pub const fn from_cpu_addr(addr: u16) -> Self {
            match addr & REGISTER_SELECT_MASK {
                0 => Self::Control,
                1 => Self::Mask,
                2 => Self::Status,
                3 => Self::OamAddr,
                4 => Self::OamData,
                5 => Self::Scroll,
                6 => Self::Addr,
                _ => Self::Data,
            }
        }
    }
}
