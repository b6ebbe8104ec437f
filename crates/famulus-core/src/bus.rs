use std::fmt::Debug;

use crate::memory;

pub mod cpu;
#[cfg(test)]
pub mod mock;
pub(crate) mod open_bus;

pub(crate) use open_bus::OpenBus;

/// First byte of the CPU stack page; `S` is an offset into it.
pub(crate) const STACK_ADDR: u16 = memory::cpu::STACK_PAGE_START;

/// What the CPU sees when it touches memory.
///
/// Every timed call costs exactly one CPU cycle: the implementation advances
/// the rest of the machine first and then performs the access, so a register
/// read observes the PPU as it is after that cycle. Unmapped and write-only
/// addresses return the last value driven on the data bus (see
/// [`open_bus::OpenBus`]).
pub trait Bus: Debug {
    /// Timed read. Register reads have their side effects.
    fn read(&mut self, addr: u16) -> u8;

    /// Timed write.
    fn write(&mut self, addr: u16, data: u8);

    /// A cycle with no bus access that still has to advance timing.
    fn internal_cycle(&mut self);

    /// Side-effect-free read for debuggers and tracing.
    fn peek(&self, addr: u16) -> u8;

    /// Consumes the NMI edge latched by the PPU, if any.
    fn take_nmi(&mut self) -> bool {
        false
    }

    /// Consumes a page number written to `$4014`.
    fn take_oam_dma_request(&mut self) -> Option<u8> {
        None
    }

    /// CPU cycles elapsed since power-on.
    fn cycles(&self) -> u64;
}
