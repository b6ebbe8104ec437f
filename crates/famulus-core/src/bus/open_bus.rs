//! Floating data bus.
//!
//! When nothing drives the data lines, a read returns whatever was last on
//! them. The charge leaks away after a while, so a value that has not been
//! refreshed for a few frames reads back as zero.

/// CPU cycles before an unrefreshed value decays to 0 (about three frames).
const DECAY_CYCLES: u64 = 90_000;

/// Last value driven on the CPU data bus.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub(crate) struct OpenBus {
    value: u8,
    driven_at: u64,
}

impl OpenBus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }

    /// Records a value some device just drove onto the bus at cycle `now`.
    pub(crate) fn latch(&mut self, value: u8, now: u64) {
        self.value = value;
        self.driven_at = now;
    }

    /// Value a floating read observes at cycle `now`.
    pub(crate) fn sample(&self, now: u64) -> u8 {
        if now.saturating_sub(self.driven_at) > DECAY_CYCLES {
            0
        } else {
            self.value
        }
    }
}
