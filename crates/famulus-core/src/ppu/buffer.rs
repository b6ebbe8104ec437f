//! Double-buffered frame of palette indices.
//!
//! The PPU writes into the back plane while the front plane holds the last
//! completed frame. [`FrameBuffer::swap`] runs once per frame at the start
//! of vblank.

use super::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const FRAME_LEN: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    planes: [Box<[u8]>; 2],
    /// Index of the plane being written.
    back: usize,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            planes: [
                vec![0; FRAME_LEN].into_boxed_slice(),
                vec![0; FRAME_LEN].into_boxed_slice(),
            ],
            back: 0,
        }
    }

    /// Last completed frame, row-major, one 6-bit palette index per pixel.
    pub fn render(&self) -> &[u8] {
        &self.planes[self.back ^ 1]
    }

    #[inline]
    pub(crate) fn write_index(&mut self, x: usize, y: usize, index: u8) {
        debug_assert!(x < SCREEN_WIDTH && y < SCREEN_HEIGHT);
        self.planes[self.back][y * SCREEN_WIDTH + x] = index;
    }

    /// Publishes the back plane. The new back plane keeps stale pixels until
    /// the next frame overwrites them.
    pub(crate) fn swap(&mut self) {
        self.back ^= 1;
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("back", &self.back)
            .field("len", &FRAME_LEN)
            .finish()
    }
}
