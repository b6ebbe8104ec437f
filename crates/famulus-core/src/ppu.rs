//! 2C02 picture processing unit.
//!
//! [`Ppu::clock`] handles one dot of the 341 x 262 raster and then advances.
//! Scanlines run from -1 (pre-render) through 260, dots from 0 (idle) through
//! 340; every event below uses that hardware numbering.
//!
//! Per dot, in order:
//! - vblank edges at (241, 1) and (-1, 1);
//! - the background fetch cycle and scroll counter updates;
//! - secondary OAM clear (dots 1-64) and sprite evaluation (65-256);
//! - sprite pattern fetches for the next line (257-320);
//! - pixel output on visible lines (dots 1-256).
//!
//! The odd-frame skipped dot is not emulated, so every frame is exactly
//! [`DOTS_PER_FRAME`] dots.

pub mod buffer;
pub mod palette;

mod background_pipeline;
mod ppu_bus;
mod registers;
mod sprite;
mod sprite_pipeline;
mod sprite_state;

use core::fmt;

use buffer::FrameBuffer;
pub use ppu_bus::PpuBus;

use crate::{
    mem_block::ppu::{PaletteRam, SecondaryOamRam},
    memory::ppu::{self as ppu_mem, Register as PpuRegister},
    reset_kind::ResetKind,
};
use background_pipeline::{BgPipeline, TileLatch};
use palette::palette_slot;
use registers::{Mask, Registers, Status};
use sprite::{ATTRIBUTE_READ_MASK, Sprite};
use sprite_pipeline::{SPRITES_PER_LINE, SpritePipeline, SpriteRow};
use sprite_state::{SpriteEvalPhase, SpriteEvalState};

pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 240;

pub const DOTS_PER_SCANLINE: u16 = 341;
pub const SCANLINES_PER_FRAME: u16 = 262;
pub const DOTS_PER_FRAME: u64 = DOTS_PER_SCANLINE as u64 * SCANLINES_PER_FRAME as u64;
/// NTSC runs the PPU at three times the CPU clock.
pub const PPU_DOTS_PER_CPU_CYCLE: u8 = 3;

const LAST_DOT: u16 = DOTS_PER_SCANLINE - 1;
const PRE_RENDER_LINE: i16 = -1;
const VISIBLE_LINES: i16 = SCREEN_HEIGHT as i16;
const VBLANK_LINE: i16 = 241;
const LAST_SCANLINE: i16 = 260;

/// PPUDATA reads of palette space refill the buffer from the nametable
/// mirror underneath (`$2F00-$2FFF`).
const PALETTE_SHADOW_OFFSET: u16 = 0x1000;

#[derive(Clone, PartialEq, Eq)]
pub struct Ppu {
    registers: Registers,
    palette: PaletteRam,
    secondary_oam: SecondaryOamRam,
    bg: BgPipeline,
    tile: TileLatch,
    sprites: SpritePipeline,
    eval: SpriteEvalState,
    /// Rows fetched during dots 257-320 for the next scanline.
    fetched: [SpriteRow; SPRITES_PER_LINE],
    fetched_count: usize,
    fetched_sprite0: bool,
    dot: u16,
    scanline: i16,
    frame: u64,
    nmi_pending: bool,
    framebuffer: FrameBuffer,
}

impl fmt::Debug for Ppu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ppu")
            .field("registers", &self.registers)
            .field("dot", &self.dot)
            .field("scanline", &self.scanline)
            .field("frame", &self.frame)
            .field("nmi_pending", &self.nmi_pending)
            .finish_non_exhaustive()
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    /// Power-on state, parked at the start of the pre-render line.
    pub fn new() -> Self {
        Self {
            registers: Registers::new(),
            palette: PaletteRam::new(),
            secondary_oam: SecondaryOamRam::filled(0xFF),
            bg: BgPipeline::default(),
            tile: TileLatch::default(),
            sprites: SpritePipeline::default(),
            eval: SpriteEvalState::default(),
            fetched: [SpriteRow::default(); SPRITES_PER_LINE],
            fetched_count: 0,
            fetched_sprite0: false,
            dot: 0,
            scanline: PRE_RENDER_LINE,
            frame: 0,
            nmi_pending: false,
            framebuffer: FrameBuffer::new(),
        }
    }

    pub fn reset(&mut self, kind: ResetKind) {
        match kind {
            ResetKind::PowerOn => *self = Self::new(),
            ResetKind::Soft => {
                self.registers.soft_reset();
                self.nmi_pending = false;
            }
        }
    }

    /// Completed frames, counted at each vblank start.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// `(scanline, dot)` of the next dot to be processed.
    pub fn position(&self) -> (i16, u16) {
        (self.scanline, self.dot)
    }

    /// Last completed frame as 6-bit palette indices.
    pub fn render_buffer(&self) -> &[u8] {
        self.framebuffer.render()
    }

    pub fn control(&self) -> u8 {
        self.registers.control.bits()
    }

    pub fn mask(&self) -> u8 {
        self.registers.mask.bits()
    }

    pub fn status(&self) -> u8 {
        self.registers.status.bits()
    }

    /// Current VRAM address `v`.
    pub fn vram_addr(&self) -> u16 {
        self.registers.vram.v.raw()
    }

    pub fn oam(&self) -> &[u8] {
        &self.registers.oam
    }

    pub fn palette_ram(&self) -> &[u8] {
        &self.palette
    }

    /// Hands a raised NMI to the CPU exactly once.
    pub fn take_nmi(&mut self) -> bool {
        core::mem::take(&mut self.nmi_pending)
    }

    /// CPU read of `$2000-$3FFF`.
    pub fn cpu_read(&mut self, addr: u16, bus: &mut PpuBus<'_>) -> u8 {
        let value = match PpuRegister::from_cpu_addr(addr) {
            PpuRegister::Status => {
                let value = self.status_value();
                self.registers.status.remove(Status::VERTICAL_BLANK);
                self.registers.vram.reset_latch();
                value
            }
            PpuRegister::OamData => self.oam_data_value(),
            PpuRegister::Data => self.read_data(bus),
            _ => self.registers.io_latch,
        };
        self.registers.io_latch = value;
        value
    }

    /// CPU write of `$2000-$3FFF`.
    pub fn cpu_write(&mut self, addr: u16, value: u8, bus: &mut PpuBus<'_>) {
        self.registers.io_latch = value;
        match PpuRegister::from_cpu_addr(addr) {
            PpuRegister::Control => {
                let was_enabled = self.registers.control.nmi_enabled();
                self.registers.write_control(value);
                // NMI is level-triggered from VBL && NMI_ENABLE, so turning it on
                // inside vblank fires immediately.
                if !was_enabled
                    && self.registers.control.nmi_enabled()
                    && self.registers.status.contains(Status::VERTICAL_BLANK)
                {
                    self.nmi_pending = true;
                }
            }
            PpuRegister::Mask => self.registers.mask = Mask::from_bits_retain(value),
            PpuRegister::Status => {}
            PpuRegister::OamAddr => self.registers.oam_addr = value,
            PpuRegister::OamData => self.write_oam_data(value),
            PpuRegister::Scroll => self.registers.vram.write_scroll(value),
            PpuRegister::Addr => self.registers.vram.write_addr(value),
            PpuRegister::Data => {
                let addr = self.registers.vram.v.bus_addr();
                self.write_vram(addr, value, bus);
                self.increment_vram_addr();
            }
        }
    }

    /// Register value a read would return, without the read side effects.
    pub fn peek_register(&self, addr: u16) -> u8 {
        match PpuRegister::from_cpu_addr(addr) {
            PpuRegister::Status => self.status_value(),
            PpuRegister::OamData => self.oam_data_value(),
            PpuRegister::Data => {
                let addr = self.registers.vram.v.bus_addr();
                if addr >= ppu_mem::PALETTE_BASE {
                    self.palette[palette_slot(addr)]
                } else {
                    self.registers.read_buffer
                }
            }
            _ => self.registers.io_latch,
        }
    }

    /// Untimed read of the PPU address space, palette included.
    pub fn read_vram(&self, addr: u16, bus: &PpuBus<'_>) -> u8 {
        let addr = addr & ppu_mem::VRAM_MIRROR_MASK;
        if addr >= ppu_mem::PALETTE_BASE {
            self.palette[palette_slot(addr)]
        } else {
            bus.read(addr)
        }
    }

    /// Untimed write of the PPU address space, palette included.
    pub fn write_vram(&mut self, addr: u16, value: u8, bus: &mut PpuBus<'_>) {
        let addr = addr & ppu_mem::VRAM_MIRROR_MASK;
        if addr >= ppu_mem::PALETTE_BASE {
            // Palette cells are 6 bits wide.
            self.palette[palette_slot(addr)] = value & 0x3F;
        } else {
            bus.write(addr, value);
        }
    }

    /// Runs one dot.
    pub fn clock(&mut self, bus: &mut PpuBus<'_>) {
        match (self.scanline, self.dot) {
            (VBLANK_LINE, 1) => self.enter_vblank(),
            (PRE_RENDER_LINE, 1) => self.registers.status.remove(
                Status::VERTICAL_BLANK | Status::SPRITE_ZERO_HIT | Status::SPRITE_OVERFLOW,
            ),
            _ => {}
        }

        let rendering = self.registers.mask.rendering_enabled();
        let visible = (0..VISIBLE_LINES).contains(&self.scanline);
        let pre_render = self.scanline == PRE_RENDER_LINE;

        if rendering && (visible || pre_render) {
            self.background_step(bus, pre_render);
            if visible {
                self.sprite_evaluation_step();
            }
            self.sprite_fetch_step(bus, visible);
        }

        if visible && (1..=SCREEN_WIDTH as u16).contains(&self.dot) {
            self.output_pixel(rendering);
        }

        self.advance();
    }

    fn advance(&mut self) {
        self.dot += 1;
        if self.dot > LAST_DOT {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline > LAST_SCANLINE {
                self.scanline = PRE_RENDER_LINE;
            }
        }
    }

    fn enter_vblank(&mut self) {
        self.registers.status.insert(Status::VERTICAL_BLANK);
        self.frame = self.frame.wrapping_add(1);
        self.framebuffer.swap();
        if self.registers.control.nmi_enabled() {
            self.nmi_pending = true;
        }
        tracing::trace!(frame = self.frame, "vblank");
    }

    fn status_value(&self) -> u8 {
        (self.registers.status.bits() & 0xE0) | (self.registers.io_latch & 0x1F)
    }

    /// Sprite evaluation or fetch is touching OAM on this dot.
    fn rendering_active(&self) -> bool {
        self.registers.mask.rendering_enabled() && self.scanline < VISIBLE_LINES
    }

    fn oam_data_value(&self) -> u8 {
        // Secondary OAM clear drives $FF onto the OAM data lines.
        if self.rendering_active() && self.scanline >= 0 && (1..=64).contains(&self.dot) {
            return 0xFF;
        }
        let addr = self.registers.oam_addr;
        let value = self.registers.oam[usize::from(addr)];
        if addr & 0b11 == 2 {
            value & ATTRIBUTE_READ_MASK
        } else {
            value
        }
    }

    fn write_oam_data(&mut self, value: u8) {
        if self.rendering_active() {
            // No write; OAMADDR still moves by one sprite.
            self.registers.oam_addr = self.registers.oam_addr.wrapping_add(4);
            return;
        }
        let addr = usize::from(self.registers.oam_addr);
        self.registers.oam[addr] = value;
        self.registers.oam_addr = self.registers.oam_addr.wrapping_add(1);
    }

    fn read_data(&mut self, bus: &mut PpuBus<'_>) -> u8 {
        let addr = self.registers.vram.v.bus_addr();
        let value = if addr >= ppu_mem::PALETTE_BASE {
            self.registers.read_buffer = bus.read(addr - PALETTE_SHADOW_OFFSET);
            let mut color = self.read_vram(addr, bus);
            if self.registers.mask.contains(Mask::GREYSCALE) {
                color &= 0x30;
            }
            color | (self.registers.io_latch & 0xC0)
        } else {
            core::mem::replace(&mut self.registers.read_buffer, bus.read(addr))
        };
        self.increment_vram_addr();
        value
    }

    fn increment_vram_addr(&mut self) {
        let step = self.registers.control.vram_increment();
        self.registers.vram.v.increment(step);
    }

    fn background_step(&mut self, bus: &PpuBus<'_>, pre_render: bool) {
        let v = self.registers.vram.v;
        if matches!(self.dot, 2..=256 | 321..=337) {
            self.bg.shift();
            match (self.dot - 1) % 8 {
                0 => {
                    self.bg.reload(&self.tile);
                    self.tile.tile = bus.read(v.tile_addr());
                }
                2 => {
                    let attribute = bus.read(v.attribute_addr());
                    self.tile.palette = (attribute >> v.attribute_shift()) & 0b11;
                }
                4 => self.tile.pattern_low = bus.read(self.background_pattern_addr()),
                6 => self.tile.pattern_high = bus.read(self.background_pattern_addr() + 8),
                7 => self.registers.vram.v.increment_x(),
                _ => {}
            }
        }

        match self.dot {
            256 => self.registers.vram.v.increment_y(),
            257 => {
                self.bg.reload(&self.tile);
                let t = self.registers.vram.t;
                self.registers.vram.v.copy_horizontal(t);
            }
            280..=304 if pre_render => {
                let t = self.registers.vram.t;
                self.registers.vram.v.copy_vertical(t);
            }
            _ => {}
        }
    }

    fn background_pattern_addr(&self) -> u16 {
        self.registers.control.background_pattern_table()
            | (u16::from(self.tile.tile) << 4)
            | u16::from(self.registers.vram.v.fine_y())
    }

    /// Secondary OAM clear and the odd-read / even-write evaluation scan.
    fn sprite_evaluation_step(&mut self) {
        match self.dot {
            1..=64 => {
                if self.dot % 2 == 0 {
                    self.secondary_oam[usize::from(self.dot / 2 - 1)] = 0xFF;
                }
            }
            65..=256 => {
                if self.dot == 65 {
                    self.eval = SpriteEvalState::default();
                }
                if self.dot % 2 == 1 {
                    self.eval.latch = self.registers.oam[self.eval.oam_index()];
                } else {
                    self.evaluate_latched_byte();
                }
            }
            _ => {}
        }
    }

    fn evaluate_latched_byte(&mut self) {
        let height = self.registers.control.sprite_height();
        let value = self.eval.latch;
        let in_range = Sprite::row_on_next_line(value, self.scanline, height).is_some();

        match self.eval.phase {
            SpriteEvalPhase::ScanY => {
                self.secondary_oam[self.eval.secondary_index] = value;
                if in_range {
                    if self.eval.n == 0 {
                        self.eval.sprite0_found = true;
                    }
                    self.eval.secondary_index += 1;
                    self.eval.m = 1;
                    self.eval.phase = SpriteEvalPhase::CopyRest;
                } else {
                    self.eval.next_sprite();
                }
            }
            SpriteEvalPhase::CopyRest => {
                self.secondary_oam[self.eval.secondary_index] = value;
                self.eval.secondary_index += 1;
                self.eval.m += 1;
                if self.eval.m == 4 {
                    self.eval.found += 1;
                    self.eval.next_sprite();
                    if self.eval.phase != SpriteEvalPhase::Done {
                        self.eval.phase = if self.eval.found == SPRITES_PER_LINE {
                            SpriteEvalPhase::OverflowScan
                        } else {
                            SpriteEvalPhase::ScanY
                        };
                    }
                }
            }
            SpriteEvalPhase::OverflowScan => {
                if in_range {
                    self.registers.status.insert(Status::SPRITE_OVERFLOW);
                    self.eval.phase = SpriteEvalPhase::Done;
                } else {
                    // Hardware bug: m advances with n.
                    self.eval.m = (self.eval.m + 1) & 0b11;
                    self.eval.n += 1;
                    if self.eval.n >= 64 {
                        self.eval.phase = SpriteEvalPhase::Done;
                    }
                }
            }
            SpriteEvalPhase::Done => {}
        }
    }

    /// Dots 257-320: eight 8-dot slots, pattern low at sub-dot 5 and high at 7.
    fn sprite_fetch_step(&mut self, bus: &PpuBus<'_>, visible: bool) {
        if !(257..=320).contains(&self.dot) {
            return;
        }
        self.registers.oam_addr = 0;

        let offset = self.dot - 257;
        if offset == 0 {
            // Evaluation never runs on the pre-render line, so line 0 has no sprites.
            self.fetched_count = if visible { self.eval.found } else { 0 };
            self.fetched_sprite0 = visible && self.eval.sprite0_found;
        }

        let slot = usize::from(offset / 8);
        let sub = offset % 8;
        if slot < self.fetched_count && matches!(sub, 5 | 7) {
            let start = slot * Sprite::BYTES;
            let sprite = Sprite::from_bytes(&self.secondary_oam[start..start + Sprite::BYTES]);
            let control = self.registers.control;
            let height = control.sprite_height();
            let row = Sprite::row_on_next_line(sprite.y, self.scanline, height).unwrap_or(0);
            let addr = sprite.pattern_addr(row, height, control.sprite_pattern_table());
            if sub == 5 {
                self.fetched[slot] = SpriteRow {
                    attributes: sprite.attributes,
                    x: sprite.x,
                    pattern_low: bus.read(addr),
                    pattern_high: 0,
                };
            } else {
                self.fetched[slot].pattern_high = bus.read(addr + 8);
            }
        }

        if self.dot == 320 {
            self.sprites
                .load(&self.fetched[..self.fetched_count], self.fetched_sprite0);
        }
    }

    fn output_pixel(&mut self, rendering: bool) {
        let x = usize::from(self.dot - 1);
        let y = self.scanline as usize;
        let mask = self.registers.mask;

        let color = if rendering {
            let (bg_palette, bg_pattern) = if mask.background_visible_at(x) {
                self.bg.sample(self.registers.vram.x)
            } else {
                (0, 0)
            };
            let sprite = self.sprites.sample_and_shift();
            let sprite_opaque = sprite.is_opaque() && mask.sprites_visible_at(x);

            if sprite_opaque && sprite.sprite0 && bg_pattern != 0 && x != SCREEN_WIDTH - 1 {
                self.registers.status.insert(Status::SPRITE_ZERO_HIT);
            }

            let background = usize::from((bg_palette << 2) | bg_pattern);
            let foreground = 0x10 | usize::from((sprite.palette << 2) | sprite.color);
            let slot = match (bg_pattern != 0, sprite_opaque) {
                (false, false) => 0,
                (false, true) => foreground,
                (true, false) => background,
                (true, true) if sprite.behind_background => background,
                (true, true) => foreground,
            };
            self.palette[slot]
        } else {
            // With rendering off the backdrop follows `v` when it points at the palette.
            let v = self.registers.vram.v.bus_addr();
            if v >= ppu_mem::PALETTE_BASE {
                self.palette[palette_slot(v)]
            } else {
                self.palette[0]
            }
        };

        let index = if mask.contains(Mask::GREYSCALE) {
            color & 0x30
        } else {
            color & 0x3F
        };
        self.framebuffer.write_index(x, y, index);
    }
}
