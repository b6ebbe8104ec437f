mod common;

use anyhow::Result;
use common::{Program, RomBuilder, jmp, lda, sta};
use famulus_core::{Nes, ResetKind, controller::Button, error::Error};

#[test]
fn ppuctrl_write_then_jump_loop() -> Result<()> {
    let rom = RomBuilder::new().code(0x8000, &[0xA9, 0x80, 0x8D, 0x00, 0x20, 0x4C, 0x00, 0x80]);
    let mut nes = rom.boot()?;
    assert_eq!(nes.cpu_snapshot().pc, 0x8000);

    for _ in 0..4 {
        nes.step_instruction();
        nes.step_instruction();
        let jumped = nes.step_instruction();
        assert_eq!(jumped.pc, 0x8000);
        assert_eq!(jumped.cycles, 3);
    }

    assert_eq!(nes.ppu().control(), 0x80);
    assert_eq!(nes.last_write_addr(), Some(0x2000));
    assert_eq!(nes.cpu_snapshot().a, 0x80);
    Ok(())
}

#[test]
fn power_on_reset_follows_the_vector() -> Result<()> {
    let nes = RomBuilder::new().reset_vector(0x8123).boot()?;
    let cpu = nes.cpu_snapshot();
    assert_eq!(cpu.pc, 0x8123);
    assert_eq!(cpu.s, 0xFD);
    assert_eq!(cpu.p & 0x04, 0x04);
    assert_eq!(nes.cpu_cycles(), 7);
    assert_eq!(nes.last_write_addr(), None);
    Ok(())
}

#[test]
fn soft_reset_keeps_ram_and_lowers_the_stack() -> Result<()> {
    let (code, _) = Program::new().store(0x0010, 0x42).halt(0x8000);
    let mut nes = RomBuilder::new().code(0x8000, &code).boot()?;
    nes.step_instruction();
    nes.step_instruction();
    assert_eq!(nes.ram()[0x10], 0x42);

    nes.reset(ResetKind::Soft);
    assert_eq!(nes.ram()[0x10], 0x42);
    assert_eq!(nes.cpu_snapshot().s, 0xFA);
    assert_eq!(nes.cpu_snapshot().pc, 0x8000);

    nes.reset(ResetKind::PowerOn);
    assert_eq!(nes.ram()[0x10], 0x00);
    assert_eq!(nes.cpu_snapshot().s, 0xFD);
    Ok(())
}

#[test]
fn pad_reads_shift_out_buttons_in_order() -> Result<()> {
    let (code, _) = Program::new()
        .store(0x4016, 1)
        .store(0x4016, 0)
        .raw(&[0xAD, 0x16, 0x40])
        .raw(&sta(0x0010))
        .raw(&[0xAD, 0x16, 0x40])
        .raw(&sta(0x0011))
        .raw(&[0xAD, 0x17, 0x40])
        .raw(&sta(0x0012))
        .halt(0x8000);
    let mut nes = RomBuilder::new().code(0x8000, &code).boot()?;
    nes.set_button(0, Button::A, true);
    nes.set_button(1, Button::A, true);
    nes.set_button(1, Button::A, false);
    nes.set_button(7, Button::Start, true);

    for _ in 0..10 {
        nes.step_instruction();
    }

    let ram = nes.ram();
    assert_eq!(ram[0x10] & 0x41, 0x41);
    assert_eq!(ram[0x11] & 0x41, 0x40);
    assert_eq!(ram[0x12] & 0x41, 0x40);
    assert_eq!(nes.buttons(0), Button::A.mask());
    assert_eq!(nes.buttons(1), 0);
    Ok(())
}

#[test]
fn peek_has_no_side_effects() -> Result<()> {
    // Latch the pads, then spin.
    let (code, _) = Program::new()
        .store(0x4016, 0x01)
        .store(0x4016, 0x00)
        .halt(0x8000);
    let mut nes = RomBuilder::new().code(0x8000, &code).boot()?;
    nes.set_button(0, Button::A, true);
    nes.run_frame();

    let observer: &Nes = &nes;
    assert_eq!(observer.peek_cpu_byte(0x2002) & 0x80, 0x80);
    assert_eq!(observer.peek_cpu_byte(0x2002) & 0x80, 0x80);
    assert_eq!(observer.peek_cpu_byte(0x8000), 0xA9);
    assert_eq!(observer.ppu().status() & 0x80, 0x80);
    let cycles = observer.cpu_cycles();
    for _ in 0..4 {
        assert_eq!(observer.peek_cpu_byte(0x4016), 0x41);
        assert_eq!(observer.peek_cpu_byte(0x4017), 0x40);
    }
    assert_eq!(observer.cpu_cycles(), cycles);
    Ok(())
}

#[test]
fn status_read_by_the_program_clears_vblank() -> Result<()> {
    // LDA $2002; JMP
    let code = [&[0xAD, 0x02, 0x20][..], &jmp(0x8000)].concat();
    let mut nes = RomBuilder::new().code(0x8000, &code).boot()?;
    nes.run_frame();
    while nes.cpu_snapshot().pc != 0x8003 {
        nes.step_instruction();
    }
    assert_eq!(nes.cpu_snapshot().a & 0x80, 0x80);
    assert_eq!(nes.ppu().status() & 0x80, 0);
    Ok(())
}

#[test]
fn writes_to_prg_rom_are_ignored() -> Result<()> {
    let (code, _) = Program::new().raw(&lda(0x00)).raw(&sta(0x8000)).halt(0x8000);
    let mut nes = RomBuilder::new().code(0x8000, &code).boot()?;
    nes.step_instruction();
    nes.step_instruction();
    assert_eq!(nes.peek_cpu_byte(0x8000), 0xA9);
    assert_eq!(nes.last_write_addr(), Some(0x8000));
    Ok(())
}

#[test]
fn bad_images_leave_the_slot_empty() {
    let mut nes = Nes::new();
    let mut image = RomBuilder::new().build();
    image.pop();
    assert!(matches!(nes.load_rom(&image), Err(Error::LengthMismatch { .. })));
    assert!(matches!(nes.load_rom(b"NES"), Err(Error::TooShort { .. })));
    assert!(nes.cartridge().is_none());
}

#[test]
fn ejecting_returns_the_cartridge() -> Result<()> {
    let mut nes = RomBuilder::new().vertical_mirroring().boot()?;
    let cartridge = nes.eject_cartridge();
    assert!(cartridge.is_some());
    assert!(nes.cartridge().is_none());
    // The vector floats at the last value read from zeroed RAM.
    assert_eq!(nes.peek_cpu_byte(0xFFFC), 0x00);
    assert_eq!(nes.cpu_snapshot().pc, 0x0000);
    Ok(())
}
