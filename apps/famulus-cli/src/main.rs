mod args;

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, bail};
use clap::Parser;
use famulus_core::{
    CpuSnapshot, Nes,
    controller::Button,
    ppu::{SCREEN_HEIGHT, SCREEN_WIDTH, palette},
};
use famulus_runtime::{EntertainmentSystem, RuntimeConfig, RuntimeEvent};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::args::Args;

/// Generous upper bound for one frame on a slow debug build.
const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("installing the log subscriber")
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.trace { Level::TRACE } else { args.log_level };
    init_tracing(level)?;

    let held: Vec<Button> = args.hold.iter().copied().map(Button::from).collect();
    let (pixels, cpu, frames) = if args.threaded {
        run_threaded(&args.rom, args.frames, &held, args.trace)?
    } else {
        run_inline(&args.rom, args.frames, &held)?
    };

    println!(
        "frame {frames}: PC={:04X} A={:02X} X={:02X} Y={:02X} S={:02X} P={:02X}",
        cpu.pc, cpu.a, cpu.x, cpu.y, cpu.s, cpu.p
    );

    if let Some(path) = &args.screenshot {
        write_ppm(path, &pixels)?;
        tracing::info!(path = %path.display(), "screenshot written");
    }
    Ok(())
}

fn run_inline(rom: &Path, frames: u64, held: &[Button]) -> Result<(Vec<u8>, CpuSnapshot, u64)> {
    let mut nes = Nes::new();
    nes.load_rom_file(rom)
        .with_context(|| format!("loading {}", rom.display()))?;
    for &button in held {
        nes.set_button(0, button, true);
    }
    for _ in 0..frames {
        let cycles = nes.run_frame();
        tracing::debug!(frame = nes.frame_count(), cycles, "frame done");
    }
    Ok((nes.render_buffer().to_vec(), nes.cpu_snapshot(), nes.frame_count()))
}

fn run_threaded(
    rom: &Path,
    frames: u64,
    held: &[Button],
    trace: bool,
) -> Result<(Vec<u8>, CpuSnapshot, u64)> {
    let config = RuntimeConfig {
        trace_instructions: trace,
        ..RuntimeConfig::default()
    };
    let mut system = EntertainmentSystem::new(config);
    system
        .load_rom_file(rom)
        .with_context(|| format!("loading {}", rom.display()))?;
    for &button in held {
        system.set_button(0, button, true);
    }

    let events = system.events();
    system.start()?;
    let mut seen = 0;
    while seen < frames {
        match events.recv_timeout(FRAME_TIMEOUT) {
            Ok(RuntimeEvent::FrameReady { frame }) => seen = frame,
            Ok(_) => {}
            Err(err) => {
                system.stop()?;
                bail!("no frame from the emulation thread: {err}");
            }
        }
    }
    system.stop()?;

    // The snapshot holds the last completed frame; the worker may have run past `frames`.
    let snapshot = system.frame_snapshot();
    Ok((snapshot.pixels, snapshot.cpu, snapshot.frame))
}

fn write_ppm(path: &Path, pixels: &[u8]) -> Result<()> {
    let mut out = format!("P6\n{SCREEN_WIDTH} {SCREEN_HEIGHT}\n255\n").into_bytes();
    out.extend_from_slice(&palette::to_rgb24(pixels));
    fs::write(path, out).with_context(|| format!("writing {}", path.display()))
}
