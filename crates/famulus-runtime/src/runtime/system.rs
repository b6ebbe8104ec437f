use std::{
    path::Path,
    sync::{Arc, atomic::Ordering},
    thread::{self, JoinHandle},
};

use crossbeam_channel::{Receiver, Sender, bounded};
use famulus_core::{
    CpuSnapshot, Nes, ResetKind, StepResult, cartridge::Cartridge, controller::Button,
};
use parking_lot::Mutex;

use super::{
    runner::{Runner, send_event},
    state::{FrameSnapshot, SharedState},
    types::{RuntimeConfig, RuntimeError, RuntimeEvent},
};

const WORKER_NAME: &str = "famulus-emu";

enum Machine {
    Idle(Box<Nes>),
    Running(JoinHandle<Nes>),
}

/// Owns a console and runs it either on the caller's thread (single steps)
/// or on a dedicated worker thread (continuous run).
///
/// While running, the worker owns the [`Nes`]; observers read the last
/// published [`FrameSnapshot`] and the event channel instead.
pub struct EntertainmentSystem {
    config: RuntimeConfig,
    machine: Option<Machine>,
    shared: Arc<SharedState>,
    events_tx: Sender<RuntimeEvent>,
    events_rx: Receiver<RuntimeEvent>,
}

impl EntertainmentSystem {
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_nes(Nes::new(), config)
    }

    pub fn with_nes(nes: Nes, config: RuntimeConfig) -> Self {
        let (events_tx, events_rx) = bounded(config.event_capacity.max(1));
        let shared = Arc::new(SharedState::new());
        for (port, mask) in shared.pad_masks.iter().enumerate() {
            mask.store(nes.buttons(port), Ordering::Release);
        }
        Self {
            config,
            machine: Some(Machine::Idle(Box::new(nes))),
            shared,
            events_tx,
            events_rx,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        matches!(self.machine, Some(Machine::Running(_)))
    }

    /// The console, while idle.
    pub fn nes(&self) -> Option<&Nes> {
        match &self.machine {
            Some(Machine::Idle(nes)) => Some(nes.as_ref()),
            _ => None,
        }
    }

    pub fn nes_mut(&mut self) -> Option<&mut Nes> {
        match &mut self.machine {
            Some(Machine::Idle(nes)) => Some(nes.as_mut()),
            _ => None,
        }
    }

    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), RuntimeError> {
        let cartridge = famulus_core::load_cartridge(bytes)?;
        self.insert_cartridge(cartridge)
    }

    pub fn load_rom_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), RuntimeError> {
        let path = path.as_ref();
        let cartridge = famulus_core::load_cartridge_from_file(path)?;
        self.insert_cartridge(cartridge)?;
        tracing::info!(path = %path.display(), "ROM loaded");
        Ok(())
    }

    pub fn insert_cartridge(&mut self, cartridge: Cartridge) -> Result<(), RuntimeError> {
        let Some(Machine::Idle(nes)) = &mut self.machine else {
            return Err(RuntimeError::Running);
        };
        nes.insert_cartridge(cartridge);
        self.shared.publish_frame(nes);
        Ok(())
    }

    pub fn reset(&mut self, kind: ResetKind) -> Result<(), RuntimeError> {
        let Some(Machine::Idle(nes)) = &mut self.machine else {
            return Err(RuntimeError::Running);
        };
        nes.reset(kind);
        self.shared.publish_cpu(nes);
        Ok(())
    }

    /// Moves the console onto the worker thread. A no-op while running.
    pub fn start(&mut self) -> Result<(), RuntimeError> {
        let nes = match self.machine.take() {
            Some(Machine::Idle(nes)) => nes,
            other => {
                self.machine = other;
                return Ok(());
            }
        };

        self.shared.stop.store(false, Ordering::Release);
        // Parked here so a failed spawn can hand the console back.
        let slot = Arc::new(Mutex::new(Some(*nes)));
        let worker_slot = Arc::clone(&slot);
        let runner_state = Arc::clone(&self.shared);
        let events = self.events_tx.clone();
        let trace = self.config.trace_instructions;

        let spawned = thread::Builder::new()
            .name(WORKER_NAME.to_owned())
            .spawn(move || {
                let nes = worker_slot.lock().take().unwrap_or_default();
                Runner::new(nes, runner_state, events, trace).run()
            });

        match spawned {
            Ok(handle) => {
                self.machine = Some(Machine::Running(handle));
                Ok(())
            }
            Err(err) => {
                let nes = slot.lock().take().unwrap_or_default();
                self.machine = Some(Machine::Idle(Box::new(nes)));
                Err(RuntimeError::Spawn(err))
            }
        }
    }

    /// Asks the worker to stop at the next instruction boundary and waits
    /// for it. A no-op while idle.
    pub fn stop(&mut self) -> Result<(), RuntimeError> {
        let handle = match self.machine.take() {
            Some(Machine::Running(handle)) => handle,
            other => {
                self.machine = other;
                return Ok(());
            }
        };

        self.shared.stop.store(true, Ordering::Release);
        let joined = handle.join();
        self.shared.stop.store(false, Ordering::Release);

        match joined {
            Ok(nes) => {
                self.machine = Some(Machine::Idle(Box::new(nes)));
                Ok(())
            }
            Err(_) => {
                tracing::error!("emulation thread panicked");
                self.machine = Some(Machine::Idle(Box::default()));
                Err(RuntimeError::WorkerPanicked)
            }
        }
    }

    /// Runs one instruction on the caller's thread. `None` while running.
    pub fn step_instruction(&mut self) -> Option<StepResult> {
        let Some(Machine::Idle(nes)) = &mut self.machine else {
            return None;
        };
        let step = nes.step_instruction();
        if step.frame_completed {
            self.shared.publish_frame(nes);
            send_event(
                &self.events_tx,
                RuntimeEvent::FrameReady {
                    frame: nes.frame_count(),
                },
            );
        } else {
            self.shared.publish_cpu(nes);
        }
        send_event(
            &self.events_tx,
            RuntimeEvent::InstructionStepped {
                pc: step.pc,
                cycles: step.cycles,
            },
        );
        Some(step)
    }

    /// Runs to the next vblank on the caller's thread and returns the CPU
    /// cycles spent. `None` while running.
    pub fn step_frame(&mut self) -> Option<u64> {
        let Some(Machine::Idle(nes)) = &mut self.machine else {
            return None;
        };
        let cycles = nes.run_frame();
        let frame = nes.frame_count();
        self.shared.publish_frame(nes);
        send_event(&self.events_tx, RuntimeEvent::FrameReady { frame });
        Some(cycles)
    }

    /// Updates a pad button. Takes effect at once when idle and at the next
    /// frame boundary while running.
    pub fn set_button(&mut self, port: usize, button: Button, pressed: bool) {
        let Some(mask) = self.shared.pad_masks.get(port) else {
            return;
        };
        if pressed {
            mask.fetch_or(button.mask(), Ordering::AcqRel);
        } else {
            mask.fetch_and(!button.mask(), Ordering::AcqRel);
        }
        if let Some(nes) = self.nes_mut() {
            nes.set_button(port, button, pressed);
        }
    }

    /// A receiver for runtime events. All receivers share one queue.
    pub fn events(&self) -> Receiver<RuntimeEvent> {
        self.events_rx.clone()
    }

    pub fn frame_snapshot(&self) -> FrameSnapshot {
        self.shared.snapshot.lock().clone()
    }

    pub fn cpu_snapshot(&self) -> CpuSnapshot {
        self.shared.snapshot.lock().cpu
    }

    /// Side-effect-free CPU read. `None` while running.
    pub fn peek_cpu_byte(&self, addr: u16) -> Option<u8> {
        self.nes().map(|nes| nes.peek_cpu_byte(addr))
    }
}

impl Drop for EntertainmentSystem {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            tracing::warn!(%err, "stopping on drop failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::{Context, Result};

    use super::*;

    /// NROM image that spins on `JMP $8000`.
    fn spin_rom() -> Vec<u8> {
        let mut image = vec![b'N', b'E', b'S', 0x1A, 1, 1, 0, 0];
        image.resize(16, 0);
        let mut prg = vec![0xEA; 0x4000];
        prg[..3].copy_from_slice(&[0x4C, 0x00, 0x80]);
        prg[0x3FFC..0x3FFE].copy_from_slice(&[0x00, 0x80]);
        image.extend_from_slice(&prg);
        image.extend_from_slice(&[0; 0x2000]);
        image
    }

    fn system(config: RuntimeConfig) -> Result<EntertainmentSystem> {
        let mut system = EntertainmentSystem::new(config);
        system.load_rom(&spin_rom())?;
        Ok(system)
    }

    #[test]
    fn single_steps_report_through_events() -> Result<()> {
        let mut system = system(RuntimeConfig::default())?;
        let events = system.events();

        let step = system.step_instruction().context("idle system steps")?;
        assert_eq!(step.pc, 0x8000);
        assert_eq!(step.cycles, 3);
        assert_eq!(
            events.try_recv()?,
            RuntimeEvent::InstructionStepped {
                pc: 0x8000,
                cycles: 3
            }
        );
        assert_eq!(system.cpu_snapshot().pc, 0x8000);

        let cycles = system.step_frame().context("idle system runs a frame")?;
        assert!(cycles > 0);
        assert_eq!(events.try_recv()?, RuntimeEvent::FrameReady { frame: 1 });
        assert_eq!(system.frame_snapshot().frame, 1);
        Ok(())
    }

    #[test]
    fn worker_runs_frames_until_stopped() -> Result<()> {
        let config = RuntimeConfig {
            event_capacity: 4096,
            ..RuntimeConfig::default()
        };
        let mut system = system(config)?;
        let events = system.events();

        assert_eq!(system.peek_cpu_byte(0x8000), Some(0x4C));

        system.start()?;
        assert!(system.is_running());
        assert!(system.step_instruction().is_none());
        assert!(system.nes().is_none());
        assert_eq!(system.peek_cpu_byte(0x8000), None);
        assert!(matches!(system.reset(ResetKind::Soft), Err(RuntimeError::Running)));

        let first = events.recv_timeout(Duration::from_secs(10))?;
        assert_eq!(first, RuntimeEvent::FrameReady { frame: 1 });

        system.stop()?;
        assert!(!system.is_running());
        let stopped = events
            .try_iter()
            .find(|event| matches!(event, RuntimeEvent::Stopped { .. }));
        let frames = system.nes().context("idle after stop")?.frame_count();
        assert_eq!(stopped, Some(RuntimeEvent::Stopped { frame: frames }));
        assert!(frames >= 1);
        assert!(system.frame_snapshot().frame >= 1);
        Ok(())
    }

    #[test]
    fn start_and_stop_are_idempotent() -> Result<()> {
        let mut system = system(RuntimeConfig::default())?;
        system.stop()?;
        system.start()?;
        system.start()?;
        system.stop()?;
        system.stop()?;
        assert!(!system.is_running());
        Ok(())
    }

    #[test]
    fn buttons_pressed_while_running_reach_the_console() -> Result<()> {
        let mut system = system(RuntimeConfig::default())?;
        system.start()?;
        system.set_button(1, Button::Start, true);
        system.set_button(9, Button::A, true);
        system.stop()?;
        let nes = system.nes().context("idle after stop")?;
        assert_eq!(nes.buttons(1), Button::Start.mask());
        assert_eq!(nes.buttons(0), 0);
        Ok(())
    }

    #[test]
    fn full_channel_drops_events() -> Result<()> {
        let config = RuntimeConfig {
            event_capacity: 1,
            ..RuntimeConfig::default()
        };
        let mut system = system(config)?;
        let events = system.events();
        for _ in 0..3 {
            system.step_instruction();
        }
        assert_eq!(events.len(), 1);
        Ok(())
    }

    #[test]
    fn bad_rom_is_a_cartridge_error() {
        let mut system = EntertainmentSystem::new(RuntimeConfig::default());
        let err = system.load_rom(b"not a rom image").err();
        assert!(matches!(err, Some(RuntimeError::Cartridge(_))));
    }
}
