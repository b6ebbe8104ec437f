use std::sync::{Arc, atomic::Ordering};

use crossbeam_channel::{Sender, TrySendError};
use famulus_core::Nes;

use super::{state::SharedState, types::RuntimeEvent};

/// Worker-side loop. Owns the console until asked to stop.
pub(crate) struct Runner {
    nes: Nes,
    state: Arc<SharedState>,
    events: Sender<RuntimeEvent>,
    trace_instructions: bool,
}

impl Runner {
    pub(crate) fn new(
        nes: Nes,
        state: Arc<SharedState>,
        events: Sender<RuntimeEvent>,
        trace_instructions: bool,
    ) -> Self {
        Self {
            nes,
            state,
            events,
            trace_instructions,
        }
    }

    /// Runs instructions until the stop flag is seen, then hands the console back.
    ///
    /// The flag is only checked between instructions, so the returned
    /// console is always at an instruction boundary.
    pub(crate) fn run(mut self) -> Nes {
        tracing::info!(frame = self.nes.frame_count(), "emulation thread started");
        self.state.apply_pads(&mut self.nes);

        while !self.state.stop.load(Ordering::Acquire) {
            let step = self.nes.step_instruction();
            if self.trace_instructions {
                send_event(
                    &self.events,
                    RuntimeEvent::InstructionStepped {
                        pc: step.pc,
                        cycles: step.cycles,
                    },
                );
            }
            if step.frame_completed {
                self.state.publish_frame(&self.nes);
                send_event(
                    &self.events,
                    RuntimeEvent::FrameReady {
                        frame: self.nes.frame_count(),
                    },
                );
                self.state.apply_pads(&mut self.nes);
            }
        }

        self.state.apply_pads(&mut self.nes);
        self.state.publish_cpu(&self.nes);
        let frame = self.nes.frame_count();
        send_event(&self.events, RuntimeEvent::Stopped { frame });
        tracing::info!(frame, "emulation thread stopped");
        self.nes
    }
}

/// Non-blocking send; slow consumers lose events instead of stalling emulation.
pub(crate) fn send_event(events: &Sender<RuntimeEvent>, event: RuntimeEvent) {
    match events.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => tracing::trace!(?event, "event channel full, dropped"),
        Err(TrySendError::Disconnected(_)) => {}
    }
}
