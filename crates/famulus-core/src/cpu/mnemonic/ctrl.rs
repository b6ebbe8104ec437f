use crate::{
    bus::Bus,
    cpu::{
        Cpu,
        addressing::{Access, Addressing},
        status::Status,
    },
    memory::cpu as cpu_mem,
};

impl Cpu {
    pub(super) fn jmp(&mut self, bus: &mut impl Bus, mode: Addressing) {
        self.pc = self.effective_address(bus, mode, Access::Read);
    }

    /// Pushes the address of the last JSR byte, so RTS adds one.
    pub(super) fn jsr(&mut self, bus: &mut impl Bus) {
        let lo = self.fetch_byte(bus);
        self.peek_stack(bus);
        let [ret_lo, ret_hi] = self.pc.to_le_bytes();
        self.push(bus, ret_hi);
        self.push(bus, ret_lo);
        let hi = bus.read(self.pc);
        self.pc = u16::from_le_bytes([lo, hi]);
    }

    pub(super) fn rts(&mut self, bus: &mut impl Bus) {
        self.idle(bus);
        self.peek_stack(bus);
        let lo = self.pull(bus);
        let hi = self.pull(bus);
        self.pc = u16::from_le_bytes([lo, hi]);
        bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
    }

    pub(super) fn rti(&mut self, bus: &mut impl Bus) {
        self.idle(bus);
        self.peek_stack(bus);
        let status = self.pull(bus);
        self.p = Status::from_stack(status);
        let lo = self.pull(bus);
        let hi = self.pull(bus);
        self.pc = u16::from_le_bytes([lo, hi]);
    }

    /// Software interrupt. The byte after the opcode is skipped, so the
    /// handler returns to `PC + 2`.
    pub(super) fn brk(&mut self, bus: &mut impl Bus) {
        self.fetch_byte(bus);
        let [lo, hi] = self.pc.to_le_bytes();
        self.push(bus, hi);
        self.push(bus, lo);
        let status = self.p.to_stack(true);
        self.push(bus, status);
        self.p.insert(Status::INTERRUPT);
        self.pc = Self::read_vector(bus, cpu_mem::IRQ_VECTOR);
    }
}
