use crate::{
    bus::Bus,
    cpu::{Cpu, status::Status},
};

impl Cpu {
    pub(super) fn pha(&mut self, bus: &mut impl Bus) {
        self.idle(bus);
        let value = self.a;
        self.push(bus, value);
    }

    /// Pushed copy has `B` and bit 5 set.
    pub(super) fn php(&mut self, bus: &mut impl Bus) {
        self.idle(bus);
        let value = self.p.to_stack(true);
        self.push(bus, value);
    }

    pub(super) fn pla(&mut self, bus: &mut impl Bus) {
        self.idle(bus);
        self.peek_stack(bus);
        self.a = self.pull(bus);
        self.p.set_zn(self.a);
    }

    pub(super) fn plp(&mut self, bus: &mut impl Bus) {
        self.idle(bus);
        self.peek_stack(bus);
        let value = self.pull(bus);
        self.p = Status::from_stack(value);
    }
}
