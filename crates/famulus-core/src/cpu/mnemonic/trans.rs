use crate::{bus::Bus, cpu::Cpu};

impl Cpu {
    pub(super) fn tax(&mut self, bus: &mut impl Bus) {
        self.idle(bus);
        self.x = self.a;
        self.p.set_zn(self.x);
    }

    pub(super) fn tay(&mut self, bus: &mut impl Bus) {
        self.idle(bus);
        self.y = self.a;
        self.p.set_zn(self.y);
    }

    pub(super) fn tsx(&mut self, bus: &mut impl Bus) {
        self.idle(bus);
        self.x = self.s;
        self.p.set_zn(self.x);
    }

    pub(super) fn txa(&mut self, bus: &mut impl Bus) {
        self.idle(bus);
        self.a = self.x;
        self.p.set_zn(self.a);
    }

    /// The only transfer that leaves the flags alone.
    pub(super) fn txs(&mut self, bus: &mut impl Bus) {
        self.idle(bus);
        self.s = self.x;
    }

    pub(super) fn tya(&mut self, bus: &mut impl Bus) {
        self.idle(bus);
        self.a = self.y;
        self.p.set_zn(self.a);
    }
}
