use crate::{
    bus::Bus,
    cpu::{Cpu, addressing::Addressing},
};

impl Cpu {
    pub(super) fn lda(&mut self, bus: &mut impl Bus, mode: Addressing) {
        self.a = self.read_operand(bus, mode);
        self.p.set_zn(self.a);
    }

    pub(super) fn ldx(&mut self, bus: &mut impl Bus, mode: Addressing) {
        self.x = self.read_operand(bus, mode);
        self.p.set_zn(self.x);
    }

    pub(super) fn ldy(&mut self, bus: &mut impl Bus, mode: Addressing) {
        self.y = self.read_operand(bus, mode);
        self.p.set_zn(self.y);
    }

    pub(super) fn sta(&mut self, bus: &mut impl Bus, mode: Addressing) {
        let value = self.a;
        self.store_operand(bus, mode, value);
    }

    pub(super) fn stx(&mut self, bus: &mut impl Bus, mode: Addressing) {
        let value = self.x;
        self.store_operand(bus, mode, value);
    }

    pub(super) fn sty(&mut self, bus: &mut impl Bus, mode: Addressing) {
        let value = self.y;
        self.store_operand(bus, mode, value);
    }
}
