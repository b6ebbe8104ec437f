use crate::{
    bus::Bus,
    cpu::{Cpu, addressing::Addressing, status::Status},
};

impl Cpu {
    pub(super) fn and(&mut self, bus: &mut impl Bus, mode: Addressing) {
        let value = self.read_operand(bus, mode);
        self.a &= value;
        self.p.set_zn(self.a);
    }

    pub(super) fn ora(&mut self, bus: &mut impl Bus, mode: Addressing) {
        let value = self.read_operand(bus, mode);
        self.a |= value;
        self.p.set_zn(self.a);
    }

    pub(super) fn eor(&mut self, bus: &mut impl Bus, mode: Addressing) {
        let value = self.read_operand(bus, mode);
        self.a ^= value;
        self.p.set_zn(self.a);
    }

    /// `N` and `V` copy bits 7 and 6 of memory; `Z` reflects `A & M`.
    pub(super) fn bit(&mut self, bus: &mut impl Bus, mode: Addressing) {
        let value = self.read_operand(bus, mode);
        self.p.set(Status::ZERO, self.a & value == 0);
        self.p.set(Status::NEGATIVE, value & 0x80 != 0);
        self.p.set(Status::OVERFLOW, value & 0x40 != 0);
    }
}
