use crate::{
    bus::Bus,
    cpu::{Cpu, status::Status},
};

impl Cpu {
    fn change_flag(&mut self, bus: &mut impl Bus, flag: Status, value: bool) {
        self.idle(bus);
        self.p.set(flag, value);
    }

    pub(super) fn clc(&mut self, bus: &mut impl Bus) {
        self.change_flag(bus, Status::CARRY, false);
    }

    pub(super) fn sec(&mut self, bus: &mut impl Bus) {
        self.change_flag(bus, Status::CARRY, true);
    }

    pub(super) fn cli(&mut self, bus: &mut impl Bus) {
        self.change_flag(bus, Status::INTERRUPT, false);
    }

    pub(super) fn sei(&mut self, bus: &mut impl Bus) {
        self.change_flag(bus, Status::INTERRUPT, true);
    }

    pub(super) fn cld(&mut self, bus: &mut impl Bus) {
        self.change_flag(bus, Status::DECIMAL, false);
    }

    pub(super) fn sed(&mut self, bus: &mut impl Bus) {
        self.change_flag(bus, Status::DECIMAL, true);
    }

    pub(super) fn clv(&mut self, bus: &mut impl Bus) {
        self.change_flag(bus, Status::OVERFLOW, false);
    }
}
