use crate::{
    bus::Bus,
    cpu::{Cpu, addressing::Addressing, status::Status},
};

impl Cpu {
    pub(super) fn asl(&mut self, bus: &mut impl Bus, mode: Addressing) {
        self.modify_operand(bus, mode, |cpu, value| {
            cpu.p.set(Status::CARRY, value & 0x80 != 0);
            let result = value << 1;
            cpu.p.set_zn(result);
            result
        });
    }

    pub(super) fn lsr(&mut self, bus: &mut impl Bus, mode: Addressing) {
        self.modify_operand(bus, mode, |cpu, value| {
            cpu.p.set(Status::CARRY, value & 0x01 != 0);
            let result = value >> 1;
            cpu.p.set_zn(result);
            result
        });
    }

    pub(super) fn rol(&mut self, bus: &mut impl Bus, mode: Addressing) {
        self.modify_operand(bus, mode, |cpu, value| {
            let carry_in = u8::from(cpu.p.contains(Status::CARRY));
            cpu.p.set(Status::CARRY, value & 0x80 != 0);
            let result = (value << 1) | carry_in;
            cpu.p.set_zn(result);
            result
        });
    }

    pub(super) fn ror(&mut self, bus: &mut impl Bus, mode: Addressing) {
        self.modify_operand(bus, mode, |cpu, value| {
            let carry_in = u8::from(cpu.p.contains(Status::CARRY)) << 7;
            cpu.p.set(Status::CARRY, value & 0x01 != 0);
            let result = (value >> 1) | carry_in;
            cpu.p.set_zn(result);
            result
        });
    }
}
