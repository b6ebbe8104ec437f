use crate::{
    bus::Bus,
    cpu::{Cpu, addressing::Addressing},
};

impl Cpu {
    pub(super) fn inc(&mut self, bus: &mut impl Bus, mode: Addressing) {
        self.modify_operand(bus, mode, |cpu, value| {
            let result = value.wrapping_add(1);
            cpu.p.set_zn(result);
            result
        });
    }

    pub(super) fn dec(&mut self, bus: &mut impl Bus, mode: Addressing) {
        self.modify_operand(bus, mode, |cpu, value| {
            let result = value.wrapping_sub(1);
            cpu.p.set_zn(result);
            result
        });
    }

    pub(super) fn inx(&mut self, bus: &mut impl Bus) {
        self.idle(bus);
        self.x = self.x.wrapping_add(1);
        self.p.set_zn(self.x);
    }

    pub(super) fn iny(&mut self, bus: &mut impl Bus) {
        self.idle(bus);
        self.y = self.y.wrapping_add(1);
        self.p.set_zn(self.y);
    }

    pub(super) fn dex(&mut self, bus: &mut impl Bus) {
        self.idle(bus);
        self.x = self.x.wrapping_sub(1);
        self.p.set_zn(self.x);
    }

    pub(super) fn dey(&mut self, bus: &mut impl Bus) {
        self.idle(bus);
        self.y = self.y.wrapping_sub(1);
        self.p.set_zn(self.y);
    }
}

#[cfg(test)]
mod tests {
    use crate::{bus::mock::MockBus, cpu::status::Status};

    #[test]
    fn inc_zero_page_wraps_to_zero() {
        let mut bus = MockBus::with_program(0x0200, &[0xE6, 0x40]);
        bus.mem[0x0040] = 0xFF;
        let mut cpu = bus.cpu_at(0x0200);
        assert_eq!(cpu.step(&mut bus), 5);
        assert_eq!(bus.mem[0x0040], 0x00);
        assert!(cpu.p.contains(Status::ZERO));
    }

    #[test]
    fn register_steps_wrap() {
        // DEX; INY
        let mut bus = MockBus::with_program(0x0200, &[0xCA, 0xC8]);
        let mut cpu = bus.cpu_at(0x0200);
        cpu.x = 0;
        cpu.y = 0x7F;
        cpu.step(&mut bus);
        assert_eq!(cpu.x, 0xFF);
        assert!(cpu.p.contains(Status::NEGATIVE));
        cpu.step(&mut bus);
        assert_eq!(cpu.y, 0x80);
    }
}
