use crate::{
    bus::Bus,
    cpu::{Cpu, addressing::Addressing, status::Status},
};

impl Cpu {
    pub(super) fn adc(&mut self, bus: &mut impl Bus, mode: Addressing) {
        let value = self.read_operand(bus, mode);
        self.add_with_carry(value);
    }

    /// `A - M - !C`, computed as `A + !M + C`.
    pub(super) fn sbc(&mut self, bus: &mut impl Bus, mode: Addressing) {
        let value = self.read_operand(bus, mode);
        self.add_with_carry(!value);
    }

    pub(super) fn cmp(&mut self, bus: &mut impl Bus, mode: Addressing) {
        let value = self.read_operand(bus, mode);
        self.compare(self.a, value);
    }

    pub(super) fn cpx(&mut self, bus: &mut impl Bus, mode: Addressing) {
        let value = self.read_operand(bus, mode);
        self.compare(self.x, value);
    }

    pub(super) fn cpy(&mut self, bus: &mut impl Bus, mode: Addressing) {
        let value = self.read_operand(bus, mode);
        self.compare(self.y, value);
    }

    /// Binary-mode adder. `D` is ignored on the 2A03.
    fn add_with_carry(&mut self, value: u8) {
        let carry_in = u16::from(self.p.contains(Status::CARRY));
        let sum = u16::from(self.a) + u16::from(value) + carry_in;
        let result = sum as u8;
        // Overflow when both inputs share a sign the result does not.
        let overflow = (!(self.a ^ value) & (self.a ^ result)) & 0x80 != 0;
        self.p.set(Status::CARRY, sum > 0xFF);
        self.p.set(Status::OVERFLOW, overflow);
        self.a = result;
        self.p.set_zn(result);
    }

    fn compare(&mut self, register: u8, value: u8) {
        let diff = register.wrapping_sub(value);
        self.p.set(Status::CARRY, register >= value);
        self.p.set_zn(diff);
    }
}

#[cfg(test)]
mod tests {
    use crate::{bus::mock::MockBus, cpu::status::Status};

    fn run_one(program: &[u8], setup: impl FnOnce(&mut crate::cpu::Cpu)) -> crate::cpu::Cpu {
        let mut bus = MockBus::with_program(0x0200, program);
        let mut cpu = bus.cpu_at(0x0200);
        setup(&mut cpu);
        cpu.step(&mut bus);
        cpu
    }

    #[test]
    fn adc_carries_out_of_ff() {
        let cpu = run_one(&[0x69, 0x01], |cpu| {
            cpu.a = 0xFF;
            cpu.p.remove(Status::CARRY);
        });
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.p.contains(Status::CARRY));
        assert!(cpu.p.contains(Status::ZERO));
        assert!(!cpu.p.contains(Status::OVERFLOW));
        assert!(!cpu.p.contains(Status::NEGATIVE));
    }

    #[test]
    fn adc_signed_overflow() {
        let cpu = run_one(&[0x69, 0x50], |cpu| cpu.a = 0x50);
        assert_eq!(cpu.a, 0xA0);
        assert!(cpu.p.contains(Status::OVERFLOW));
        assert!(cpu.p.contains(Status::NEGATIVE));
        assert!(!cpu.p.contains(Status::CARRY));
    }

    #[test]
    fn adc_uses_carry_in_and_ignores_decimal_flag() {
        let cpu = run_one(&[0x69, 0x09], |cpu| {
            cpu.a = 0x09;
            cpu.p.insert(Status::CARRY | Status::DECIMAL);
        });
        assert_eq!(cpu.a, 0x13);
    }

    #[test]
    fn sbc_borrows_when_carry_clear() {
        let cpu = run_one(&[0xE9, 0x01], |cpu| {
            cpu.a = 0x00;
            cpu.p.insert(Status::CARRY);
        });
        assert_eq!(cpu.a, 0xFF);
        assert!(!cpu.p.contains(Status::CARRY));
        assert!(cpu.p.contains(Status::NEGATIVE));

        let cpu = run_one(&[0xE9, 0x01], |cpu| {
            cpu.a = 0x05;
            cpu.p.remove(Status::CARRY);
        });
        assert_eq!(cpu.a, 0x03);
        assert!(cpu.p.contains(Status::CARRY));
    }

    #[test]
    fn sbc_signed_overflow() {
        let cpu = run_one(&[0xE9, 0x01], |cpu| {
            cpu.a = 0x80;
            cpu.p.insert(Status::CARRY);
        });
        assert_eq!(cpu.a, 0x7F);
        assert!(cpu.p.contains(Status::OVERFLOW));
    }

    #[test]
    fn cmp_equal_and_less() {
        let cpu = run_one(&[0xC9, 0x05], |cpu| cpu.a = 0x05);
        assert!(cpu.p.contains(Status::ZERO));
        assert!(cpu.p.contains(Status::CARRY));

        let cpu = run_one(&[0xC9, 0x05], |cpu| cpu.a = 0x03);
        assert!(!cpu.p.contains(Status::CARRY));
        assert!(cpu.p.contains(Status::NEGATIVE));
        assert!(!cpu.p.contains(Status::ZERO));
    }

    #[test]
    fn cpx_cpy_compare_their_register() {
        let cpu = run_one(&[0xE0, 0x10], |cpu| cpu.x = 0x20);
        assert!(cpu.p.contains(Status::CARRY));
        assert!(!cpu.p.contains(Status::ZERO));

        let cpu = run_one(&[0xC0, 0x30], |cpu| cpu.y = 0x20);
        assert!(!cpu.p.contains(Status::CARRY));
    }
}
