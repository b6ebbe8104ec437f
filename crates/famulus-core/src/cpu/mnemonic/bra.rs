use crate::{
    bus::Bus,
    cpu::{Cpu, status::Status},
};

impl Cpu {
    /// 2 cycles untaken, 3 taken, 4 when the target sits in another page.
    fn branch_if(&mut self, bus: &mut impl Bus, condition: bool) {
        let offset = self.fetch_byte(bus) as i8;
        if !condition {
            return;
        }
        bus.read(self.pc);
        let target = self.pc.wrapping_add_signed(i16::from(offset));
        if (target ^ self.pc) & 0xFF00 != 0 {
            bus.read((self.pc & 0xFF00) | (target & 0x00FF));
        }
        self.pc = target;
    }

    pub(super) fn bcc(&mut self, bus: &mut impl Bus) {
        let taken = !self.p.contains(Status::CARRY);
        self.branch_if(bus, taken);
    }

    pub(super) fn bcs(&mut self, bus: &mut impl Bus) {
        let taken = self.p.contains(Status::CARRY);
        self.branch_if(bus, taken);
    }

    pub(super) fn beq(&mut self, bus: &mut impl Bus) {
        let taken = self.p.contains(Status::ZERO);
        self.branch_if(bus, taken);
    }

    pub(super) fn bne(&mut self, bus: &mut impl Bus) {
        let taken = !self.p.contains(Status::ZERO);
        self.branch_if(bus, taken);
    }

    pub(super) fn bmi(&mut self, bus: &mut impl Bus) {
        let taken = self.p.contains(Status::NEGATIVE);
        self.branch_if(bus, taken);
    }

    pub(super) fn bpl(&mut self, bus: &mut impl Bus) {
        let taken = !self.p.contains(Status::NEGATIVE);
        self.branch_if(bus, taken);
    }

    pub(super) fn bvc(&mut self, bus: &mut impl Bus) {
        let taken = !self.p.contains(Status::OVERFLOW);
        self.branch_if(bus, taken);
    }

    pub(super) fn bvs(&mut self, bus: &mut impl Bus) {
        let taken = self.p.contains(Status::OVERFLOW);
        self.branch_if(bus, taken);
    }
}
