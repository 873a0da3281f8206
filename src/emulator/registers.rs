use std::ops::{Index, IndexMut};

use super::instruction::Reg;

pub const NUM_REGISTERS: usize = 16;

/// The sixteen general purpose registers `V0..=VF`.
/// `VF` doubles as the carry, borrow and collision flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registers([u8; NUM_REGISTERS]);

impl Registers {
    pub fn new() -> Registers {
        Registers::default()
    }

    pub fn flag(&self) -> u8 {
        self[Reg::VF]
    }

    pub fn set_flag(&mut self, set: bool) {
        self[Reg::VF] = set as u8;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl Index<Reg> for Registers {
    type Output = u8;

    fn index(&self, reg: Reg) -> &u8 {
        &self.0[reg.index()]
    }
}

impl IndexMut<Reg> for Registers {
    fn index_mut(&mut self, reg: Reg) -> &mut u8 {
        &mut self.0[reg.index()]
    }
}
