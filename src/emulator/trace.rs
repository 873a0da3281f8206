use std::fmt;

use super::instruction::Instruction;

/// A record of one executed instruction, for debugging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceLine {
    /// Address the instruction was fetched from.
    pub pc: u16,
    pub opcode: u16,
    pub instruction: Instruction,
}

impl fmt::Display for TraceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}  {:#06x}  {}", self.pc, self.opcode, self.instruction)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn renders_address_opcode_and_mnemonic() {
        let line = TraceLine {
            pc: 0x200,
            opcode: 0x6A02,
            instruction: Instruction::decode(0x6A02).unwrap(),
        };
        assert_eq!(line.to_string(), "0x0200  0x6a02  LD VA, 0x02");
    }
}
