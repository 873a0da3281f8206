use std::fmt;

use super::error::{Error, Result};
use super::registers::NUM_REGISTERS;
use crate::util::bit_splitter::BitSplitter;

/// A wrapper for addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Addr(pub u16);

/// A register identifier, always in `0..=0xF`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Reg(u8);

/// A wrapper for constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Const(pub u8);

impl Reg {
    pub const V0: Reg = Reg(0x0);
    /// The flag register.
    pub const VF: Reg = Reg(0xF);

    pub fn new(index: usize) -> Result<Reg> {
        if index < NUM_REGISTERS {
            Ok(Reg(index as u8))
        } else {
            Err(Error::RegisterOutOfBounds { index })
        }
    }

    /// Registers decoded from an opcode are a single nibble and always valid.
    pub(crate) fn from_nibble(nibble: u8) -> Reg {
        Reg(nibble & 0xF)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single instruction from the CHIP-8 instruction set.
/// Two bytes written in hexadecimal, with the following special characters:
/// - NNN: address
/// - NN: 8-bit constant
/// - N: 4-bit constant
/// - X and Y: 4-bit register identifier
/// - PC: Program counter
/// - I: 16 bit register for memory address
/// - VN: One of the 16 available variables (register identifiers)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen, // 00E0
    Return, // 00EE
    Exec(Addr), // 0NNN, a plain jump here
    Goto(Addr), // 1NNN
    Call(Addr), // 2NNN
    SkipIfRegEqConst(Reg, Const), // 3XNN
    SkipIfRegNeqConst(Reg, Const), // 4XNN
    SkipIfRegEqReg(Reg, Reg), // 5XY_
    SetRegToConst(Reg, Const), // 6XNN
    IncRegByConst(Reg, Const), // 7XNN
    SetRegToReg(Reg, Reg), // 8XY0
    BitwiseOr(Reg, Reg), // 8XY1
    BitwiseAnd(Reg, Reg), // 8XY2
    BitwiseXor(Reg, Reg), // 8XY3
    IncRegByReg(Reg, Reg), // 8XY4
    DecRegByReg(Reg, Reg), // 8XY5
    BitshiftRight(Reg), // 8XY6
    SetVxVyMinusVx(Reg, Reg), // 8XY7
    BitshiftLeft(Reg), // 8XYE
    SkipIfRegNeqReg(Reg, Reg), // 9XY_
    SetI(Addr), // ANNN
    SetPcToV0PlusAddr(Addr), // BNNN
    SetVxRand(Reg, Const), // CXNN
    Draw(Reg, Reg, Const), // DXYN
    SkipIfKeyPressed(Reg), // EX9E
    SkipIfKeyNotPressed(Reg), // EXA1
    SetRegToDelayTimer(Reg), // FX07
    WaitForKey(Reg), // FX0A
    SetDelayTimerToReg(Reg), // FX15
    SetSoundTimerToReg(Reg), // FX18
    AddRegToI(Reg), // FX1E
    SetIToSpriteAddrVx(Reg), // FX29
    SetIToBcdOfReg(Reg), // FX33
    RegDump(Reg), // FX55
    RegLoad(Reg), // FX65
    Ignored(u16), // unlisted EX__ and FX__
}

impl Instruction {

    /// Decode an instruction word. Only unknown `8XY_` arithmetic is an error,
    /// unknown key and timer sub-opcodes decode to [`Instruction::Ignored`].
    pub fn decode(word: u16) -> Result<Instruction> {
        use Instruction::*;

        let opcode = BitSplitter::from_u16(word);
        let (class, x, y, n) = opcode.as_four_u8();
        let (vx, vy) = (Reg::from_nibble(x), Reg::from_nibble(y));
        let addr = Addr(opcode.last_12_bits());
        let kk = Const(opcode.last_8_bits());

        let instruction = match class {
            0x0 => match word {
                0x00E0 => ClearScreen,
                0x00EE => Return,
                _ => Exec(addr),
            },
            0x1 => Goto(addr),
            0x2 => Call(addr),
            0x3 => SkipIfRegEqConst(vx, kk),
            0x4 => SkipIfRegNeqConst(vx, kk),
            0x5 => SkipIfRegEqReg(vx, vy),
            0x6 => SetRegToConst(vx, kk),
            0x7 => IncRegByConst(vx, kk),
            0x8 => match n {
                0x0 => SetRegToReg(vx, vy),
                0x1 => BitwiseOr(vx, vy),
                0x2 => BitwiseAnd(vx, vy),
                0x3 => BitwiseXor(vx, vy),
                0x4 => IncRegByReg(vx, vy),
                0x5 => DecRegByReg(vx, vy),
                0x6 => BitshiftRight(vx),
                0x7 => SetVxVyMinusVx(vx, vy),
                0xE => BitshiftLeft(vx),
                _ => {
                    log::error!("Unknown opcode {:#06x}", word);
                    return Err(Error::UnsupportedOpcode(word));
                }
            },
            0x9 => SkipIfRegNeqReg(vx, vy),
            0xA => SetI(addr),
            0xB => SetPcToV0PlusAddr(addr),
            0xC => SetVxRand(vx, kk),
            0xD => Draw(vx, vy, Const(n)),
            0xE => match kk.0 {
                0x9E => SkipIfKeyPressed(vx),
                0xA1 => SkipIfKeyNotPressed(vx),
                _ => Ignored(word),
            },
            _ => match kk.0 {
                0x07 => SetRegToDelayTimer(vx),
                0x0A => WaitForKey(vx),
                0x15 => SetDelayTimerToReg(vx),
                0x18 => SetSoundTimerToReg(vx),
                0x1E => AddRegToI(vx),
                0x29 => SetIToSpriteAddrVx(vx),
                0x33 => SetIToBcdOfReg(vx),
                0x55 => RegDump(vx),
                0x65 => RegLoad(vx),
                _ => Ignored(word),
            },
        };
        Ok(instruction)
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X}", self.0)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05x}", self.0)
    }
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// Conventional assembler mnemonics.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Exec(a) => write!(f, "SYS {}", a),
            Goto(a) => write!(f, "JP {}", a),
            Call(a) => write!(f, "CALL {}", a),
            SkipIfRegEqConst(x, k) => write!(f, "SE {}, {}", x, k),
            SkipIfRegNeqConst(x, k) => write!(f, "SNE {}, {}", x, k),
            SkipIfRegEqReg(x, y) => write!(f, "SE {}, {}", x, y),
            SetRegToConst(x, k) => write!(f, "LD {}, {}", x, k),
            IncRegByConst(x, k) => write!(f, "ADD {}, {}", x, k),
            SetRegToReg(x, y) => write!(f, "LD {}, {}", x, y),
            BitwiseOr(x, y) => write!(f, "OR {}, {}", x, y),
            BitwiseAnd(x, y) => write!(f, "AND {}, {}", x, y),
            BitwiseXor(x, y) => write!(f, "XOR {}, {}", x, y),
            IncRegByReg(x, y) => write!(f, "ADD {}, {}", x, y),
            DecRegByReg(x, y) => write!(f, "SUB {}, {}", x, y),
            BitshiftRight(x) => write!(f, "SHR {}", x),
            SetVxVyMinusVx(x, y) => write!(f, "SUBN {}, {}", x, y),
            BitshiftLeft(x) => write!(f, "SHL {}", x),
            SkipIfRegNeqReg(x, y) => write!(f, "SNE {}, {}", x, y),
            SetI(a) => write!(f, "LD I, {}", a),
            SetPcToV0PlusAddr(a) => write!(f, "JP V0, {}", a),
            SetVxRand(x, k) => write!(f, "RND {}, {}", x, k),
            Draw(x, y, Const(n)) => write!(f, "DRW {}, {}, {}", x, y, n),
            SkipIfKeyPressed(x) => write!(f, "SKP {}", x),
            SkipIfKeyNotPressed(x) => write!(f, "SKNP {}", x),
            SetRegToDelayTimer(x) => write!(f, "LD {}, DT", x),
            WaitForKey(x) => write!(f, "LD {}, K", x),
            SetDelayTimerToReg(x) => write!(f, "LD DT, {}", x),
            SetSoundTimerToReg(x) => write!(f, "LD ST, {}", x),
            AddRegToI(x) => write!(f, "ADD I, {}", x),
            SetIToSpriteAddrVx(x) => write!(f, "LD F, {}", x),
            SetIToBcdOfReg(x) => write!(f, "LD B, {}", x),
            RegDump(x) => write!(f, "LD [I], {}", x),
            RegLoad(x) => write!(f, "LD {}, [I]", x),
            Ignored(word) => write!(f, ".word {:#06x}", word),
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use test_case::test_case;

    fn reg(index: usize) -> Reg {
        Reg::new(index).unwrap()
    }

    #[test]
    fn opcodes_are_parsed_correctly() {
        use Instruction::*;

        let cases = [
            (0x00E0, ClearScreen),
            (0x00EE, Return),
            (0x0123, Exec(Addr(0x123))),
            (0x1025, Goto(Addr(0x25))),
            (0x2037, Call(Addr(0x37))),
            (0x3A08, SkipIfRegEqConst(reg(0xA), Const(8))),
            (0x4A08, SkipIfRegNeqConst(reg(0xA), Const(8))),
            (0x5AB0, SkipIfRegEqReg(reg(0xA), reg(0xB))),
            (0x6B23, SetRegToConst(reg(0xB), Const(0x23))),
            (0x7CA1, IncRegByConst(reg(0xC), Const(0xA1))),
            (0x8AB0, SetRegToReg(reg(0xA), reg(0xB))),
            (0x8DE1, BitwiseOr(reg(0xD), reg(0xE))),
            (0x8DE2, BitwiseAnd(reg(0xD), reg(0xE))),
            (0x8DE3, BitwiseXor(reg(0xD), reg(0xE))),
            (0x8AB4, IncRegByReg(reg(0xA), reg(0xB))),
            (0x8AB5, DecRegByReg(reg(0xA), reg(0xB))),
            (0x8AB6, BitshiftRight(reg(0xA))),
            (0x8AB7, SetVxVyMinusVx(reg(0xA), reg(0xB))),
            (0x8A0E, BitshiftLeft(reg(0xA))),
            (0x9AB0, SkipIfRegNeqReg(reg(0xA), reg(0xB))),
            (0xA025, SetI(Addr(0x25))),
            (0xB025, SetPcToV0PlusAddr(Addr(0x25))),
            (0xCA23, SetVxRand(reg(0xA), Const(0x23))),
            (0xDABC, Draw(reg(0xA), reg(0xB), Const(0xC))),
            (0xEA9E, SkipIfKeyPressed(reg(0xA))),
            (0xEAA1, SkipIfKeyNotPressed(reg(0xA))),
            (0xFA07, SetRegToDelayTimer(reg(0xA))),
            (0xFA0A, WaitForKey(reg(0xA))),
            (0xFA15, SetDelayTimerToReg(reg(0xA))),
            (0xFA18, SetSoundTimerToReg(reg(0xA))),
            (0xFA1E, AddRegToI(reg(0xA))),
            (0xFA29, SetIToSpriteAddrVx(reg(0xA))),
            (0xFA33, SetIToBcdOfReg(reg(0xA))),
            (0xFA55, RegDump(reg(0xA))),
            (0xFA65, RegLoad(reg(0xA))),
        ];

        for (word, expected) in cases.iter() {
            assert_eq!(*expected, Instruction::decode(*word).unwrap(), "decoding {:#06x}", word);
        }
    }

    #[test_case(0x8AB8 ; "eight")]
    #[test_case(0x8AB9 ; "nine")]
    #[test_case(0x8ABA ; "ten")]
    #[test_case(0x8ABF ; "fifteen")]
    fn unknown_arithmetic_is_unsupported(word: u16) {
        match Instruction::decode(word) {
            Err(Error::UnsupportedOpcode(w)) => assert_eq!(w, word),
            other => panic!("expected UnsupportedOpcode, got {:?}", other),
        }
    }

    #[test_case(0xE000 ; "unknown key op")]
    #[test_case(0xF0FF ; "unknown misc op")]
    fn unknown_key_and_misc_ops_are_ignored(word: u16) {
        assert_eq!(Instruction::decode(word).unwrap(), Instruction::Ignored(word));
    }

    #[test]
    fn skips_ignore_the_last_nibble() {
        assert_eq!(Instruction::decode(0x5AB7).unwrap(), Instruction::SkipIfRegEqReg(reg(0xA), reg(0xB)));
        assert_eq!(Instruction::decode(0x9AB1).unwrap(), Instruction::SkipIfRegNeqReg(reg(0xA), reg(0xB)));
    }

    #[test]
    fn registers_outside_the_bank_are_rejected() {
        assert!(Reg::new(15).is_ok());
        assert!(matches!(Reg::new(16), Err(Error::RegisterOutOfBounds { index: 16 })));
    }

    #[test_case(0x6A02 => "LD VA, 0x02".to_string() ; "load constant")]
    #[test_case(0x00E0 => "CLS".to_string() ; "clear")]
    #[test_case(0xA2F0 => "LD I, 0x2f0".to_string() ; "set index")]
    #[test_case(0xD125 => "DRW V1, V2, 5".to_string() ; "draw")]
    #[test_case(0xF30A => "LD V3, K".to_string() ; "wait for key")]
    fn mnemonics(word: u16) -> String {
        Instruction::decode(word).unwrap().to_string()
    }
}
