/// A structure for easily splitting an opcode
/// into different formats, such as a single `u16`,
/// four nibbles or similar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitSplitter(u16);

impl BitSplitter {

    pub fn from_u16(value: u16) -> BitSplitter {
        BitSplitter(value)
    }

    /// Combine two bytes in big-endian order, as they are laid out in memory.
    pub fn from_two_u8(left: u8, right: u8) -> BitSplitter {
        BitSplitter(u16::from_be_bytes([left, right]))
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// All four nibbles, most significant first.
    pub fn as_four_u8(&self) -> (u8, u8, u8, u8) {
        (self.nibble(0), self.nibble(1), self.nibble(2), self.nibble(3))
    }

    /// The `n`th nibble counted from the most significant end.
    /// Only the lowest two bits of `n` are used.
    pub fn nibble(&self, n: usize) -> u8 {
        let shift = 4 * (3 - (n & 0b11));
        ((self.0 >> shift) & 0xF) as u8
    }

    pub fn last_8_bits(&self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    pub fn last_12_bits(&self) -> u16 {
        self.0 & 0x0FFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nibbles_are_most_significant_first() {
        assert_eq!((0xA, 0xB, 0xC, 0xD), BitSplitter::from_u16(0xABCD).as_four_u8());
        assert_eq!(0xA, BitSplitter::from_u16(0xABCD).nibble(0));
        assert_eq!(0xD, BitSplitter::from_u16(0xABCD).nibble(3));
    }

    #[test]
    fn two_bytes_are_big_endian() {
        assert_eq!(0x1234, BitSplitter::from_two_u8(0x12, 0x34).as_u16());
    }

    #[test]
    fn low_fields() {
        assert_eq!(0xBCD, BitSplitter::from_u16(0xABCD).last_12_bits());
        assert_eq!(0xCD, BitSplitter::from_u16(0xABCD).last_8_bits());
        assert_eq!(0x000, BitSplitter::from_u16(0xF000).last_12_bits());
    }
}
