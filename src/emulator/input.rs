use std::fmt;

pub const NUM_KEYS: u8 = 16;

/// The set of currently held keys, one bit per key `0x0..=0xF`.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad(u16);

impl Keypad {
    pub fn empty() -> Keypad {
        Keypad(0)
    }

    pub fn from_bits(bits: u16) -> Keypad {
        Keypad(bits)
    }

    pub fn with_key(key: u8) -> Keypad {
        let mut keypad = Keypad::empty();
        keypad.press(key);
        keypad
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    /// Keys outside the pad are ignored.
    pub fn press(&mut self, key: u8) {
        if key < NUM_KEYS {
            self.0 |= 1 << key;
        }
    }

    pub fn release(&mut self, key: u8) {
        if key < NUM_KEYS {
            self.0 &= !(1 << key);
        }
    }

    /// Keys outside the pad are never pressed.
    pub fn is_pressed(self, key: u8) -> bool {
        key < NUM_KEYS && self.0 & (1 << key) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn lowest_pressed(self) -> Option<u8> {
        if self.is_empty() {
            None
        } else {
            Some(self.0.trailing_zeros() as u8)
        }
    }
}

impl fmt::Debug for Keypad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypad({:#018b})", self.0)
    }
}

/// Represents an input device that reports which of the keys `0x0..=0xF` are held.
/// Polled once per emulator step, so it must hand out a complete snapshot.
pub trait EmulatorInput {
    fn read(&mut self) -> Keypad;
}

/// An input device that never provides any input
pub struct DummyInput;

impl EmulatorInput for DummyInput {
    fn read(&mut self) -> Keypad {
        Keypad::empty()
    }
}

impl<T: EmulatorInput + ?Sized> EmulatorInput for Box<T> {
    fn read(&mut self) -> Keypad {
        (**self).read()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn press_and_release() {
        let mut keypad = Keypad::empty();
        keypad.press(0xA);
        keypad.press(0x3);
        assert!(keypad.is_pressed(0xA));
        assert!(keypad.is_pressed(0x3));
        assert!(!keypad.is_pressed(0x4));
        assert_eq!(keypad.bits(), 0b0000_0100_0000_1000);

        keypad.release(0xA);
        assert!(!keypad.is_pressed(0xA));
    }

    #[test]
    fn lowest_pressed_key_wins() {
        assert_eq!(Keypad::empty().lowest_pressed(), None);
        assert_eq!(Keypad::from_bits(0b1010_0000).lowest_pressed(), Some(5));
        assert_eq!(Keypad::with_key(0xF).lowest_pressed(), Some(0xF));
    }

    #[test]
    fn keys_outside_the_pad() {
        let mut keypad = Keypad::empty();
        keypad.press(16);
        assert!(keypad.is_empty());
        assert!(!Keypad::from_bits(0xFFFF).is_pressed(200));
    }
}
